//! kbase-hybrid
//!
//! Keyword-first fusion of the keyword router and the term-vector stage.
//! Keyword matches always precede vector matches; vector matches fill the
//! remaining slots up to `k`.

pub mod context;

use std::collections::HashSet;
use std::sync::Arc;

use kbase_core::config::RetrievalSettings;
use kbase_core::error::{Error, Result};
use kbase_core::records::RecordSet;
use kbase_core::traits::{CategoryRouter, Embedder, SearchEngine, VectorIndexer};
use kbase_core::types::{CategoryMatch, Document, MatchType, ScoredDocument};
use kbase_embed::get_default_embedder;
use kbase_keyword::KeywordRouter;
use kbase_vector::{KnowledgeBase, KnowledgeBaseCache, TermVectorSearch};
use tracing::debug;

pub struct HybridSearchEngine<KR, VI> where KR: CategoryRouter, VI: VectorIndexer {
    keyword: KR,
    vector: VI,
    embedder: Box<dyn Embedder>,
}

/// The rule-table router paired with the cosine scan.
pub type DefaultEngine = HybridSearchEngine<KeywordRouter, TermVectorSearch>;

impl DefaultEngine {
    /// Default rule table extended with `company_terms`, cosine threshold
    /// from the settings.
    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        let keyword = KeywordRouter::default().with_company_terms(&settings.company_terms);
        let vector = TermVectorSearch::new(settings.similarity_threshold);
        Self::new(keyword, vector, get_default_embedder())
    }
}

impl Default for DefaultEngine {
    fn default() -> Self { Self::from_settings(&RetrievalSettings::default()) }
}

impl<KR, VI> HybridSearchEngine<KR, VI> where KR: CategoryRouter, VI: VectorIndexer {
    pub fn new(keyword: KR, vector: VI, embedder: Box<dyn Embedder>) -> Self { Self { keyword, vector, embedder } }

    pub fn query(&self, query: &str, documents: &[Document], k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be greater than 0".into()));
        }
        if query.trim().is_empty() || documents.is_empty() {
            return Ok(Vec::new());
        }
        // 1) keyword routing
        let routes = self.keyword.route(query);
        let keyword_hits = keyword_candidates(&routes, documents);
        // 2) vector similarity
        let q_vec = self.embedder.embed(query);
        let vector_hits = self.vector.search_vec(&q_vec, documents);
        debug!(keyword = keyword_hits.len(), vector = vector_hits.len(), k, "fusing candidates");
        // 3) keyword first, then vector, unique ids
        Ok(fuse(keyword_hits, vector_hits, k))
    }

    pub fn search(&self, query: &str, kb: &KnowledgeBase, k: usize) -> Result<Vec<ScoredDocument>> {
        self.query(query, kb.documents(), k)
    }
}

impl<KR, VI> SearchEngine for HybridSearchEngine<KR, VI> where KR: CategoryRouter, VI: VectorIndexer {
    fn query(&self, query: &str, documents: &[Document], k: usize) -> Result<Vec<ScoredDocument>> { Self::query(self, query, documents, k) }
}

/// Every document of each routed category, in route order and then
/// knowledge-base order, scored with the route's confidence.
pub fn keyword_candidates(routes: &[CategoryMatch], documents: &[Document]) -> Vec<ScoredDocument> {
    routes
        .iter()
        .flat_map(move |route| {
            documents
                .iter()
                .filter(move |d| d.category == route.category)
                .map(move |d| ScoredDocument::new(d.clone(), route.confidence, MatchType::Keyword))
        })
        .collect()
}

/// Concatenates keyword then vector candidates, dropping repeated ids, and
/// stops at `k` results.
pub fn fuse(keyword: Vec<ScoredDocument>, vector: Vec<ScoredDocument>, k: usize) -> Vec<ScoredDocument> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(k);
    for hit in keyword.into_iter().chain(vector) {
        if merged.len() >= k { break; }
        if seen.insert(hit.document.id.clone()) { merged.push(hit); }
    }
    merged
}

/// Engine, knowledge-base cache and default `k` bundled for callers that
/// query the same record set repeatedly.
pub struct Retriever {
    engine: DefaultEngine,
    cache: KnowledgeBaseCache,
    top_k: usize,
}

impl Retriever {
    pub fn new(settings: &RetrievalSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            engine: DefaultEngine::from_settings(settings),
            cache: KnowledgeBaseCache::default(),
            top_k: settings.top_k,
        })
    }

    pub fn top_k(&self) -> usize { self.top_k }

    pub fn knowledge_base(&self, records: &RecordSet) -> Result<Arc<KnowledgeBase>> {
        self.cache.get_or_build(records)
    }

    pub fn retrieve(&self, query: &str, records: &RecordSet) -> Result<Vec<ScoredDocument>> {
        self.retrieve_k(query, records, self.top_k)
    }

    pub fn retrieve_k(&self, query: &str, records: &RecordSet, k: usize) -> Result<Vec<ScoredDocument>> {
        let kb = self.knowledge_base(records)?;
        self.engine.search(query, &kb, k)
    }
}
