use kbase_core::config::DEFAULT_SIMILARITY_THRESHOLD;
use kbase_core::traits::VectorIndexer;
use kbase_core::types::{Document, MatchType, ScoredDocument, TermFrequencyMap};
use kbase_embed::cosine_similarity;
use tracing::debug;

/// Exhaustive cosine scan over the knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct TermVectorSearch {
    threshold: f32,
}

impl Default for TermVectorSearch {
    fn default() -> Self { Self::new(DEFAULT_SIMILARITY_THRESHOLD) }
}

impl TermVectorSearch {
    pub fn new(threshold: f32) -> Self { Self { threshold } }

    pub fn threshold(&self) -> f32 { self.threshold }

    /// Documents scoring strictly above the threshold, highest similarity
    /// first; ties keep knowledge-base order.
    pub fn search_vec(&self, query_vec: &TermFrequencyMap, documents: &[Document]) -> Vec<ScoredDocument> {
        if query_vec.is_empty() { return Vec::new(); }
        let mut hits: Vec<ScoredDocument> = documents
            .iter()
            .filter_map(|doc| {
                let score = cosine_similarity(query_vec, &doc.vector);
                (score > self.threshold).then(|| ScoredDocument::new(doc.clone(), score, MatchType::Vector))
            })
            .collect();
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        debug!(candidates = hits.len(), threshold = self.threshold, "vector stage");
        hits
    }
}

impl VectorIndexer for TermVectorSearch {
    fn search_vec(&self, query_vec: &TermFrequencyMap, documents: &[Document]) -> Vec<ScoredDocument> {
        Self::search_vec(self, query_vec, documents)
    }
}
