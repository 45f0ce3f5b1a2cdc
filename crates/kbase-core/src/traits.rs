use crate::error::Result;
use crate::types::{CategoryMatch, Document, ScoredDocument, TermFrequencyMap};

pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> TermFrequencyMap;
}

pub trait CategoryRouter: Send + Sync {
    fn route(&self, query: &str) -> Vec<CategoryMatch>;
}

pub trait VectorIndexer: Send + Sync {
    /// Documents whose similarity to `query_vec` clears the indexer's
    /// threshold, best first.
    fn search_vec(&self, query_vec: &TermFrequencyMap, documents: &[Document]) -> Vec<ScoredDocument>;
}

pub trait SearchEngine: Send + Sync {
    fn query(&self, query: &str, documents: &[Document], k: usize) -> Result<Vec<ScoredDocument>>;
}
