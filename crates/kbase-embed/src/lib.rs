//! kbase-embed
//!
//! Bag-of-words "embeddings": term-frequency vectorization of mixed
//! Latin/Japanese text and cosine similarity between the resulting maps.

pub mod similarity;
pub mod tokenize;

pub use similarity::cosine_similarity;
pub use tokenize::vectorize;

use kbase_core::traits::Embedder;
use kbase_core::types::TermFrequencyMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyEmbedder;

impl TermFrequencyEmbedder {
    pub fn new() -> Self { Self }
}

impl Embedder for TermFrequencyEmbedder {
    fn embed(&self, text: &str) -> TermFrequencyMap { vectorize(text) }
}

pub fn get_default_embedder() -> Box<dyn Embedder> {
    Box::new(TermFrequencyEmbedder::new())
}
