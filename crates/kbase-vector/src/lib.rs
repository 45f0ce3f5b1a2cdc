//! kbase-vector
//!
//! Term-vector side of retrieval: building the knowledge base from records,
//! caching it across queries, and the cosine similarity stage.

pub mod cache;
pub mod index_build;
pub mod search;

pub use cache::KnowledgeBaseCache;
pub use index_build::{build, fingerprint, KnowledgeBase, KnowledgeBaseBuilder};
pub use search::TermVectorSearch;
