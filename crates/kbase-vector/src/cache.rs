//! In-memory knowledge-base cache keyed by the record set's content hash.
//!
//! The built document set is swapped as a whole `Arc`, so concurrent readers
//! only ever observe a complete knowledge base.

use std::sync::{Arc, RwLock};

use kbase_core::error::{Error, Result};
use kbase_core::records::RecordSet;
use tracing::{debug, info};

use crate::index_build::{fingerprint, KnowledgeBase, KnowledgeBaseBuilder};

pub struct KnowledgeBaseCache {
    builder: KnowledgeBaseBuilder,
    current: RwLock<Option<Arc<KnowledgeBase>>>,
}

impl Default for KnowledgeBaseCache {
    fn default() -> Self { Self::new(KnowledgeBaseBuilder::default()) }
}

impl KnowledgeBaseCache {
    pub fn new(builder: KnowledgeBaseBuilder) -> Self {
        Self { builder, current: RwLock::new(None) }
    }

    /// Cached knowledge base for `records`, rebuilt when their fingerprint
    /// differs from the cached one. Readers holding an earlier `Arc` keep
    /// the complete old document set.
    pub fn get_or_build(&self, records: &RecordSet) -> Result<Arc<KnowledgeBase>> {
        let fp = fingerprint(records)?;
        if let Some(kb) = self.current()? {
            if kb.fingerprint() == fp {
                debug!("knowledge base cache hit");
                return Ok(kb);
            }
        }
        let kb = Arc::new(self.builder.build_knowledge_base(records)?);
        let mut guard = self.current.write().map_err(|_| Error::Operation("knowledge base cache lock poisoned".into()))?;
        // another thread may have finished the same rebuild first
        if let Some(existing) = guard.as_ref() {
            if existing.fingerprint() == kb.fingerprint() {
                return Ok(Arc::clone(existing));
            }
        }
        *guard = Some(Arc::clone(&kb));
        info!(documents = kb.len(), "knowledge base cache rebuilt");
        Ok(kb)
    }

    pub fn current(&self) -> Result<Option<Arc<KnowledgeBase>>> {
        let guard = self.current.read().map_err(|_| Error::Operation("knowledge base cache lock poisoned".into()))?;
        Ok(guard.clone())
    }

    pub fn invalidate(&self) -> Result<()> {
        let mut guard = self.current.write().map_err(|_| Error::Operation("knowledge base cache lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}
