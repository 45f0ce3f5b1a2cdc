//! Flattens a [`RecordSet`] into indexed knowledge-base documents.

use std::collections::HashSet;

use kbase_core::records::RecordSet;
use kbase_core::traits::Embedder;
use kbase_core::types::{Category, Document};
use kbase_embed::get_default_embedder;
use tracing::{info, warn};

/// An immutable, fully built document set.
///
/// `fingerprint` identifies the record set it was built from; two knowledge
/// bases with equal fingerprints hold identical documents.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    fingerprint: String,
    documents: Vec<Document>,
}

impl KnowledgeBase {
    pub fn fingerprint(&self) -> &str { &self.fingerprint }
    pub fn documents(&self) -> &[Document] { &self.documents }
    pub fn len(&self) -> usize { self.documents.len() }
    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
    pub fn get(&self, id: &str) -> Option<&Document> { self.documents.iter().find(|d| d.id == id) }
}

/// Hex digest of the record set's canonical JSON.
pub fn fingerprint(records: &RecordSet) -> kbase_core::Result<String> {
    let json = records.canonical_json()?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

pub struct KnowledgeBaseBuilder {
    embedder: Box<dyn Embedder>,
}

impl Default for KnowledgeBaseBuilder {
    fn default() -> Self { Self::new(get_default_embedder()) }
}

impl KnowledgeBaseBuilder {
    pub fn new(embedder: Box<dyn Embedder>) -> Self { Self { embedder } }

    fn doc(&self, id: String, category: Category, content: String) -> Document {
        let vector = self.embedder.embed(&content);
        Document { id, category, content, vector }
    }

    /// Documents in knowledge-base order: company, representative, services
    /// (each followed by its features), values, FAQ, case studies, contact.
    pub fn build(&self, records: &RecordSet) -> Vec<Document> {
        let mut docs = Vec::new();
        let mut seen = HashSet::new();
        let mut emit = |id: String, category: Category, content: String| -> String {
            let id = unique_id(id, &mut seen);
            docs.push(self.doc(id.clone(), category, content));
            id
        };

        if let Some(c) = &records.company {
            let name = if c.japanese_name.is_empty() {
                c.name.clone()
            } else {
                format!("{}（{}）", c.name, c.japanese_name)
            };
            let content = format!(
                "{}は{}。{}年に設立され、{}に本社を構えています。",
                name, c.description, c.founded, c.location
            );
            emit("company-basic".into(), Category::Company, content);
        }

        if let Some(r) = &records.representative {
            let content = format!("代表取締役CEOの{}です。{} {}", r.name, r.message, r.background);
            emit("representative".into(), Category::Representative, content);
        }

        for (index, service) in records.services.iter().enumerate() {
            let key = if service.id.trim().is_empty() { index.to_string() } else { service.id.clone() };
            let content = format!(
                "{}: {} 対象: {} 料金: {}",
                service.name, service.description, service.target, service.price
            );
            let service_id = emit(format!("service-{key}"), Category::Service, content);
            for (i, feature) in service.features.iter().enumerate() {
                let content = format!("{} feature: {}", service.name, feature);
                emit(format!("{service_id}-feature-{i}"), Category::ServiceFeature, content);
            }
        }

        for (i, value) in records.company_values.iter().enumerate() {
            let content = format!("{}: {}", value.title, value.description);
            emit(format!("value-{i}"), Category::Values, content);
        }

        for (i, faq) in records.faq.iter().enumerate() {
            let content = format!("Q: {} A: {}", faq.question, faq.answer);
            emit(format!("faq-{i}"), Category::Faq, content);
        }

        for (i, case) in records.case_studies.iter().enumerate() {
            let content = format!(
                "{}: {} 業界: {} 成果: {}",
                case.title,
                case.description,
                case.industry,
                case.results.join(", ")
            );
            emit(format!("case-{i}"), Category::CaseStudy, content);
        }

        if let Some(c) = &records.contact {
            let content = format!(
                "連絡先: {} 営業時間: {} 初回相談: {} 回答時間: {}",
                c.office, c.business_hours, c.consultation, c.response_time
            );
            emit("contact".into(), Category::Contact, content);
        }

        docs
    }

    pub fn build_knowledge_base(&self, records: &RecordSet) -> kbase_core::Result<KnowledgeBase> {
        let fingerprint = fingerprint(records)?;
        let documents = self.build(records);
        info!(documents = documents.len(), fingerprint = %&fingerprint[..12], "built knowledge base");
        Ok(KnowledgeBase { fingerprint, documents })
    }
}

/// `id` if no earlier document in this build used it, otherwise `id-N` with
/// the smallest free `N` starting at 1.
fn unique_id(id: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let unique = (1..)
        .map(|n| format!("{id}-{n}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| id.clone());
    warn!(document_id = %id, renamed = %unique, "duplicate document id; suffixing");
    seen.insert(unique.clone());
    unique
}

/// Builds documents with the default term-frequency embedder.
pub fn build(records: &RecordSet) -> Vec<Document> {
    KnowledgeBaseBuilder::default().build(records)
}
