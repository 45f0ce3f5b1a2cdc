//! Domain types shared by the keyword, vector and hybrid engines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type DocumentId = String;

/// Sparse bag-of-words vector: term → occurrence count.
pub type TermFrequencyMap = HashMap<String, u32>;

/// Source category of a knowledge-base document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Company,
    Representative,
    Service,
    ServiceFeature,
    Values,
    Faq,
    CaseStudy,
    Contact,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Company,
        Category::Representative,
        Category::Service,
        Category::ServiceFeature,
        Category::Values,
        Category::Faq,
        Category::CaseStudy,
        Category::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Company => "company",
            Category::Representative => "representative",
            Category::Service => "service",
            Category::ServiceFeature => "service-feature",
            Category::Values => "values",
            Category::Faq => "faq",
            Category::CaseStudy => "case-study",
            Category::Contact => "contact",
        }
    }

    /// Display label used when rendering results for people.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Company => "会社概要",
            Category::Representative => "代表者",
            Category::Service => "サービス",
            Category::ServiceFeature => "サービスの機能",
            Category::Values => "企業理念",
            Category::Faq => "よくある質問",
            Category::CaseStudy => "導入事例",
            Category::Contact => "連絡先",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One indexed snippet of the knowledge base.
///
/// - `id`: deterministic from the source record, unique within one build
/// - `category`: which kind of record produced it
/// - `content`: the text handed back to callers
/// - `vector`: term frequencies of `content`, computed at build time
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub category: Category,
    pub content: String,
    #[serde(skip)]
    pub vector: TermFrequencyMap,
}

/// Indicates which retrieval stage produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Keyword,
    Vector,
}

/// A category selected by the keyword router, with the confidence assigned to
/// every document of that category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryMatch {
    pub category: Category,
    pub confidence: f32,
}

/// A document together with its score for one query.
///
/// `similarity` is in `[0, 1]`; for keyword matches it is the rule confidence,
/// for vector matches the cosine similarity.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: Document,
    pub similarity: f32,
    #[serde(rename = "matchType")]
    pub match_type: MatchType,
}

impl ScoredDocument {
    pub fn new(document: Document, similarity: f32, match_type: MatchType) -> Self {
        Self { document, similarity, match_type }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    pub fn category(&self) -> Category {
        self.document.category
    }

    pub fn content(&self) -> &str {
        &self.document.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_match_serde() {
        for c in Category::ALL {
            let json = serde_json::to_string(&c).expect("serialize");
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn scored_document_serializes_flat_without_vector() {
        let mut vector = TermFrequencyMap::new();
        vector.insert("faq".to_string(), 1);
        let doc = Document { id: "faq-0".into(), category: Category::Faq, content: "Q: a A: b".into(), vector };
        let scored = ScoredDocument::new(doc, 0.5, MatchType::Vector);
        let v: serde_json::Value = serde_json::to_value(&scored).expect("serialize");
        assert_eq!(v["id"], "faq-0");
        assert_eq!(v["category"], "faq");
        assert_eq!(v["matchType"], "vector");
        assert_eq!(v["content"], "Q: a A: b");
        assert!(v.get("match_type").is_none());
        assert!(v.get("vector").is_none());
    }
}
