//! kbase-keyword
//!
//! Rule-based routing of a query to knowledge-base categories. Each rule is a
//! list of substrings; any hit assigns the rule's fixed confidence to every
//! document of its category. Rules are evaluated in order and are not
//! exclusive.

use kbase_core::traits::CategoryRouter;
use kbase_core::types::{Category, CategoryMatch};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    pub category: Category,
    pub confidence: f32,
    /// Lowercase substrings; matched against the lowercased query.
    pub terms: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: Category, confidence: f32, terms: &[&str]) -> Self {
        Self { category, confidence, terms: terms.iter().map(|t| t.to_lowercase()).collect() }
    }

    pub fn matches(&self, lowered_query: &str) -> bool {
        self.terms.iter().any(|t| !t.is_empty() && lowered_query.contains(t.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct KeywordRouter {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordRouter {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl KeywordRouter {
    pub fn new(rules: Vec<KeywordRule>) -> Self { Self { rules } }

    pub fn rules(&self) -> &[KeywordRule] { &self.rules }

    /// Appends `terms` to the first rule for `category`, or adds a new rule
    /// with `confidence` if there is none.
    pub fn with_terms<I, S>(mut self, category: Category, confidence: f32, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() { return self; }
        match self.rules.iter_mut().find(|r| r.category == category) {
            Some(rule) => {
                for t in terms {
                    if !rule.terms.contains(&t) { rule.terms.push(t); }
                }
            }
            None => self.rules.push(KeywordRule { category, confidence, terms }),
        }
        self
    }

    /// Adds company-name tokens to the company rule.
    pub fn with_company_terms<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_terms(Category::Company, COMPANY_CONFIDENCE, terms)
    }

    pub fn route(&self, query: &str) -> Vec<CategoryMatch> {
        let lowered = query.to_lowercase();
        let matches: Vec<CategoryMatch> = self
            .rules
            .iter()
            .filter(|r| r.matches(&lowered))
            .map(|r| CategoryMatch { category: r.category, confidence: r.confidence })
            .collect();
        debug!(query, matched = matches.len(), "keyword routing");
        matches
    }
}

impl CategoryRouter for KeywordRouter {
    fn route(&self, query: &str) -> Vec<CategoryMatch> { Self::route(self, query) }
}

pub const REPRESENTATIVE_CONFIDENCE: f32 = 1.0;
pub const COMPANY_CONFIDENCE: f32 = 0.9;
pub const SERVICE_CONFIDENCE: f32 = 0.8;
pub const CONTACT_CONFIDENCE: f32 = 0.9;

pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(Category::Representative, REPRESENTATIVE_CONFIDENCE, &["代表", "代表者", "ceo", "社長", "取締役"]),
        KeywordRule::new(Category::Company, COMPANY_CONFIDENCE, &["会社", "企業", "概要", "情報"]),
        KeywordRule::new(
            Category::Service,
            SERVICE_CONFIDENCE,
            &["サービス", "料金", "価格", "費用", "コンサル", "consulting", "開発", "development", "ai", "システム", "system"],
        ),
        KeywordRule::new(
            Category::Contact,
            CONTACT_CONFIDENCE,
            &["連絡", "電話", "メール", "住所", "アクセス", "問い合わせ", "inquiry", "contact"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(router: &KeywordRouter, q: &str) -> Vec<Category> {
        router.route(q).into_iter().map(|m| m.category).collect()
    }

    #[test]
    fn representative_query_routes_with_full_confidence() {
        let router = KeywordRouter::default();
        let m = router.route("代表者は誰ですか");
        assert_eq!(m, vec![CategoryMatch { category: Category::Representative, confidence: 1.0 }]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let router = KeywordRouter::default();
        assert_eq!(categories(&router, "Who is the CEO?"), vec![Category::Representative]);
        assert_eq!(categories(&router, "AI Consulting"), vec![Category::Service]);
    }

    #[test]
    fn multiple_rules_fire_in_table_order() {
        let router = KeywordRouter::default();
        assert_eq!(
            categories(&router, "会社の連絡先と料金、社長について"),
            vec![Category::Representative, Category::Company, Category::Service, Category::Contact]
        );
    }

    #[test]
    fn no_match_is_empty() {
        let router = KeywordRouter::default();
        assert!(router.route("hello there").is_empty());
        assert!(router.route("").is_empty());
    }

    #[test]
    fn company_terms_extend_company_rule() {
        let router = KeywordRouter::default().with_company_terms(["Allgens", "  "]);
        let m = router.route("allgensってどんなところ");
        assert_eq!(m, vec![CategoryMatch { category: Category::Company, confidence: 0.9 }]);
        let company_rules = router.rules().iter().filter(|r| r.category == Category::Company).count();
        assert_eq!(company_rules, 1);
    }

    #[test]
    fn extra_rule_for_unrouted_category() {
        let router = KeywordRouter::default().with_terms(Category::Faq, 0.7, ["よくある質問"]);
        let m = router.route("よくある質問を見せて");
        assert_eq!(m, vec![CategoryMatch { category: Category::Faq, confidence: 0.7 }]);
    }
}
