use std::collections::HashSet;

use kbase_core::config::RetrievalSettings;
use kbase_core::records::{Record, RecordSet, Representative};
use kbase_core::types::{Category, MatchType};
use kbase_hybrid::context::{format_context, NO_RESULTS_MESSAGE};
use kbase_hybrid::{DefaultEngine, Retriever};
use kbase_vector::build;

fn company_records() -> RecordSet {
    RecordSet::from_json_value(serde_json::json!({
        "company": {"name": "allgens", "description": "AI導入コンサルティングを提供する企業", "founded": 2020, "location": "東京都千代田区"},
        "representative": {"name": "Jane Doe", "message": "We build AI.", "background": ""},
        "services": [
            {"id": "ai", "name": "AI導入コンサルティング", "description": "業務プロセスの自動化とAI活用戦略の立案", "target": "中小企業", "price": "月額15万円〜", "features": ["AI活用提案", "既存システムとの連携設計"]},
            {"id": "system", "name": "システム運用サポート", "description": "24時間365日の監視と障害対応", "target": "全業種", "price": "月額8万円〜", "features": ["障害対応", "セキュリティ対策"]},
            {"id": "ec", "name": "ECマーケティング支援", "description": "オンライン販売の最適化", "target": "EC事業者", "price": "月額12万円〜", "features": ["SEO対策"]}
        ],
        "faq": [
            {"question": "無料相談はありますか？", "answer": "はい、初回のご相談は無料で承っております。"},
            {"question": "導入までの期間はどのくらいですか？", "answer": "一般的には3ヶ月から6ヶ月程度を想定しています。"}
        ],
        "contact": {"office": "東京都千代田区千代田1-1-1", "businessHours": "平日 9:00-18:00", "consultation": "無料", "responseTime": "24時間以内"}
    }))
    .expect("records")
}

#[test]
fn representative_question_is_answered_by_keyword_route() {
    let records: RecordSet = vec![Record::Representative(Representative {
        name: "Jane Doe".into(),
        message: "We build AI.".into(),
        background: String::new(),
    })]
    .into_iter()
    .collect();
    let docs = build(&records);
    let results = DefaultEngine::default().query("代表者は誰ですか", &docs, 3).expect("query");
    let first = results.first().expect("one result");
    assert_eq!(first.category(), Category::Representative);
    assert_eq!(first.match_type, MatchType::Keyword);
    assert_eq!(first.similarity, 1.0);
}

#[test]
fn empty_records_give_empty_results() {
    let docs = build(&RecordSet::new());
    for q in ["代表者は誰ですか", "料金", "hello"] {
        assert!(DefaultEngine::default().query(q, &docs, 3).expect("query").is_empty());
    }
}

#[test]
fn empty_query_gives_empty_results() {
    let docs = build(&company_records());
    assert!(DefaultEngine::default().query("", &docs, 3).expect("query").is_empty());
}

#[test]
fn unmatched_query_gives_empty_results_and_fallback_text() {
    let docs = build(&company_records());
    let results = DefaultEngine::default().query("hello world", &docs, 3).expect("query");
    assert!(results.is_empty());
    assert_eq!(format_context(&results), NO_RESULTS_MESSAGE);
}

#[test]
fn keyword_matches_precede_vector_matches() {
    let docs = build(&company_records());
    let engine = DefaultEngine::default();
    // routes to the service category and also shares characters with FAQ and contact text
    let results = engine.query("無料相談の料金", &docs, 10).expect("query");
    assert!(!results.is_empty());
    let first_vector = results.iter().position(|r| r.match_type == MatchType::Vector).unwrap_or(results.len());
    assert!(results[..first_vector].iter().all(|r| r.match_type == MatchType::Keyword));
    assert!(results[first_vector..].iter().all(|r| r.match_type == MatchType::Vector));
    assert!(results[..first_vector].iter().all(|r| r.category() == Category::Service));
    assert_eq!(first_vector, 3, "three service documents are routed by keyword");
    assert!(results[first_vector..].iter().any(|r| r.id() == "faq-0"));
}

#[test]
fn vector_stage_fills_unrouted_queries() {
    let docs = build(&company_records());
    let results = DefaultEngine::default().query("導入までの期間", &docs, 3).expect("query");
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.match_type == MatchType::Vector));
    assert_eq!(results[0].id(), "faq-1");
    assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
}

#[test]
fn results_are_bounded_unique_and_deterministic() {
    let docs = build(&company_records());
    let engine = DefaultEngine::default();
    let queries = [
        "代表者は誰ですか",
        "会社の連絡先と料金、社長について",
        "AIシステム開発の費用",
        "SEO対策はできますか",
        "24時間 監視",
        "allgens",
    ];
    for q in queries {
        for k in 1..=6 {
            let a = engine.query(q, &docs, k).expect("query");
            let b = engine.query(q, &docs, k).expect("query");
            assert!(a.len() <= k, "{q} k={k}");
            let ids: Vec<&str> = a.iter().map(|r| r.id()).collect();
            let unique: HashSet<&str> = ids.iter().copied().collect();
            assert_eq!(unique.len(), ids.len(), "{q} k={k}");
            assert_eq!(ids, b.iter().map(|r| r.id()).collect::<Vec<_>>());
            assert!(a.iter().all(|r| (0.0..=1.0).contains(&r.similarity)));
        }
    }
}

#[test]
fn company_terms_route_to_company() {
    let settings = RetrievalSettings { company_terms: vec!["allgens".into()], ..Default::default() };
    let retriever = Retriever::new(&settings).expect("retriever");
    let results = retriever.retrieve("allgensってどんな会社？", &company_records()).expect("retrieve");
    assert_eq!(results[0].id(), "company-basic");
    assert_eq!(results[0].match_type, MatchType::Keyword);
    assert!((results[0].similarity - 0.9).abs() < 1e-6);
    assert!(results.len() <= retriever.top_k());
}

#[test]
fn retriever_reuses_knowledge_base() {
    let retriever = Retriever::new(&RetrievalSettings::default()).expect("retriever");
    let records = company_records();
    let a = retriever.knowledge_base(&records).expect("kb");
    let b = retriever.knowledge_base(&records).expect("kb");
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    let results = retriever.retrieve("電話番号を教えて", &records).expect("retrieve");
    assert_eq!(results[0].id(), "contact");
}

#[test]
fn retriever_rejects_invalid_settings() {
    let settings = RetrievalSettings { top_k: 0, ..Default::default() };
    assert!(Retriever::new(&settings).is_err());
}
