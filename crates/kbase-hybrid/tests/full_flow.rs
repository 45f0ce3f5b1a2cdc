use std::path::PathBuf;

use kbase_core::config::RetrievalSettings;
use kbase_core::records::RecordSet;
use kbase_core::types::{Category, MatchType};
use kbase_hybrid::context::{format_context, CONTEXT_HEADER};
use kbase_hybrid::Retriever;

fn records_path() -> PathBuf {
    // crates/kbase-hybrid -> crates -> repo root
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf();
    root.join("data/company_info.json")
}

#[test]
fn sample_company_data_full_flow() {
    let records = RecordSet::from_path(&records_path()).expect("sample records");
    let settings = RetrievalSettings { company_terms: vec!["allgens".into()], ..Default::default() };
    let retriever = Retriever::new(&settings).expect("retriever");

    let kb = retriever.knowledge_base(&records).expect("kb");
    eprintln!("knowledge base: {} documents", kb.len());
    assert_eq!(kb.documents().iter().filter(|d| d.category == Category::Service).count(), 4);
    assert_eq!(kb.documents().iter().filter(|d| d.category == Category::Faq).count(), 4);

    for (q, expected) in [
        ("代表者は誰ですか", Category::Representative),
        ("電話番号と住所を教えて", Category::Contact),
        ("料金を知りたい", Category::Service),
        ("allgensについて", Category::Company),
    ] {
        let results = retriever.retrieve(q, &records).expect("retrieve");
        eprintln!("q='{}' -> {:?}", q, results.iter().map(|r| r.id()).collect::<Vec<_>>());
        assert!(results.len() <= 3);
        assert_eq!(results[0].category(), expected, "{q}");
        assert_eq!(results[0].match_type, MatchType::Keyword, "{q}");
        assert!(format_context(&results).starts_with(CONTEXT_HEADER));
    }
}
