//! Rendering retrieval results for the chat layer.
//!
//! Every empty result, whatever the routed category, falls through to
//! [`NO_RESULTS_MESSAGE`].

use std::fmt::Write as _;

use kbase_core::types::{MatchType, ScoredDocument};
use serde::{Deserialize, Serialize};

pub const NO_RESULTS_MESSAGE: &str = "関連する情報が見つかりませんでした。";
pub const CONTEXT_HEADER: &str = "【関連情報】";

const NOT_ENTERED: &str = "未入力";
const NOT_SELECTED: &str = "未選択";

/// Numbered list of result contents, or the fallback message.
pub fn format_context(results: &[ScoredDocument]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }
    let mut out = format!("{CONTEXT_HEADER}\n");
    for (i, hit) in results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, hit.content());
    }
    out
}

/// One line per result with category label, stage and score.
pub fn format_diagnostics(results: &[ScoredDocument]) -> String {
    let mut out = String::new();
    for (i, hit) in results.iter().enumerate() {
        let stage = match hit.match_type {
            MatchType::Keyword => "keyword",
            MatchType::Vector => "vector",
        };
        let _ = writeln!(
            out,
            "{}. [{}] {} ({} {:.3}) {}",
            i + 1,
            hit.category().heading(),
            hit.id(),
            stage,
            hit.similarity,
            hit.content()
        );
    }
    out
}

/// Contact-form fields the customer may already have filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormData {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

impl FormData {
    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    fn render(&self) -> String {
        if !self.has_name() {
            return String::new();
        }
        format!(
            "\n\n【お客様情報】\nお名前: {}\n会社名: {}\nメール: {}\n電話: {}\n選択サービス: {}\nメッセージ: {}",
            or_placeholder(&self.name, NOT_ENTERED),
            or_placeholder(&self.company, NOT_ENTERED),
            or_placeholder(&self.email, NOT_ENTERED),
            or_placeholder(&self.phone, NOT_ENTERED),
            or_placeholder(&self.service, NOT_SELECTED),
            or_placeholder(&self.message, NOT_ENTERED),
        )
    }
}

/// Instruction prompt for a downstream language model, grounded on the
/// retrieved context.
pub struct RagPrompt;

impl RagPrompt {
    pub fn render(user_message: &str, context: &str, form: &FormData) -> String {
        format!(
            "あなたはAIアシスタントです。以下の情報を参考にして、お客様の質問に丁寧で正確な回答をしてください。\n\n\
             {context}\n\n\
             【指示】\n\
             - 上記の情報を基に、お客様の質問に回答してください\n\
             - 情報が不足している場合は、適切な質問をして詳細を確認してください\n\
             - 営業的な内容ではなく、お客様の役に立つ情報を提供してください\n\
             - 日本語で回答してください\n\
             - 親しみやすく、プロフェッショナルな口調で回答してください\n\n\
             {form}\n\n\
             【お客様の質問】\n\
             {user_message}",
            form = form.render(),
        )
    }
}
