use kbase_core::types::TermFrequencyMap;

/// Hiragana, Katakana and CJK Unified Ideographs.
pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() || is_cjk(c)
}

/// Lowercases, trims and replaces every symbol with a space.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect()
}

/// Term-frequency map of `text`.
///
/// Two token families share the map: whitespace-separated words longer than
/// one character, and every single CJK character regardless of word
/// boundaries. `None` and empty input give an empty map.
pub fn vectorize<'a>(text: impl Into<Option<&'a str>>) -> TermFrequencyMap {
    let mut tf = TermFrequencyMap::new();
    let Some(text) = text.into() else { return tf };
    if text.is_empty() {
        return tf;
    }
    let normalized = normalize(text);
    for word in normalized.split_whitespace().filter(|w| w.chars().count() > 1) {
        *tf.entry(word.to_string()).or_insert(0) += 1;
    }
    for c in normalized.chars().filter(|c| is_cjk(*c)) {
        *tf.entry(c.to_string()).or_insert(0) += 1;
    }
    tf
}
