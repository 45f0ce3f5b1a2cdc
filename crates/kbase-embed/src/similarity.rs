use kbase_core::types::TermFrequencyMap;

fn norm(v: &TermFrequencyMap) -> f64 {
    v.values().map(|&c| f64::from(c) * f64::from(c)).sum::<f64>().sqrt()
}

/// Cosine similarity of two term-frequency maps.
///
/// Keys missing from one side count as zero, so only shared keys contribute
/// to the dot product. Returns 0.0 when either vector is empty.
pub fn cosine_similarity(a: &TermFrequencyMap, b: &TermFrequencyMap) -> f32 {
    let (norm_a, norm_b) = (norm(a), norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // iterate the smaller map; the dot product is symmetric
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, &x)| large.get(term).map(|&y| f64::from(x) * f64::from(y)))
        .sum();
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0) as f32
}
