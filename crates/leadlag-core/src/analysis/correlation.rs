/// Fewest positional pairs for which a correlation is reported.
pub const MIN_PAIRED_OBSERVATIONS: usize = 5;

/// Pearson correlation over the first `min(a.len(), b.len())` positional pairs.
///
/// `None` when fewer than [`MIN_PAIRED_OBSERVATIONS`] pairs are available or either side has
/// zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    pearson_with_minimum(a, b, MIN_PAIRED_OBSERVATIONS)
}

/// [`pearson`] with a caller-chosen minimum pair count.
pub fn pearson_with_minimum(a: &[f64], b: &[f64], min_pairs: usize) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < min_pairs || n == 0 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        covariance += da * db;
        variance_a += da * da;
        variance_b += db * db;
    }

    let denominator = (variance_a * variance_b).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let correlation = covariance / denominator;
    if !correlation.is_finite() {
        return None;
    }
    Some(correlation.clamp(-1.0, 1.0))
}
