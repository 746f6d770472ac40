/// Period-over-period fractional returns: `r[i] = (p[i+1] - p[i]) / p[i]`.
///
/// Returns `n - 1` values for `n` prices and nothing for fewer than two. A zero price yields a
/// non-finite return; callers drop such pairs before correlating.
pub fn pct_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Keeps positional pairs where both values are finite, truncated to the shorter input.
pub fn finite_pairs(a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .unzip()
}
