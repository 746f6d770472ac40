use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::alignment::AlignedPrices;
use super::correlation::{pearson_with_minimum, MIN_PAIRED_OBSERVATIONS};
use super::returns::{finite_pairs, pct_returns};
use crate::ValidationError;

/// Fewest aligned closes needed before any lag is scanned.
pub const MIN_ALIGNED_DATES: usize = 10;

/// Largest |lag| tested, in trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LagBound(u32);

impl LagBound {
    /// Roughly one trading year.
    pub const MAX: u32 = 250;

    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 || value > Self::MAX {
            return Err(ValidationError::InvalidLagBound {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Candidate lags in scan order, most negative first.
    pub fn lags(self) -> RangeInclusive<i32> {
        // MAX keeps the bound far inside i32
        let bound = self.0 as i32;
        -bound..=bound
    }
}

impl Default for LagBound {
    fn default() -> Self {
        Self(60)
    }
}

impl TryFrom<u32> for LagBound {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LagBound> for u32 {
    fn from(value: LagBound) -> Self {
        value.0
    }
}

/// Best lag found for one proxy/stock pair.
///
/// Positive `lag` means the proxy leads the stock by that many trading days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagEstimate {
    pub lag: i32,
    pub correlation: Option<f64>,
    pub sample_size: usize,
}

impl LagEstimate {
    /// Outcome reported when the overlap is too short to scan.
    pub const fn insufficient() -> Self {
        Self {
            lag: 0,
            correlation: None,
            sample_size: 0,
        }
    }
}

/// Brute-force lead/lag search over `[-max_lag, +max_lag]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagScanner {
    max_lag: LagBound,
    min_aligned_dates: usize,
    min_pairs: usize,
}

impl Default for LagScanner {
    fn default() -> Self {
        Self::new(LagBound::default())
    }
}

impl LagScanner {
    pub fn new(max_lag: LagBound) -> Self {
        Self {
            max_lag,
            min_aligned_dates: MIN_ALIGNED_DATES,
            min_pairs: MIN_PAIRED_OBSERVATIONS,
        }
    }

    pub fn with_min_aligned_dates(mut self, min_aligned_dates: usize) -> Self {
        self.min_aligned_dates = min_aligned_dates;
        self
    }

    pub fn with_min_pairs(mut self, min_pairs: usize) -> Self {
        self.min_pairs = min_pairs;
        self
    }

    pub const fn max_lag(&self) -> LagBound {
        self.max_lag
    }

    /// Scans the returns of two date-aligned price sequences.
    pub fn scan_aligned(&self, aligned: &AlignedPrices) -> LagEstimate {
        if aligned.len() < self.min_aligned_dates {
            return LagEstimate::insufficient();
        }
        self.scan_returns(&pct_returns(&aligned.proxy), &pct_returns(&aligned.stock))
    }

    /// Scans two return series derived from the same aligned dates.
    ///
    /// Ties on |correlation| keep the earliest lag in scan order. When no lag yields a defined
    /// correlation the estimate falls back to lag 0 with the pair count available there.
    pub fn scan_returns(&self, proxy: &[f64], stock: &[f64]) -> LagEstimate {
        let aligned_dates = proxy.len().min(stock.len()) + 1;
        if aligned_dates < self.min_aligned_dates {
            return LagEstimate::insufficient();
        }

        let candidates = self
            .max_lag
            .lags()
            .map(|lag| self.estimate_at(proxy, stock, lag));

        pick_strongest(candidates).unwrap_or_else(|| self.estimate_at(proxy, stock, 0))
    }

    fn estimate_at(&self, proxy: &[f64], stock: &[f64], lag: i32) -> LagEstimate {
        let (proxy, stock) = lagged_pairs(proxy, stock, lag);
        let (proxy, stock) = finite_pairs(proxy, stock);
        LagEstimate {
            lag,
            correlation: pearson_with_minimum(&proxy, &stock, self.min_pairs),
            sample_size: proxy.len(),
        }
    }
}

/// Positional pairing for one lag.
///
/// `lag >= 0` pairs `proxy[i]` with `stock[i + lag]`; `lag < 0` pairs `proxy[i - lag]` with
/// `stock[i]`. Both slices have the same length.
pub fn lagged_pairs<'a>(proxy: &'a [f64], stock: &'a [f64], lag: i32) -> (&'a [f64], &'a [f64]) {
    let shift = lag.unsigned_abs() as usize;
    let (proxy, stock) = if lag >= 0 {
        (proxy, stock.get(shift..).unwrap_or_default())
    } else {
        (proxy.get(shift..).unwrap_or_default(), stock)
    };
    let n = proxy.len().min(stock.len());
    (&proxy[..n], &stock[..n])
}

/// First candidate with a strictly greater |correlation| than everything before it.
fn pick_strongest(candidates: impl IntoIterator<Item = LagEstimate>) -> Option<LagEstimate> {
    let mut best: Option<(f64, LagEstimate)> = None;
    for candidate in candidates {
        let Some(correlation) = candidate.correlation else {
            continue;
        };
        let strength = correlation.abs();
        match best {
            Some((best_strength, _)) if strength <= best_strength => {}
            _ => best = Some((strength, candidate)),
        }
    }
    best.map(|(_, estimate)| estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_returns(seed: u64, len: usize) -> Vec<f64> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..len).map(|_| (rng.f64() - 0.5) * 0.06).collect()
    }

    fn follower(leader: &[f64], lead: usize, seed: u64) -> Vec<f64> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..leader.len())
            .map(|i| {
                let noise = 1.0 + (rng.f64() - 0.5) * 0.1;
                match i.checked_sub(lead) {
                    Some(j) => leader[j] * noise,
                    None => (rng.f64() - 0.5) * 0.06,
                }
            })
            .collect()
    }

    fn scanner(max_lag: u32) -> LagScanner {
        LagScanner::new(LagBound::new(max_lag).expect("bound"))
    }

    #[test]
    fn lag_bound_rejects_zero_and_oversized_values() {
        assert!(LagBound::new(0).is_err());
        assert!(LagBound::new(LagBound::MAX + 1).is_err());
        let lags: Vec<i32> = LagBound::new(2).expect("bound").lags().collect();
        assert_eq!(lags, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn positive_lag_when_proxy_leads_stock() {
        let proxy = noisy_returns(7, 40);
        let stock = follower(&proxy, 2, 11);

        let estimate = scanner(5).scan_returns(&proxy, &stock);

        assert_eq!(estimate.lag, 2);
        assert!(estimate.correlation.expect("defined") > 0.9);
        assert_eq!(estimate.sample_size, 38);
    }

    #[test]
    fn negative_lag_when_stock_leads_proxy() {
        let stock = noisy_returns(21, 60);
        let proxy = follower(&stock, 3, 5);

        let estimate = scanner(10).scan_returns(&proxy, &stock);

        assert_eq!(estimate.lag, -3);
        assert!(estimate.correlation.expect("defined") > 0.9);
    }

    #[test]
    fn inverse_relationship_is_found_by_magnitude() {
        let proxy = noisy_returns(3, 50);
        let stock: Vec<f64> = follower(&proxy, 1, 9).iter().map(|r| -r).collect();

        let estimate = scanner(4).scan_returns(&proxy, &stock);

        assert_eq!(estimate.lag, 1);
        assert!(estimate.correlation.expect("defined") < -0.9);
    }

    #[test]
    fn short_overlap_is_reported_without_scanning() {
        let aligned = AlignedPrices {
            dates: Vec::new(),
            proxy: vec![1.0; 9],
            stock: vec![1.0; 9],
        };
        assert_eq!(scanner(3).scan_aligned(&aligned), LagEstimate::insufficient());
        assert_eq!(
            scanner(3).scan_returns(&[0.1, 0.2, -0.1], &[0.3, 0.1, 0.0]),
            LagEstimate::insufficient()
        );
    }

    #[test]
    fn degenerate_series_falls_back_to_lag_zero() {
        let flat = vec![0.0; 20];
        let proxy = noisy_returns(1, 20);

        let estimate = scanner(5).scan_returns(&proxy, &flat);

        assert_eq!(estimate.lag, 0);
        assert_eq!(estimate.correlation, None);
        assert_eq!(estimate.sample_size, 20);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let proxy = noisy_returns(42, 120);
        let stock = follower(&proxy, 4, 43);
        let scanner = scanner(60);

        assert_eq!(
            scanner.scan_returns(&proxy, &stock),
            scanner.scan_returns(&proxy, &stock)
        );
    }

    #[test]
    fn sample_size_shrinks_with_lag_magnitude() {
        let proxy = noisy_returns(8, 30);
        let stock = noisy_returns(9, 30);
        let scanner = scanner(12);

        let estimate = scanner.scan_returns(&proxy, &stock);
        let aligned_dates = proxy.len() + 1;

        assert!(estimate.sample_size <= aligned_dates - 1);
        assert_eq!(
            estimate.sample_size,
            aligned_dates - estimate.lag.unsigned_abs() as usize - 1
        );
    }

    #[test]
    fn non_finite_returns_are_dropped_from_pairs() {
        let mut proxy = noisy_returns(12, 30);
        let stock = proxy.clone();
        proxy[4] = f64::INFINITY;

        let estimate = scanner(2).scan_returns(&proxy, &stock);

        assert_eq!(estimate.lag, 0);
        assert_eq!(estimate.sample_size, 29);
        assert!((estimate.correlation.expect("defined") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_the_first_lag_scanned() {
        let estimate = |lag, correlation| LagEstimate {
            lag,
            correlation,
            sample_size: 10,
        };
        let candidates = [
            estimate(-2, None),
            estimate(-1, Some(-0.5)),
            estimate(0, Some(0.5)),
            estimate(1, Some(0.4)),
        ];

        let best = pick_strongest(candidates).expect("a defined candidate exists");

        assert_eq!(best.lag, -1);
        assert_eq!(best.correlation, Some(-0.5));
    }

    #[test]
    fn alternating_series_ties_resolve_to_the_most_negative_lag() {
        // every lag correlates at exactly +1 or -1
        let alternating: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();

        let estimate = scanner(3).scan_returns(&alternating, &alternating);

        assert_eq!(estimate.lag, -3);
        assert_eq!(estimate.correlation.map(f64::abs), Some(1.0));
        assert_eq!(estimate.sample_size, 17);
    }

    #[test]
    fn lagged_pairs_shift_the_expected_side() {
        let proxy = [1.0, 2.0, 3.0, 4.0];
        let stock = [10.0, 20.0, 30.0, 40.0];

        assert_eq!(lagged_pairs(&proxy, &stock, 1), (&proxy[..3], &stock[1..]));
        assert_eq!(lagged_pairs(&proxy, &stock, -1), (&proxy[1..], &stock[..3]));
        let (a, b) = lagged_pairs(&proxy, &stock, 9);
        assert!(a.is_empty() && b.is_empty());
    }
}
