use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// One daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: TradingDate, close: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() || close <= 0.0 {
            return Err(ValidationError::InvalidClose {
                date: date.format_iso(),
                value: close,
            });
        }
        Ok(Self { date, close })
    }
}

/// Date-ordered daily closes for a single ticker.
///
/// Dates are strictly ascending; the series is never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from points that must already be strictly ascending by date.
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for pair in points.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(ValidationError::UnorderedSeries {
                    previous: pair[0].date.format_iso(),
                    next: pair[1].date.format_iso(),
                });
            }
        }
        Ok(Self { symbol, points })
    }

    /// Sorts raw points by date and collapses same-date rows, keeping the last one seen.
    pub fn from_unordered(symbol: Symbol, mut points: Vec<PricePoint>) -> Self {
        // stable sort keeps feed order among equal dates, so the later row wins below
        points.sort_by_key(|point| point.date);

        let mut collapsed: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match collapsed.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => collapsed.push(point),
            }
        }

        Self {
            symbol,
            points: collapsed,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<TradingDate> {
        self.points.first().map(|point| point.date)
    }

    pub fn last_date(&self) -> Option<TradingDate> {
        self.points.last().map(|point| point.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint::new(TradingDate::parse(date).expect("date"), close).expect("point")
    }

    #[test]
    fn rejects_non_positive_and_non_finite_closes() {
        let date = TradingDate::parse("2024-01-02").expect("date");
        assert!(matches!(
            PricePoint::new(date, 0.0),
            Err(ValidationError::InvalidClose { .. })
        ));
        assert!(PricePoint::new(date, f64::NAN).is_err());
        assert!(PricePoint::new(date, -1.5).is_err());
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let symbol = Symbol::parse("BDRY").expect("symbol");
        let err = PriceSeries::new(
            symbol,
            vec![point("2024-01-02", 10.0), point("2024-01-02", 11.0)],
        )
        .expect_err("duplicate dates must fail");
        assert!(matches!(err, ValidationError::UnorderedSeries { .. }));
    }

    #[test]
    fn from_unordered_sorts_and_keeps_last_duplicate() {
        let symbol = Symbol::parse("GNK").expect("symbol");
        let series = PriceSeries::from_unordered(
            symbol,
            vec![
                point("2024-01-04", 12.0),
                point("2024-01-02", 10.0),
                point("2024-01-03", 11.0),
                point("2024-01-02", 10.5),
            ],
        );

        assert_eq!(series.closes(), vec![10.5, 11.0, 12.0]);
        assert_eq!(
            series.first_date().map(TradingDate::format_iso).as_deref(),
            Some("2024-01-02")
        );
    }
}
