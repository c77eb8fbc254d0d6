//! Daily price observations and the per-ticker series built from them.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Observations for one ticker over one requested period.
///
/// Always strictly increasing by date with no duplicate dates; non-trading
/// days are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    /// Sorts by date and keeps the first observation for any repeated date.
    pub fn new(ticker: impl Into<String>, mut observations: Vec<PriceObservation>) -> Self {
        observations.sort_by_key(|o| o.date);
        observations.dedup_by_key(|o| o.date);
        Self {
            ticker: ticker.into(),
            observations,
        }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Vec::new())
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, close: f64) -> PriceObservation {
        PriceObservation {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn new_sorts_by_date() {
        let series = PriceSeries::new(
            "THYAO.IS",
            vec![obs("2024-01-03", 3.0), obs("2024-01-01", 1.0), obs("2024-01-02", 2.0)],
        );
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn new_drops_duplicate_dates_keeping_first() {
        let series = PriceSeries::new(
            "THYAO.IS",
            vec![obs("2024-01-01", 1.0), obs("2024-01-01", 9.0), obs("2024-01-02", 2.0)],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 2.0]);
    }

    #[test]
    fn empty_series_has_no_last_or_range() {
        let series = PriceSeries::empty("SISE.IS");
        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(series.date_range().is_none());
        assert_eq!(series.ticker(), "SISE.IS");
    }

    #[test]
    fn date_range_spans_first_to_last() {
        let series = PriceSeries::new("X", vec![obs("2024-02-05", 1.0), obs("2024-01-10", 2.0)]);
        let (start, end) = series.date_range().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap());
    }
}
