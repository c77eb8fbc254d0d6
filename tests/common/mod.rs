#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::cell::Cell;
use std::collections::HashMap;
use std::io::Write;
use tickerdash::domain::error::DashboardError;
use tickerdash::domain::ohlcv::{PriceObservation, PriceSeries};
use tickerdash::domain::parameters::LookbackPeriod;
use tickerdash::domain::ticker::Ticker;
use tickerdash::ports::data_port::PriceSeriesProvider;

pub struct MockProvider {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.ticker().to_string(), series);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceSeriesProvider for MockProvider {
    fn fetch(&self, ticker: &Ticker, _period: LookbackPeriod) -> Result<PriceSeries, DashboardError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(ticker.as_str()) {
            return Err(DashboardError::provider(ticker.as_str(), reason.clone()));
        }
        Ok(self
            .data
            .get(ticker.as_str())
            .cloned()
            .unwrap_or_else(|| PriceSeries::empty(ticker.as_str())))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ticker(s: &str) -> Ticker {
    Ticker::parse(s).unwrap()
}

/// One observation per calendar day starting at `start`.
pub fn make_series(ticker: &str, start: NaiveDate, closes: &[f64]) -> PriceSeries {
    let observations = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceObservation {
            date: start + Days::new(i as u64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000 + i as u64,
        })
        .collect();
    PriceSeries::new(ticker, observations)
}

/// Deterministic zig-zag trend of `count` closes.
pub fn generate_closes(count: usize, start_price: f64) -> Vec<f64> {
    (0..count)
        .map(|i| start_price + i as f64 * 0.5 + if i % 3 == 0 { -1.5 } else { 0.75 })
        .collect()
}

pub fn write_csv(dir: &std::path::Path, series: &PriceSeries) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for o in series.observations() {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            o.date, o.open, o.high, o.low, o.close, o.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", series.ticker())), content).unwrap();
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
