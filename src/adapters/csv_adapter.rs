//! CSV file price data adapter.
//!
//! One file per ticker, `<base>/<TICKER>.csv`, with header
//! `date,open,high,low,close,volume`. Rows with an empty or non-finite
//! (`NaN`, `inf`) field are dropped.
//!
//! Without a configured `as_of`, every fetch windows back from the latest
//! date found across the whole data directory, so a primary and its
//! comparison ticker always share one calendar window.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{PriceObservation, PriceSeries};
use crate::domain::parameters::LookbackPeriod;
use crate::domain::ticker::Ticker;
use crate::ports::data_port::PriceSeriesProvider;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
    as_of: Option<NaiveDate>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            as_of: None,
        }
    }

    /// Anchors lookback windows at `as_of` instead of the directory's latest date.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    fn csv_path(&self, ticker: &Ticker) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// Tickers that have a CSV file under the base path, sorted.
    pub fn list_tickers(&self) -> Result<Vec<String>, DashboardError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            DashboardError::provider(
                "*",
                format!("failed to read directory {}: {}", self.base_path.display(), e),
            )
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| DashboardError::provider("*", format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            if let Some(ticker) = name.to_string_lossy().strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn read_observations(&self, ticker: &Ticker) -> Result<Vec<PriceObservation>, DashboardError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| {
            DashboardError::provider(
                ticker.as_str(),
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut observations = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                DashboardError::provider(ticker.as_str(), format!("CSV parse error: {}", e))
            })?;

            let fields: Vec<&str> = (0..6).map(|i| record.get(i).unwrap_or("").trim()).collect();
            if fields.iter().any(|f| f.is_empty() || is_non_finite(f)) {
                log::debug!("{}: dropping incomplete row {}", ticker, line + 2);
                continue;
            }

            let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d").map_err(|e| {
                DashboardError::provider(ticker.as_str(), format!("invalid date format: {}", e))
            })?;

            observations.push(PriceObservation {
                date,
                open: parse_field(ticker, "open", fields[1])?,
                high: parse_field(ticker, "high", fields[2])?,
                low: parse_field(ticker, "low", fields[3])?,
                close: parse_field(ticker, "close", fields[4])?,
                volume: parse_volume(ticker, fields[5])?,
            });
        }

        Ok(observations)
    }

    /// Latest observation date across every readable CSV under the base path.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        let tickers = self
            .list_tickers()
            .inspect_err(|e| log::debug!("{}", e))
            .ok()?;
        tickers
            .iter()
            .filter_map(|name| Ticker::parse(name).ok())
            .filter_map(|ticker| {
                self.read_observations(&ticker)
                    .inspect_err(|e| log::debug!("skipping {} for anchor date: {}", ticker, e))
                    .ok()
            })
            .flat_map(|observations| observations.into_iter().map(|o| o.date))
            .max()
    }
}

fn is_non_finite(raw: &str) -> bool {
    raw.parse::<f64>().is_ok_and(|v| !v.is_finite())
}

fn parse_field<T: FromStr>(ticker: &Ticker, column: &str, raw: &str) -> Result<T, DashboardError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| {
        DashboardError::provider(
            ticker.as_str(),
            format!("invalid {} value {:?}: {}", column, raw, e),
        )
    })
}

/// Accepts integral volumes written either as `1200` or `1200.0`.
fn parse_volume(ticker: &Ticker, raw: &str) -> Result<u64, DashboardError> {
    if let Ok(volume) = raw.parse::<u64>() {
        return Ok(volume);
    }
    let volume: f64 = parse_field(ticker, "volume", raw)?;
    if volume.is_finite() && volume >= 0.0 && volume.fract() == 0.0 {
        Ok(volume as u64)
    } else {
        Err(DashboardError::provider(
            ticker.as_str(),
            format!("invalid volume value {:?}", raw),
        ))
    }
}

impl PriceSeriesProvider for CsvAdapter {
    fn fetch(
        &self,
        ticker: &Ticker,
        period: LookbackPeriod,
    ) -> Result<PriceSeries, DashboardError> {
        let observations = self.read_observations(ticker)?;

        let Some(as_of) = self.as_of.or_else(|| self.latest_date()) else {
            return Ok(PriceSeries::empty(ticker.as_str()));
        };
        let start = period.start_date(as_of);

        let in_window = observations
            .into_iter()
            .filter(|o| o.date >= start && o.date <= as_of)
            .collect();
        Ok(PriceSeries::new(ticker.as_str(), in_window))
    }
}
