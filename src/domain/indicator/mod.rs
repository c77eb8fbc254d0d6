//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series, with an
//!   explicitly undefined value where there is not enough history yet
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values, aligned 1:1 by date
//!   with the price series that produced it

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::{calculate_ema, ema_values};
pub use macd::{calculate_macd, calculate_macd_default, MacdSeries};
pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD};

use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    /// `None` marks an undefined sample.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    Ema(usize),
    MacdLine { fast: usize, slow: usize },
    MacdSignal { fast: usize, slow: usize, signal: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Same length and dates as `series`, every value undefined.
    pub fn undefined(indicator_type: IndicatorType, series: &PriceSeries) -> Self {
        Self {
            indicator_type,
            values: series
                .observations()
                .iter()
                .map(|o| IndicatorPoint {
                    date: o.date,
                    value: None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.value.is_some()).count()
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(|p| p.value.is_none())
    }

    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|p| p.value)
    }
}

/// Observations needed before the first defined value appears.
pub fn minimum_history(indicator_type: IndicatorType) -> usize {
    match indicator_type {
        IndicatorType::Rsi(period) => period + 1,
        IndicatorType::Ema(_) | IndicatorType::MacdLine { .. } | IndicatorType::MacdSignal { .. } => 1,
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::MacdLine { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "SIGNAL({},{},{})", fast, slow, signal)
            }
        }
    }
}
