//! Dashboard parameter tuple and the discrete change events that replace it.
//!
//! `DashboardParameters` is an immutable value: every change produces a new
//! tuple via [`DashboardParameters::with_change`], never an in-place edit.

use crate::domain::error::DashboardError;
use crate::domain::ticker::{Ticker, TickerCatalog};
use chrono::{Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LookbackPeriod {
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl LookbackPeriod {
    pub const ALL: [LookbackPeriod; 4] = [
        LookbackPeriod::OneMonth,
        LookbackPeriod::ThreeMonths,
        LookbackPeriod::SixMonths,
        LookbackPeriod::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackPeriod::OneMonth => "1mo",
            LookbackPeriod::ThreeMonths => "3mo",
            LookbackPeriod::SixMonths => "6mo",
            LookbackPeriod::OneYear => "1y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookbackPeriod::OneMonth => "Last 1 month",
            LookbackPeriod::ThreeMonths => "Last 3 months",
            LookbackPeriod::SixMonths => "Last 6 months",
            LookbackPeriod::OneYear => "Last 1 year",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            LookbackPeriod::OneMonth => 1,
            LookbackPeriod::ThreeMonths => 3,
            LookbackPeriod::SixMonths => 6,
            LookbackPeriod::OneYear => 12,
        }
    }

    /// First calendar date inside the window ending at `as_of`.
    pub fn start_date(&self, as_of: NaiveDate) -> NaiveDate {
        as_of
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for LookbackPeriod {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        LookbackPeriod::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| {
                DashboardError::invalid(
                    "period",
                    format!("{:?} is not one of 1mo, 3mo, 6mo, 1y", s.trim()),
                )
            })
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(DashboardError::invalid(
                "theme",
                format!("{:?} is not one of light, dark", other),
            )),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardParameters {
    pub primary: Ticker,
    pub secondary: Option<Ticker>,
    pub lookback: LookbackPeriod,
    pub theme: Theme,
}

/// A single user edit to one field of the parameter tuple, still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterChange {
    Primary(String),
    Secondary(Option<String>),
    Lookback(String),
    Theme(String),
}

impl ParameterChange {
    /// Parses `ticker=..`, `compare=..` (empty clears), `period=..` or `theme=..`.
    pub fn parse(input: &str) -> Result<Self, DashboardError> {
        let (key, value) = input.split_once('=').ok_or_else(|| {
            DashboardError::invalid("event", format!("expected key=value, got {:?}", input))
        })?;
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            "ticker" => Ok(ParameterChange::Primary(value.to_string())),
            "compare" => Ok(ParameterChange::Secondary(
                Some(value.to_string()).filter(|v| !v.is_empty()),
            )),
            "period" => Ok(ParameterChange::Lookback(value.to_string())),
            "theme" => Ok(ParameterChange::Theme(value.to_string())),
            other => Err(DashboardError::invalid(
                "event",
                format!("unknown parameter {:?}", other),
            )),
        }
    }
}

impl DashboardParameters {
    pub fn new(primary: Ticker) -> Self {
        Self {
            primary,
            secondary: None,
            lookback: LookbackPeriod::default(),
            theme: Theme::default(),
        }
    }

    /// Checks every ticker against the catalog.
    pub fn validate(&self, catalog: &TickerCatalog) -> Result<(), DashboardError> {
        for ticker in std::iter::once(&self.primary).chain(self.secondary.as_ref()) {
            if !catalog.contains(ticker) {
                return Err(DashboardError::invalid(
                    "ticker",
                    format!("unknown ticker code {}", ticker),
                ));
            }
        }
        Ok(())
    }

    /// Returns the tuple with `change` applied; `self` is left untouched.
    pub fn with_change(
        &self,
        change: &ParameterChange,
        catalog: &TickerCatalog,
    ) -> Result<Self, DashboardError> {
        let mut next = self.clone();
        match change {
            ParameterChange::Primary(symbol) => next.primary = catalog.resolve(symbol)?,
            ParameterChange::Secondary(None) => next.secondary = None,
            ParameterChange::Secondary(Some(symbol)) => {
                next.secondary = Some(catalog.resolve(symbol)?)
            }
            ParameterChange::Lookback(period) => next.lookback = period.parse()?,
            ParameterChange::Theme(theme) => next.theme = theme.parse()?,
        }
        Ok(next)
    }
}
