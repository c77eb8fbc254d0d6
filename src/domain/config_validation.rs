//! Configuration validation.
//!
//! Validates all config fields before any data is fetched.

use crate::domain::error::DashboardError;
use crate::domain::parameters::{LookbackPeriod, Theme};
use crate::domain::ticker::TickerCatalog;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_data_path(config)?;
    validate_as_of(config)?;
    Ok(())
}

pub const DEFAULT_CHART_WIDTH: i64 = 900;
const CHART_WIDTH_RANGE: std::ops::RangeInclusive<i64> = 320..=4000;

pub fn validate_chart_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let Some(raw) = config.get_string("chart", "width") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(width) if CHART_WIDTH_RANGE.contains(&width) => Ok(()),
        _ => Err(DashboardError::ConfigInvalid {
            section: "chart".to_string(),
            key: "width".to_string(),
            reason: format!(
                "width must be an integer between {} and {}",
                CHART_WIDTH_RANGE.start(),
                CHART_WIDTH_RANGE.end()
            ),
        }),
    }
}

pub fn validate_dashboard_config(
    config: &dyn ConfigPort,
    catalog: &TickerCatalog,
) -> Result<(), DashboardError> {
    validate_ticker(config, catalog, "ticker")?;
    validate_ticker(config, catalog, "compare")?;
    validate_period(config)?;
    validate_theme(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(DashboardError::ConfigInvalid {
            section: "data".to_string(),
            key: "path".to_string(),
            reason: "path must not be empty".to_string(),
        }),
        None => Err(DashboardError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_as_of(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    parse_as_of(config).map(|_| ())
}

/// Optional `[data] as_of` anchor date.
pub fn parse_as_of(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, DashboardError> {
    match config.get_string("data", "as_of") {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DashboardError::ConfigInvalid {
                section: "data".to_string(),
                key: "as_of".to_string(),
                reason: "invalid as_of format, expected YYYY-MM-DD".to_string(),
            }),
    }
}

fn validate_ticker(
    config: &dyn ConfigPort,
    catalog: &TickerCatalog,
    key: &str,
) -> Result<(), DashboardError> {
    match config.get_string("dashboard", key) {
        Some(s) if !s.trim().is_empty() => {
            catalog
                .resolve(&s)
                .map(|_| ())
                .map_err(|e| DashboardError::ConfigInvalid {
                    section: "dashboard".to_string(),
                    key: key.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(()),
    }
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    match config.get_string("dashboard", "period") {
        Some(s) => s
            .parse::<LookbackPeriod>()
            .map(|_| ())
            .map_err(|e| DashboardError::ConfigInvalid {
                section: "dashboard".to_string(),
                key: "period".to_string(),
                reason: e.to_string(),
            }),
        None => Ok(()),
    }
}

fn validate_theme(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    match config.get_string("dashboard", "theme") {
        Some(s) => s
            .parse::<Theme>()
            .map(|_| ())
            .map_err(|e| DashboardError::ConfigInvalid {
                section: "dashboard".to_string(),
                key: "theme".to_string(),
                reason: e.to_string(),
            }),
        None => Ok(()),
    }
}
