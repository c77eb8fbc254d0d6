//! Domain error types.
//!
//! Short indicator history is deliberately absent from this taxonomy: it is
//! represented by an all-undefined [`IndicatorSeries`](crate::domain::indicator::IndicatorSeries).

/// Top-level error type for tickerdash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no data for {ticker}: {reason}")]
    Provider { ticker: String, reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn provider(ticker: &str, reason: impl Into<String>) -> Self {
        DashboardError::Provider {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DashboardError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigMissing { .. }
            | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::Provider { .. } => 3,
            DashboardError::InvalidParameter { .. } => 4,
            DashboardError::Render { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message() {
        let err = DashboardError::provider("ASELS.IS", "connection refused");
        assert_eq!(err.to_string(), "no data for ASELS.IS: connection refused");
    }

    #[test]
    fn invalid_parameter_message() {
        let err = DashboardError::invalid("period", "expected one of 1mo, 3mo, 6mo, 1y");
        assert_eq!(
            err.to_string(),
            "invalid period: expected one of 1mo, 3mo, 6mo, 1y"
        );
    }

    #[test]
    fn exit_codes_differ_per_category() {
        let provider = std::process::ExitCode::from(&DashboardError::provider("X", "y"));
        let invalid = std::process::ExitCode::from(&DashboardError::invalid("x", "y"));
        assert_ne!(provider, invalid);
    }
}
