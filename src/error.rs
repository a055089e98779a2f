use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalboardError {
    #[error("No data available: {0}")]
    DataUnavailable(String),

    #[error("Insufficient history: {available} bars, at least {required} required")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Indicator error: {0}")]
    IndicatorError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl SignalboardError {
    /// True for the "nothing to show yet" conditions (closed market, fresh
    /// listing, short history, malformed bars). Callers report these, they don't fail on them.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable(_) | Self::InsufficientHistory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SignalboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_classification() {
        assert!(SignalboardError::DataUnavailable("empty".into()).is_no_data());
        assert!(SignalboardError::InsufficientHistory { required: 15, available: 3 }.is_no_data());
        assert!(!SignalboardError::DataLoading("bad row".into()).is_no_data());
        assert!(!SignalboardError::Configuration("bad span".into()).is_no_data());
    }

    #[test]
    fn test_insufficient_history_message() {
        let err = SignalboardError::InsufficientHistory { required: 15, available: 4 };
        assert_eq!(
            err.to_string(),
            "Insufficient history: 4 bars, at least 15 required"
        );
    }
}
