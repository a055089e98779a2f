use super::traits::ConfigSection;
use crate::error::SignalboardError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// One instrument on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_period")]
    pub period: String,
    /// Explicit data file; otherwise the data source's naming convention applies.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_interval() -> String {
    "15m".to_string()
}

fn default_period() -> String {
    "5d".to_string()
}

impl InstrumentConfig {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: None,
            interval: default_interval(),
            period: default_period(),
            path: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistConfig {
    /// Directory searched for `{symbol}_{interval}.csv` files.
    pub data_dir: Option<PathBuf>,
    pub instruments: Vec<InstrumentConfig>,
}

impl ConfigSection for WatchlistConfig {
    fn section_name() -> &'static str {
        "watchlist"
    }

    fn validate(&self) -> Result<(), SignalboardError> {
        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.symbol.trim().is_empty() {
                return Err(SignalboardError::Configuration(
                    "Watchlist symbol must not be empty".to_string(),
                ));
            }
            if !seen.insert((&instrument.symbol, &instrument.interval)) {
                return Err(SignalboardError::Configuration(format!(
                    "Duplicate watchlist entry: {} ({})",
                    instrument.symbol, instrument.interval
                )));
            }
        }
        Ok(())
    }
}
