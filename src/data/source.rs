use crate::config::InstrumentConfig;
use crate::data::connectors::CsvConnector;
use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

/// What the dashboard asks the market-data provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbol: String,
    pub interval: String,
    pub period: String,
    pub path: Option<PathBuf>,
}

impl FetchRequest {
    pub fn new(symbol: &str, interval: &str, period: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            period: period.to_string(),
            path: None,
        }
    }
}

impl From<&InstrumentConfig> for FetchRequest {
    fn from(instrument: &InstrumentConfig) -> Self {
        Self {
            symbol: instrument.symbol.clone(),
            interval: instrument.interval.clone(),
            period: instrument.period.clone(),
            path: instrument.path.clone(),
        }
    }
}

/// Replaceable provider of raw tabular bars. Implementations may return any
/// column layout `BarSeries::from_frame` can normalize, including an empty frame.
pub trait MarketDataSource: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> Result<DataFrame>;
}

/// Reads CSV exports, either from the request's explicit path or from
/// `{data_dir}/{symbol}_{interval}.csv`.
#[derive(Debug, Clone, Default)]
pub struct CsvDataSource {
    data_dir: Option<PathBuf>,
}

impl CsvDataSource {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self { data_dir }
    }

    pub fn path_for(&self, request: &FetchRequest) -> PathBuf {
        if let Some(path) = &request.path {
            return path.clone();
        }
        let file_name = format!("{}_{}.csv", file_stem(&request.symbol), request.interval);
        match &self.data_dir {
            Some(dir) => dir.join(file_name),
            None => Path::new(".").join(file_name),
        }
    }
}

impl MarketDataSource for CsvDataSource {
    fn fetch(&self, request: &FetchRequest) -> Result<DataFrame> {
        let path = self.path_for(request);
        log::debug!("Fetching {} ({}) from {}", request.symbol, request.interval, path.display());
        CsvConnector::load(path)
    }
}

/// Tickers such as `^GSPC`, `GC=F` or `BTC/USDT` as a file-name stem.
fn file_stem(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| match c {
            '^' | '=' | '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_convention() {
        let source = CsvDataSource::new(Some(PathBuf::from("/data")));
        let request = FetchRequest::new("GC=F", "15m", "5d");
        assert_eq!(source.path_for(&request), PathBuf::from("/data/GC_F_15m.csv"));

        let request = FetchRequest::new("^GSPC", "1d", "1mo");
        assert_eq!(source.path_for(&request), PathBuf::from("/data/_GSPC_1d.csv"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let source = CsvDataSource::new(Some(PathBuf::from("/data")));
        let mut instrument = InstrumentConfig::new("BTC-USD");
        instrument.path = Some(PathBuf::from("/elsewhere/btc.csv"));
        let request = FetchRequest::from(&instrument);
        assert_eq!(source.path_for(&request), PathBuf::from("/elsewhere/btc.csv"));
    }
}
