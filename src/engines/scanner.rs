//! Watchlist evaluation: one independent engine call per instrument.

use crate::config::InstrumentConfig;
use crate::data::{parse_period, BarSeries, FetchRequest, MarketDataSource, AUTO_INTERVAL};
use crate::engines::signal::{SignalEngine, SignalReport};
use crate::error::Result;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum InstrumentStatus {
    Ready(Box<SignalReport>),
    /// Empty feed or too little history; shown as information.
    NoData(String),
    /// Unreadable or invalid data.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentReport {
    pub symbol: String,
    pub name: String,
    pub interval: String,
    #[serde(flatten)]
    pub status: InstrumentStatus,
}

impl InstrumentReport {
    pub fn report(&self) -> Option<&SignalReport> {
        match &self.status {
            InstrumentStatus::Ready(report) => Some(report),
            _ => None,
        }
    }
}

pub struct Scanner<S: MarketDataSource> {
    source: S,
    engine: SignalEngine,
}

impl<S: MarketDataSource> Scanner<S> {
    pub fn new(source: S, engine: SignalEngine) -> Self {
        Self { source, engine }
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// Fetch, normalize and evaluate one instrument. Never fails: problems
    /// become `NoData` or `Failed` statuses.
    pub fn evaluate(&self, instrument: &InstrumentConfig) -> InstrumentReport {
        let status = match self.try_evaluate(instrument) {
            Ok(report) => InstrumentStatus::Ready(Box::new(report)),
            Err(err) if err.is_no_data() => {
                log::info!("{} ({}): {}", instrument.symbol, instrument.interval, err);
                InstrumentStatus::NoData(err.to_string())
            }
            Err(err) => {
                log::warn!("{} ({}): {}", instrument.symbol, instrument.interval, err);
                InstrumentStatus::Failed(err.to_string())
            }
        };

        let interval = match &status {
            InstrumentStatus::Ready(report) => report.interval.clone(),
            _ => instrument.interval.clone(),
        };
        InstrumentReport {
            symbol: instrument.symbol.clone(),
            name: instrument.display_name().to_string(),
            interval,
            status,
        }
    }

    /// Evaluate every instrument in parallel; results keep watchlist order.
    pub fn scan(&self, instruments: &[InstrumentConfig]) -> Vec<InstrumentReport> {
        instruments
            .par_iter()
            .map(|instrument| self.evaluate(instrument))
            .collect()
    }

    fn try_evaluate(&self, instrument: &InstrumentConfig) -> Result<SignalReport> {
        let request = FetchRequest::from(instrument);
        let frame = self.source.fetch(&request)?;
        let mut series = BarSeries::from_frame(&instrument.symbol, &instrument.interval, &frame)?;
        if instrument.interval == AUTO_INTERVAL {
            if let Some(interval) = series.infer_interval() {
                series.set_interval(&interval);
            }
        }
        if let Some(lookback) = parse_period(&instrument.period) {
            series.retain_lookback(lookback);
        }
        self.engine.evaluate(&series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalboardError;
    use polars::df;
    use polars::prelude::DataFrame;

    struct StaticSource;

    impl MarketDataSource for StaticSource {
        fn fetch(&self, request: &FetchRequest) -> Result<DataFrame> {
            match request.symbol.as_str() {
                "EMPTY" => Ok(DataFrame::empty()),
                "BROKEN" => Err(SignalboardError::DataLoading("connection reset".into())),
                "GLITCH" => {
                    let dates: Vec<String> = (1..=28).map(|d| format!("2024-02-{:02}", d)).collect();
                    let closes: Vec<f64> = (0..28).map(|i| 50.0 + i as f64 * 0.5).collect();
                    let mut lows = closes.clone();
                    lows[3] = closes[3] + 1.0;
                    Ok(df! {
                        "Date" => dates,
                        "Open" => closes.clone(),
                        "High" => closes.clone(),
                        "Low" => lows,
                        "Close" => closes,
                    }?)
                }
                "SHORT" => Ok(df! {
                    "Date" => &["2024-01-01", "2024-01-02"],
                    "Open" => &[1.0, 1.0],
                    "High" => &[1.0, 1.0],
                    "Low" => &[1.0, 1.0],
                    "Close" => &[1.0, 1.0],
                }?),
                _ => {
                    let dates: Vec<String> = (1..=28).map(|d| format!("2024-02-{:02}", d)).collect();
                    let closes: Vec<f64> = (0..28).map(|i| 50.0 + i as f64 * 0.5).collect();
                    Ok(df! {
                        "Date" => dates,
                        "Open" => closes.clone(),
                        "High" => closes.clone(),
                        "Low" => closes.clone(),
                        "Close" => closes,
                    }?)
                }
            }
        }
    }

    fn instrument(symbol: &str) -> InstrumentConfig {
        let mut config = InstrumentConfig::new(symbol);
        config.interval = "1d".to_string();
        config.period = "max".to_string();
        config
    }

    #[test]
    fn test_scan_classifies_outcomes_in_order() {
        let scanner = Scanner::new(StaticSource, SignalEngine::default());
        let reports = scanner.scan(&[
            instrument("GC=F"),
            instrument("EMPTY"),
            instrument("SHORT"),
            instrument("BROKEN"),
        ]);

        let symbols: Vec<&str> = reports.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["GC=F", "EMPTY", "SHORT", "BROKEN"]);
        assert!(matches!(reports[0].status, InstrumentStatus::Ready(_)));
        assert!(matches!(reports[1].status, InstrumentStatus::NoData(_)));
        assert!(matches!(reports[2].status, InstrumentStatus::NoData(_)));
        assert!(matches!(reports[3].status, InstrumentStatus::Failed(_)));
    }

    #[test]
    fn test_period_trims_history() {
        let scanner = Scanner::new(StaticSource, SignalEngine::default());
        let mut short_window = instrument("GC=F");
        short_window.period = "5d".to_string();
        // 6 bars remain, below the 15-bar warm-up
        let report = scanner.evaluate(&short_window);
        assert!(matches!(report.status, InstrumentStatus::NoData(_)));
    }

    #[test]
    fn test_malformed_bar_dropped_not_failed() {
        let scanner = Scanner::new(StaticSource, SignalEngine::default());
        let result = scanner.evaluate(&instrument("GLITCH"));
        let report = result.report().expect("bad row should be dropped, not fail the instrument");
        // 27 valid bars minus the 14-bar RSI warm-up
        assert_eq!(report.series.len(), 27 - 14);
        assert!(report
            .series
            .rows()
            .iter()
            .all(|row| row.bar.high >= row.bar.low));
    }

    #[test]
    fn test_auto_interval_detected_from_bars() {
        let scanner = Scanner::new(StaticSource, SignalEngine::default());
        let mut gold = instrument("GC=F");
        gold.interval = AUTO_INTERVAL.to_string();
        let result = scanner.evaluate(&gold);
        assert_eq!(result.interval, "1d");
        assert_eq!(result.report().unwrap().interval, "1d");
    }
}
