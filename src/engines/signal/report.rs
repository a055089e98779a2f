use crate::config::SignalThresholds;
use crate::engines::signal::{engine::{DecoratedBar, DecoratedSeries}, markers::ChartMarker};
use crate::types::Signal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// The numbers shown next to the signal label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatestReadings {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub separation_pct: f64,
}

impl LatestReadings {
    pub fn from_row(row: &DecoratedBar) -> Self {
        Self {
            timestamp: row.bar.timestamp,
            price: row.bar.close,
            rsi: row.rsi,
            ema_fast: row.ema_fast,
            ema_slow: row.ema_slow,
            separation_pct: row.separation_pct(),
        }
    }
}

/// Everything one evaluation hands to the display and alerting side.
#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    pub symbol: String,
    pub interval: String,
    pub signal: Signal,
    pub latest: LatestReadings,
    pub thresholds: SignalThresholds,
    pub markers: Vec<ChartMarker>,
    pub series: DecoratedSeries,
}

impl fmt::Display for SignalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indicators = self.series.indicators();
        write!(
            f,
            "{:<10} {:>4} {:<4} price {:.4}  RSI({}) {:.2}  EMA{} {:.4}  EMA{} {:.4}  ({})",
            self.symbol,
            self.interval,
            self.signal,
            self.latest.price,
            indicators.rsi_window,
            self.latest.rsi,
            indicators.fast_span,
            self.latest.ema_fast,
            indicators.slow_span,
            self.latest.ema_slow,
            self.latest.timestamp.format("%Y-%m-%d %H:%M"),
        )
    }
}
