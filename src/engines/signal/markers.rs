use crate::config::SignalThresholds;
use crate::engines::signal::{
    classifier::classify_signal,
    engine::DecoratedSeries,
};
use crate::types::Signal;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Marker offsets keep triangles clear of the candle wicks.
const BUY_MARKER_OFFSET: f64 = 0.999;
const SELL_MARKER_OFFSET: f64 = 1.001;

/// Per-bar tag from the historical pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaggedBar {
    /// Index into `DecoratedSeries::rows()`.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
}

/// A BUY or SELL marker anchored below/above the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartMarker {
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    pub price: f64,
}

/// Classify every row that has a predecessor. Each tag depends only on the
/// row and the one before it.
pub fn mark_historical_signals(
    series: &DecoratedSeries,
    thresholds: &SignalThresholds,
) -> Vec<TaggedBar> {
    series
        .rows()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| TaggedBar {
            index: i + 1,
            timestamp: pair[1].bar.timestamp,
            signal: classify_signal(&pair[1], Some(&pair[0]), thresholds),
        })
        .collect()
}

/// BUY/SELL tags only, positioned for a candlestick overlay.
pub fn chart_markers(series: &DecoratedSeries, thresholds: &SignalThresholds) -> Vec<ChartMarker> {
    let rows = series.rows();
    mark_historical_signals(series, thresholds)
        .into_iter()
        .filter_map(|tag| {
            let bar = &rows[tag.index].bar;
            let price = match tag.signal {
                Signal::Buy => bar.low * BUY_MARKER_OFFSET,
                Signal::Sell => bar.high * SELL_MARKER_OFFSET,
                Signal::Wait => return None,
            };
            Some(ChartMarker {
                timestamp: tag.timestamp,
                signal: tag.signal,
                price,
            })
        })
        .collect()
}
