use crate::engines::signal::engine::{EMA_FAST_COLUMN, EMA_SLOW_COLUMN, RSI_COLUMN};
use crate::engines::signal::{ChartMarker, DecoratedBar, LatestReadings, SignalReport};
use crate::functions::indicators::{EMA, RSI};
use crate::functions::traits::Indicator;
use crate::types::{ScaleType, Signal};
use crate::view::state::ViewState;
use serde::Serialize;

/// How a renderer should draw one derived column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLegend {
    /// Field name in each row.
    pub column: &'static str,
    /// Short label such as `EMA9`.
    pub label: String,
    pub name: &'static str,
    /// `Price` overlays the candles; `Oscillator0_100` gets its own pane.
    pub scale: ScaleType,
    pub range: Option<(f64, f64)>,
}

impl SeriesLegend {
    fn new(indicator: &dyn Indicator, column: &'static str, period: usize) -> Self {
        Self {
            column,
            label: format!("{}{}", indicator.alias(), period),
            name: indicator.ui_name(),
            scale: indicator.scale_type(),
            range: indicator.value_range(),
        }
    }
}

/// Renderer-agnostic payload: candles with EMA overlays, an RSI pane with
/// guide lines, and optional BUY/SELL markers.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFrame {
    pub symbol: String,
    pub interval: String,
    pub signal: Signal,
    pub latest: LatestReadings,
    pub legend: Vec<SeriesLegend>,
    pub rsi_upper: f64,
    pub rsi_lower: f64,
    pub rows: Vec<DecoratedBar>,
    pub markers: Vec<ChartMarker>,
}

impl ChartFrame {
    pub fn build(report: &SignalReport, view: &ViewState) -> Self {
        let all_rows = report.series.rows();
        let rows = all_rows[view.window_start(all_rows.len())..].to_vec();

        let markers = match (view.show_markers(), rows.first()) {
            (true, Some(first)) => report
                .markers
                .iter()
                .filter(|marker| marker.timestamp >= first.bar.timestamp)
                .copied()
                .collect(),
            _ => Vec::new(),
        };

        let indicators = report.series.indicators();
        Self {
            symbol: report.symbol.clone(),
            interval: report.interval.clone(),
            signal: report.signal,
            latest: report.latest,
            legend: vec![
                SeriesLegend::new(&EMA::new(indicators.fast_span), EMA_FAST_COLUMN, indicators.fast_span),
                SeriesLegend::new(&EMA::new(indicators.slow_span), EMA_SLOW_COLUMN, indicators.slow_span),
                SeriesLegend::new(&RSI::new(indicators.rsi_window), RSI_COLUMN, indicators.rsi_window),
            ],
            rsi_upper: report.thresholds.rsi_buy_ceiling,
            rsi_lower: report.thresholds.rsi_sell_floor,
            rows,
            markers,
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
