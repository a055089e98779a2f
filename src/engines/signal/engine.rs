use crate::{
    config::{AppConfig, ConfigSection, IndicatorConfig, SignalThresholds},
    data::BarSeries,
    engines::signal::{
        classifier::classify_signal,
        markers::{chart_markers, mark_historical_signals, TaggedBar},
        report::{LatestReadings, SignalReport},
    },
    error::{Result, SignalboardError},
    functions::{
        indicators::{EMA, RSI},
        traits::{IndicatorArg, VectorizedIndicator},
    },
    types::{Bar, Signal},
};
use polars::prelude::*;
use serde::Serialize;

pub const EMA_FAST_COLUMN: &str = "ema_fast";
pub const EMA_SLOW_COLUMN: &str = "ema_slow";
pub const RSI_COLUMN: &str = "rsi";
pub const SIGNAL_COLUMN: &str = "signal";

/// A bar with every derived column populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecoratedBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    /// Historical tag; `None` until tagged, and always for the first row.
    pub signal: Option<Signal>,
}

impl DecoratedBar {
    pub fn new(bar: Bar, ema_fast: f64, ema_slow: f64, rsi: f64) -> Self {
        Self {
            bar,
            ema_fast,
            ema_slow,
            rsi,
            signal: None,
        }
    }

    /// Relative EMA gap `|fast - slow| / slow`.
    pub fn separation_pct(&self) -> f64 {
        (self.ema_fast - self.ema_slow).abs() / self.ema_slow
    }
}

/// Bars after warm-up trimming, with EMA fast/slow and RSI attached.
#[derive(Debug, Clone, Serialize)]
pub struct DecoratedSeries {
    symbol: String,
    interval: String,
    indicators: IndicatorConfig,
    rows: Vec<DecoratedBar>,
    #[serde(skip)]
    frame: DataFrame,
}

impl DecoratedSeries {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    pub fn indicators(&self) -> &IndicatorConfig {
        &self.indicators
    }

    pub fn rows(&self) -> &[DecoratedBar] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&DecoratedBar> {
        self.rows.last()
    }

    /// The last row and its predecessor, if any.
    pub fn latest_pair(&self) -> Option<(&DecoratedBar, Option<&DecoratedBar>)> {
        let last = self.rows.last()?;
        let prev = self.rows.len().checked_sub(2).map(|i| &self.rows[i]);
        Some((last, prev))
    }

    /// Polars frame: `timestamp` (epoch ms), OHLC and the derived columns.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of leading input bars that were trimmed plus one.
    pub fn warmup_len(&self) -> usize {
        self.indicators.warmup_len()
    }

    /// Write historical tags onto the rows and as a `signal` frame column
    /// (`BUY`/`SELL`/`WAIT`, null where untagged).
    pub fn attach_signals(&mut self, tags: &[TaggedBar]) -> Result<()> {
        let len = self.rows.len();
        for row in &mut self.rows {
            row.signal = None;
        }
        for tag in tags {
            let row = self.rows.get_mut(tag.index).ok_or_else(|| {
                SignalboardError::IndicatorError(format!(
                    "Signal tag for row {} outside {} rows",
                    tag.index, len
                ))
            })?;
            row.signal = Some(tag.signal);
        }

        let labels: Vec<Option<&str>> = self
            .rows
            .iter()
            .map(|row| row.signal.map(|signal| signal.as_str()))
            .collect();
        self.frame
            .with_column(Series::new(SIGNAL_COLUMN.into(), labels))?;
        Ok(())
    }
}

/// Decorate `series` with EMA(fast_span), EMA(slow_span) and RSI(rsi_window).
pub fn compute_indicators(
    series: &BarSeries,
    fast_span: usize,
    slow_span: usize,
    rsi_window: usize,
) -> Result<DecoratedSeries> {
    let indicators = IndicatorConfig::new(fast_span, slow_span, rsi_window);
    indicators.validate()?;

    let warmup = indicators.warmup_len();
    if series.is_empty() {
        return Err(SignalboardError::DataUnavailable(format!(
            "{} ({}): empty series",
            series.symbol(),
            series.interval()
        )));
    }
    if series.len() < warmup {
        return Err(SignalboardError::InsufficientHistory {
            required: warmup,
            available: series.len(),
        });
    }

    let close = || vec![IndicatorArg::Series(col("close"))];
    let ema_fast = EMA::new(fast_span)
        .calculate_vectorized(&close())
        .map_err(|e| SignalboardError::IndicatorError(e.to_string()))?;
    let ema_slow = EMA::new(slow_span)
        .calculate_vectorized(&close())
        .map_err(|e| SignalboardError::IndicatorError(e.to_string()))?;
    let rsi = RSI::new(rsi_window)
        .calculate_vectorized(&close())
        .map_err(|e| SignalboardError::IndicatorError(e.to_string()))?;

    let frame = series
        .to_frame()?
        .lazy()
        .with_columns([
            ema_fast.alias(EMA_FAST_COLUMN),
            ema_slow.alias(EMA_SLOW_COLUMN),
            rsi.alias(RSI_COLUMN),
        ])
        .filter(
            col(EMA_FAST_COLUMN)
                .is_not_null()
                .and(col(EMA_SLOW_COLUMN).is_not_null())
                .and(col(RSI_COLUMN).is_not_null()),
        )
        .collect()?;

    // Only leading rows are undefined, so the trimmed frame lines up with the
    // tail of the input bars.
    let offset = series.len() - frame.height();
    let fast = frame.column(EMA_FAST_COLUMN)?.f64()?;
    let slow = frame.column(EMA_SLOW_COLUMN)?.f64()?;
    let rsi = frame.column(RSI_COLUMN)?.f64()?;

    let mut rows = Vec::with_capacity(frame.height());
    for (i, bar) in series.bars()[offset..].iter().enumerate() {
        match (fast.get(i), slow.get(i), rsi.get(i)) {
            (Some(f), Some(s), Some(r)) => rows.push(DecoratedBar::new(*bar, f, s, r)),
            _ => {
                return Err(SignalboardError::IndicatorError(format!(
                    "Undefined indicator value after warm-up at row {}",
                    offset + i
                )))
            }
        }
    }

    log::debug!(
        "{} ({}): {} bars in, {} decorated (warm-up {})",
        series.symbol(),
        series.interval(),
        series.len(),
        rows.len(),
        warmup
    );

    Ok(DecoratedSeries {
        symbol: series.symbol().to_string(),
        interval: series.interval().to_string(),
        indicators,
        rows,
        frame,
    })
}

/// Stateless indicator + signal evaluation for one series at a time.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    indicators: IndicatorConfig,
    thresholds: SignalThresholds,
}

impl SignalEngine {
    pub fn new(indicators: IndicatorConfig, thresholds: SignalThresholds) -> Self {
        Self {
            indicators,
            thresholds,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.indicators, config.thresholds)
    }

    pub fn indicators(&self) -> &IndicatorConfig {
        &self.indicators
    }

    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    pub fn compute_indicators(&self, series: &BarSeries) -> Result<DecoratedSeries> {
        compute_indicators(
            series,
            self.indicators.fast_span,
            self.indicators.slow_span,
            self.indicators.rsi_window,
        )
    }

    /// Decorate the series and classify its most recent bar.
    pub fn evaluate(&self, series: &BarSeries) -> Result<SignalReport> {
        self.thresholds.validate()?;
        let mut decorated = self.compute_indicators(series)?;
        decorated.attach_signals(&mark_historical_signals(&decorated, &self.thresholds))?;

        let (last, prev) = decorated.latest_pair().ok_or_else(|| {
            SignalboardError::DataUnavailable(format!("{}: nothing after warm-up", series.symbol()))
        })?;
        let signal = classify_signal(last, prev, &self.thresholds);
        let latest = LatestReadings::from_row(last);
        let markers = chart_markers(&decorated, &self.thresholds);

        log::debug!(
            "{} ({}): {} at {} (rsi {:.2}, sep {:.5})",
            series.symbol(),
            series.interval(),
            signal,
            latest.timestamp,
            latest.rsi,
            latest.separation_pct
        );

        Ok(SignalReport {
            symbol: series.symbol().to_string(),
            interval: series.interval().to_string(),
            signal,
            latest,
            thresholds: self.thresholds,
            markers,
            series: decorated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64]) -> BarSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        BarSeries::from_closes("TEST", "1m", start, Duration::minutes(1), closes).unwrap()
    }

    #[test]
    fn test_warmup_trimming_length() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
        let decorated = compute_indicators(&series(&closes), 9, 21, 14).unwrap();
        assert_eq!(decorated.len(), 30 - (15 - 1));
        assert_eq!(decorated.frame().height(), decorated.len());
        assert_eq!(decorated.rows()[0].bar.timestamp, series(&closes).bars()[14].timestamp);
    }

    #[test]
    fn test_exactly_warmup_bars_gives_one_row() {
        let closes: Vec<f64> = (0..15).map(|i| 50.0 + i as f64).collect();
        let decorated = compute_indicators(&series(&closes), 9, 21, 14).unwrap();
        assert_eq!(decorated.len(), 1);
        assert!(decorated.latest_pair().unwrap().1.is_none());
    }

    #[test]
    fn test_insufficient_history() {
        let err = compute_indicators(&series(&[1.0, 2.0, 3.0]), 9, 21, 14).unwrap_err();
        assert!(matches!(
            err,
            SignalboardError::InsufficientHistory { required: 15, available: 3 }
        ));
        assert!(err.is_no_data());
    }

    #[test]
    fn test_invalid_spans_rejected() {
        let closes = vec![1.0; 30];
        assert!(matches!(
            compute_indicators(&series(&closes), 21, 9, 14),
            Err(SignalboardError::Configuration(_))
        ));
    }

    #[test]
    fn test_input_not_mutated() {
        let closes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let input = series(&closes);
        let before = input.clone();
        let _ = compute_indicators(&input, 3, 5, 4).unwrap();
        assert_eq!(input, before);
    }

    #[test]
    fn test_evaluate_reports_latest_readings() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let report = SignalEngine::default().evaluate(&series(&closes)).unwrap();
        let last = report.series.last().unwrap();
        assert_eq!(report.latest.price, 139.0);
        assert_eq!(report.latest.rsi, last.rsi);
        assert_eq!(report.latest.ema_fast, last.ema_fast);
        assert_eq!(report.latest.ema_slow, last.ema_slow);
        assert_eq!(report.symbol, "TEST");
    }

    #[test]
    fn test_evaluate_tags_every_row_after_first() {
        let closes: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 100.0 + i as f64 } else { 98.5 + i as f64 })
            .collect();
        let report = SignalEngine::default().evaluate(&series(&closes)).unwrap();
        let rows = report.series.rows();

        assert!(rows[0].signal.is_none());
        assert!(rows[1..].iter().all(|row| row.signal.is_some()));
        assert_eq!(rows.last().unwrap().signal, Some(report.signal));

        let column = report.series.frame().column(SIGNAL_COLUMN).unwrap();
        let labels = column.str().unwrap();
        assert_eq!(labels.null_count(), 1);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(labels.get(i), row.signal.map(|s| s.as_str()));
        }
    }

    #[test]
    fn test_compute_indicators_leaves_rows_untagged() {
        let closes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let decorated = compute_indicators(&series(&closes), 3, 5, 4).unwrap();
        assert!(decorated.rows().iter().all(|row| row.signal.is_none()));
        assert!(decorated.frame().column(SIGNAL_COLUMN).is_err());
    }
}
