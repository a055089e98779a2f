//! Strict, validated bar sequence: the only shape the engine accepts.

use crate::data::connectors::{CsvConnector, DataValidator, RequiredColumn};
use crate::error::{Result, SignalboardError};
use crate::types::Bar;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use polars::df;
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Epoch integers below this are seconds, above it milliseconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Interval label asking for detection from bar spacing.
pub const AUTO_INTERVAL: &str = "auto";

/// Ordered bars for one instrument/interval pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    symbol: String,
    interval: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate an already-built bar vector. Bars must be strictly ascending
    /// by timestamp; anything else is reported as "no data".
    pub fn new(symbol: &str, interval: &str, bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(SignalboardError::DataUnavailable(format!(
                "{} ({}): no bars",
                symbol, interval
            )));
        }
        if let Some(i) = bars.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(SignalboardError::DataUnavailable(format!(
                "{} ({}): bars not strictly ascending at row {}",
                symbol,
                interval,
                i + 1
            )));
        }
        DataValidator::validate_bars(&bars)?;

        Ok(Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            bars,
        })
    }

    /// Build a series from whatever tabular shape the data source produced:
    /// aliases and multi-level labels are resolved, rows are sorted and
    /// duplicate timestamps collapse to the last occurrence.
    pub fn from_frame(symbol: &str, interval: &str, df: &DataFrame) -> Result<Self> {
        if df.height() == 0 {
            return Err(SignalboardError::DataUnavailable(format!(
                "{} ({}): data source returned no rows",
                symbol, interval
            )));
        }

        let normalized = CsvConnector::normalize_columns(df)?;
        let timestamps = parse_timestamps(normalized.column(RequiredColumn::Timestamp.as_str())?)?;
        let open = normalized.column("open")?.f64()?;
        let high = normalized.column("high")?.f64()?;
        let low = normalized.column("low")?.f64()?;
        let close = normalized.column("close")?.f64()?;

        let mut bars = Vec::with_capacity(normalized.height());
        let mut unparsed = 0usize;
        for i in 0..normalized.height() {
            match (timestamps[i], open.get(i), high.get(i), low.get(i), close.get(i)) {
                (Some(ts), Some(o), Some(h), Some(l), Some(c)) => bars.push(Bar::new(ts, o, h, l, c)),
                _ => unparsed += 1,
            }
        }
        if unparsed > 0 {
            log::warn!(
                "{} ({}): dropped {} rows with unreadable timestamps",
                symbol, interval, unparsed
            );
        }

        let before = bars.len();
        bars.retain(|bar| match DataValidator::bar_defect(bar) {
            Some(defect) => {
                log::warn!("{} ({}): dropped bar at {}: {}", symbol, interval, bar.timestamp, defect);
                false
            }
            None => true,
        });
        if bars.is_empty() {
            return Err(SignalboardError::DataUnavailable(format!(
                "{} ({}): no valid bars among {} rows",
                symbol, interval, before
            )));
        }

        bars.sort_by_key(|bar| bar.timestamp);
        let before = bars.len();
        let bars = dedup_keep_last(bars);
        if bars.len() < before {
            log::warn!(
                "{} ({}): collapsed {} duplicate timestamps",
                symbol,
                interval,
                before - bars.len()
            );
        }

        Self::new(symbol, interval, bars)
    }

    /// Evenly spaced flat bars from a list of closes.
    pub fn from_closes(
        symbol: &str,
        interval: &str,
        start: DateTime<Utc>,
        step: Duration,
        closes: &[f64],
    ) -> Result<Self> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::flat(start + step * i as i32, close))
            .collect();
        Self::new(symbol, interval, bars)
    }

    /// Keep only bars within `lookback` of the most recent bar.
    pub fn retain_lookback(&mut self, lookback: Duration) {
        if let Some(last) = self.bars.last().map(|bar| bar.timestamp) {
            let cutoff = last - lookback;
            self.bars.retain(|bar| bar.timestamp >= cutoff);
        }
    }

    /// The most common spacing between consecutive bars, as `15m`, `1h`,
    /// `1d` or `1wk`. `None` for a single bar.
    pub fn infer_interval(&self) -> Option<String> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for pair in self.bars.windows(2) {
            let seconds = (pair[1].timestamp - pair[0].timestamp).num_seconds();
            *counts.entry(seconds).or_default() += 1;
        }
        counts
            .into_iter()
            .max_by_key(|&(seconds, n)| (n, Reverse(seconds)))
            .map(|(seconds, _)| format_interval(seconds))
    }

    pub fn set_interval(&mut self, interval: &str) {
        self.interval = interval.to_string();
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Polars view with epoch-millisecond timestamps.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let timestamps: Vec<i64> = self.bars.iter().map(|b| b.timestamp.timestamp_millis()).collect();
        let open: Vec<f64> = self.bars.iter().map(|b| b.open).collect();
        let high: Vec<f64> = self.bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = self.bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = self.bars.iter().map(|b| b.close).collect();

        let df = df! {
            "timestamp" => timestamps,
            "open" => open,
            "high" => high,
            "low" => low,
            "close" => close,
        }?;
        Ok(df)
    }
}

fn dedup_keep_last(bars: Vec<Bar>) -> Vec<Bar> {
    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}

/// Yahoo-style lookback periods: `1d`, `5d`, `1wk`, `1mo`, `3mo`, `1y`.
/// `max`, `ytd` and anything unrecognised mean "no trimming".
pub fn parse_period(period: &str) -> Option<Duration> {
    let period = period.trim().to_ascii_lowercase();
    let split = period.find(|c: char| !c.is_ascii_digit())?;
    let (count, unit) = period.split_at(split);
    let count: i64 = count.parse().ok()?;
    let days = match unit {
        "d" => count,
        "wk" | "w" => count * 7,
        "mo" => count * 30,
        "y" => count * 365,
        _ => return None,
    };
    Some(Duration::days(days))
}

fn format_interval(seconds: i64) -> String {
    match seconds {
        s if s > 0 && s % 604_800 == 0 => format!("{}wk", s / 604_800),
        s if s > 0 && s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s > 0 && s % 3_600 == 0 => format!("{}h", s / 3_600),
        s if s > 0 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}

fn parse_timestamps(column: &Column) -> Result<Vec<Option<DateTime<Utc>>>> {
    let parsed = match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_timestamp_str))
            .collect(),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            column
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .map(|value| value.and_then(|v| from_time_unit(v, unit)))
                .collect()
        }
        DataType::Date => column
            .cast(&DataType::Int32)?
            .i32()?
            .into_iter()
            .map(|value| value.and_then(|days| DateTime::from_timestamp(days as i64 * 86_400, 0)))
            .collect(),
        DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32 => column
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|value| value.and_then(from_epoch))
            .collect(),
        other => {
            return Err(SignalboardError::DataLoading(format!(
                "Timestamp column has unsupported type {:?}",
                other
            )))
        }
    };
    Ok(parsed)
}

fn from_time_unit(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    }
}

fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() < EPOCH_MILLIS_CUTOFF {
        DateTime::from_timestamp(value, 0)
    } else {
        DateTime::from_timestamp_millis(value)
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, fmt) {
            return Some(ts.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    raw.parse::<i64>().ok().and_then(from_epoch)
}
