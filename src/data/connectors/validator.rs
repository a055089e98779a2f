use crate::error::{Result, SignalboardError};
use crate::types::Bar;
use polars::prelude::*;
use super::types::{ColumnMap, RequiredColumn};

pub struct DataValidator;

impl DataValidator {
    /// Locate the timestamp and OHLC columns, flattening multi-level labels.
    /// When several columns match, the first in frame order wins.
    pub fn resolve_columns(df: &DataFrame) -> Result<ColumnMap> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let find = |required: RequiredColumn| -> Result<String> {
            names
                .iter()
                .find(|name| required.matches(name))
                .cloned()
                .ok_or_else(|| {
                    SignalboardError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?}, found: {:?})",
                        required.as_str(),
                        required.aliases(),
                        names
                    ))
                })
        };

        let open = find(RequiredColumn::Open)?;
        let high = find(RequiredColumn::High)?;
        let low = find(RequiredColumn::Low)?;
        let close = find(RequiredColumn::Close)?;

        // Index columns written without a label (e.g. "Price" above a ticker row)
        // fall back to the leading column.
        let timestamp = match find(RequiredColumn::Timestamp) {
            Ok(name) => name,
            Err(err) => names
                .first()
                .filter(|first| ![&open, &high, &low, &close].contains(first))
                .cloned()
                .ok_or(err)?,
        };

        let column_map = ColumnMap {
            timestamp,
            open,
            high,
            low,
            close,
        };

        for required in RequiredColumn::prices() {
            let name = column_map.source_name(required);
            let dtype = df.column(name)?.dtype().clone();
            let accepted = matches!(
                dtype,
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
                    | DataType::String
            );
            if !accepted {
                return Err(SignalboardError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    name,
                    required.as_str(),
                    dtype
                )));
            }
        }

        Ok(column_map)
    }

    /// Why the indicators cannot use `bar`, if they can't.
    pub fn bar_defect(bar: &Bar) -> Option<String> {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Some(format!("prices must be positive and finite ({:?})", prices));
        }
        if bar.high < bar.low {
            return Some(format!("high ({}) < low ({})", bar.high, bar.low));
        }
        None
    }

    /// Reject a bar vector holding any malformed bar. Malformed input is a
    /// "no data" condition, not a failure.
    pub fn validate_bars(bars: &[Bar]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            if let Some(defect) = Self::bar_defect(bar) {
                return Err(SignalboardError::DataUnavailable(format!(
                    "Malformed bar at row {}: {}",
                    i, defect
                )));
            }
        }
        Ok(())
    }

    /// Check for null values in any column
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .map(|column| (column.name().to_string(), column.null_count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use polars::df;

    #[test]
    fn test_resolve_plain_columns() {
        let df = df! {
            "timestamp" => &["2024-01-01", "2024-01-02"],
            "open" => &[100.0, 101.0],
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "close" => &[100.5, 102.0],
        }
        .unwrap();

        let map = DataValidator::resolve_columns(&df).unwrap();
        assert_eq!(map.close, "close");
        assert_eq!(map.timestamp, "timestamp");
    }

    #[test]
    fn test_resolve_multi_level_columns() {
        let df = df! {
            "Price" => &["2024-01-01", "2024-01-02"],
            "Adj Close_GC=F" => &[100.1, 101.9],
            "Close_GC=F" => &[100.5, 102.0],
            "High_GC=F" => &[101.0, 103.0],
            "Low_GC=F" => &[99.0, 100.0],
            "Open_GC=F" => &[100.0, 101.0],
        }
        .unwrap();

        let map = DataValidator::resolve_columns(&df).unwrap();
        assert_eq!(map.close, "Close_GC=F");
        assert_eq!(map.open, "Open_GC=F");
        assert_eq!(map.timestamp, "Price");
    }

    #[test]
    fn test_first_duplicate_wins() {
        let df = df! {
            "Date" => &["2024-01-01"],
            "Open" => &[1.0],
            "High" => &[1.0],
            "Low" => &[1.0],
            "Close" => &[1.0],
            "close_duplicated_0" => &[2.0],
        }
        .unwrap();

        let map = DataValidator::resolve_columns(&df).unwrap();
        assert_eq!(map.close, "Close");
    }

    #[test]
    fn test_missing_column() {
        let df = df! {
            "date" => &["2024-01-01"],
            "open" => &[100.0],
            "high" => &[101.0],
            "low" => &[99.0],
        }
        .unwrap();

        assert!(DataValidator::resolve_columns(&df).is_err());
    }

    #[test]
    fn test_invalid_bars() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(DataValidator::validate_bars(&[Bar::new(ts, 100.0, 99.0, 101.0, 100.0)]).is_err());
        assert!(DataValidator::validate_bars(&[Bar::flat(ts, 0.0)]).is_err());
        assert!(DataValidator::validate_bars(&[Bar::flat(ts, f64::NAN)]).is_err());
        assert!(DataValidator::validate_bars(&[Bar::flat(ts, 42.0)]).is_ok());
    }

    #[test]
    fn test_malformed_bars_are_no_data() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = [Bar::flat(ts, 42.0), Bar::new(ts, 51.0, 51.5, 52.5, 52.0)];
        let err = DataValidator::validate_bars(&bars).unwrap_err();
        assert!(err.is_no_data());
        assert!(err.to_string().contains("row 1"));
        assert_eq!(
            DataValidator::bar_defect(&bars[1]).as_deref(),
            Some("high (51.5) < low (52.5)")
        );
        assert!(DataValidator::bar_defect(&bars[0]).is_none());
    }
}
