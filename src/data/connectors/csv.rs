use crate::error::{Result, SignalboardError};
use polars::prelude::*;
use std::path::Path;
use super::{types::RequiredColumn, validator::DataValidator};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SignalboardError::DataUnavailable(format!(
                "No data file at {}",
                path.display()
            )));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| SignalboardError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        log::debug!("Loaded {} rows from {}", df.height(), path.display());
        Ok(df)
    }

    /// Rename the resolved columns to `timestamp/open/high/low/close`, cast
    /// prices to f64 and drop rows without a usable price. Everything else
    /// (volume, adjusted close, ticker columns) is discarded.
    pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame> {
        let column_map = DataValidator::resolve_columns(df)?;

        let mut columns = Vec::with_capacity(5);
        columns.push(
            df.column(&column_map.timestamp)?
                .clone()
                .with_name(RequiredColumn::Timestamp.as_str().into()),
        );
        for required in RequiredColumn::prices() {
            let source = df.column(column_map.source_name(required))?;
            // Non-strict cast: header rows repeated below the header become null.
            let cast = source.cast(&DataType::Float64)?;
            columns.push(cast.with_name(required.as_str().into()));
        }

        let normalized = DataFrame::new(columns)?;

        let null_report = DataValidator::check_nulls(&normalized);
        if null_report.is_empty() {
            return Ok(normalized);
        }

        log::warn!("Null values detected: {:?}", null_report);
        let before = normalized.height();
        let cleaned = normalized
            .lazy()
            .filter(
                col("timestamp")
                    .is_not_null()
                    .and(col("open").is_not_null())
                    .and(col("high").is_not_null())
                    .and(col("low").is_not_null())
                    .and(col("close").is_not_null()),
            )
            .collect()?;
        log::warn!("Dropped {} incomplete rows", before - cleaned.height());

        Ok(cleaned)
    }
}
