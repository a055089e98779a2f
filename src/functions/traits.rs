use polars::prelude::*;
use anyhow::Result;
use crate::types::ScaleType;

/// Base trait for all indicators
pub trait Indicator: Send + Sync {
    /// Display name
    fn ui_name(&self) -> &'static str;

    /// Short name, also the default output column
    fn alias(&self) -> &'static str;

    /// Semantic scale type
    fn scale_type(&self) -> ScaleType;

    /// Expected value range
    fn value_range(&self) -> Option<(f64, f64)>;

    /// Number of leading bars consumed before the first defined value
    fn warmup_len(&self) -> usize;
}

/// Indicators computed over the whole series as one Polars expression
pub trait VectorizedIndicator: Indicator {
    fn calculate_vectorized(&self, args: &[IndicatorArg]) -> Result<Expr>;
}

/// Argument for indicator calls
#[derive(Debug, Clone)]
pub enum IndicatorArg {
    Series(Expr), // Polars expression
}

impl IndicatorArg {
    /// The leading series argument every indicator here takes.
    pub fn series(args: &[IndicatorArg], indicator: &str) -> Result<Expr> {
        match args.first() {
            Some(IndicatorArg::Series(expr)) => Ok(expr.clone()),
            None => anyhow::bail!("{}: missing series argument", indicator),
        }
    }
}
