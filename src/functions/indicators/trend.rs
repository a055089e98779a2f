use crate::{
    functions::traits::{Indicator, IndicatorArg, VectorizedIndicator},
    types::ScaleType,
};
use anyhow::{bail, Result};
use polars::{lazy::dsl, prelude::EWMOptions};

// --- EMA ---
pub struct EMA {
    pub span: usize,
}

impl EMA {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    /// Smoothing factor 2 / (span + 1).
    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl Indicator for EMA {
    fn alias(&self) -> &'static str {
        "EMA"
    }
    fn ui_name(&self) -> &'static str {
        "Exponential Moving Average"
    }
    fn scale_type(&self) -> ScaleType {
        ScaleType::Price
    }
    fn value_range(&self) -> Option<(f64, f64)> {
        None
    }
    fn warmup_len(&self) -> usize {
        1
    }
}

impl VectorizedIndicator for EMA {
    /// `EMA[i] = a * close[i] + (1 - a) * EMA[i-1]`, seeded with `EMA[0] = close[0]`.
    fn calculate_vectorized(&self, args: &[IndicatorArg]) -> Result<dsl::Expr> {
        if self.span == 0 {
            bail!("EMA: span must be at least 1");
        }
        let series = IndicatorArg::series(args, self.alias())?;

        let options = EWMOptions {
            alpha: self.alpha(),
            adjust: false,
            min_periods: 1,
            ..Default::default()
        };

        Ok(series.ewm_mean(options))
    }
}
