use anyhow::{bail, Result};
use polars::lazy::dsl::{self, lit, when};
use polars::prelude::RollingOptionsFixedWindow;
use crate::functions::traits::{Indicator, IndicatorArg, VectorizedIndicator};
use crate::types::ScaleType;

/// Relative Strength Index over simple rolling means of gains and losses.
pub struct RSI {
    pub window: usize,
}

impl RSI {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    fn rolling_mean(&self, series: dsl::Expr) -> dsl::Expr {
        series.rolling_mean(RollingOptionsFixedWindow {
            window_size: self.window,
            min_periods: self.window,
            ..Default::default()
        })
    }
}

impl Indicator for RSI {
    fn alias(&self) -> &'static str { "RSI" }
    fn ui_name(&self) -> &'static str { "Relative Strength Index" }
    fn scale_type(&self) -> ScaleType { ScaleType::Oscillator0_100 }
    fn value_range(&self) -> Option<(f64, f64)> { Some((0.0, 100.0)) }

    /// One bar for the first delta plus `window` deltas.
    fn warmup_len(&self) -> usize {
        self.window + 1
    }
}

impl VectorizedIndicator for RSI {
    fn calculate_vectorized(&self, args: &[IndicatorArg]) -> Result<dsl::Expr> {
        if self.window == 0 {
            bail!("RSI: window must be at least 1");
        }
        let series = IndicatorArg::series(args, self.alias())?;

        // Step 1: price changes (null on the first bar)
        let delta = series.clone() - series.shift(lit(1));

        // Step 2: split into gains and losses; nulls propagate
        let gains = (delta.clone() + delta.clone().abs()) / lit(2.0);
        let losses = (delta.clone().abs() - delta) / lit(2.0);

        // Step 3: simple rolling means
        let avg_gains = self.rolling_mean(gains);
        let avg_losses = self.rolling_mean(losses);

        // Step 4: RS and RSI; no losses in the window pins RSI at 100
        let rs = avg_gains / avg_losses.clone();
        let rsi = when(avg_losses.eq(lit(0.0)))
            .then(lit(100.0))
            .otherwise(lit(100.0) - (lit(100.0) / (lit(1.0) + rs)));

        Ok(rsi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::*;

    fn rsi_values(closes: &[f64], window: usize) -> Vec<Option<f64>> {
        let df = df! { "close" => closes }.unwrap();
        let expr = RSI::new(window)
            .calculate_vectorized(&[IndicatorArg::Series(col("close"))])
            .unwrap();
        let out = df.lazy().select([expr.alias("rsi")]).collect().unwrap();
        out.column("rsi").unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_rsi_warmup_is_null() {
        let values = rsi_values(&[1.0, 2.0, 1.0, 2.0, 1.0], 3);
        assert_eq!(values[..3], [None, None, None]);
        assert!(values[3].is_some());
        assert!(values[4].is_some());
    }

    #[test]
    fn test_rsi_simple_rolling_mean() {
        // deltas: +2, -1, +2, -1 ; window 2 at idx 2: gains (2,0) losses (0,1)
        let values = rsi_values(&[10.0, 12.0, 11.0, 13.0, 12.0], 2);
        let rs: f64 = 1.0 / 0.5;
        let expected = 100.0 - 100.0 / (1.0 + rs);
        assert!((values[2].unwrap() - expected).abs() < 1e-9);
        assert!((values[3].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let values = rsi_values(&[1.0, 2.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(values[3], Some(100.0));
        assert_eq!(values[4], Some(100.0));
    }

    #[test]
    fn test_rsi_no_gains_is_0() {
        let values = rsi_values(&[5.0, 4.0, 3.0, 2.0], 3);
        assert_eq!(values[3], Some(0.0));
    }

    #[test]
    fn test_rsi_rejects_zero_window() {
        assert!(RSI::new(0)
            .calculate_vectorized(&[IndicatorArg::Series(col("close"))])
            .is_err());
        assert_eq!(RSI::new(14).warmup_len(), 15);
    }
}
