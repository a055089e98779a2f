use super::traits::ConfigSection;
use crate::error::SignalboardError;
use serde::{Deserialize, Serialize};

/// Decision thresholds for the BUY/SELL/WAIT classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    /// Minimum `|ema_fast - ema_slow| / ema_slow`, inclusive.
    pub min_separation_pct: f64,
    /// RSI must be strictly below this for a BUY.
    pub rsi_buy_ceiling: f64,
    /// RSI must be strictly above this for a SELL.
    pub rsi_sell_floor: f64,
    /// Require the slow EMA to move in the signal's direction since the previous bar.
    pub require_slope_confirmation: bool,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            min_separation_pct: 0.00015,
            rsi_buy_ceiling: 65.0,
            rsi_sell_floor: 35.0,
            require_slope_confirmation: false,
        }
    }
}

impl SignalThresholds {
    /// The wider 70/30 RSI band.
    pub fn classic() -> Self {
        Self {
            rsi_buy_ceiling: 70.0,
            rsi_sell_floor: 30.0,
            ..Self::default()
        }
    }

    pub fn with_slope_confirmation(mut self, enabled: bool) -> Self {
        self.require_slope_confirmation = enabled;
        self
    }

    pub fn with_min_separation(mut self, pct: f64) -> Self {
        self.min_separation_pct = pct;
        self
    }
}

impl ConfigSection for SignalThresholds {
    fn section_name() -> &'static str {
        "thresholds"
    }

    fn validate(&self) -> Result<(), SignalboardError> {
        if !self.min_separation_pct.is_finite() || self.min_separation_pct < 0.0 {
            return Err(SignalboardError::Configuration(
                "Minimum separation must be a non-negative number".to_string(),
            ));
        }
        for (name, value) in [
            ("rsi_buy_ceiling", self.rsi_buy_ceiling),
            ("rsi_sell_floor", self.rsi_sell_floor),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(SignalboardError::Configuration(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        if self.rsi_sell_floor >= self.rsi_buy_ceiling {
            return Err(SignalboardError::Configuration(format!(
                "RSI sell floor ({}) must be below buy ceiling ({})",
                self.rsi_sell_floor, self.rsi_buy_ceiling
            )));
        }
        Ok(())
    }
}
