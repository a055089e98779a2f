use super::traits::ConfigSection;
use crate::error::SignalboardError;
use crate::functions::indicators::{EMA, RSI};
use crate::functions::traits::Indicator;
use serde::{Deserialize, Serialize};

/// Spans and windows for the three derived columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub fast_span: usize,
    pub slow_span: usize,
    pub rsi_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            fast_span: 9,
            slow_span: 21,
            rsi_window: 14,
        }
    }
}

impl IndicatorConfig {
    pub fn new(fast_span: usize, slow_span: usize, rsi_window: usize) -> Self {
        Self {
            fast_span,
            slow_span,
            rsi_window,
        }
    }

    /// Leading bars consumed before every derived column is defined.
    pub fn warmup_len(&self) -> usize {
        [
            EMA::new(self.fast_span).warmup_len(),
            EMA::new(self.slow_span).warmup_len(),
            RSI::new(self.rsi_window).warmup_len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }
}

impl ConfigSection for IndicatorConfig {
    fn section_name() -> &'static str {
        "indicators"
    }

    fn validate(&self) -> Result<(), SignalboardError> {
        if self.fast_span == 0 {
            return Err(SignalboardError::Configuration(
                "Fast EMA span must be at least 1".to_string(),
            ));
        }
        if self.fast_span >= self.slow_span {
            return Err(SignalboardError::Configuration(format!(
                "Fast EMA span ({}) must be shorter than slow EMA span ({})",
                self.fast_span, self.slow_span
            )));
        }
        if self.rsi_window == 0 {
            return Err(SignalboardError::Configuration(
                "RSI window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
