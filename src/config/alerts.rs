use super::traits::ConfigSection;
use crate::error::SignalboardError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertMode {
    /// Fire only when an instrument enters BUY or SELL.
    Transition,
    /// Fire on every evaluation that ends in BUY or SELL.
    Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub enabled: bool,
    pub mode: AlertMode,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: AlertMode::Transition,
        }
    }
}

impl ConfigSection for AlertConfig {
    fn section_name() -> &'static str {
        "alerts"
    }

    fn validate(&self) -> Result<(), SignalboardError> {
        Ok(())
    }
}
