use super::traits::ConfigSection;
use crate::error::SignalboardError;
use serde::{Deserialize, Serialize};

/// Initial chart view handed to the caller-owned `ViewState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of most recent bars to show; `None` shows everything.
    pub visible_bars: Option<usize>,
    /// Bars added or removed per zoom step.
    pub zoom_step: usize,
    pub show_markers: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            visible_bars: Some(120),
            zoom_step: 20,
            show_markers: true,
        }
    }
}

impl ConfigSection for ViewConfig {
    fn section_name() -> &'static str {
        "view"
    }

    fn validate(&self) -> Result<(), SignalboardError> {
        if self.visible_bars == Some(0) {
            return Err(SignalboardError::Configuration(
                "visible_bars must be at least 1 (omit it to show all bars)".to_string(),
            ));
        }
        if self.zoom_step == 0 {
            return Err(SignalboardError::Configuration(
                "zoom_step must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
