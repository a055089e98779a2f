use crate::config::ViewConfig;

/// Zoom and marker toggles owned by whoever drives the display.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    config: ViewConfig,
    visible_bars: Option<usize>,
    show_markers: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl ViewState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            visible_bars: config.visible_bars,
            show_markers: config.show_markers,
            config,
        }
    }

    pub fn visible_bars(&self) -> Option<usize> {
        self.visible_bars
    }

    pub fn show_markers(&self) -> bool {
        self.show_markers
    }

    pub fn set_show_markers(&mut self, show: bool) {
        self.show_markers = show;
    }

    /// Show `zoom_step` fewer bars, never fewer than one step and never
    /// more than are visible now.
    pub fn zoom_in(&mut self, available: usize) {
        let step = self.config.zoom_step;
        let current = self.visible_bars.unwrap_or(available);
        self.visible_bars = Some(current.saturating_sub(step).max(step).min(current));
    }

    /// Show `zoom_step` more bars; once everything fits, show all.
    pub fn zoom_out(&mut self, available: usize) {
        if let Some(current) = self.visible_bars {
            let widened = current + self.config.zoom_step;
            self.visible_bars = if widened >= available { None } else { Some(widened) };
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Index of the first visible row out of `len`.
    pub fn window_start(&self, len: usize) -> usize {
        match self.visible_bars {
            Some(visible) => len.saturating_sub(visible),
            None => 0,
        }
    }
}
