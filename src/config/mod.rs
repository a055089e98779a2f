pub mod traits;
pub mod indicators;
pub mod thresholds;
pub mod alerts;
pub mod view;
pub mod watchlist;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use indicators::IndicatorConfig;
pub use thresholds::SignalThresholds;
pub use alerts::{AlertConfig, AlertMode};
pub use view::ViewConfig;
pub use watchlist::{InstrumentConfig, WatchlistConfig};
pub use traits::ConfigSection;
