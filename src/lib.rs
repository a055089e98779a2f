pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;
pub mod view;

pub use config::{AppConfig, ConfigManager, IndicatorConfig, SignalThresholds};
pub use data::{BarSeries, CsvDataSource, MarketDataSource};
pub use engines::{AlertEmitter, Scanner, SignalEngine, SignalReport};
pub use error::{Result, SignalboardError};
pub use types::{Bar, Signal};
pub use view::{ChartFrame, ViewState};
