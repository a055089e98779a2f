pub mod connectors;
pub mod series;
pub mod source;

pub use connectors::{CsvConnector, DataValidator, RequiredColumn};
pub use series::{parse_period, BarSeries, AUTO_INTERVAL};
pub use source::{CsvDataSource, FetchRequest, MarketDataSource};
