pub mod classifier;
pub mod engine;
pub mod markers;
pub mod report;

pub use classifier::classify_signal;
pub use engine::{compute_indicators, DecoratedBar, DecoratedSeries, SignalEngine};
pub use markers::{chart_markers, mark_historical_signals, ChartMarker, TaggedBar};
pub use report::{LatestReadings, SignalReport};
