pub mod alerts;
pub mod scanner;
pub mod signal;

pub use alerts::{Alert, AlertEmitter, AlertSink, LogAlertSink, MemoryAlertSink};
pub use scanner::{InstrumentReport, InstrumentStatus, Scanner};
pub use signal::{
    chart_markers, classify_signal, compute_indicators, mark_historical_signals, ChartMarker,
    DecoratedBar, DecoratedSeries, LatestReadings, SignalEngine, SignalReport, TaggedBar,
};
