pub mod emitter;
pub mod sink;

pub use emitter::{Alert, AlertEmitter};
pub use sink::{AlertSink, LogAlertSink, MemoryAlertSink};
