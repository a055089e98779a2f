pub mod momentum;
pub mod trend;

pub use trend::EMA;
pub use momentum::RSI;
