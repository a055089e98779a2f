pub mod chart;
pub mod state;

pub use chart::{ChartFrame, SeriesLegend};
pub use state::ViewState;
