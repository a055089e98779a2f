mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{flatten_label, ColumnMap, RequiredColumn};
pub use validator::DataValidator;
