use serde::{Deserialize, Serialize};

/// Columns the engine understands. Volume is carried by some feeds but never required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredColumn {
    Timestamp,
    Open,
    High,
    Low,
    Close,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }

    pub fn prices() -> [Self; 4] {
        [Self::Open, Self::High, Self::Low, Self::Close]
    }

    /// Common alternative column names
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Timestamp => &[
                "timestamp", "Timestamp", "date", "Date", "datetime", "Datetime", "DateTime",
                "time", "Time",
            ],
            Self::Open => &["open", "Open", "OPEN", "o"],
            Self::High => &["high", "High", "HIGH", "h"],
            Self::Low => &["low", "Low", "LOW", "l"],
            Self::Close => &["close", "Close", "CLOSE", "c"],
        }
    }

    /// Match a (possibly multi-level) column label against this column's aliases.
    pub fn matches(&self, label: &str) -> bool {
        let flat = flatten_label(label);
        self.aliases().iter().any(|alias| *alias == flat)
    }
}

/// Collapse a multi-level column label to its first level.
///
/// `('Close', 'GC=F')`, `Close_GC=F`, `Close.GC=F` and `Close GC=F` all become
/// `Close`. A label whose first level is itself a known qualifier such as
/// `Adj Close` stays distinct.
pub fn flatten_label(label: &str) -> &str {
    let trimmed = label.trim();

    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .map(|rest| rest.split(',').next().unwrap_or(rest))
        .unwrap_or(trimmed);

    let inner = inner.trim().trim_matches(|c: char| c == '\'' || c == '"').trim();

    inner
        .split(|c: char| c == '_' || c == '.' || c == ' ')
        .next()
        .filter(|first| !first.is_empty() && !is_qualifier(first))
        .unwrap_or(inner)
}

fn is_qualifier(word: &str) -> bool {
    matches!(word, "adj" | "Adj" | "ADJ" | "adjusted" | "Adjusted")
}

/// Resolved source column name for each required column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub timestamp: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

impl ColumnMap {
    pub fn source_name(&self, column: RequiredColumn) -> &str {
        match column {
            RequiredColumn::Timestamp => &self.timestamp,
            RequiredColumn::Open => &self.open,
            RequiredColumn::High => &self.high,
            RequiredColumn::Low => &self.low,
            RequiredColumn::Close => &self.close,
        }
    }
}
