use super::sink::AlertSink;
use crate::config::{AlertConfig, AlertMode};
use crate::engines::signal::SignalReport;
use crate::types::Signal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Title/body pair for a BUY or SELL notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub symbol: String,
    pub interval: String,
    pub signal: Signal,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl Alert {
    pub fn from_report(report: &SignalReport) -> Self {
        let indicators = report.series.indicators();
        Self {
            symbol: report.symbol.clone(),
            interval: report.interval.clone(),
            signal: report.signal,
            timestamp: report.latest.timestamp,
            title: format!("{} {}", report.signal, report.symbol),
            body: format!(
                "Price {:.4} | RSI {:.1} | EMA{} {:.4} / EMA{} {:.4}",
                report.latest.price,
                report.latest.rsi,
                indicators.fast_span,
                report.latest.ema_fast,
                indicators.slow_span,
                report.latest.ema_slow,
            ),
        }
    }
}

/// Caller-owned alert state across refreshes. The engine itself keeps none.
#[derive(Debug, Clone)]
pub struct AlertEmitter {
    config: AlertConfig,
    last_signal: HashMap<(String, String), Signal>,
}

impl AlertEmitter {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            last_signal: HashMap::new(),
        }
    }

    /// Record the report's signal and return the alert it warrants, if any.
    pub fn observe(&mut self, report: &SignalReport) -> Option<Alert> {
        let key = (report.symbol.clone(), report.interval.clone());
        let previous = self.last_signal.insert(key, report.signal);

        if !self.config.enabled || !report.signal.is_actionable() {
            return None;
        }

        let fire = match self.config.mode {
            AlertMode::Level => true,
            AlertMode::Transition => previous != Some(report.signal),
        };
        fire.then(|| Alert::from_report(report))
    }

    /// `observe` and forward to `sink`.
    pub fn dispatch(&mut self, report: &SignalReport, sink: &dyn AlertSink) -> Option<Alert> {
        let alert = self.observe(report)?;
        sink.send(&alert);
        Some(alert)
    }

    pub fn last_signal(&self, symbol: &str, interval: &str) -> Option<Signal> {
        self.last_signal
            .get(&(symbol.to_string(), interval.to_string()))
            .copied()
    }

    /// Forget an instrument so its next BUY/SELL alerts again.
    pub fn reset(&mut self, symbol: &str, interval: &str) {
        self.last_signal
            .remove(&(symbol.to_string(), interval.to_string()));
    }
}
