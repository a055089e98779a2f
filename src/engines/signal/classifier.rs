//! BUY/SELL/WAIT decision for a single decorated bar.

use crate::config::SignalThresholds;
use crate::engines::signal::engine::DecoratedBar;
use crate::types::Signal;

/// Classify `row`, optionally confirming the slow-EMA slope against `prev_row`.
///
/// Conditions are checked in a fixed order: BUY, then SELL, otherwise WAIT.
/// The separation filter is inclusive. Equal EMAs, NaN readings and a
/// missing predecessor under slope confirmation all fall through to WAIT.
pub fn classify_signal(
    row: &DecoratedBar,
    prev_row: Option<&DecoratedBar>,
    thresholds: &SignalThresholds,
) -> Signal {
    let separated = row.separation_pct() >= thresholds.min_separation_pct;

    if row.ema_fast > row.ema_slow
        && separated
        && row.rsi < thresholds.rsi_buy_ceiling
        && slope_confirms(row, prev_row, thresholds, Slope::Rising)
    {
        Signal::Buy
    } else if row.ema_fast < row.ema_slow
        && separated
        && row.rsi > thresholds.rsi_sell_floor
        && slope_confirms(row, prev_row, thresholds, Slope::Falling)
    {
        Signal::Sell
    } else {
        Signal::Wait
    }
}

#[derive(Clone, Copy)]
enum Slope {
    Rising,
    Falling,
}

fn slope_confirms(
    row: &DecoratedBar,
    prev_row: Option<&DecoratedBar>,
    thresholds: &SignalThresholds,
    slope: Slope,
) -> bool {
    if !thresholds.require_slope_confirmation {
        return true;
    }
    match (prev_row, slope) {
        (Some(prev), Slope::Rising) => row.ema_slow > prev.ema_slow,
        (Some(prev), Slope::Falling) => row.ema_slow < prev.ema_slow,
        (None, _) => false,
    }
}
