//! MACD histogram zero-cross policy.

use crate::domain::indicator::Indicator;
use crate::domain::period::Period;
use crate::domain::signal::{Signal, SignalPolicy};

use super::previous;

const STRENGTH: f64 = 0.8;

/// Slow EMA window of the upstream MACD(12, 26, 9) plus the signal window.
const LOOKBACK: usize = 26 + 9;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacdPolicy;

impl SignalPolicy for MacdPolicy {
    fn id(&self) -> &'static str {
        "macd"
    }

    fn name(&self) -> &'static str {
        "MACD"
    }

    fn description(&self) -> &'static str {
        "Entries and exits on MACD histogram zero crosses"
    }

    fn params(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }

    fn min_periods(&self) -> usize {
        LOOKBACK
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal> {
        let hist: Vec<Option<f64>> = periods
            .iter()
            .map(|p| p.indicator(Indicator::MacdHistogram))
            .collect();

        (0..periods.len())
            .map(|i| match (previous(&hist, i), hist[i]) {
                (Some(prev), Some(curr)) if prev <= 0.0 && curr > 0.0 => {
                    Signal::buy(STRENGTH, "MACD bullish cross")
                }
                (Some(prev), Some(curr)) if prev >= 0.0 && curr < 0.0 => {
                    Signal::sell(STRENGTH, "MACD bearish cross")
                }
                _ => Signal::neutral(),
            })
            .collect()
    }
}
