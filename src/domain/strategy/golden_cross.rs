//! Moving-average crossover policy.
//!
//! Golden cross (short SMA moves above long SMA) buys, dead cross sells. Both
//! averages must be defined on the current and previous period.

use crate::domain::indicator::Indicator;
use crate::domain::period::Period;
use crate::domain::signal::{Signal, SignalPolicy};

use super::{ParamOverrides, previous};

const STRENGTH: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct GoldenCrossPolicy {
    pub short_ma: usize,
    pub long_ma: usize,
}

impl Default for GoldenCrossPolicy {
    fn default() -> Self {
        GoldenCrossPolicy {
            short_ma: 25,
            long_ma: 75,
        }
    }
}

impl GoldenCrossPolicy {
    pub fn from_overrides(overrides: &ParamOverrides) -> Self {
        let d = GoldenCrossPolicy::default();
        GoldenCrossPolicy {
            short_ma: overrides.period_or("short_ma", d.short_ma),
            long_ma: overrides.period_or("long_ma", d.long_ma),
        }
    }
}

impl SignalPolicy for GoldenCrossPolicy {
    fn id(&self) -> &'static str {
        "golden_cross"
    }

    fn name(&self) -> &'static str {
        "Golden Cross"
    }

    fn description(&self) -> &'static str {
        "Trend following on short/long moving average crossovers"
    }

    fn params(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("short_ma", self.short_ma as f64),
            ("long_ma", self.long_ma as f64),
        ]
    }

    fn min_periods(&self) -> usize {
        self.short_ma.max(self.long_ma) + 1
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal> {
        let pairs: Vec<Option<(f64, f64)>> = periods
            .iter()
            .map(|p| {
                Some((
                    p.indicator(Indicator::Sma(self.short_ma))?,
                    p.indicator(Indicator::Sma(self.long_ma))?,
                ))
            })
            .collect();

        (0..periods.len())
            .map(|i| match (previous(&pairs, i), pairs[i]) {
                (Some((prev_short, prev_long)), Some((short, long))) => {
                    if prev_short <= prev_long && short > long {
                        Signal::buy(STRENGTH, "golden cross")
                    } else if prev_short >= prev_long && short < long {
                        Signal::sell(STRENGTH, "dead cross")
                    } else {
                        Signal::neutral()
                    }
                }
                _ => Signal::neutral(),
            })
            .collect()
    }
}
