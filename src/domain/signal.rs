//! Per-period trading signals and the policy capability that produces them.

use serde::Serialize;

use super::period::Period;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub buy: bool,
    pub sell: bool,
    pub strength: f64,
    pub reason: String,
}

impl Signal {
    pub fn neutral() -> Self {
        Signal {
            buy: false,
            sell: false,
            strength: 0.0,
            reason: String::new(),
        }
    }

    pub fn buy(strength: f64, reason: impl Into<String>) -> Self {
        Signal {
            buy: true,
            sell: false,
            strength: strength.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }

    pub fn sell(strength: f64, reason: impl Into<String>) -> Self {
        Signal {
            buy: false,
            sell: true,
            strength: strength.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }

    pub fn is_neutral(&self) -> bool {
        !self.buy && !self.sell
    }
}

impl Default for Signal {
    fn default() -> Self {
        Signal::neutral()
    }
}

/// A signal-generation strategy.
///
/// `generate_signals` must return exactly one signal per period, in period
/// order. Periods whose inputs are undefined yield [`Signal::neutral`].
pub trait SignalPolicy {
    /// Selector id, e.g. `"rsi"`.
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Effective parameters after overrides, in declaration order.
    fn params(&self) -> Vec<(&'static str, f64)>;

    /// Smallest series length on which the policy can fire at all.
    fn min_periods(&self) -> usize {
        1
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal>;
}
