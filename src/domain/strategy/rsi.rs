//! RSI mean-reversion policy.
//!
//! Buys when RSI is at or below the oversold threshold and sells when it is at
//! or above the overbought threshold. Reads the `RSI_<period>` column.

use crate::domain::indicator::{DEFAULT_RSI_PERIOD, Indicator};
use crate::domain::period::Period;
use crate::domain::signal::{Signal, SignalPolicy};

use super::ParamOverrides;

const STRENGTH: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct RsiPolicy {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiPolicy {
    fn default() -> Self {
        RsiPolicy {
            period: DEFAULT_RSI_PERIOD,
            oversold: 35.0,
            overbought: 65.0,
        }
    }
}

impl RsiPolicy {
    pub fn from_overrides(overrides: &ParamOverrides) -> Self {
        let d = RsiPolicy::default();
        RsiPolicy {
            period: overrides.period_or("rsi_period", d.period),
            oversold: overrides.get_or("oversold_threshold", d.oversold),
            overbought: overrides.get_or("overbought_threshold", d.overbought),
        }
    }

    fn signal_for(&self, rsi: f64) -> Signal {
        if rsi <= self.oversold {
            Signal::buy(STRENGTH, format!("RSI oversold ({:.1})", rsi))
        } else if rsi >= self.overbought {
            Signal::sell(STRENGTH, format!("RSI overbought ({:.1})", rsi))
        } else {
            Signal::neutral()
        }
    }
}

impl SignalPolicy for RsiPolicy {
    fn id(&self) -> &'static str {
        "rsi"
    }

    fn name(&self) -> &'static str {
        "RSI"
    }

    fn description(&self) -> &'static str {
        "Contrarian entries on RSI oversold, exits on RSI overbought"
    }

    fn params(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("rsi_period", self.period as f64),
            ("oversold_threshold", self.oversold),
            ("overbought_threshold", self.overbought),
        ]
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal> {
        let column = Indicator::Rsi(self.period);
        periods
            .iter()
            .map(|p| match p.indicator(column) {
                Some(rsi) => self.signal_for(rsi),
                None => Signal::neutral(),
            })
            .collect()
    }
}
