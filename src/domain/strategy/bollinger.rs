//! Bollinger band touch policy: buy at the lower band, sell at the upper band.

use crate::domain::indicator::Indicator;
use crate::domain::period::Period;
use crate::domain::signal::{Signal, SignalPolicy};

const STRENGTH: f64 = 0.7;
const LOOKBACK: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BollingerBandPolicy;

impl SignalPolicy for BollingerBandPolicy {
    fn id(&self) -> &'static str {
        "bollinger"
    }

    fn name(&self) -> &'static str {
        "Bollinger Bands"
    }

    fn description(&self) -> &'static str {
        "Contrarian entries at the lower band, exits at the upper band"
    }

    fn params(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }

    fn min_periods(&self) -> usize {
        LOOKBACK
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal> {
        periods
            .iter()
            .map(|p| {
                let bands = p
                    .indicator(Indicator::BollingerUpper)
                    .zip(p.indicator(Indicator::BollingerLower));
                match bands {
                    Some((_, lower)) if p.close <= lower => {
                        Signal::buy(STRENGTH, "lower band touch")
                    }
                    Some((upper, _)) if p.close >= upper => {
                        Signal::sell(STRENGTH, "upper band touch")
                    }
                    _ => Signal::neutral(),
                }
            })
            .collect()
    }
}
