//! One row of an indicator-annotated price series.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::indicator::Indicator;

#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub indicators: HashMap<Indicator, f64>,
}

impl Period {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Period {
            date,
            open,
            high,
            low,
            close,
            volume,
            indicators: HashMap::new(),
        }
    }

    pub fn with_indicator(mut self, indicator: Indicator, value: f64) -> Self {
        self.set_indicator(indicator, value);
        self
    }

    /// Non-finite values are dropped so they read back as undefined.
    pub fn set_indicator(&mut self, indicator: Indicator, value: f64) {
        if value.is_finite() {
            self.indicators.insert(indicator, value);
        } else {
            self.indicators.remove(&indicator);
        }
    }

    /// `None` when the indicator is absent (insufficient history or never computed).
    pub fn indicator(&self, indicator: Indicator) -> Option<f64> {
        self.indicators.get(&indicator).copied()
    }
}

/// True when dates are strictly increasing.
pub fn is_strictly_ascending(periods: &[Period]) -> bool {
    periods.windows(2).all(|w| w[0].date < w[1].date)
}
