//! Built-in signal policies and selection by name.
//!
//! Each variant lives in its own module and implements
//! [`SignalPolicy`]. A [`StrategySelector`] names a variant plus parameter
//! overrides; [`build_policy`] turns it into a boxed policy.

pub mod bollinger;
pub mod combo;
pub mod golden_cross;
pub mod macd;
pub mod rsi;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::SwingtraderError;
use crate::domain::signal::SignalPolicy;

pub use bollinger::BollingerBandPolicy;
pub use combo::ComboPolicy;
pub use golden_cross::GoldenCrossPolicy;
pub use macd::MacdPolicy;
pub use rsi::RsiPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Rsi,
    GoldenCross,
    Macd,
    Bollinger,
    Combo,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Rsi,
        StrategyKind::GoldenCross,
        StrategyKind::Macd,
        StrategyKind::Bollinger,
        StrategyKind::Combo,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::Rsi => "rsi",
            StrategyKind::GoldenCross => "golden_cross",
            StrategyKind::Macd => "macd",
            StrategyKind::Bollinger => "bollinger",
            StrategyKind::Combo => "combo",
        }
    }

    pub fn build(&self, overrides: &ParamOverrides) -> Box<dyn SignalPolicy> {
        match self {
            StrategyKind::Rsi => Box::new(RsiPolicy::from_overrides(overrides)),
            StrategyKind::GoldenCross => Box::new(GoldenCrossPolicy::from_overrides(overrides)),
            StrategyKind::Macd => Box::new(MacdPolicy),
            StrategyKind::Bollinger => Box::new(BollingerBandPolicy),
            StrategyKind::Combo => Box::new(ComboPolicy::from_overrides(overrides)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrategyKind {
    type Err = SwingtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.id() == wanted)
            .ok_or_else(|| SwingtraderError::UnknownStrategy {
                name: s.trim().to_string(),
            })
    }
}

/// Named numeric parameter overrides. Keys a policy does not declare are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    values: BTreeMap<String, f64>,
}

impl ParamOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.values.insert(key.trim().to_ascii_lowercase(), value);
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.values
            .get(key)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    /// Window lengths are whole and positive; anything else keeps the default.
    pub fn period_or(&self, key: &str, default: usize) -> usize {
        match self.values.get(key) {
            Some(&v) if v.is_finite() && v >= 1.0 => v.round() as usize,
            _ => default,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Strategy id plus overrides, as read from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySelector {
    pub name: String,
    pub overrides: ParamOverrides,
}

impl StrategySelector {
    pub fn new(name: &str) -> Self {
        StrategySelector {
            name: name.to_string(),
            overrides: ParamOverrides::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: ParamOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        StrategySelector::new(StrategyKind::Combo.id())
    }
}

pub fn build_policy(selector: &StrategySelector) -> Result<Box<dyn SignalPolicy>, SwingtraderError> {
    let kind: StrategyKind = selector.name.parse()?;
    let policy = kind.build(&selector.overrides);

    let known: Vec<&str> = policy.params().iter().map(|(k, _)| *k).collect();
    for key in selector.overrides.keys() {
        if !known.iter().any(|k| *k == key) {
            tracing::debug!(strategy = kind.id(), param = key, "ignoring unknown parameter");
        }
    }

    Ok(policy)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<(&'static str, f64)>,
}

impl StrategyInfo {
    pub fn of(policy: &dyn SignalPolicy) -> Self {
        StrategyInfo {
            id: policy.id(),
            name: policy.name(),
            description: policy.description(),
            params: policy.params(),
        }
    }
}

/// Every built-in strategy with its default parameters.
pub fn available_strategies() -> Vec<StrategyInfo> {
    let defaults = ParamOverrides::new();
    StrategyKind::ALL
        .iter()
        .map(|k| StrategyInfo::of(k.build(&defaults).as_ref()))
        .collect()
}

/// Value at the period before `i`, or `None` at the start of the series.
pub(crate) fn previous<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    i.checked_sub(1).and_then(|j| values[j])
}
