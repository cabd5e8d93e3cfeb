//! Precomputed indicator columns a price series can carry.
//!
//! Indicator values are computed upstream; this module only names them.
//! `Indicator` serves as the map key on a [`Period`](super::period::Period)
//! and round-trips through the CSV column names used by the data adapter.

use std::fmt;
use std::str::FromStr;

/// RSI period assumed for a bare `RSI` column.
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    Sma(usize),
    Rsi(usize),
    Macd,
    MacdSignal,
    MacdHistogram,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    StochasticK,
    StochasticD,
    VolumeSma,
    VolumeRatio,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Sma(period) => write!(f, "SMA_{}", period),
            Indicator::Rsi(period) => write!(f, "RSI_{}", period),
            Indicator::Macd => write!(f, "MACD"),
            Indicator::MacdSignal => write!(f, "MACD_signal"),
            Indicator::MacdHistogram => write!(f, "MACD_histogram"),
            Indicator::BollingerUpper => write!(f, "BB_upper"),
            Indicator::BollingerMiddle => write!(f, "BB_middle"),
            Indicator::BollingerLower => write!(f, "BB_lower"),
            Indicator::StochasticK => write!(f, "Stoch_k"),
            Indicator::StochasticD => write!(f, "Stoch_d"),
            Indicator::VolumeSma => write!(f, "Volume_SMA"),
            Indicator::VolumeRatio => write!(f, "Volume_ratio"),
        }
    }
}

/// Column name that is not a recognised indicator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised indicator column: {0}")]
pub struct UnknownIndicator(pub String);

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let lower = name.to_ascii_lowercase();

        let fixed = match lower.as_str() {
            "rsi" => Some(Indicator::Rsi(DEFAULT_RSI_PERIOD)),
            "macd" => Some(Indicator::Macd),
            "macd_signal" => Some(Indicator::MacdSignal),
            "macd_histogram" | "macd_hist" => Some(Indicator::MacdHistogram),
            "bb_upper" => Some(Indicator::BollingerUpper),
            "bb_middle" => Some(Indicator::BollingerMiddle),
            "bb_lower" => Some(Indicator::BollingerLower),
            "stoch_k" => Some(Indicator::StochasticK),
            "stoch_d" => Some(Indicator::StochasticD),
            "volume_sma" => Some(Indicator::VolumeSma),
            "volume_ratio" => Some(Indicator::VolumeRatio),
            _ => None,
        };
        if let Some(indicator) = fixed {
            return Ok(indicator);
        }

        let period = |prefix: &str| {
            lower
                .strip_prefix(prefix)
                .and_then(|rest| rest.parse::<usize>().ok())
                .filter(|&p| p > 0)
        };

        if let Some(p) = period("sma_") {
            Ok(Indicator::Sma(p))
        } else if let Some(p) = period("rsi_") {
            Ok(Indicator::Rsi(p))
        } else {
            Err(UnknownIndicator(name.to_string()))
        }
    }
}
