//! Weighted combination of independent policies.
//!
//! Every sub-policy casts a buy or sell vote per period; the vote adds that
//! policy's weight to the matching score. A buy fires when the buy score
//! reaches `buy_threshold`, otherwise a sell fires when the sell score reaches
//! `sell_threshold`. Reaching means `score >= threshold` within
//! [`SCORE_EPSILON`], so a sum of weights that equals the threshold in exact
//! arithmetic always triggers.

use crate::domain::period::Period;
use crate::domain::signal::{Signal, SignalPolicy};

use super::{BollingerBandPolicy, GoldenCrossPolicy, MacdPolicy, ParamOverrides, RsiPolicy};

pub const SCORE_EPSILON: f64 = 1e-9;

struct Vote {
    label: &'static str,
    param: &'static str,
    weight: f64,
    policy: Box<dyn SignalPolicy>,
}

pub struct ComboPolicy {
    votes: Vec<Vote>,
    buy_threshold: f64,
    sell_threshold: f64,
}

impl ComboPolicy {
    pub fn new(buy_threshold: f64, sell_threshold: f64) -> Self {
        ComboPolicy {
            votes: Vec::new(),
            buy_threshold,
            sell_threshold,
        }
    }

    pub fn with_vote(
        mut self,
        label: &'static str,
        param: &'static str,
        weight: f64,
        policy: Box<dyn SignalPolicy>,
    ) -> Self {
        self.votes.push(Vote {
            label,
            param,
            weight,
            policy,
        });
        self
    }

    /// RSI, moving-average cross, MACD and Bollinger votes with default
    /// sub-policy parameters; only weights and thresholds are overridable.
    pub fn from_overrides(overrides: &ParamOverrides) -> Self {
        ComboPolicy::new(
            overrides.get_or("buy_threshold", 0.4),
            overrides.get_or("sell_threshold", 0.4),
        )
        .with_vote(
            "RSI",
            "rsi_weight",
            overrides.get_or("rsi_weight", 0.25),
            Box::new(RsiPolicy::default()),
        )
        .with_vote(
            "MA",
            "ma_weight",
            overrides.get_or("ma_weight", 0.35),
            Box::new(GoldenCrossPolicy::default()),
        )
        .with_vote(
            "MACD",
            "macd_weight",
            overrides.get_or("macd_weight", 0.25),
            Box::new(MacdPolicy),
        )
        .with_vote(
            "BB",
            "bb_weight",
            overrides.get_or("bb_weight", 0.15),
            Box::new(BollingerBandPolicy),
        )
    }
}

fn reaches(score: f64, threshold: f64) -> bool {
    score + SCORE_EPSILON >= threshold
}

impl SignalPolicy for ComboPolicy {
    fn id(&self) -> &'static str {
        "combo"
    }

    fn name(&self) -> &'static str {
        "Combination"
    }

    fn description(&self) -> &'static str {
        "Weighted vote of RSI, moving average, MACD and Bollinger signals"
    }

    fn params(&self) -> Vec<(&'static str, f64)> {
        let mut params: Vec<_> = self.votes.iter().map(|v| (v.param, v.weight)).collect();
        params.push(("buy_threshold", self.buy_threshold));
        params.push(("sell_threshold", self.sell_threshold));
        params
    }

    fn min_periods(&self) -> usize {
        self.votes
            .iter()
            .map(|v| v.policy.min_periods())
            .min()
            .unwrap_or(1)
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal> {
        let ballots: Vec<Vec<Signal>> = self
            .votes
            .iter()
            .map(|v| v.policy.generate_signals(periods))
            .collect();

        (0..periods.len())
            .map(|i| {
                let mut buy_score = 0.0;
                let mut sell_score = 0.0;
                let mut reasons = Vec::new();

                for (vote, ballot) in self.votes.iter().zip(&ballots) {
                    let signal = &ballot[i];
                    if signal.buy {
                        buy_score += vote.weight;
                        reasons.push(format!("{} buy", vote.label));
                    } else if signal.sell {
                        sell_score += vote.weight;
                        reasons.push(format!("{} sell", vote.label));
                    }
                }

                if reaches(buy_score, self.buy_threshold) {
                    Signal::buy(buy_score, reasons.join(" | "))
                } else if reaches(sell_score, self.sell_threshold) {
                    Signal::sell(sell_score, reasons.join(" | "))
                } else {
                    Signal::neutral()
                }
            })
            .collect()
    }
}
