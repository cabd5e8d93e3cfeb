//! Risk metrics on the trade-indexed value curve.
//!
//! The curve has one point per closed trade, so "returns" here are per-trade
//! steps of account value. They are annualised with the daily constant anyway.

use serde::Serialize;

use super::{Sanitize, TRADING_DAYS_PER_YEAR, clean};
use crate::domain::position::Trade;
use crate::domain::stats::{mean, percentile, std_dev};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RiskMetrics {
    pub max_drawdown_pct: f64,
    /// Longest run of curve points without a new peak.
    pub max_drawdown_duration: usize,
    pub volatility_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub var_95_pct: f64,
    pub cvar_95_pct: f64,
    pub calmar_ratio: f64,
}

/// `[initial, initial + pl1, initial + pl1 + pl2, ...]`
pub fn value_curve(trades: &[Trade], initial_capital: f64) -> Vec<f64> {
    std::iter::once(initial_capital)
        .chain(trades.iter().scan(initial_capital, |value, t| {
            *value += t.profit_loss;
            Some(*value)
        }))
        .collect()
}

fn step_returns(curve: &[f64]) -> Vec<f64> {
    curve
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Maximum drawdown in percent and its duration in curve points.
fn drawdown(curve: &[f64]) -> (f64, usize) {
    let Some((&first, rest)) = curve.split_first() else {
        return (0.0, 0);
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut run = 0usize;
    let mut max_run = 0usize;

    for &value in rest {
        if value > peak {
            peak = value;
            run = 0;
        } else {
            run += 1;
            if peak > 0.0 {
                max_dd = max_dd.max((peak - value) / peak);
            }
            max_run = max_run.max(run);
        }
    }
    (max_dd * 100.0, max_run)
}

impl RiskMetrics {
    pub fn compute(trades: &[Trade], initial_capital: f64, risk_free_rate: f64) -> Self {
        let curve = value_curve(trades, initial_capital);
        let returns = step_returns(&curve);
        let annualiser = TRADING_DAYS_PER_YEAR.sqrt();

        let (max_drawdown_pct, max_drawdown_duration) = drawdown(&curve);

        let sd = std_dev(&returns);
        let step_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
        let mean_excess = mean(&returns) - step_rf;

        let sharpe_ratio = if sd > 0.0 {
            mean_excess / sd * annualiser
        } else {
            0.0
        };

        let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let downside = std_dev(&negative);
        let sortino_ratio = if downside > 0.0 {
            mean_excess / downside * annualiser
        } else {
            0.0
        };

        let var_95 = percentile(&returns, 5.0);
        let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var_95).collect();
        let cvar_95 = mean(&tail);

        let calmar_ratio = if max_drawdown_pct > 0.0 {
            mean(&returns) * TRADING_DAYS_PER_YEAR * 100.0 / max_drawdown_pct
        } else {
            0.0
        };

        RiskMetrics {
            max_drawdown_pct,
            max_drawdown_duration,
            volatility_pct: sd * annualiser * 100.0,
            sharpe_ratio,
            sortino_ratio,
            var_95_pct: var_95 * 100.0,
            cvar_95_pct: cvar_95 * 100.0,
            calmar_ratio,
        }
    }
}

impl Sanitize for RiskMetrics {
    fn sanitize(&mut self) {
        for v in [
            &mut self.max_drawdown_pct,
            &mut self.volatility_pct,
            &mut self.sharpe_ratio,
            &mut self.sortino_ratio,
            &mut self.var_95_pct,
            &mut self.cvar_95_pct,
            &mut self.calmar_ratio,
        ] {
            clean(v);
        }
    }
}
