//! Strategy against buy-and-hold.
//!
//! Beta is approximate: per-trade returns are paired with the last `n` daily
//! market returns of the series, where `n` is the trade count. The two
//! sequences are not aligned in time. Covariance uses the sample
//! denominator while the market variance is a population variance.

use serde::Serialize;

use super::{Sanitize, clean};
use crate::domain::period::Period;
use crate::domain::position::Trade;
use crate::domain::stats::{sample_covariance, std_dev, variance};

const DEFAULT_BETA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MarketComparison {
    pub buy_hold_return_pct: f64,
    pub strategy_return_pct: f64,
    pub alpha: f64,
    pub beta: f64,
    pub strategy_market_covariance: f64,
    pub information_ratio: f64,
}

fn daily_returns(periods: &[Period]) -> Vec<f64> {
    periods
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

/// `(beta, covariance)`, falling back to `(1.0, 0.0)` when undefined.
fn approximate_beta(strategy: &[f64], market: &[f64]) -> (f64, f64) {
    let n = strategy.len();
    if n < 2 || market.len() < n {
        return (DEFAULT_BETA, 0.0);
    }
    let tail = &market[market.len() - n..];
    let market_variance = variance(tail);
    if !market_variance.is_finite() || market_variance <= 0.0 {
        return (DEFAULT_BETA, 0.0);
    }
    let covariance = sample_covariance(strategy, tail);
    (covariance / market_variance, covariance)
}

impl MarketComparison {
    /// `None` without a price series.
    pub fn compute(trades: &[Trade], periods: &[Period], strategy_return_pct: f64) -> Option<Self> {
        let (first, last) = (periods.first()?, periods.last()?);
        let buy_hold_return_pct = (last.close - first.close) / first.close * 100.0;
        let alpha = strategy_return_pct - buy_hold_return_pct;

        let strategy: Vec<f64> = trades.iter().map(|t| t.profit_loss_pct / 100.0).collect();
        let (beta, strategy_market_covariance) = approximate_beta(&strategy, &daily_returns(periods));

        let sd = std_dev(&strategy);
        let information_ratio = if sd > 0.0 { alpha / sd } else { 0.0 };

        Some(MarketComparison {
            buy_hold_return_pct,
            strategy_return_pct,
            alpha,
            beta,
            strategy_market_covariance,
            information_ratio,
        })
    }
}

impl Sanitize for MarketComparison {
    fn sanitize(&mut self) {
        for v in [
            &mut self.buy_hold_return_pct,
            &mut self.strategy_return_pct,
            &mut self.alpha,
            &mut self.beta,
            &mut self.strategy_market_covariance,
            &mut self.information_ratio,
        ] {
            clean(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use approx::assert_abs_diff_eq;

    fn closes(values: &[f64]) -> Vec<Period> {
        let start = date(2024, 1, 1);
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Period::new(start + chrono::Duration::days(i as i64), c, c, c, c, 1.0))
            .collect()
    }

    #[test]
    fn buy_and_hold_and_alpha() {
        let m = MarketComparison::compute(&trades(&[500.0]), &closes(&[100.0, 90.0, 120.0]), 5.0).unwrap();
        assert_abs_diff_eq!(m.buy_hold_return_pct, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.alpha, -15.0, epsilon = 1e-9);
    }

    #[test]
    fn fewer_than_two_trades_default_beta() {
        let m = MarketComparison::compute(&trades(&[500.0]), &closes(&[100.0, 110.0, 99.0]), 5.0).unwrap();
        assert_eq!(m.beta, 1.0);
        assert_eq!(m.strategy_market_covariance, 0.0);
        assert_eq!(m.information_ratio, 0.0);
    }

    #[test]
    fn too_few_market_returns_default_beta() {
        let m = MarketComparison::compute(&trades(&[100.0, -100.0, 50.0]), &closes(&[100.0, 110.0]), 0.5).unwrap();
        assert_eq!(m.beta, 1.0);
    }

    #[test]
    fn flat_market_default_beta() {
        let m = MarketComparison::compute(&trades(&[100.0, -100.0]), &closes(&[50.0, 50.0, 50.0]), 0.0).unwrap();
        assert_eq!(m.beta, 1.0);
        assert_eq!(m.strategy_market_covariance, 0.0);
    }

    #[test]
    fn beta_pairs_trades_with_market_tail() {
        // market returns: +10%, -10%, +20%; the tail for two trades is [-0.1, 0.2]
        let periods = closes(&[100.0, 110.0, 99.0, 118.8]);
        // per-trade returns 1% and 4%
        let log = trades(&[100.0, 400.0]);
        let m = MarketComparison::compute(&log, &periods, 5.0).unwrap();

        let tail = [-0.1, 0.2];
        // sample covariance of (0.01, 0.04) and (-0.1, 0.2) over population variance of the tail
        let cov = (-0.015 * -0.15 + 0.015 * 0.15) / 1.0;
        assert_abs_diff_eq!(m.strategy_market_covariance, cov, epsilon = 1e-9);
        assert_abs_diff_eq!(m.beta, cov / variance(&tail), epsilon = 1e-9);
    }

    #[test]
    fn information_ratio_divides_alpha_by_return_spread() {
        let periods = closes(&[100.0, 100.0]);
        let log = trades(&[100.0, 300.0]);
        let m = MarketComparison::compute(&log, &periods, 4.0).unwrap();
        // returns 0.01 and 0.03, population spread 0.01
        assert_abs_diff_eq!(m.information_ratio, 4.0 / 0.01, epsilon = 1e-6);
    }

    #[test]
    fn empty_series_is_none() {
        assert!(MarketComparison::compute(&trades(&[1.0]), &[], 0.0).is_none());
    }
}
