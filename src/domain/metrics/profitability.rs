use serde::Serialize;

use super::{PROFIT_FACTOR_SENTINEL, Sanitize, clean};
use crate::domain::position::Trade;
use crate::domain::stats::mean;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfitabilityMetrics {
    pub gross_profit: f64,
    /// Absolute value of the summed losses.
    pub gross_loss: f64,
    pub avg_win: f64,
    /// Negative, or 0 without losing trades.
    pub avg_loss: f64,
    pub max_win: f64,
    pub max_loss: f64,
    pub profit_factor: f64,
    pub payoff_ratio: f64,
    pub expectancy: f64,
    pub expectancy_pct: f64,
}

impl ProfitabilityMetrics {
    /// `None` when every trade broke even.
    pub fn compute(trades: &[Trade], initial_capital: f64) -> Option<Self> {
        let wins: Vec<f64> = trades.iter().filter(|t| t.is_win()).map(|t| t.profit_loss).collect();
        let losses: Vec<f64> = trades.iter().filter(|t| t.is_loss()).map(|t| t.profit_loss).collect();
        if wins.is_empty() && losses.is_empty() {
            return None;
        }

        let gross_profit: f64 = wins.iter().sum();
        let gross_loss = losses.iter().sum::<f64>().abs();
        let avg_win = mean(&wins);
        let avg_loss = mean(&losses);

        // A one-sided log has no meaningful ratio in either direction.
        let profit_factor = if gross_loss > 0.0 && gross_profit > 0.0 {
            gross_profit / gross_loss
        } else {
            PROFIT_FACTOR_SENTINEL
        };
        let payoff_ratio = if avg_loss != 0.0 && avg_win != 0.0 {
            (avg_win / avg_loss).abs()
        } else {
            PROFIT_FACTOR_SENTINEL
        };

        let win_rate = wins.len() as f64 / trades.len() as f64;
        let expectancy = avg_win * win_rate + avg_loss * (1.0 - win_rate);
        let expectancy_pct = if initial_capital > 0.0 {
            expectancy / initial_capital * 100.0
        } else {
            0.0
        };

        Some(ProfitabilityMetrics {
            gross_profit,
            gross_loss,
            avg_win,
            avg_loss,
            max_win: wins.iter().copied().fold(0.0, f64::max),
            max_loss: losses.iter().copied().fold(0.0, f64::min),
            profit_factor,
            payoff_ratio,
            expectancy,
            expectancy_pct,
        })
    }
}

impl Sanitize for ProfitabilityMetrics {
    fn sanitize(&mut self) {
        for v in [
            &mut self.gross_profit,
            &mut self.gross_loss,
            &mut self.avg_win,
            &mut self.avg_loss,
            &mut self.max_win,
            &mut self.max_loss,
            &mut self.profit_factor,
            &mut self.payoff_ratio,
            &mut self.expectancy,
            &mut self.expectancy_pct,
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

    #[test]
    fn mixed_log() {
        let p = ProfitabilityMetrics::compute(&trades(&[1000.0, -500.0, 1500.0, -250.0]), 10_000.0).unwrap();
        assert_abs_diff_eq!(p.gross_profit, 2500.0);
        assert_abs_diff_eq!(p.gross_loss, 750.0);
        assert_abs_diff_eq!(p.avg_win, 1250.0);
        assert_abs_diff_eq!(p.avg_loss, -375.0);
        assert_abs_diff_eq!(p.max_win, 1500.0);
        assert_abs_diff_eq!(p.max_loss, -500.0);
        assert_abs_diff_eq!(p.profit_factor, 2500.0 / 750.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.payoff_ratio, 1250.0 / 375.0, epsilon = 1e-12);
        // 1250 * 0.5 - 375 * 0.5
        assert_abs_diff_eq!(p.expectancy, 437.5, epsilon = 1e-9);
        assert_abs_diff_eq!(p.expectancy_pct, 4.375, epsilon = 1e-9);
    }

    #[test]
    fn winners_only_use_sentinel() {
        let p = ProfitabilityMetrics::compute(&trades(&[100.0, 200.0]), 10_000.0).unwrap();
        assert_eq!(p.profit_factor, PROFIT_FACTOR_SENTINEL);
        assert_eq!(p.payoff_ratio, PROFIT_FACTOR_SENTINEL);
        assert_eq!(p.avg_loss, 0.0);
        assert_eq!(p.max_loss, 0.0);
    }

    #[test]
    fn losers_only_use_sentinel() {
        let p = ProfitabilityMetrics::compute(&trades(&[-100.0, -300.0]), 10_000.0).unwrap();
        assert_eq!(p.profit_factor, PROFIT_FACTOR_SENTINEL);
        assert_eq!(p.payoff_ratio, PROFIT_FACTOR_SENTINEL);
        assert_abs_diff_eq!(p.expectancy, -200.0);
    }

    #[test]
    fn breakeven_trades_count_toward_win_rate_denominator() {
        let p = ProfitabilityMetrics::compute(&trades(&[100.0, 0.0]), 10_000.0).unwrap();
        assert_abs_diff_eq!(p.expectancy, 50.0);
    }

    #[test]
    fn all_breakeven_is_none() {
        assert!(ProfitabilityMetrics::compute(&trades(&[0.0, 0.0]), 10_000.0).is_none());
    }
}
