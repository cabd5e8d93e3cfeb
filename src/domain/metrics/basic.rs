use serde::Serialize;

use super::{Sanitize, clean};
use crate::domain::position::Trade;
use crate::domain::stats::{mean, median};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BasicStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percent of trades with positive P&L.
    pub win_rate: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub avg_return_per_trade: f64,
    pub avg_return_per_trade_pct: f64,
    pub avg_holding_days: f64,
    pub median_holding_days: f64,
    pub initial_capital: f64,
    pub final_value: f64,
}

impl BasicStats {
    pub fn compute(trades: &[Trade], initial_capital: f64) -> Self {
        let total_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.is_win()).count();
        let losing_trades = trades.iter().filter(|t| t.is_loss()).count();

        let pnls: Vec<f64> = trades.iter().map(|t| t.profit_loss).collect();
        let pcts: Vec<f64> = trades.iter().map(|t| t.profit_loss_pct).collect();
        let days: Vec<f64> = trades.iter().map(|t| t.holding_days as f64).collect();

        let total_return: f64 = pnls.iter().sum();
        let total_return_pct = if initial_capital > 0.0 {
            total_return / initial_capital * 100.0
        } else {
            0.0
        };
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        BasicStats {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            total_return,
            total_return_pct,
            avg_return_per_trade: mean(&pnls),
            avg_return_per_trade_pct: mean(&pcts),
            avg_holding_days: mean(&days),
            median_holding_days: median(&days),
            initial_capital,
            final_value: initial_capital + total_return,
        }
    }
}

impl Sanitize for BasicStats {
    fn sanitize(&mut self) {
        for v in [
            &mut self.win_rate,
            &mut self.total_return,
            &mut self.total_return_pct,
            &mut self.avg_return_per_trade,
            &mut self.avg_return_per_trade_pct,
            &mut self.avg_holding_days,
            &mut self.median_holding_days,
            &mut self.initial_capital,
            &mut self.final_value,
        ] {
            clean(v);
        }
    }
}
