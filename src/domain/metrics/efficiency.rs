use serde::Serialize;

use super::{Sanitize, clean};
use crate::domain::position::Trade;
use crate::domain::stats::std_dev;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EfficiencyMetrics {
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub avg_consecutive_wins: f64,
    pub avg_consecutive_losses: f64,
    pub min_holding_days: i64,
    pub max_holding_days: i64,
    pub std_holding_days: f64,
}

/// Lengths of the winning and losing runs, in log order. Break-even trades
/// extend a losing run.
fn streaks(trades: &[Trade]) -> (Vec<usize>, Vec<usize>) {
    let mut wins = Vec::new();
    let mut losses = Vec::new();
    let (mut w, mut l) = (0usize, 0usize);

    for trade in trades {
        if trade.is_win() {
            w += 1;
            if l > 0 {
                losses.push(l);
                l = 0;
            }
        } else {
            l += 1;
            if w > 0 {
                wins.push(w);
                w = 0;
            }
        }
    }
    if w > 0 {
        wins.push(w);
    }
    if l > 0 {
        losses.push(l);
    }
    (wins, losses)
}

fn average(runs: &[usize]) -> f64 {
    if runs.is_empty() {
        0.0
    } else {
        runs.iter().sum::<usize>() as f64 / runs.len() as f64
    }
}

impl EfficiencyMetrics {
    pub fn compute(trades: &[Trade]) -> Self {
        let (wins, losses) = streaks(trades);
        let days: Vec<i64> = trades.iter().map(|t| t.holding_days).collect();
        let days_f: Vec<f64> = days.iter().map(|&d| d as f64).collect();

        EfficiencyMetrics {
            max_consecutive_wins: wins.iter().copied().max().unwrap_or(0),
            max_consecutive_losses: losses.iter().copied().max().unwrap_or(0),
            avg_consecutive_wins: average(&wins),
            avg_consecutive_losses: average(&losses),
            min_holding_days: days.iter().copied().min().unwrap_or(0),
            max_holding_days: days.iter().copied().max().unwrap_or(0),
            std_holding_days: std_dev(&days_f),
        }
    }
}

impl Sanitize for EfficiencyMetrics {
    fn sanitize(&mut self) {
        clean(&mut self.avg_consecutive_wins);
        clean(&mut self.avg_consecutive_losses);
        clean(&mut self.std_holding_days);
    }
}
