use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use super::{Sanitize, clean};
use crate::domain::position::Trade;
use crate::domain::stats::{mean, std_dev};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPnl {
    /// `YYYY-MM` of the exit date.
    pub month: String,
    pub profit_loss: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlyAnalysis {
    pub total_months: usize,
    pub winning_months: usize,
    pub monthly_win_rate: f64,
    pub avg_monthly_return: f64,
    pub best_month: f64,
    pub worst_month: f64,
    pub monthly_volatility: f64,
    pub months: Vec<MonthlyPnl>,
}

impl MonthlyAnalysis {
    pub fn compute(trades: &[Trade]) -> Self {
        let mut grouped: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
        for t in trades {
            let entry = grouped.entry((t.exit_date.year(), t.exit_date.month())).or_default();
            entry.0 += t.profit_loss;
            entry.1 += 1;
        }

        let months: Vec<MonthlyPnl> = grouped
            .into_iter()
            .map(|((year, month), (profit_loss, trades))| MonthlyPnl {
                month: format!("{year:04}-{month:02}"),
                profit_loss,
                trades,
            })
            .collect();
        let totals: Vec<f64> = months.iter().map(|m| m.profit_loss).collect();
        let winning_months = totals.iter().filter(|&&pl| pl > 0.0).count();

        MonthlyAnalysis {
            total_months: months.len(),
            winning_months,
            monthly_win_rate: if months.is_empty() {
                0.0
            } else {
                winning_months as f64 / months.len() as f64 * 100.0
            },
            avg_monthly_return: mean(&totals),
            best_month: totals.iter().copied().reduce(f64::max).unwrap_or(0.0),
            worst_month: totals.iter().copied().reduce(f64::min).unwrap_or(0.0),
            monthly_volatility: std_dev(&totals),
            months,
        }
    }
}

impl Sanitize for MonthlyAnalysis {
    fn sanitize(&mut self) {
        for v in [
            &mut self.monthly_win_rate,
            &mut self.avg_monthly_return,
            &mut self.best_month,
            &mut self.worst_month,
            &mut self.monthly_volatility,
        ] {
            clean(v);
        }
        for m in &mut self.months {
            clean(&mut m.profit_loss);
        }
    }
}
