//! Open position and completed trade records.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: u64,
    pub entry_reason: String,
}

impl Position {
    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.entry_price
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    /// Realise the position at `exit_price`.
    pub fn close(self, exit_date: NaiveDate, exit_price: f64, exit_reason: impl Into<String>) -> Trade {
        let exit_value = self.market_value(exit_price);
        let profit_loss = exit_value - self.cost_basis();
        let profit_loss_pct = (exit_price - self.entry_price) / self.entry_price * 100.0;
        Trade {
            entry_date: self.entry_date,
            exit_date,
            entry_price: self.entry_price,
            exit_price,
            shares: self.shares,
            profit_loss,
            profit_loss_pct,
            holding_days: (exit_date - self.entry_date).num_days(),
            entry_reason: self.entry_reason,
            exit_reason: exit_reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: u64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub entry_reason: String,
    pub exit_reason: String,
    pub holding_days: i64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit_loss > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.profit_loss < 0.0
    }

    pub fn exit_value(&self) -> f64 {
        self.shares as f64 * self.exit_price
    }
}
