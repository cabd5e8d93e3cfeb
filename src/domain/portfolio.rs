//! Single-position cash account carried through a simulation.

use chrono::NaiveDate;

use super::position::{Position, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub position: Option<Position>,
    pub closed_trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            position: None,
            closed_trades: Vec::new(),
        }
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Whole shares affordable with `fraction` of the cash at `price`.
    pub fn affordable_shares(&self, price: f64, fraction: f64) -> u64 {
        if price <= 0.0 || !price.is_finite() {
            return 0;
        }
        let shares = (self.cash * fraction / price).floor();
        if shares < 1.0 {
            return 0;
        }
        let mut shares = shares as u64;
        // Division can round up onto an integer; never spend more than the cash.
        if shares as f64 * price > self.cash {
            shares -= 1;
        }
        shares
    }

    /// Open a long position. Returns `false` without side effects when a
    /// position is already open or `shares` is zero.
    pub fn open(&mut self, date: NaiveDate, price: f64, shares: u64, reason: &str) -> bool {
        if self.position.is_some() || shares == 0 {
            return false;
        }
        self.cash -= shares as f64 * price;
        self.position = Some(Position {
            entry_date: date,
            entry_price: price,
            shares,
            entry_reason: reason.to_string(),
        });
        true
    }

    /// Close the open position, if any, and record the trade.
    pub fn close(&mut self, date: NaiveDate, price: f64, reason: &str) -> Option<&Trade> {
        let position = self.position.take()?;
        let trade = position.close(date, price, reason);
        self.cash += trade.exit_value();
        self.closed_trades.push(trade);
        self.closed_trades.last()
    }
}
