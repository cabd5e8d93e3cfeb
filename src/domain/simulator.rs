//! Single-position trade simulation.
//!
//! One pass over the periods in order, folding a [`Portfolio`] through each
//! period:
//! 1. Buy signal while flat: buy `floor(cash * fraction / close)` shares at
//!    the close. Zero affordable shares is a no-op.
//! 2. Otherwise, sell signal while positioned: close at the close price.
//!    A period flagged both buy and sell while positioned therefore sells;
//!    the position is never reopened on the same bar.
//! 3. After the last period any open position is closed at the final close
//!    with exit reason [`PERIOD_END_REASON`].

use super::period::Period;
use super::portfolio::Portfolio;
use super::position::Trade;
use super::signal::Signal;

pub const PERIOD_END_REASON: &str = "period end";

/// Trade log plus the cash left once every position is realised.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub trades: Vec<Trade>,
    pub final_cash: f64,
}

/// Simulate and return the trade log ordered by exit date.
pub fn simulate(
    periods: &[Period],
    signals: &[Signal],
    initial_capital: f64,
    position_size_fraction: f64,
) -> Vec<Trade> {
    replay(periods, signals, initial_capital, position_size_fraction).trades
}

/// Periods and signals are paired by index; any excess in the longer slice is ignored.
pub fn replay(
    periods: &[Period],
    signals: &[Signal],
    initial_capital: f64,
    position_size_fraction: f64,
) -> Replay {
    debug_assert_eq!(periods.len(), signals.len(), "signals must align with periods");

    let mut portfolio = periods.iter().zip(signals).fold(
        Portfolio::new(initial_capital),
        |mut portfolio, (period, signal)| {
            step(&mut portfolio, period, signal, position_size_fraction);
            portfolio
        },
    );

    if let Some(last) = periods.last() {
        if let Some(trade) = portfolio.close(last.date, last.close, PERIOD_END_REASON) {
            tracing::info!(
                date = %trade.exit_date,
                price = trade.exit_price,
                pnl = trade.profit_loss,
                "closed open position at period end"
            );
        }
    }

    Replay {
        trades: portfolio.closed_trades,
        final_cash: portfolio.cash,
    }
}

fn step(portfolio: &mut Portfolio, period: &Period, signal: &Signal, fraction: f64) {
    if signal.buy && !portfolio.has_position() {
        let shares = portfolio.affordable_shares(period.close, fraction);
        if portfolio.open(period.date, period.close, shares, &signal.reason) {
            tracing::debug!(
                date = %period.date,
                price = period.close,
                shares,
                reason = %signal.reason,
                "opened position"
            );
        } else {
            tracing::debug!(date = %period.date, price = period.close, "buy skipped: insufficient cash");
        }
    } else if signal.sell && portfolio.has_position() {
        if let Some(trade) = portfolio.close(period.date, period.close, &signal.reason) {
            tracing::debug!(
                date = %trade.exit_date,
                price = trade.exit_price,
                pnl = trade.profit_loss,
                reason = %trade.exit_reason,
                "closed position"
            );
        }
    }
}
