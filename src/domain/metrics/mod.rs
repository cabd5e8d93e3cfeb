//! Performance evaluation of a completed trade log.
//!
//! [`PerformanceEvaluator::evaluate`] recomputes every section from scratch;
//! the report holds no state between calls. An empty trade log produces
//! all-zero [`BasicStats`] and no other section. Every float passes through
//! [`Sanitize`] once before the report is returned, so NaN and infinities
//! never reach a caller.

mod basic;
mod distribution;
mod efficiency;
mod market;
mod monthly;
mod profitability;
mod risk;

use serde::Serialize;

use super::period::Period;
use super::position::Trade;
use super::stats::finite_or;

pub use basic::BasicStats;
pub use distribution::ReturnDistribution;
pub use efficiency::EfficiencyMetrics;
pub use market::MarketComparison;
pub use monthly::{MonthlyAnalysis, MonthlyPnl};
pub use profitability::ProfitabilityMetrics;
pub use risk::{RiskMetrics, value_curve};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Stand-in for a profit factor or payoff ratio with no meaningful denominator.
pub const PROFIT_FACTOR_SENTINEL: f64 = 999.0;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MetricsReport {
    pub basic_stats: BasicStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_metrics: Option<RiskMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profitability_metrics: Option<ProfitabilityMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_metrics: Option<EfficiencyMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_comparison: Option<MarketComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_analysis: Option<MonthlyAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_distribution: Option<ReturnDistribution>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceEvaluator {
    /// Annual rate; Sharpe and Sortino subtract `risk_free_rate / 252` per step.
    pub risk_free_rate: f64,
}

impl Default for PerformanceEvaluator {
    fn default() -> Self {
        PerformanceEvaluator {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

impl PerformanceEvaluator {
    pub fn new(risk_free_rate: f64) -> Self {
        PerformanceEvaluator { risk_free_rate }
    }

    pub fn evaluate(&self, trades: &[Trade], periods: &[Period], initial_capital: f64) -> MetricsReport {
        if trades.is_empty() {
            return MetricsReport::default();
        }

        let basic_stats = BasicStats::compute(trades, initial_capital);
        let mut report = MetricsReport {
            risk_metrics: Some(RiskMetrics::compute(trades, initial_capital, self.risk_free_rate)),
            profitability_metrics: ProfitabilityMetrics::compute(trades, initial_capital),
            efficiency_metrics: Some(EfficiencyMetrics::compute(trades)),
            market_comparison: MarketComparison::compute(trades, periods, basic_stats.total_return_pct),
            monthly_analysis: Some(MonthlyAnalysis::compute(trades)),
            return_distribution: Some(ReturnDistribution::compute(trades)),
            basic_stats,
        };
        report.sanitize();
        report
    }
}

/// Evaluate with the default risk free rate.
pub fn evaluate(trades: &[Trade], periods: &[Period], initial_capital: f64) -> MetricsReport {
    PerformanceEvaluator::default().evaluate(trades, periods, initial_capital)
}

/// Replace every non-finite float with 0.
pub trait Sanitize {
    fn sanitize(&mut self);
}

pub(crate) fn clean(value: &mut f64) {
    *value = finite_or(*value, 0.0);
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(&mut self) {
        if let Some(inner) = self {
            inner.sanitize();
        }
    }
}

impl Sanitize for MetricsReport {
    fn sanitize(&mut self) {
        self.basic_stats.sanitize();
        self.risk_metrics.sanitize();
        self.profitability_metrics.sanitize();
        self.efficiency_metrics.sanitize();
        self.market_comparison.sanitize();
        self.monthly_analysis.sanitize();
        self.return_distribution.sanitize();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::domain::position::Trade;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 100 shares entered at 100.0 and held for `days`, exiting on `exit`.
    pub fn make_trade(exit: NaiveDate, days: i64, pnl: f64) -> Trade {
        let exit_price = 100.0 + pnl / 100.0;
        Trade {
            entry_date: exit - chrono::Duration::days(days),
            exit_date: exit,
            entry_price: 100.0,
            exit_price,
            shares: 100,
            profit_loss: pnl,
            profit_loss_pct: pnl / 100.0,
            entry_reason: "entry".into(),
            exit_reason: "exit".into(),
            holding_days: days,
        }
    }

    pub fn trades(pnls: &[f64]) -> Vec<Trade> {
        let start = date(2024, 1, 1);
        pnls.iter()
            .enumerate()
            .map(|(i, &pnl)| make_trade(start + chrono::Duration::days(10 * (i as i64 + 1)), 5, pnl))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn closes(values: &[f64]) -> Vec<Period> {
        let start = date(2024, 1, 1);
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Period::new(start + chrono::Duration::days(i as i64), c, c, c, c, 1.0))
            .collect()
    }

    #[test]
    fn empty_log_has_only_zero_basic_stats() {
        let report = evaluate(&[], &closes(&[100.0, 110.0]), 10_000.0);
        assert_eq!(report.basic_stats, BasicStats::default());
        assert!(report.risk_metrics.is_none());
        assert!(report.profitability_metrics.is_none());
        assert!(report.efficiency_metrics.is_none());
        assert!(report.market_comparison.is_none());
        assert!(report.monthly_analysis.is_none());
        assert!(report.return_distribution.is_none());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let log = trades(&[1000.0, -500.0, 1500.0, -200.0]);
        let periods = closes(&[100.0, 102.0, 99.0, 104.0, 108.0, 103.0]);
        let evaluator = PerformanceEvaluator::new(0.02);
        let first = evaluator.evaluate(&log, &periods, 10_000.0);
        let second = evaluator.evaluate(&log, &periods, 10_000.0);
        assert_eq!(first, second);
    }

    #[test]
    fn single_losing_trade_uses_sentinels() {
        let report = evaluate(&trades(&[-300.0]), &closes(&[100.0, 97.0]), 10_000.0);
        let p = report.profitability_metrics.unwrap();
        assert_eq!(p.profit_factor, PROFIT_FACTOR_SENTINEL);
        assert_eq!(p.payoff_ratio, PROFIT_FACTOR_SENTINEL);
        assert_eq!(p.gross_loss, 300.0);
    }

    #[test]
    fn single_trade_distribution_moments_are_zero() {
        let report = evaluate(&trades(&[500.0]), &closes(&[100.0, 105.0]), 10_000.0);
        let d = report.return_distribution.unwrap();
        assert_eq!(d.skewness, 0.0);
        assert_eq!(d.kurtosis, 0.0);
        assert_eq!(d.std_dev, 0.0);
    }

    #[test]
    fn all_breakeven_has_no_profitability_section() {
        let report = evaluate(&trades(&[0.0, 0.0]), &closes(&[100.0]), 10_000.0);
        assert!(report.profitability_metrics.is_none());
        assert!(report.risk_metrics.is_some());
    }

    #[test]
    fn zero_first_close_is_sanitised() {
        let report = evaluate(&trades(&[100.0]), &closes(&[0.0, 10.0]), 10_000.0);
        let m = report.market_comparison.unwrap();
        assert_eq!(m.buy_hold_return_pct, 0.0);
        assert!(m.alpha.is_finite());
    }

    #[test]
    fn report_serialises_without_absent_sections() {
        let json = serde_json::to_value(evaluate(&[], &[], 1_000.0)).unwrap();
        assert!(json.get("basic_stats").is_some());
        assert!(json.get("risk_metrics").is_none());
    }
}
