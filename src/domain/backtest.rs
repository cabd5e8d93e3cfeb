//! Backtest pipeline: signal policy, trade simulation, then evaluation.
//!
//! [`run_backtest`] is pure over its inputs. [`BacktestOrchestrator`] adds
//! data acquisition through a [`DataPort`] for a ticker and date range.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::SwingtraderError;
use super::metrics::{DEFAULT_RISK_FREE_RATE, MetricsReport, PerformanceEvaluator};
use super::period::{Period, is_strictly_ascending};
use super::position::Trade;
use super::simulator;
use super::strategy::{StrategyInfo, StrategySelector, build_policy};
use crate::ports::data_port::DataPort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;
pub const DEFAULT_POSITION_SIZE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Fraction of available cash committed per entry, in (0, 1].
    pub position_size_fraction: f64,
    pub risk_free_rate: f64,
    pub strategy: StrategySelector,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            position_size_fraction: DEFAULT_POSITION_SIZE,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            strategy: StrategySelector::default(),
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), SwingtraderError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(SwingtraderError::invalid(
                "backtest",
                "initial_capital",
                "initial_capital must be positive",
            ));
        }
        let f = self.position_size_fraction;
        if !(f.is_finite() && f > 0.0 && f <= 1.0) {
            return Err(SwingtraderError::invalid(
                "backtest",
                "position_size",
                "position_size must be in (0, 1]",
            ));
        }
        if !(self.risk_free_rate.is_finite() && (0.0..1.0).contains(&self.risk_free_rate)) {
            return Err(SwingtraderError::invalid(
                "backtest",
                "risk_free_rate",
                "risk_free_rate must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub strategy: StrategyInfo,
    pub trades: Vec<Trade>,
    pub final_cash: f64,
    pub metrics: MetricsReport,
}

/// Run parameters plus the result, as written by report adapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub periods: usize,
    pub initial_capital: f64,
    pub position_size_fraction: f64,
    pub risk_free_rate: f64,
    #[serde(flatten)]
    pub result: BacktestResult,
}

/// Validate the configuration, then run policy, simulator and evaluator over
/// `periods`. Configuration errors are raised before any signal is computed.
pub fn run_backtest(periods: &[Period], config: &BacktestConfig) -> Result<BacktestResult, SwingtraderError> {
    config.validate()?;
    let policy = build_policy(&config.strategy)?;

    if !is_strictly_ascending(periods) {
        return Err(SwingtraderError::Data {
            reason: "periods must have strictly ascending dates".to_string(),
        });
    }
    if periods.len() < policy.min_periods() {
        tracing::warn!(
            strategy = policy.id(),
            periods = periods.len(),
            required = policy.min_periods(),
            "series shorter than strategy lookback; expect few or no trades"
        );
    }

    let signals = policy.generate_signals(periods);
    let replay = simulator::replay(
        periods,
        &signals,
        config.initial_capital,
        config.position_size_fraction,
    );
    tracing::info!(
        strategy = policy.id(),
        periods = periods.len(),
        trades = replay.trades.len(),
        "simulation complete"
    );

    let metrics = PerformanceEvaluator::new(config.risk_free_rate).evaluate(
        &replay.trades,
        periods,
        config.initial_capital,
    );

    Ok(BacktestResult {
        strategy: StrategyInfo::of(policy.as_ref()),
        trades: replay.trades,
        final_cash: replay.final_cash,
        metrics,
    })
}

/// Loads a ticker's periods and runs the pipeline over them.
pub struct BacktestOrchestrator<'a> {
    data: &'a dyn DataPort,
}

impl<'a> BacktestOrchestrator<'a> {
    pub fn new(data: &'a dyn DataPort) -> Self {
        BacktestOrchestrator { data }
    }

    pub fn run(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        config: &BacktestConfig,
    ) -> Result<BacktestReport, SwingtraderError> {
        config.validate()?;
        build_policy(&config.strategy)?;

        let periods = self.data.fetch_periods(ticker, start_date, end_date)?;
        if periods.is_empty() {
            return Err(SwingtraderError::DataUnavailable {
                ticker: ticker.to_string(),
                start_date,
                end_date,
            });
        }
        tracing::info!(ticker, periods = periods.len(), %start_date, %end_date, "loaded price series");

        let result = run_backtest(&periods, config)?;
        Ok(BacktestReport {
            ticker: ticker.to_string(),
            start_date,
            end_date,
            periods: periods.len(),
            initial_capital: config.initial_capital,
            position_size_fraction: config.position_size_fraction,
            risk_free_rate: config.risk_free_rate,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::Indicator;
    use crate::domain::strategy::ParamOverrides;

    fn periods_with_rsi(values: &[(f64, f64)]) -> Vec<Period> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &(close, rsi))| {
                Period::new(start + chrono::Duration::days(i as i64), close, close, close, close, 1.0)
                    .with_indicator(Indicator::Rsi(14), rsi)
            })
            .collect()
    }

    fn rsi_config() -> BacktestConfig {
        BacktestConfig {
            initial_capital: 10_000.0,
            strategy: StrategySelector::new("rsi"),
            ..BacktestConfig::default()
        }
    }

    #[test]
    fn default_config() {
        let c = BacktestConfig::default();
        assert!((c.initial_capital - 1_000_000.0).abs() < f64::EPSILON);
        assert!((c.position_size_fraction - 0.95).abs() < f64::EPSILON);
        assert!((c.risk_free_rate - 0.001).abs() < f64::EPSILON);
        assert_eq!(c.strategy.name, "combo");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_capital() {
        let c = BacktestConfig {
            initial_capital: 0.0,
            ..BacktestConfig::default()
        };
        let err = run_backtest(&[], &c).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn rejects_fraction_out_of_range() {
        for f in [0.0, -0.5, 1.5, f64::NAN] {
            let c = BacktestConfig {
                position_size_fraction: f,
                ..BacktestConfig::default()
            };
            assert!(c.validate().is_err(), "fraction {f} should be rejected");
        }
        let full = BacktestConfig {
            position_size_fraction: 1.0,
            ..BacktestConfig::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn unknown_strategy_is_configuration_error() {
        let c = BacktestConfig {
            strategy: StrategySelector::new("moon_phase"),
            ..BacktestConfig::default()
        };
        let err = run_backtest(&periods_with_rsi(&[(100.0, 50.0)]), &c).unwrap_err();
        assert!(matches!(err, SwingtraderError::UnknownStrategy { .. }));
    }

    #[test]
    fn rsi_round_trip() {
        let periods = periods_with_rsi(&[(100.0, 50.0), (90.0, 30.0), (95.0, 50.0), (110.0, 70.0)]);
        let result = run_backtest(&periods, &rsi_config()).unwrap();
        assert_eq!(result.trades.len(), 1);
        let t = &result.trades[0];
        assert_eq!(t.shares, 105);
        assert!((t.profit_loss - 2100.0).abs() < 1e-9);
        assert!((result.final_cash - 12_100.0).abs() < 1e-9);
        assert_eq!(result.metrics.basic_stats.total_trades, 1);
        assert_eq!(result.strategy.id, "rsi");
    }

    #[test]
    fn overrides_reach_the_policy() {
        let periods = periods_with_rsi(&[(100.0, 40.0), (110.0, 50.0)]);
        let mut c = rsi_config();
        c.strategy = c
            .strategy
            .with_overrides(ParamOverrides::new().with("oversold_threshold", 45.0));
        let result = run_backtest(&periods, &c).unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].exit_reason, simulator::PERIOD_END_REASON);
    }

    #[test]
    fn short_series_yields_empty_result() {
        let periods = periods_with_rsi(&[(100.0, 50.0)]);
        let result = run_backtest(&periods, &rsi_config()).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.metrics, MetricsReport::default());
    }

    #[test]
    fn unordered_periods_are_rejected() {
        let mut periods = periods_with_rsi(&[(100.0, 50.0), (101.0, 50.0)]);
        periods.swap(0, 1);
        let err = run_backtest(&periods, &rsi_config()).unwrap_err();
        assert!(matches!(err, SwingtraderError::Data { .. }));
    }
}
