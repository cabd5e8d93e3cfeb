//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{
    BacktestConfig, BacktestOrchestrator, BacktestReport, DEFAULT_INITIAL_CAPITAL,
    DEFAULT_POSITION_SIZE,
};
use crate::domain::config_validation::{STRATEGY_PARAMS_SECTION, date_range, validate_backtest_config};
use crate::domain::error::SwingtraderError;
use crate::domain::metrics::DEFAULT_RISK_FREE_RATE;
use crate::domain::strategy::{ParamOverrides, StrategyKind, StrategySelector, available_strategies};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIRECTORY: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "swingtrader", about = "Single-position equity backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [backtest] ticker
        #[arg(long)]
        ticker: Option<String>,
        /// Overrides [strategy] name
        #[arg(short, long)]
        strategy: Option<String>,
        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List built-in strategies and their default parameters
    Strategies,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers with CSV data
    ListTickers {
        #[arg(long)]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            ticker,
            strategy,
            output,
        } => run_backtest(&config, ticker.as_deref(), strategy.as_deref(), output.as_deref()),
        Command::Strategies => {
            print_strategies();
            Ok(())
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListTickers { data_dir } => run_list_tickers(&data_dir),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SwingtraderError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Strategy id from `name_override` or `[strategy] name`, with every key of
/// `[strategy_params]` as an override.
pub fn build_strategy_selector(
    adapter: &dyn ConfigPort,
    name_override: Option<&str>,
) -> Result<StrategySelector, SwingtraderError> {
    let name = name_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("strategy", "name"))
        .unwrap_or_else(|| StrategyKind::Combo.id().to_string());

    let mut overrides = ParamOverrides::new();
    for key in adapter.keys(STRATEGY_PARAMS_SECTION) {
        let raw = adapter
            .get_string(STRATEGY_PARAMS_SECTION, &key)
            .unwrap_or_default();
        let value = raw.trim().parse::<f64>().map_err(|_| {
            SwingtraderError::invalid(STRATEGY_PARAMS_SECTION, &key, format!("'{}' is not a number", raw))
        })?;
        overrides.insert(&key, value);
    }

    Ok(StrategySelector::new(&name).with_overrides(overrides))
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    strategy_override: Option<&str>,
) -> Result<BacktestConfig, SwingtraderError> {
    Ok(BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        position_size_fraction: adapter.get_double("backtest", "position_size", DEFAULT_POSITION_SIZE),
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
        strategy: build_strategy_selector(adapter, strategy_override)?,
    })
}

pub fn resolve_ticker(
    ticker_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<String, SwingtraderError> {
    ticker_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("backtest", "ticker"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SwingtraderError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })
}

/// `[data] directory`, resolved against the config file's directory when relative.
pub fn resolve_data_directory(adapter: &dyn ConfigPort, config_path: &Path) -> PathBuf {
    let dir = PathBuf::from(
        adapter
            .get_string("data", "directory")
            .unwrap_or_else(|| DEFAULT_DATA_DIRECTORY.to_string()),
    );
    match config_path.parent() {
        Some(base) if dir.is_relative() => base.join(dir),
        _ => dir,
    }
}

fn run_backtest(
    config_path: &Path,
    ticker_override: Option<&str>,
    strategy_override: Option<&str>,
    output_path: Option<&Path>,
) -> Result<(), SwingtraderError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter, strategy_override)?;

    let config = build_backtest_config(&adapter, strategy_override)?;
    let ticker = resolve_ticker(ticker_override, &adapter)?;
    let (start_date, end_date) = date_range(&adapter)?;
    let data = CsvAdapter::new(resolve_data_directory(&adapter, config_path));

    tracing::info!(
        %ticker,
        strategy = %config.strategy.name,
        %start_date,
        %end_date,
        "running backtest"
    );
    let report = run_backtest_pipeline(&data, &ticker, start_date, end_date, &config)?;
    print_summary(&report);

    if let Some(path) = output_path {
        JsonReportAdapter::new().write(&report, &path.to_string_lossy())?;
        println!("\nReport written to: {}", path.display());
    }
    Ok(())
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    config: &BacktestConfig,
) -> Result<BacktestReport, SwingtraderError> {
    BacktestOrchestrator::new(data_port).run(ticker, start_date, end_date, config)
}

fn print_summary(report: &BacktestReport) {
    let result = &report.result;
    let basic = &result.metrics.basic_stats;

    println!("=== {} | {} ===", report.ticker, result.strategy.name);
    println!("Period:           {} to {} ({} bars)", report.start_date, report.end_date, report.periods);
    println!("Initial Capital:  {:.0}", report.initial_capital);
    println!("Final Value:      {:.0}", report.initial_capital + basic.total_return);
    println!("Total Return:     {:.2}%", basic.total_return_pct);
    println!("Total Trades:     {}", basic.total_trades);
    println!("Win Rate:         {:.1}%", basic.win_rate);

    if let Some(risk) = &result.metrics.risk_metrics {
        println!("Max Drawdown:     -{:.1}%", risk.max_drawdown_pct);
        println!("Sharpe Ratio:     {:.2}", risk.sharpe_ratio);
        println!("Sortino Ratio:    {:.2}", risk.sortino_ratio);
    }
    if let Some(p) = &result.metrics.profitability_metrics {
        println!("Profit Factor:    {:.2}", p.profit_factor);
        println!("Expectancy:       {:.0}", p.expectancy);
    }
    if let Some(m) = &result.metrics.market_comparison {
        println!("Buy & Hold:       {:.2}%", m.buy_hold_return_pct);
        println!("Alpha:            {:.2}%", m.alpha);
    }

    if !result.trades.is_empty() {
        println!("\n=== Trades ===");
        for t in &result.trades {
            let sign = if t.profit_loss >= 0.0 { "+" } else { "" };
            println!(
                "  {} -> {}  {} @ {:.2} -> {:.2}  {}{:.0} ({}{:.2}%)  [{} / {}]",
                t.entry_date,
                t.exit_date,
                t.shares,
                t.entry_price,
                t.exit_price,
                sign,
                t.profit_loss,
                sign,
                t.profit_loss_pct,
                t.entry_reason,
                t.exit_reason,
            );
        }
    }
}

fn print_strategies() {
    for info in available_strategies() {
        println!("{} - {}", info.id, info.name);
        println!("    {}", info.description);
        for (key, value) in &info.params {
            println!("    {key} = {value}");
        }
    }
}

fn run_validate(config_path: &Path) -> Result<(), SwingtraderError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter, None)?;
    let config = build_backtest_config(&adapter, None)?;
    crate::domain::strategy::build_policy(&config.strategy)?;
    println!("Config validated successfully");
    Ok(())
}

fn run_list_tickers(data_dir: &Path) -> Result<(), SwingtraderError> {
    let tickers = CsvAdapter::new(data_dir.to_path_buf()).list_tickers()?;
    if tickers.is_empty() {
        tracing::warn!(dir = %data_dir.display(), "no CSV files found");
    }
    for ticker in tickers {
        println!("{ticker}");
    }
    Ok(())
}
