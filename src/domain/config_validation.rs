//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. The ticker is not
//! checked here because the command line may supply it; a strategy given on
//! the command line is checked in place of `[strategy] name`.

use crate::domain::error::SwingtraderError;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const STRATEGY_PARAMS_SECTION: &str = "strategy_params";

pub fn validate_backtest_config(
    config: &dyn ConfigPort,
    strategy_override: Option<&str>,
) -> Result<(), SwingtraderError> {
    validate_initial_capital(config)?;
    validate_position_size(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    validate_strategy(config, strategy_override)?;
    validate_strategy_params(config)?;
    Ok(())
}

/// A present value that does not parse as a number is invalid; an absent one
/// falls back to the default later.
fn numeric(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<f64>, SwingtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| SwingtraderError::invalid(section, key, format!("'{}' is not a number", raw))),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SwingtraderError> {
    if let Some(value) = numeric(config, "backtest", "initial_capital")? {
        if value <= 0.0 {
            return Err(SwingtraderError::invalid(
                "backtest",
                "initial_capital",
                "initial_capital must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), SwingtraderError> {
    if let Some(value) = numeric(config, "backtest", "position_size")? {
        if value <= 0.0 || value > 1.0 {
            return Err(SwingtraderError::invalid(
                "backtest",
                "position_size",
                "position_size must be in (0, 1]",
            ));
        }
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), SwingtraderError> {
    if let Some(value) = numeric(config, "backtest", "risk_free_rate")? {
        if !(0.0..1.0).contains(&value) {
            return Err(SwingtraderError::invalid(
                "backtest",
                "risk_free_rate",
                "risk_free_rate must be between 0 and 1",
            ));
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SwingtraderError> {
    let (start_date, end_date) = date_range(config)?;
    if start_date >= end_date {
        return Err(SwingtraderError::invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

/// `[backtest] start_date` and `end_date`, both required.
pub fn date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), SwingtraderError> {
    let start = config.get_string("backtest", "start_date");
    let end = config.get_string("backtest", "end_date");
    Ok((
        parse_date(start.as_deref(), "start_date")?,
        parse_date(end.as_deref(), "end_date")?,
    ))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, SwingtraderError> {
    match value {
        None => Err(SwingtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            SwingtraderError::invalid(
                "backtest",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_strategy(
    config: &dyn ConfigPort,
    strategy_override: Option<&str>,
) -> Result<(), SwingtraderError> {
    let name = strategy_override
        .map(str::to_string)
        .or_else(|| config.get_string("strategy", "name"));
    match name {
        Some(name) => name.parse::<StrategyKind>().map(|_| ()),
        None => Ok(()),
    }
}

fn validate_strategy_params(config: &dyn ConfigPort) -> Result<(), SwingtraderError> {
    for key in config.keys(STRATEGY_PARAMS_SECTION) {
        numeric(config, STRATEGY_PARAMS_SECTION, &key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const DATES: &str = "start_date = 2023-01-01\nend_date = 2024-12-31\n";

    fn with_backtest(extra: &str) -> FileConfigAdapter {
        make_config(&format!("[backtest]\n{DATES}{extra}"))
    }

    #[test]
    fn valid_backtest_config_passes() {
        let config = make_config(
            r#"
[backtest]
ticker = 7203.T
start_date = 2023-01-01
end_date = 2024-12-31
initial_capital = 1000000
position_size = 0.95
risk_free_rate = 0.001

[strategy]
name = golden_cross

[strategy_params]
short_ma = 10
long_ma = 50
"#,
        );
        assert!(validate_backtest_config(&config, None).is_ok());
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_backtest_config(&with_backtest(""), None).is_ok());
    }

    #[test]
    fn initial_capital_must_be_positive() {
        for value in ["-100", "0"] {
            let config = with_backtest(&format!("initial_capital = {value}\n"));
            let err = validate_backtest_config(&config, None).unwrap_err();
            assert!(
                matches!(err, SwingtraderError::ConfigInvalid { key, .. } if key == "initial_capital")
            );
        }
    }

    #[test]
    fn non_numeric_capital_fails() {
        let config = with_backtest("initial_capital = lots\n");
        let err = validate_backtest_config(&config, None).unwrap_err();
        assert!(matches!(err, SwingtraderError::ConfigInvalid { key, .. } if key == "initial_capital"));
    }

    #[test]
    fn position_size_out_of_range_fails() {
        for value in ["0", "1.5", "-0.2"] {
            let config = with_backtest(&format!("position_size = {value}\n"));
            let err = validate_backtest_config(&config, None).unwrap_err();
            assert!(matches!(err, SwingtraderError::ConfigInvalid { key, .. } if key == "position_size"));
        }
        assert!(validate_backtest_config(&with_backtest("position_size = 1\n"), None).is_ok());
    }

    #[test]
    fn risk_free_rate_out_of_range_fails() {
        for value in ["1.5", "-0.05", "1"] {
            let config = with_backtest(&format!("risk_free_rate = {value}\n"));
            let err = validate_backtest_config(&config, None).unwrap_err();
            assert!(
                matches!(err, SwingtraderError::ConfigInvalid { key, .. } if key == "risk_free_rate")
            );
        }
    }

    #[test]
    fn invalid_start_date_format_fails() {
        let config = make_config("[backtest]\nstart_date = 2020/01/01\nend_date = 2024-12-31\n");
        let err = validate_backtest_config(&config, None).unwrap_err();
        assert!(matches!(err, SwingtraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_end_date_fails() {
        let config = make_config("[backtest]\nstart_date = 2020-01-01\n");
        let err = validate_backtest_config(&config, None).unwrap_err();
        assert!(matches!(err, SwingtraderError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn start_date_after_end_date_fails() {
        let config = make_config("[backtest]\nstart_date = 2024-12-31\nend_date = 2020-01-01\n");
        let err = validate_backtest_config(&config, None).unwrap_err();
        assert!(matches!(err, SwingtraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn unknown_strategy_fails() {
        let config = make_config(&format!("[backtest]\n{DATES}[strategy]\nname = astrology\n"));
        let err = validate_backtest_config(&config, None).unwrap_err();
        assert!(matches!(err, SwingtraderError::UnknownStrategy { name } if name == "astrology"));
    }

    #[test]
    fn strategy_override_replaces_configured_name() {
        let config = make_config(&format!("[backtest]\n{DATES}[strategy]\nname = astrology\n"));
        assert!(validate_backtest_config(&config, Some("rsi")).is_ok());

        let config = with_backtest("");
        let err = validate_backtest_config(&config, Some("palmistry")).unwrap_err();
        assert!(matches!(err, SwingtraderError::UnknownStrategy { name } if name == "palmistry"));
    }

    #[test]
    fn non_numeric_strategy_param_fails() {
        let config = make_config(&format!(
            "[backtest]\n{DATES}[strategy_params]\nbuy_threshold = high\n"
        ));
        let err = validate_backtest_config(&config, None).unwrap_err();
        assert!(matches!(err, SwingtraderError::ConfigInvalid { section, key, .. }
            if section == "strategy_params" && key == "buy_threshold"));
    }

    #[test]
    fn date_range_parses_both_ends() {
        let (start, end) = date_range(&with_backtest("")).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
