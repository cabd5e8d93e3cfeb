#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use swingtrader::domain::error::SwingtraderError;
use swingtrader::domain::indicator::Indicator;
pub use swingtrader::domain::period::Period;
use swingtrader::domain::signal::{Signal, SignalPolicy};
use swingtrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Period>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_periods(mut self, ticker: &str, periods: Vec<Period>) -> Self {
        self.data.insert(ticker.to_string(), periods);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_periods(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Period>, SwingtraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SwingtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|periods| {
                periods
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, SwingtraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_period(date: &str, close: f64) -> Period {
    Period::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        close - 1.0,
        close + 1.0,
        close - 2.0,
        close,
        1000.0,
    )
}

/// Consecutive calendar days from `start`, one period per close.
pub fn periods_from_closes(start: NaiveDate, closes: &[f64]) -> Vec<Period> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Period::new(start + chrono::Duration::days(i as i64), c, c, c, c, 1000.0))
        .collect()
}

/// Attach an RSI column to each period, pairing by index.
pub fn with_rsi(periods: Vec<Period>, rsi: &[Option<f64>]) -> Vec<Period> {
    periods
        .into_iter()
        .zip(rsi)
        .map(|(p, r)| match r {
            Some(v) => p.with_indicator(Indicator::Rsi(14), *v),
            None => p,
        })
        .collect()
}

/// Buys after a close drops more than `drop_pct` from the prior close and
/// sells once the close is more than `gain_pct` above the last buy signal.
pub struct DipRallyPolicy {
    pub drop_pct: f64,
    pub gain_pct: f64,
}

impl SignalPolicy for DipRallyPolicy {
    fn id(&self) -> &'static str {
        "dip_rally"
    }

    fn name(&self) -> &'static str {
        "Dip and rally"
    }

    fn description(&self) -> &'static str {
        "Buy a sharp daily drop, sell a rally from entry"
    }

    fn params(&self) -> Vec<(&'static str, f64)> {
        vec![("drop_pct", self.drop_pct), ("gain_pct", self.gain_pct)]
    }

    fn generate_signals(&self, periods: &[Period]) -> Vec<Signal> {
        let mut entry: Option<f64> = None;
        let mut signals = Vec::with_capacity(periods.len());
        for (i, p) in periods.iter().enumerate() {
            let signal = match (i.checked_sub(1).map(|j| periods[j].close), entry) {
                (_, Some(e)) if (p.close - e) / e * 100.0 > self.gain_pct => {
                    entry = None;
                    Signal::sell(1.0, "rally")
                }
                (Some(prev), None) if (prev - p.close) / prev * 100.0 > self.drop_pct => {
                    entry = Some(p.close);
                    Signal::buy(1.0, "dip")
                }
                _ => Signal::neutral(),
            };
            signals.push(signal);
        }
        signals
    }
}

/// Replays a fixed buy/sell script; `b` buy, `s` sell, anything else neutral.
pub fn scripted_signals(script: &str) -> Vec<Signal> {
    script
        .chars()
        .map(|c| match c {
            'b' => Signal::buy(1.0, "scripted buy"),
            's' => Signal::sell(1.0, "scripted sell"),
            _ => Signal::neutral(),
        })
        .collect()
}
