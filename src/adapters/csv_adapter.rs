//! CSV file data adapter.
//!
//! One file per ticker, `<base_path>/<TICKER>.csv`, with a header row. The
//! OHLCV columns are required; any further column whose name parses as an
//! [`Indicator`] is attached to each period and other columns are ignored.
//! Empty cells and `NaN` in indicator columns read as undefined; OHLCV cells
//! must be finite and non-negative.

use crate::domain::error::SwingtraderError;
use crate::domain::indicator::Indicator;
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const DATE_FORMAT: &str = "%Y-%m-%d";
const OHLCV: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

/// Column positions resolved from the header row.
struct Layout {
    ohlcv: [usize; 6],
    indicators: Vec<(usize, Indicator)>,
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SwingtraderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SwingtraderError::Data {
                    reason: format!("missing {} column", name),
                })
        };
        let mut ohlcv = [0usize; 6];
        for (slot, name) in ohlcv.iter_mut().zip(OHLCV) {
            *slot = find(name)?;
        }

        let indicators = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !ohlcv.contains(i))
            .filter_map(|(i, h)| h.parse::<Indicator>().ok().map(|ind| (i, ind)))
            .collect();

        Ok(Layout { ohlcv, indicators })
    }
}

/// OHLCV cells must be finite and non-negative.
fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    date: NaiveDate,
) -> Result<f64, SwingtraderError> {
    let cell = record.get(index).unwrap_or("").trim();
    let value = cell.parse::<f64>().map_err(|e| SwingtraderError::Data {
        reason: format!("invalid {} value '{}' on {}: {}", name, cell, date, e),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(SwingtraderError::Data {
            reason: format!(
                "{} on {} must be a finite non-negative number, got '{}'",
                name, date, cell
            ),
        });
    }
    Ok(value)
}

fn parse_optional(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn parse(
        &self,
        content: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Period>, SwingtraderError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SwingtraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let layout = Layout::from_headers(headers)?;
        let [date_i, open_i, high_i, low_i, close_i, volume_i] = layout.ohlcv;

        let mut periods = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SwingtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_i).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
                SwingtraderError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;
            if date < start_date || date > end_date {
                continue;
            }

            let mut period = Period::new(
                date,
                parse_number(&record, open_i, "open", date)?,
                parse_number(&record, high_i, "high", date)?,
                parse_number(&record, low_i, "low", date)?,
                parse_number(&record, close_i, "close", date)?,
                parse_number(&record, volume_i, "volume", date)?,
            );
            for &(i, indicator) in &layout.indicators {
                if let Some(value) = parse_optional(record.get(i)) {
                    period.set_indicator(indicator, value);
                }
            }
            periods.push(period);
        }

        periods.sort_by_key(|p| p.date);
        if let Some(w) = periods.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SwingtraderError::Data {
                reason: format!("duplicate date {}", w[0].date),
            });
        }
        Ok(periods)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_periods(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Period>, SwingtraderError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no CSV file for ticker");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(SwingtraderError::Data {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };
        self.parse(&content, start_date, end_date)
    }

    fn list_tickers(&self) -> Result<Vec<String>, SwingtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SwingtraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SwingtraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some(ticker) = name.to_string_lossy().strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
