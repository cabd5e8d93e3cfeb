//! Market data port trait.

use crate::domain::error::SwingtraderError;
use crate::domain::period::Period;
use chrono::NaiveDate;

pub trait DataPort {
    /// Periods for `ticker` with dates in `[start_date, end_date]`, ascending.
    /// An empty vector means the range holds no data.
    fn fetch_periods(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Period>, SwingtraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, SwingtraderError>;
}
