//! Report output port trait.

use crate::domain::backtest::BacktestReport;
use crate::domain::error::SwingtraderError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(&self, report: &BacktestReport, output_path: &str) -> Result<(), SwingtraderError>;
}
