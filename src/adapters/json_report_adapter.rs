//! JSON report adapter implementing ReportPort.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestReport;
use crate::domain::error::SwingtraderError;
use crate::ports::report_port::ReportPort;

/// Writes the full report as pretty-printed JSON.
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(report: &BacktestReport) -> Result<String, SwingtraderError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &str) -> Result<(), SwingtraderError> {
        let json = Self::render(report)?;
        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        tracing::info!(path = output_path, "wrote JSON report");
        Ok(())
    }
}
