//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for swingtrader.
#[derive(Debug, thiserror::Error)]
pub enum SwingtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("no data for {ticker} between {start_date} and {end_date}")]
    DataUnavailable {
        ticker: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SwingtraderError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SwingtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the configuration family, which is raised before any simulation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SwingtraderError::ConfigParse { .. }
                | SwingtraderError::ConfigMissing { .. }
                | SwingtraderError::ConfigInvalid { .. }
                | SwingtraderError::UnknownStrategy { .. }
        )
    }
}

impl From<&SwingtraderError> for std::process::ExitCode {
    fn from(err: &SwingtraderError) -> Self {
        let code: u8 = match err {
            SwingtraderError::Io(_)
            | SwingtraderError::Json(_)
            | SwingtraderError::Report { .. } => 1,
            SwingtraderError::ConfigParse { .. }
            | SwingtraderError::ConfigMissing { .. }
            | SwingtraderError::ConfigInvalid { .. }
            | SwingtraderError::UnknownStrategy { .. } => 2,
            SwingtraderError::Data { .. } => 3,
            SwingtraderError::DataUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
