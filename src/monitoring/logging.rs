//! Structured logging for the engine's callers, following this
//! codebase's existing `tracing`/`tracing-subscriber` pattern.
//!
//! The orchestrator itself never logs; the caller logs the *outcome* of
//! a `validate_document` call (entry/exit, `valid`, `eventCount`,
//! error/warning counts at `info`) and the aggregated error list at
//! `debug`, after the call returns.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::models::report::{Severity, ValidationReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub console_output: bool,
    pub file_output: bool,
    pub log_directory: PathBuf,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Text,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("./logs"),
            format: LogFormat::Text,
        }
    }
}

/// Initializes the global `tracing` subscriber. Called once, from
/// `main`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.file_output {
        std::fs::create_dir_all(&config.log_directory)?;
    }

    let level = config.level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .try_init()
        .ok();

    Ok(())
}

/// Logs the outcome of a single `validate_document` call: a one-line
/// summary at `info`, the full error list at `debug`.
pub fn log_validation_outcome(supplier: &str, document_name: &str, report: &ValidationReport) {
    let error_count = report
        .errors
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .count();
    let warning_count = report.errors.len() - error_count;

    if report.valid {
        info!(
            supplier,
            document_name,
            event_count = report.event_count,
            warning_count,
            "document validated successfully"
        );
    } else {
        warn!(
            supplier,
            document_name,
            event_count = report.event_count,
            error_count,
            warning_count,
            "document failed validation"
        );
    }

    for error in &report.errors {
        debug!(
            supplier,
            document_name,
            error_type = %error.error_type,
            severity = ?error.severity,
            line_number = ?error.line_number,
            "{}",
            error.message
        );
    }
}
