//! The engine's single output type: [`ValidationReport`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Closed taxonomy for `ValidationError::error_type`.
pub mod error_type {
    pub const FORMAT: &str = "format";
    pub const STRUCTURE: &str = "structure";
    pub const FIELD: &str = "field";
    pub const SEQUENCE: &str = "sequence";
    pub const HIERARCHY: &str = "hierarchy";
    pub const SYSTEM: &str = "system";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl ValidationError {
    pub fn new(error_type: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.to_string(),
            severity,
            message: message.into(),
            line_number: None,
            count: None,
        }
    }

    pub fn with_line(mut self, line_number: Option<u32>) -> Self {
        self.line_number = line_number;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<serde_json::Value>,
    #[serde(rename = "eventCount")]
    pub event_count: usize,
    pub companies: Vec<String>,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// `report.valid ⇔ ¬∃ e ∈ report.errors : e.severity = error`.
    pub fn recompute_validity(&mut self) {
        self.valid = !self
            .errors
            .iter()
            .any(|e| e.severity == Severity::Error);
    }

    pub fn company_set(&self) -> BTreeSet<&str> {
        self.companies.iter().map(String::as_str).collect()
    }
}

/// Read-only summary over an already-produced report, grouped by error
/// type. Mirrors `summarize_errors` from the original Python validator —
/// a pure view, it introduces no new engine state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub by_type: std::collections::BTreeMap<String, TypeCounts>,
    pub critical_issues: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCounts {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl ErrorSummary {
    pub fn from_report(report: &ValidationReport) -> Self {
        let mut summary = ErrorSummary {
            total: report.errors.len(),
            ..Default::default()
        };

        for error in &report.errors {
            let is_error = error.severity == Severity::Error;
            if is_error {
                summary.errors += 1;
            } else {
                summary.warnings += 1;
            }

            let counts = summary.by_type.entry(error.error_type.clone()).or_default();
            counts.total += 1;
            if is_error {
                counts.errors += 1;
            } else {
                counts.warnings += 1;
            }

            if is_error
                && (error.error_type == error_type::SEQUENCE
                    || error.error_type == error_type::HIERARCHY)
            {
                summary.critical_issues.push(error.message.clone());
            }
        }

        summary
    }
}
