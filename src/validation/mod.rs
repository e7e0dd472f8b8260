//! The orchestrator: runs parsing, per-event validation, sequence and
//! packaging-hierarchy validation, and error aggregation in order, then
//! synthesizes the [`ValidationReport`]. This module is the crate's only
//! stable entry point.

pub mod aggregator;
pub mod event;
pub mod sequence;

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::models::report::{error_type, Severity, ValidationError, ValidationReport};
use crate::parser;

/// Validates a raw EPCIS document (XML or JSON) and returns a complete
/// report.
///
/// Never panics: any internal panic is caught at this boundary and
/// reported as a single `system`/error finding with `valid=false`. The
/// engine performs no I/O and holds no state once this call returns.
pub fn validate_document(content: &[u8], is_xml: bool) -> ValidationReport {
    match catch_unwind(AssertUnwindSafe(|| validate_document_inner(content, is_xml))) {
        Ok(report) => report,
        Err(_) => ValidationReport {
            valid: false,
            header: None,
            event_count: 0,
            companies: Vec::new(),
            errors: vec![ValidationError::new(
                error_type::SYSTEM,
                Severity::Error,
                "Internal error while validating document",
            )],
        },
    }
}

fn validate_document_inner(content: &[u8], is_xml: bool) -> ValidationReport {
    let parsed = parser::parse_document(content, is_xml);

    if !parsed.parse_errors.is_empty() {
        let mut report = ValidationReport {
            valid: false,
            header: parsed.header,
            event_count: parsed.events.len(),
            companies: parsed.companies.into_iter().collect(),
            errors: aggregator::aggregate(parsed.parse_errors),
        };
        report.recompute_validity();
        return report;
    }

    let mut errors = Vec::new();

    // The header's declared Sender/Receiver prefixes are the authorization
    // set when the document names any; undeclared-header documents fall
    // back to whatever prefixes the body itself carries.
    let authorized_companies = if parsed.header_companies.is_empty() {
        &parsed.companies
    } else {
        &parsed.header_companies
    };

    for event in &parsed.events {
        errors.extend(event::validate_event(event, authorized_companies));
    }
    errors.extend(sequence::validate_sequence(&parsed.events));
    errors.extend(sequence::validate_packaging_hierarchy(&parsed.events));

    let errors = aggregator::aggregate(errors);

    let mut report = ValidationReport {
        valid: false,
        header: parsed.header,
        event_count: parsed.events.len(),
        companies: parsed.companies.into_iter().collect(),
        errors,
    };
    report.recompute_validity();
    report
}
