//! The dual-format EPCIS parser.
//!
//! Decodes XML or JSON bytes into the uniform [`Event`] representation,
//! extracting the document header, the event list, and the set of
//! company prefixes encountered, while recording any parse-time errors.
//! Per-event exceptions never abort the document.

pub mod json;
pub mod xml;

use crate::models::report::{error_type, Severity, ValidationError};
use crate::models::Event;
use serde_json::Value;
use std::collections::BTreeSet;

pub struct ParsedDocument {
    pub header: Option<serde_json::Value>,
    pub events: Vec<Event>,
    pub companies: BTreeSet<String>,
    /// Company prefixes declared by the document header's `Sender`/`Receiver`
    /// identifiers — the set an event's own EPCs are checked against. Empty
    /// when the document carries no header or the header names no party.
    pub header_companies: BTreeSet<String>,
    pub parse_errors: Vec<ValidationError>,
}

/// `parse_document(bytes, is_xml) -> (header, events, companies, parse_errors)`.
pub fn parse_document(content: &[u8], is_xml: bool) -> ParsedDocument {
    if is_xml {
        xml::parse(content)
    } else {
        json::parse(content)
    }
}

/// Extracts company prefixes from a `StandardBusinessDocumentHeader`'s
/// `Sender`/`Receiver` parties: the last `:`-delimited segment of each
/// party's `Identifier`, kept only when it is entirely digits.
pub(crate) fn extract_header_companies(header: &Value) -> BTreeSet<String> {
    let sbdh = header.get("StandardBusinessDocumentHeader").unwrap_or(header);
    let mut companies = BTreeSet::new();
    for party in ["Sender", "Receiver"] {
        if let Some(prefix) = party_company_prefix(sbdh, party) {
            companies.insert(prefix);
        }
    }
    companies
}

fn party_company_prefix(sbdh: &Value, party: &str) -> Option<String> {
    let identifier = sbdh.get(party)?.get("Identifier")?;
    let text = match identifier {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("value")?.as_str()?,
        _ => return None,
    };
    let prefix = text.rsplit(':').next()?;
    (!prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit())).then(|| prefix.to_string())
}

pub(crate) fn accumulate_company_prefix(companies: &mut BTreeSet<String>, epc: &str) {
    if let Some(prefix) = crate::identifier::extract_company_prefix(epc) {
        companies.insert(prefix);
    }
}

pub(crate) fn format_error(message: impl Into<String>) -> ValidationError {
    ValidationError::new(error_type::FORMAT, Severity::Error, message)
}

pub(crate) fn structure_error(message: impl Into<String>) -> ValidationError {
    ValidationError::new(error_type::STRUCTURE, Severity::Error, message)
}
