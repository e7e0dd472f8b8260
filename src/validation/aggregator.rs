//! Error aggregation. Collects raw findings from the event and sequence
//! validators, deduplicates by `(type, severity, base_message, line_number)`,
//! and rewrites groups of two or more into a single summarized error
//! carrying a handful of example identifiers.

use std::collections::BTreeMap;

use crate::models::report::ValidationError;

const SPLIT_MARKER: &str = " for urn:epc:";
const EXAMPLE_LIMIT: usize = 3;

/// Splits a message into `(base_message, identifier)`. The identifier is
/// `None` when the message carries no ` for urn:epc:...` suffix.
fn split_message(message: &str) -> (&str, Option<&str>) {
    match message.find(SPLIT_MARKER) {
        Some(idx) => {
            let base = &message[..idx];
            // `+ " for "`.len() == 5 bytes, leaving the identifier itself.
            let identifier = &message[idx + 5..];
            (base, Some(identifier))
        }
        None => (message, None),
    }
}

#[derive(Default)]
struct Group {
    first: Option<ValidationError>,
    identifiers: Vec<String>,
    count: u32,
}

/// Groups and rewrites errors, with a configurable number of example
/// identifiers shown per merged group (default 3).
pub fn aggregate_with_example_limit(errors: Vec<ValidationError>, example_limit: usize) -> Vec<ValidationError> {
    let mut order: Vec<(String, crate::models::report::Severity, String, Option<u32>)> = Vec::new();
    let mut groups: BTreeMap<(String, String, String, Option<u32>), Group> = BTreeMap::new();

    for error in errors {
        let (base, identifier) = split_message(&error.message);
        let key = (
            error.error_type.clone(),
            format!("{:?}", error.severity),
            base.to_string(),
            error.line_number,
        );

        let group = groups.entry(key.clone()).or_default();
        if group.first.is_none() {
            order.push((error.error_type.clone(), error.severity, base.to_string(), error.line_number));
            group.first = Some(error.clone());
        }
        group.count += 1;
        if let Some(id) = identifier {
            group.identifiers.push(id.to_string());
        }
    }

    order
        .into_iter()
        .map(|(error_type, severity, base, line_number)| {
            let key = (error_type.clone(), format!("{severity:?}"), base.clone(), line_number);
            let group = groups.remove(&key).expect("key was just inserted above");
            let first = group.first.expect("group always has a first error");

            if group.count < 2 {
                return first;
            }

            let mut message = format!("{base} ({} items)", group.count);
            if !group.identifiers.is_empty() {
                let shown: Vec<&str> = group
                    .identifiers
                    .iter()
                    .take(example_limit)
                    .map(String::as_str)
                    .collect();
                message.push_str("\nExamples: ");
                message.push_str(&shown.join(", "));
                if group.identifiers.len() > example_limit {
                    message.push_str(&format!("\n...and {} more", group.identifiers.len() - example_limit));
                }
            }

            let mut merged = first;
            merged.message = message;
            merged.count = Some(group.count);
            merged
        })
        .collect()
}

/// Aggregates errors using the default example limit of 3.
pub fn aggregate(errors: Vec<ValidationError>) -> Vec<ValidationError> {
    aggregate_with_example_limit(errors, EXAMPLE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{error_type, Severity};

    fn epc_error(message: impl Into<String>, line: Option<u32>) -> ValidationError {
        ValidationError::new(error_type::FIELD, Severity::Error, message).with_line(line)
    }

    #[test]
    fn merges_repeated_field_errors_on_same_line() {
        let errors = vec![
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.1", Some(10)),
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.2", Some(10)),
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.3", Some(10)),
        ];
        let aggregated = aggregate(errors);
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].count, Some(3));
        assert!(aggregated[0].message.contains("(3 items)"));
        assert!(aggregated[0].message.contains("Examples:"));
    }

    #[test]
    fn does_not_merge_across_different_lines_or_types() {
        let errors = vec![
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.1", Some(10)),
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.2", Some(20)),
        ];
        let aggregated = aggregate(errors);
        assert_eq!(aggregated.len(), 2);
        assert!(aggregated.iter().all(|e| e.count.is_none()));
    }

    #[test]
    fn preserves_single_errors_unmodified() {
        let errors = vec![epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.1", Some(10))];
        let aggregated = aggregate(errors.clone());
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].message, errors[0].message);
        assert!(aggregated[0].count.is_none());
    }

    #[test]
    fn output_length_never_exceeds_input_and_keys_are_preserved() {
        let errors = vec![
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.1", Some(10)),
            epc_error("Invalid EPC format for urn:epc:id:sgtin:1.1.2", Some(10)),
            ValidationError::new(error_type::SEQUENCE, Severity::Warning, "Incomplete sequence: ends with shipping"),
        ];
        let before_len = errors.len();
        let aggregated = aggregate(errors);
        assert!(aggregated.len() <= before_len);
    }

    #[test]
    fn truncates_examples_and_notes_remainder() {
        let errors = (0..5)
            .map(|i| epc_error(format!("Invalid EPC format for urn:epc:id:sgtin:1.1.{i}"), Some(1)))
            .collect();
        let aggregated = aggregate(errors);
        assert_eq!(aggregated.len(), 1);
        assert!(aggregated[0].message.contains("...and 2 more"));
    }
}
