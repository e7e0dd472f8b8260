//! The cross-event, stateful sequence and packaging-hierarchy validator.
//! One instance's state is scoped to a single `validate_document` call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::identifier::{self, EpcScheme};
use crate::models::epcis::{suffix, Action, Event, EventKind};
use crate::models::report::{error_type, Severity, ValidationError};
use crate::utils::time;

/// Terminal-check ordinal sequence.
const DSCSA_STEPS: &[&str] = &[
    "commissioning",
    "packing",
    "shipping",
    "receiving",
    "storing",
    "dispensing",
    "decommissioning",
    "returns",
];

const TERMINAL_STEPS: &[&str] = &["dispensing", "decommissioning", "returns"];

fn dscsa_ordinal(step: &str) -> Option<usize> {
    DSCSA_STEPS.iter().position(|s| *s == step)
}

fn predecessors(step: &str) -> Option<&'static [&'static str]> {
    match step {
        "commissioning" => Some(&[]),
        "packing" => Some(&["commissioning"]),
        "shipping" => Some(&["commissioning", "packing"]),
        "receiving" => Some(&["shipping"]),
        "storing" => Some(&["receiving", "commissioning"]),
        "dispensing" => Some(&["receiving", "storing"]),
        "decommissioning" => Some(&["receiving", "storing"]),
        "returns" => Some(&["dispensing", "storing"]),
        _ => None,
    }
}

fn allowed_dispositions(step: &str) -> Option<&'static [&'static str]> {
    match step {
        "commissioning" => Some(&["active", "in_progress"]),
        "packing" => Some(&["in_progress", "active"]),
        "shipping" => Some(&["in_transit"]),
        "receiving" => Some(&["in_progress", "active"]),
        "storing" => Some(&["active", "sellable_accessible"]),
        "dispensing" => Some(&["dispensed", "partially_dispensed"]),
        "decommissioning" => Some(&["destroyed", "expired", "recalled"]),
        "returns" => Some(&["returned"]),
        _ => None,
    }
}

fn seq_error(message: impl Into<String>, line: Option<u32>) -> ValidationError {
    ValidationError::new(error_type::SEQUENCE, Severity::Error, message).with_line(line)
}

fn seq_warning(message: impl Into<String>, line: Option<u32>) -> ValidationError {
    ValidationError::new(error_type::SEQUENCE, Severity::Warning, message).with_line(line)
}

fn hierarchy_error(message: impl Into<String>, line: Option<u32>) -> ValidationError {
    ValidationError::new(error_type::HIERARCHY, Severity::Error, message).with_line(line)
}

#[derive(Default)]
struct Commissioned {
    sgtin: std::collections::HashSet<String>,
    sscc: std::collections::HashSet<String>,
}

impl Commissioned {
    fn contains(&self, scheme: EpcScheme, epc: &str) -> bool {
        match scheme {
            EpcScheme::Sgtin => self.sgtin.contains(epc),
            EpcScheme::Sscc => self.sscc.contains(epc),
            _ => true,
        }
    }

    fn insert(&mut self, scheme: EpcScheme, epc: &str) {
        match scheme {
            EpcScheme::Sgtin => {
                self.sgtin.insert(epc.to_string());
            }
            EpcScheme::Sscc => {
                self.sscc.insert(epc.to_string());
            }
            _ => {}
        }
    }
}

/// Single-document sequence validator instance. Constructed fresh (or
/// discarded) per `validate_document` call — no process-wide state.
#[derive(Default)]
struct SequenceValidator {
    commissioned: Commissioned,
    event_times: HashMap<String, HashMap<String, DateTime<Utc>>>,
    event_sequence: HashMap<String, Vec<(String, DateTime<Utc>)>>,
}

impl SequenceValidator {
    fn commissioning_sweep(&mut self, events: &[Event]) {
        for event in events {
            if event.biz_step_suffix() != Some("commissioning") {
                continue;
            }
            for epc in event.sequencing_epcs() {
                if let Some(scheme) = identifier::get_epc_type(&epc.value) {
                    self.commissioned.insert(scheme, &epc.value);
                }
            }
        }
    }

    fn per_event_pass(&mut self, events: &[Event], errors: &mut Vec<ValidationError>) {
        for event in events {
            let Some(step) = event.biz_step_suffix().map(str::to_string) else {
                continue;
            };
            let Some(instant) = event
                .common
                .event_time
                .as_deref()
                .and_then(time::parse_event_time)
            else {
                continue;
            };
            let line = event.line_number();
            let disposition = event.disposition_suffix().map(str::to_string);

            for epc in event.sequencing_epcs() {
                let epc_value = epc.value.clone();

                if let Some(times) = self.event_times.get(&epc_value) {
                    if let Some(max_instant) = times.values().max() {
                        if instant < *max_instant {
                            errors.push(seq_error(
                                format!("Event out of chronological order for {epc_value}"),
                                line,
                            ));
                        }
                    }
                }

                if let Some(scheme) = identifier::get_epc_type(&epc_value) {
                    if matches!(scheme, EpcScheme::Sgtin | EpcScheme::Sscc)
                        && !self.commissioned.contains(scheme, &epc_value)
                    {
                        errors.push(seq_error(
                            format!("Item not commissioned before {step} for {epc_value}"),
                            line,
                        ));
                    }
                }

                if let Some(allowed) = predecessors(&step) {
                    if !allowed.is_empty() {
                        let history = self.event_sequence.get(&epc_value);
                        let satisfied = history
                            .map(|h| h.iter().any(|(s, _)| allowed.contains(&s.as_str())))
                            .unwrap_or(false);
                        if !satisfied {
                            errors.push(seq_error(
                                format!(
                                    "Event reached {step} without required predecessor(s) ({}) for {epc_value}",
                                    allowed.join(", ")
                                ),
                                line,
                            ));
                        }
                    }
                }

                self.event_sequence
                    .entry(epc_value.clone())
                    .or_default()
                    .push((step.clone(), instant));
                self.event_times
                    .entry(epc_value.clone())
                    .or_default()
                    .insert(step.clone(), instant);

                if let Some(disposition) = &disposition {
                    if let Some(allowed) = allowed_dispositions(&step) {
                        if !allowed.contains(&disposition.as_str()) {
                            errors.push(seq_error(
                                format!(
                                    "Disposition {disposition} not allowed for step {step}, for {epc_value}"
                                ),
                                line,
                            ));
                        }
                    }
                }
            }
        }
    }

    fn closure_pass(&self, errors: &mut Vec<ValidationError>) {
        for (epc, history) in &self.event_sequence {
            let mut sorted = history.clone();
            sorted.sort_by_key(|(_, instant)| *instant);

            let mut max_ordinal_seen: Option<usize> = None;
            for (step, _) in &sorted {
                if let Some(ordinal) = dscsa_ordinal(step) {
                    if let Some(max_seen) = max_ordinal_seen {
                        if ordinal < max_seen {
                            errors.push(seq_error(
                                format!("Step {step} for EPC {epc} is out of order"),
                                None,
                            ));
                            continue;
                        }
                    }
                    max_ordinal_seen = Some(max_ordinal_seen.map_or(ordinal, |m| m.max(ordinal)));
                }
            }

            if let Some((last_step, _)) = sorted.last() {
                if !TERMINAL_STEPS.contains(&last_step.as_str()) {
                    errors.push(seq_warning(
                        format!("Incomplete sequence: ends with {last_step}"),
                        None,
                    ));
                }
            }
        }
    }
}

/// Walks events in three passes: a commissioning sweep, a per-event
/// predecessor/disposition/ordering check, and a closure pass over each
/// EPC's full history for out-of-order terminal steps.
pub fn validate_sequence(events: &[Event]) -> Vec<ValidationError> {
    let mut validator = SequenceValidator::default();
    let mut errors = Vec::new();

    validator.commissioning_sweep(events);
    validator.per_event_pass(events, &mut errors);
    validator.closure_pass(&mut errors);

    errors
}

/// Tracks child EPC -> parent EPC aggregation state across `AggregationEvent`s,
/// flagging double-aggregation and mismatched disaggregation. Independent of
/// [`validate_sequence`] — may run before or after it.
pub fn validate_packaging_hierarchy(events: &[Event]) -> Vec<ValidationError> {
    let mut aggregated: HashMap<String, String> = HashMap::new();
    let mut errors = Vec::new();

    for event in events {
        let EventKind::AggregationEvent {
            action,
            parent_id,
            child_epcs,
        } = &event.kind
        else {
            continue;
        };
        let line = event.line_number();

        match action {
            Some(Action::Add) => {
                let Some(parent_id) = parent_id else { continue };
                for child in child_epcs {
                    if let Some(existing) = aggregated.get(&child.value) {
                        errors.push(hierarchy_error(
                            format!(
                                "already aggregated to {existing} for {}",
                                child.value
                            ),
                            line,
                        ));
                    } else {
                        aggregated.insert(child.value.clone(), parent_id.clone());
                    }
                }
            }
            Some(Action::Delete) => {
                let claimed_parent = parent_id.clone().unwrap_or_default();
                for child in child_epcs {
                    match aggregated.get(&child.value) {
                        None => {
                            errors.push(hierarchy_error(
                                format!("not previously aggregated for {}", child.value),
                                line,
                            ));
                        }
                        Some(actual) if *actual != claimed_parent => {
                            errors.push(hierarchy_error(
                                format!(
                                    "cannot disaggregate from {claimed_parent}, was aggregated to {actual}, for {}",
                                    child.value
                                ),
                                line,
                            ));
                        }
                        Some(_) => {
                            aggregated.remove(&child.value);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    errors
}
