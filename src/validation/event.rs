//! The per-event field validator: required fields, timestamp formats,
//! EPC authorization, CBV vocabulary, and the shipping/ILMD/aggregation
//! special cases.

use std::collections::BTreeSet;

use crate::identifier;
use crate::models::epcis::{suffix, Action, Event, EventKind};
use crate::models::report::{error_type, Severity, ValidationError};
use crate::utils::time;

/// CBV `bizStep` vocabulary.
pub const VALID_BIZ_STEPS: &[&str] = &[
    "accepting",
    "arriving",
    "collecting",
    "commissioning",
    "consigning",
    "creating_class_instance",
    "cycle_counting",
    "decommissioning",
    "departing",
    "destroying",
    "dispensing",
    "encoding",
    "entering_exiting",
    "holding",
    "inspecting",
    "installing",
    "killing",
    "loading",
    "other",
    "packing",
    "picking",
    "receiving",
    "removing",
    "repackaging",
    "repairing",
    "replacing",
    "reserving",
    "retail_selling",
    "shipping",
    "staging_outbound",
    "stock_taking",
    "stocking",
    "storing",
    "transporting",
    "unloading",
    "void_shipping",
];

/// CBV `disposition` vocabulary.
pub const VALID_DISPOSITIONS: &[&str] = &[
    "active",
    "container_closed",
    "damaged",
    "destroyed",
    "dispensed",
    "disposed",
    "encoded",
    "expired",
    "in_progress",
    "in_transit",
    "inactive",
    "no_pedigree_match",
    "non_sellable_other",
    "partially_dispensed",
    "recalled",
    "reserved",
    "retail_sold",
    "returned",
    "sellable_accessible",
    "sellable_not_accessible",
    "stolen",
    "unknown",
    "available",
    "unavailable",
];

fn err(error_type: &str, severity: Severity, message: impl Into<String>, line: Option<u32>) -> ValidationError {
    ValidationError::new(error_type, severity, message).with_line(line)
}

fn field_error(message: impl Into<String>, line: Option<u32>) -> ValidationError {
    err(error_type::FIELD, Severity::Error, message, line)
}

/// Runs every per-event field check in a fixed order and collects all
/// resulting errors.
pub fn validate_event(event: &Event, authorized_companies: &BTreeSet<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let line = event.line_number();

    check_required_fields(event, line, &mut errors);
    check_event_time(event, line, &mut errors);
    check_timezone(event, line, &mut errors);
    check_epcs(event, line, authorized_companies, &mut errors);
    check_biz_step(event, line, &mut errors);
    check_disposition(event, line, &mut errors);
    check_location(event, line, &mut errors);
    check_ilmd(event, line, &mut errors);
    check_aggregation_parent(event, line, &mut errors);
    check_shipping(event, line, &mut errors);
    check_date_order(event, line, &mut errors);

    errors
}

fn check_required_fields(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let c = &event.common;
    let mut missing = Vec::new();

    if c.event_time.is_none() {
        missing.push("eventTime");
    }
    if c.event_time_zone_offset.is_none() {
        missing.push("eventTimeZoneOffset");
    }

    match &event.kind {
        EventKind::ObjectEvent { action, epc_list } => {
            if epc_list.is_empty() {
                missing.push("epcList");
            }
            if action.is_none() {
                missing.push("action");
            }
        }
        EventKind::AggregationEvent {
            action, child_epcs, ..
        } => {
            if child_epcs.is_empty() {
                missing.push("childEPCs");
            }
            if action.is_none() {
                missing.push("action");
            }
            // parentID-when-ADD is handled by check_aggregation_parent, which
            // additionally conditions on non-empty childEPCs.
        }
        EventKind::TransactionEvent { action, epc_list } => {
            if c.biz_transaction_list.is_empty() {
                missing.push("bizTransactionList");
            }
            if epc_list.is_empty() {
                missing.push("epcList");
            }
            if action.is_none() {
                missing.push("action");
            }
        }
        EventKind::TransformationEvent {
            input_epc_list,
            output_epc_list,
        } => {
            if input_epc_list.is_empty() {
                missing.push("inputEPCList");
            }
            if output_epc_list.is_empty() {
                missing.push("outputEPCList");
            }
        }
    }

    for field in missing {
        errors.push(field_error(
            format!("Missing required field '{field}' for {}", event.kind.type_name()),
            line,
        ));
    }
}

fn check_event_time(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let Some(value) = event.common.event_time.as_deref() else {
        return;
    };
    if time::parse_event_time(value).is_none() {
        errors.push(field_error(format!("Invalid eventTime format: {value}"), line));
    }
}

fn check_timezone(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let Some(value) = event.common.event_time_zone_offset.as_deref() else {
        return;
    };
    if !time::is_valid_timezone_offset(value) {
        errors.push(field_error(
            format!("Invalid eventTimeZoneOffset format: {value}"),
            line,
        ));
    }
}

fn check_epcs(
    event: &Event,
    line: Option<u32>,
    authorized_companies: &BTreeSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for epc in event.all_epcs() {
        let epc_line = epc.line_number.or(line);
        if !identifier::validate_epc_format(&epc.value) {
            errors.push(field_error(
                format!("Invalid EPC format for {}", epc.value),
                epc_line,
            ));
        } else if !identifier::validate_company_prefix(&epc.value, authorized_companies) {
            errors.push(field_error(
                format!("Unauthorized company prefix in EPC for {}", epc.value),
                epc_line,
            ));
        }
    }
}

fn check_biz_step(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let Some(raw) = event.common.biz_step.as_deref() else {
        return;
    };
    let step = suffix(raw);
    if !VALID_BIZ_STEPS.contains(&step) {
        errors.push(field_error(format!("Invalid bizStep: {raw}"), line));
    }
}

fn check_disposition(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let Some(raw) = event.common.disposition.as_deref() else {
        return;
    };
    let disposition = suffix(raw);
    if !VALID_DISPOSITIONS.contains(&disposition) {
        errors.push(field_error(format!("Invalid disposition: {raw}"), line));
    }
}

fn check_location(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    for (name, loc) in [
        ("readPoint", &event.common.read_point),
        ("bizLocation", &event.common.biz_location),
    ] {
        let Some(loc) = loc else { continue };
        if !loc.id.starts_with("urn:epc:id:sgln:") {
            errors.push(field_error(
                format!("{name} id must be an SGLN URN: {}", loc.id),
                line,
            ));
        }
    }
}

fn check_ilmd(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let Some(step) = event.biz_step_suffix() else {
        return;
    };
    if step != "commissioning" {
        return;
    }
    let Some(ilmd) = &event.common.ilmd else {
        return;
    };
    if ilmd.lot_number.is_none() {
        errors.push(field_error("Missing ilmd.lotNumber for commissioning event", line));
    }
    match &ilmd.item_expiration_date {
        None => errors.push(field_error(
            "Missing ilmd.itemExpirationDate for commissioning event",
            line,
        )),
        Some(date) if !time::parse_date(date) => errors.push(field_error(
            format!("Invalid ilmd.itemExpirationDate format: {date}"),
            line,
        )),
        Some(_) => {}
    }
}

fn check_aggregation_parent(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let EventKind::AggregationEvent {
        action,
        parent_id,
        child_epcs,
    } = &event.kind
    else {
        return;
    };
    if matches!(action, Some(Action::Add)) && !child_epcs.is_empty() && parent_id.is_none() {
        errors.push(field_error(
            "AggregationEvent with action=ADD and non-empty childEPCs requires parentID",
            line,
        ));
    }
}

const SHIPPING_PO: &str = "urn:epcglobal:cbv:btt:po";
const SHIPPING_DESADV: &str = "urn:epcglobal:cbv:btt:desadv";

fn check_shipping(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let Some(step) = event.biz_step_suffix() else {
        return;
    };
    if step != "shipping" {
        return;
    }

    let has_po = event
        .common
        .biz_transaction_list
        .iter()
        .any(|t| t.biz_type.contains(SHIPPING_PO));
    let has_desadv = event
        .common
        .biz_transaction_list
        .iter()
        .any(|t| t.biz_type.contains(SHIPPING_DESADV));
    if !has_po || !has_desadv {
        errors.push(field_error(
            "Shipping event bizTransactionList must include both a 'po' and a 'desadv' transaction",
            line,
        ));
    }

    let has_owning_source = event
        .common
        .extension
        .source_list
        .iter()
        .any(|s| suffix(&s.entry_type) == "owning_party");
    let has_location_source = event
        .common
        .extension
        .source_list
        .iter()
        .any(|s| suffix(&s.entry_type) == "location");
    if !has_owning_source || !has_location_source {
        errors.push(field_error(
            "Shipping event extension.sourceList must include both 'owning_party' and 'location'",
            line,
        ));
    }

    let has_owning_dest = event
        .common
        .extension
        .destination_list
        .iter()
        .any(|d| suffix(&d.entry_type) == "owning_party");
    let has_location_dest = event
        .common
        .extension
        .destination_list
        .iter()
        .any(|d| suffix(&d.entry_type) == "location");
    if !has_owning_dest || !has_location_dest {
        errors.push(field_error(
            "Shipping event extension.destinationList must include both 'owning_party' and 'location'",
            line,
        ));
    }
}

fn check_date_order(event: &Event, line: Option<u32>, errors: &mut Vec<ValidationError>) {
    let (Some(record_time), Some(event_time)) = (
        event.common.record_time.as_deref(),
        event.common.event_time.as_deref(),
    ) else {
        return;
    };
    let (Some(record), Some(occurred)) = (
        time::parse_event_time(record_time),
        time::parse_event_time(event_time),
    ) else {
        return;
    };
    if record > occurred {
        errors.push(field_error(
            format!("recordTime ({record_time}) is later than eventTime ({event_time})"),
            line,
        ));
    }
}
