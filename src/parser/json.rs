//! JSON-LD half of the parser. No line-number tracking is available for
//! this format — every `EpcEntry` and `EventCommon` carries
//! `line_number: None`, and downstream validators treat that as "no
//! location to report" rather than an error.

use std::collections::BTreeSet;

use serde_json::Value;

use super::{accumulate_company_prefix, format_error, structure_error, ParsedDocument};
use crate::models::epcis::{
    Action, BizTransaction, EpcEntry, EventCommon, EventKind, Extension, Ilmd, LocationRef,
    SourceDestEntry,
};
use crate::models::Event;

pub fn parse(content: &[u8]) -> ParsedDocument {
    let mut companies = BTreeSet::new();
    let mut parse_errors = Vec::new();
    let mut events = Vec::new();
    let mut header = None;

    let data: Value = match serde_json::from_slice(content) {
        Ok(v) => v,
        Err(e) => {
            parse_errors.push(format_error(format!("Invalid JSON format: {e}")));
            return ParsedDocument {
                header,
                events,
                companies,
                header_companies: BTreeSet::new(),
                parse_errors,
            };
        }
    };

    let context_ok = data
        .get("@context")
        .map(context_mentions_epcis)
        .unwrap_or(false);
    if !context_ok {
        parse_errors.push(structure_error("Missing EPCIS context in JSON document"));
    }

    header = data.get("header").cloned();

    if let Some(Value::Array(list)) = data.get("eventList") {
        for raw_event in list {
            match build_event(raw_event) {
                Ok(event) => {
                    for epc in event.all_epcs() {
                        accumulate_company_prefix(&mut companies, &epc.value);
                    }
                    events.push(event);
                }
                Err(message) => {
                    parse_errors.push(format_error(format!("Error parsing event: {message}")));
                }
            }
        }
    }

    let header_companies = header
        .as_ref()
        .map(super::extract_header_companies)
        .unwrap_or_default();

    ParsedDocument {
        header,
        events,
        companies,
        header_companies,
        parse_errors,
    }
}

fn context_mentions_epcis(ctx: &Value) -> bool {
    match ctx {
        Value::Array(items) => items.iter().any(value_mentions_epcis),
        other => value_mentions_epcis(other),
    }
}

fn value_mentions_epcis(v: &Value) -> bool {
    v.to_string().to_lowercase().contains("epcis")
}

fn build_event(raw: &Value) -> Result<Event, String> {
    let event_type = raw
        .get("eventType")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing eventType".to_string())?;

    let common = build_common(raw);
    let kind = match event_type {
        "ObjectEvent" => EventKind::ObjectEvent {
            action: str_field(raw, "action").and_then(|a| Action::parse(&a)),
            epc_list: epc_entries(raw, "epcList"),
        },
        "AggregationEvent" => EventKind::AggregationEvent {
            action: str_field(raw, "action").and_then(|a| Action::parse(&a)),
            parent_id: str_field(raw, "parentID"),
            child_epcs: epc_entries(raw, "childEPCs"),
        },
        "TransactionEvent" => EventKind::TransactionEvent {
            action: str_field(raw, "action").and_then(|a| Action::parse(&a)),
            epc_list: epc_entries(raw, "epcList"),
        },
        "TransformationEvent" => EventKind::TransformationEvent {
            input_epc_list: epc_entries(raw, "inputEPCList"),
            output_epc_list: epc_entries(raw, "outputEPCList"),
        },
        other => return Err(format!("unknown eventType '{other}'")),
    };

    Ok(Event { common, kind })
}

fn str_field(raw: &Value, field: &str) -> Option<String> {
    raw.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Prefers a `<field>_detailed` array of `{value, line_number}` objects —
/// the hook that lets hand-authored fixtures exercise line-aware
/// validation paths over JSON input — and falls back to the plain
/// string array every real EPCIS JSON document actually carries.
fn epc_entries(raw: &Value, field: &str) -> Vec<EpcEntry> {
    let detailed_key = format!("{field}_detailed");
    if let Some(Value::Array(items)) = raw.get(&detailed_key) {
        return items
            .iter()
            .filter_map(|item| {
                let value = item.get("value")?.as_str()?.to_string();
                let line_number = item
                    .get("line_number")
                    .and_then(Value::as_u64)
                    .map(|n| n as u32);
                Some(EpcEntry { value, line_number })
            })
            .collect();
    }

    match raw.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(EpcEntry::new))
            .collect(),
        _ => Vec::new(),
    }
}

fn location_ref(raw: &Value, field: &str) -> Option<LocationRef> {
    let obj = raw.get(field)?;
    let id = obj.get("id")?.as_str()?.to_string();
    Some(LocationRef { id })
}

fn biz_transactions(raw: &Value) -> Vec<BizTransaction> {
    match raw.get("bizTransactionList") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let biz_type = item.get("type")?.as_str()?.to_string();
                let value = item.get("bizTransaction")?.as_str()?.to_string();
                Some(BizTransaction { biz_type, value })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn extension(raw: &Value) -> Extension {
    let mut ext = Extension::default();
    let Some(ext_val) = raw.get("extension") else {
        return ext;
    };
    if let Some(Value::Array(items)) = ext_val.get("sourceList") {
        ext.source_list = items
            .iter()
            .filter_map(|item| {
                let entry_type = item.get("type")?.as_str()?.to_string();
                let value = item.get("source")?.as_str()?.to_string();
                Some(SourceDestEntry { entry_type, value })
            })
            .collect();
    }
    if let Some(Value::Array(items)) = ext_val.get("destinationList") {
        ext.destination_list = items
            .iter()
            .filter_map(|item| {
                let entry_type = item.get("type")?.as_str()?.to_string();
                let value = item.get("destination")?.as_str()?.to_string();
                Some(SourceDestEntry { entry_type, value })
            })
            .collect();
    }
    ext
}

fn ilmd(raw: &Value) -> Option<Ilmd> {
    let ilmd_val = raw.get("ilmd")?;
    let get_field = |bare: &str| -> Option<String> {
        ilmd_val
            .get(bare)
            .or_else(|| ilmd_val.get(format!("cbvmda:{bare}")))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    Some(Ilmd {
        lot_number: get_field("lotNumber"),
        item_expiration_date: get_field("itemExpirationDate"),
        production_date: get_field("productionDate"),
    })
}

fn build_common(raw: &Value) -> EventCommon {
    EventCommon {
        event_time: str_field(raw, "eventTime"),
        event_time_zone_offset: str_field(raw, "eventTimeZoneOffset"),
        record_time: str_field(raw, "recordTime"),
        biz_step: str_field(raw, "bizStep"),
        disposition: str_field(raw, "disposition"),
        read_point: location_ref(raw, "readPoint"),
        biz_location: location_ref(raw, "bizLocation"),
        biz_transaction_list: biz_transactions(raw),
        extension: extension(raw),
        ilmd: ilmd(raw),
        line_number: None,
    }
}
