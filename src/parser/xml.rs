//! XML half of the parser: line-number-aware, built on `roxmltree`
//! rather than `quick-xml` so every `EpcEntry` and event can carry the
//! source line it came from.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use roxmltree::{Document, Node};
use serde_json::{Map, Value};

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

    let text = match std::str::from_utf8(content) {
        Ok(t) => t,
        Err(e) => {
            parse_errors.push(format_error(format!("Invalid XML encoding: {e}")));
            return ParsedDocument {
                header,
                events,
                companies,
                header_companies: BTreeSet::new(),
                parse_errors,
            };
        }
    };

    let doc = match Document::parse(text) {
        Ok(d) => d,
        Err(e) => {
            parse_errors.push(format_error(format!("Invalid XML format: {e}")));
            return ParsedDocument {
                header,
                events,
                companies,
                header_companies: BTreeSet::new(),
                parse_errors,
            };
        }
    };

    if !namespace_uris(text)
        .iter()
        .any(|ns| ns.to_lowercase().contains("epcis"))
    {
        parse_errors.push(structure_error("Missing EPCIS namespace declaration"));
    }

    let root = doc.root_element();

    if let Some(header_node) = find_descendant(root, "StandardBusinessDocumentHeader") {
        header = Some(element_to_value(header_node));
    }

    for event_node in root
        .descendants()
        .filter(|n| n.is_element() && matches!(n.tag_name().name(), "ObjectEvent" | "AggregationEvent"))
    {
        let event = match event_node.tag_name().name() {
            "ObjectEvent" => build_object_event(&doc, event_node),
            "AggregationEvent" => build_aggregation_event(&doc, event_node),
            _ => unreachable!(),
        };
        for epc in event.all_epcs() {
            accumulate_company_prefix(&mut companies, &epc.value);
        }
        events.push(event);
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

fn namespace_uris(text: &str) -> Vec<String> {
    static NAMESPACE_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAMESPACE_RE
        .get_or_init(|| Regex::new(r#"xmlns(?::[\w.-]+)?\s*=\s*["']([^"']+)["']"#).unwrap());
    re.captures_iter(text).map(|c| c[1].to_string()).collect()
}

fn line_number(doc: &Document, node: Node) -> u32 {
    doc.text_pos_at(node.range().start).row
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn find_descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|d| d.is_element() && d.tag_name().name() == name)
}

fn child_text(node: Node, tag: &str) -> Option<String> {
    find_child(node, tag)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn extract_epc_list(doc: &Document, node: Node, tag: &str) -> Vec<EpcEntry> {
    let mut out = Vec::new();
    let Some(list_node) = find_child(node, tag) else {
        return out;
    };
    for epc_node in list_node
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "epc")
    {
        if let Some(text) = epc_node.text() {
            let value = text.trim();
            if value.is_empty() {
                continue;
            }
            out.push(EpcEntry::at_line(value, line_number(doc, epc_node)));
        }
    }
    out
}

fn extract_biz_transactions(node: Node) -> Vec<BizTransaction> {
    let mut out = Vec::new();
    let Some(list_node) = find_child(node, "bizTransactionList") else {
        return out;
    };
    for txn in list_node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "bizTransaction")
    {
        if let Some(text) = txn.text() {
            let value = text.trim();
            if value.is_empty() {
                continue;
            }
            out.push(BizTransaction {
                biz_type: txn.attribute("type").unwrap_or_default().to_string(),
                value: value.to_string(),
            });
        }
    }
    out
}

fn extract_location_ref(node: Node, tag: &str) -> Option<LocationRef> {
    let loc_node = find_child(node, tag)?;
    let id_node = find_child(loc_node, "id")?;
    let text = id_node.text()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(LocationRef { id: text.to_string() })
}

fn extract_extension(node: Node) -> Extension {
    let mut ext = Extension::default();
    let Some(ext_node) = find_child(node, "extension") else {
        return ext;
    };
    if let Some(src_list) = find_child(ext_node, "sourceList") {
        for src in src_list
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "source")
        {
            if let Some(text) = src.text() {
                let value = text.trim();
                if value.is_empty() {
                    continue;
                }
                ext.source_list.push(SourceDestEntry {
                    entry_type: src.attribute("type").unwrap_or_default().to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
    if let Some(dst_list) = find_child(ext_node, "destinationList") {
        for dst in dst_list
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "destination")
        {
            if let Some(text) = dst.text() {
                let value = text.trim();
                if value.is_empty() {
                    continue;
                }
                ext.destination_list.push(SourceDestEntry {
                    entry_type: dst.attribute("type").unwrap_or_default().to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
    ext
}

fn extract_ilmd(node: Node) -> Option<Ilmd> {
    let ilmd_node = find_child(node, "ilmd")?;
    let mut ilmd = Ilmd::default();
    for child in ilmd_node.children().filter(|n| n.is_element()) {
        // roxmltree resolves qualified names to their local part, so a
        // bare `lotNumber` and a `cbvmda:lotNumber` land the same way.
        let text = child
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        match child.tag_name().name() {
            "lotNumber" => ilmd.lot_number = text,
            "itemExpirationDate" => ilmd.item_expiration_date = text,
            "productionDate" => ilmd.production_date = text,
            _ => {}
        }
    }
    Some(ilmd)
}

fn build_common(doc: &Document, node: Node) -> EventCommon {
    EventCommon {
        event_time: child_text(node, "eventTime"),
        event_time_zone_offset: child_text(node, "eventTimeZoneOffset"),
        record_time: child_text(node, "recordTime"),
        biz_step: child_text(node, "bizStep"),
        disposition: child_text(node, "disposition"),
        read_point: extract_location_ref(node, "readPoint"),
        biz_location: extract_location_ref(node, "bizLocation"),
        biz_transaction_list: extract_biz_transactions(node),
        extension: extract_extension(node),
        ilmd: extract_ilmd(node),
        line_number: Some(line_number(doc, node)),
    }
}

fn build_object_event(doc: &Document, node: Node) -> Event {
    Event {
        common: build_common(doc, node),
        kind: EventKind::ObjectEvent {
            action: child_text(node, "action").and_then(|a| Action::parse(&a)),
            epc_list: extract_epc_list(doc, node, "epcList"),
        },
    }
}

fn build_aggregation_event(doc: &Document, node: Node) -> Event {
    Event {
        common: build_common(doc, node),
        kind: EventKind::AggregationEvent {
            action: child_text(node, "action").and_then(|a| Action::parse(&a)),
            parent_id: child_text(node, "parentID"),
            child_epcs: extract_epc_list(doc, node, "childEPCs"),
        },
    }
}

/// Generic element-to-JSON conversion, used only for the document header
/// (which downstream components treat as an opaque blob to echo back in
/// the report, never as validation input).
fn element_to_value(node: Node) -> Value {
    let mut map = Map::new();
    for attr in node.attributes() {
        map.insert(
            attr.name().to_string(),
            Value::String(attr.value().to_string()),
        );
    }

    let mut text_value = None;
    for child in node.children() {
        if child.is_text() {
            if let Some(t) = child.text() {
                let trimmed = t.trim();
                if !trimmed.is_empty() {
                    text_value = Some(trimmed.to_string());
                }
            }
            continue;
        }
        if !child.is_element() {
            continue;
        }
        let key = child.tag_name().name().to_string();
        let value = element_to_value(child);
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let previous = existing.clone();
                map.insert(key, Value::Array(vec![previous, value]));
            }
            None => {
                map.insert(key, value);
            }
        }
    }

    if map.is_empty() {
        return text_value.map(Value::String).unwrap_or(Value::Null);
    }
    if let Some(text) = text_value {
        map.insert("value".to_string(), Value::String(text));
    }
    Value::Object(map)
}
