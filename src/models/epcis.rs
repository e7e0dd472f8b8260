//! In-memory representation of a parsed EPCIS event.
//!
//! The parser (see [`crate::parser`]) is the only producer of these types;
//! every downstream validator works against typed fields, never against a
//! raw XML/JSON tree.

use serde::{Deserialize, Serialize};

/// `ADD` / `OBSERVE` / `DELETE`, carried on most EPCIS event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Add,
    Observe,
    Delete,
}

impl Action {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ADD" => Some(Action::Add),
            "OBSERVE" => Some(Action::Observe),
            "DELETE" => Some(Action::Delete),
            _ => None,
        }
    }
}

/// A single EPC, carrying the source line number when the parser could
/// locate it (XML only).
#[derive(Debug, Clone, Default)]
pub struct EpcEntry {
    pub value: String,
    pub line_number: Option<u32>,
}

impl EpcEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            line_number: None,
        }
    }

    pub fn at_line(value: impl Into<String>, line_number: u32) -> Self {
        Self {
            value: value.into(),
            line_number: Some(line_number),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BizTransaction {
    pub biz_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct SourceDestEntry {
    pub entry_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Extension {
    pub source_list: Vec<SourceDestEntry>,
    pub destination_list: Vec<SourceDestEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct LocationRef {
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct Ilmd {
    pub lot_number: Option<String>,
    pub item_expiration_date: Option<String>,
    pub production_date: Option<String>,
}

/// Fields shared by every EPCIS event type.
#[derive(Debug, Clone, Default)]
pub struct EventCommon {
    pub event_time: Option<String>,
    pub event_time_zone_offset: Option<String>,
    pub record_time: Option<String>,
    pub biz_step: Option<String>,
    pub disposition: Option<String>,
    pub read_point: Option<LocationRef>,
    pub biz_location: Option<LocationRef>,
    pub biz_transaction_list: Vec<BizTransaction>,
    pub extension: Extension,
    pub ilmd: Option<Ilmd>,
    /// Set iff the source was XML and the event element was locatable.
    pub line_number: Option<u32>,
}

/// The per-type payload. Each variant carries exactly the fields EPCIS
/// defines for that `eventType`.
#[derive(Debug, Clone)]
pub enum EventKind {
    ObjectEvent {
        action: Option<Action>,
        epc_list: Vec<EpcEntry>,
    },
    AggregationEvent {
        action: Option<Action>,
        parent_id: Option<String>,
        child_epcs: Vec<EpcEntry>,
    },
    TransactionEvent {
        action: Option<Action>,
        epc_list: Vec<EpcEntry>,
    },
    TransformationEvent {
        input_epc_list: Vec<EpcEntry>,
        output_epc_list: Vec<EpcEntry>,
    },
}

impl EventKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::ObjectEvent { .. } => "ObjectEvent",
            EventKind::AggregationEvent { .. } => "AggregationEvent",
            EventKind::TransactionEvent { .. } => "TransactionEvent",
            EventKind::TransformationEvent { .. } => "TransformationEvent",
        }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            EventKind::ObjectEvent { action, .. }
            | EventKind::AggregationEvent { action, .. }
            | EventKind::TransactionEvent { action, .. } => *action,
            EventKind::TransformationEvent { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub common: EventCommon,
    pub kind: EventKind,
}

impl Event {
    pub fn line_number(&self) -> Option<u32> {
        self.common.line_number
    }

    pub fn biz_step_suffix(&self) -> Option<&str> {
        self.common.biz_step.as_deref().map(suffix)
    }

    pub fn disposition_suffix(&self) -> Option<&str> {
        self.common.disposition.as_deref().map(suffix)
    }

    /// EPCs this event carries for cross-event sequencing purposes
    /// (`epcList ∪ childEPCs`). TransformationEvent carries none — its
    /// input/output EPCs never enter sequencing state.
    pub fn sequencing_epcs(&self) -> &[EpcEntry] {
        match &self.kind {
            EventKind::ObjectEvent { epc_list, .. } => epc_list,
            EventKind::AggregationEvent { child_epcs, .. } => child_epcs,
            EventKind::TransactionEvent { epc_list, .. } => epc_list,
            EventKind::TransformationEvent { .. } => &[],
        }
    }

    /// Every EPC this event carries, across all of its EPC-valued fields
    /// (`epcList`, `childEPCs`, `inputEPCList`, `outputEPCList`). Used for
    /// the company-prefix union and per-event EPC format/authorization
    /// checks — broader than [`Event::sequencing_epcs`], which excludes
    /// TransformationEvent.
    pub fn all_epcs(&self) -> Vec<&EpcEntry> {
        match &self.kind {
            EventKind::ObjectEvent { epc_list, .. } => epc_list.iter().collect(),
            EventKind::AggregationEvent { child_epcs, .. } => child_epcs.iter().collect(),
            EventKind::TransactionEvent { epc_list, .. } => epc_list.iter().collect(),
            EventKind::TransformationEvent {
                input_epc_list,
                output_epc_list,
            } => input_epc_list.iter().chain(output_epc_list.iter()).collect(),
        }
    }
}

/// The last `:`-delimited segment of a CBV URN, e.g.
/// `urn:epcglobal:cbv:bizstep:shipping` -> `shipping`.
pub fn suffix(value: &str) -> &str {
    value.rsplit(':').next().unwrap_or(value)
}
