pub mod epcis;
pub mod report;

pub use epcis::{Event, EventCommon, EventKind};
pub use report::{Severity, ValidationError, ValidationReport};
