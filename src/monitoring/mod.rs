//! Ambient observability for the callers of [`crate::validate_document`]
//! (the CLI and the HTTP interface stub). The engine itself performs no
//! logging or I/O; these modules are invoked by the orchestrator's
//! callers only.

pub mod logging;
pub mod metrics;
