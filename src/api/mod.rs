//! HTTP interface stub for [`crate::validate_document`]. Thin: decoding
//! the body, calling the engine, and serializing the resulting
//! [`crate::models::ValidationReport`].

pub mod server;
