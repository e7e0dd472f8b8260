//! Storage collaborator boundary. The engine itself never touches a
//! file or socket; this trait is the shape a submission service uses to
//! persist the original artifact alongside the engine's
//! [`crate::models::ValidationReport`]. Concrete S3/FTP backends are out
//! of scope — only this boundary and an in-memory implementation (for
//! tests and local development) live here.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::EpcisKgError;

/// Persists a submitted artifact and retrieves it by the location
/// returned from storing it.
pub trait SubmissionStore: Send + Sync {
    fn store(&self, bytes: &[u8], name: &str, supplier: &str) -> Result<String, EpcisKgError>;
    fn retrieve(&self, location: &str) -> Result<Vec<u8>, EpcisKgError>;
}

/// In-memory `SubmissionStore`, keyed by a generated location string.
/// Suitable for tests and for running the HTTP interface stub locally;
/// a real deployment replaces this with an S3/FTP-backed adapter
/// (explicitly out of scope here).
#[derive(Default)]
pub struct InMemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionStore for InMemoryStore {
    fn store(&self, bytes: &[u8], name: &str, supplier: &str) -> Result<String, EpcisKgError> {
        let location = format!("{supplier}/{}-{name}", uuid::Uuid::new_v4());
        self.objects
            .lock()
            .map_err(|_| EpcisKgError::Storage("submission store lock poisoned".to_string()))?
            .insert(location.clone(), bytes.to_vec());
        Ok(location)
    }

    fn retrieve(&self, location: &str) -> Result<Vec<u8>, EpcisKgError> {
        self.objects
            .lock()
            .map_err(|_| EpcisKgError::Storage("submission store lock poisoned".to_string()))?
            .get(location)
            .cloned()
            .ok_or_else(|| EpcisKgError::Storage(format!("no object at location: {location}")))
    }
}
