//! Evidence submission records and the store abstraction.
//!
//! The store is an injected trait rather than process-wide mutable
//! state, so callers decide the lifetime of submitted evidence. Only an
//! in-memory implementation ships here; persistence is out of scope.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A submitted piece of evidence with its (possibly OCR-enhanced)
/// description.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    pub file_count: usize,
    pub image_names: Vec<String>,
}

/// Draft of an evidence record, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct EvidenceDraft {
    pub title: String,
    pub description: String,
    pub submitted_by: String,
    pub image_names: Vec<String>,
}

/// Storage seam for submitted evidence.
pub trait EvidenceStore: Send + Sync {
    /// Append a record, assigning it the next id.
    fn append(&self, draft: EvidenceDraft) -> EvidenceRecord;

    /// Find a record by id.
    fn find(&self, id: u64) -> Option<EvidenceRecord>;

    /// All records in submission order.
    fn all(&self) -> Vec<EvidenceRecord>;

    /// Remove every record.
    fn clear(&self);
}

/// In-memory evidence store.
#[derive(Default)]
pub struct MemoryEvidenceStore {
    records: Mutex<Vec<EvidenceRecord>>,
}

impl MemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvidenceStore for MemoryEvidenceStore {
    fn append(&self, draft: EvidenceDraft) -> EvidenceRecord {
        let mut records = self.records.lock().expect("evidence store poisoned");
        let record = EvidenceRecord {
            id: records.len() as u64 + 1,
            title: draft.title,
            description: draft.description,
            submitted_by: draft.submitted_by,
            submitted_at: Utc::now(),
            file_count: draft.image_names.len(),
            image_names: draft.image_names,
        };
        records.push(record.clone());
        record
    }

    fn find(&self, id: u64) -> Option<EvidenceRecord> {
        self.records
            .lock()
            .expect("evidence store poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    fn all(&self) -> Vec<EvidenceRecord> {
        self.records.lock().expect("evidence store poisoned").clone()
    }

    fn clear(&self) {
        self.records.lock().expect("evidence store poisoned").clear();
    }
}
