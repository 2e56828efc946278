//! Data model for the triage pipeline.
//!
//! All pipeline entities are created and dropped within a single
//! invocation; nothing here persists or is shared across invocations.

mod evidence;
mod outcome;

pub use evidence::{EvidenceDraft, EvidenceRecord, EvidenceStore, MemoryEvidenceStore};
pub use outcome::{BatchOutcome, FileOutcome, OcrOutcome, SourceImage};
