//! Service layer.
//!
//! Services own the pipeline orchestration and are separated from CLI
//! concerns; they return result types for the caller to render.

mod triage;

pub use triage::{TriageError, TriageService};
