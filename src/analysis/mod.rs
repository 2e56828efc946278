//! Text classification and report generation.
//!
//! The classifier scans extracted text for keyword patterns across a
//! fixed category taxonomy; the report generator turns classifier output
//! and extraction statistics into the triage report.

mod classifier;
mod report;

pub use classifier::{classify, Category, Classification, Urgency};
pub use report::{batch_report, single_file_report, BatchStats};
