//! OCR backend abstraction.

use std::path::Path;

use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw engine output for one image.
///
/// `token_confidences` is ordered to match the engine's token stream and
/// may contain negative values for structural rows; those are filtered
/// when an [`crate::models::OcrOutcome`] is built.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Plain extracted text.
    pub text: String,
    /// Per-token confidence values as reported by the engine.
    pub token_confidences: Vec<i32>,
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Short identifier for logs and reports.
    fn name(&self) -> &'static str;

    /// Check if this backend is able to run (binary installed, models present).
    fn is_available(&self) -> bool;

    /// Description of what is needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Extract text and per-token confidences from an image file.
    fn recognize(&self, image_path: &Path) -> Result<EngineOutput, OcrError>;
}
