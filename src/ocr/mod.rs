//! OCR and image preparation.
//!
//! - Tesseract CLI backend for text extraction with per-token confidences
//! - Best-effort image preprocessing to improve recognition accuracy
//! - Thumbnail encoding for display surfaces
//!
//! The `OcrBackend` trait is the seam between the pipeline and the
//! engine; tests inject a stub backend through it.

mod backend;
pub mod preprocess;
mod tesseract;
pub mod thumbnail;

pub use backend::{EngineOutput, OcrBackend, OcrError};
pub use tesseract::TesseractBackend;
