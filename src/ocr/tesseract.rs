//! Tesseract OCR backend.
//!
//! Invokes the tesseract command line twice per image: once for plain
//! text and once for TSV output, which carries the per-token confidence
//! values the scoring step needs.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use super::backend::{EngineOutput, OcrBackend, OcrError};

/// Column index of the confidence value in tesseract TSV output.
const TSV_CONF_COLUMN: usize = 10;

/// Tesseract CLI backend.
pub struct TesseractBackend {
    language: String,
}

impl TesseractBackend {
    /// Create a backend with the default language ("eng").
    pub fn new() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }

    /// Create a backend for a specific tesseract language.
    pub fn with_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Run tesseract with the given trailing config arguments.
    fn run_tesseract(&self, image_path: &Path, extra: &[&str]) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .args(extra)
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        which::which("tesseract").is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "Tesseract is available".to_string()
        } else {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }

    fn recognize(&self, image_path: &Path) -> Result<EngineOutput, OcrError> {
        let start = Instant::now();
        let text = self.run_tesseract(image_path, &[])?;
        let tsv = self.run_tesseract(image_path, &["tsv"])?;
        let token_confidences = parse_tsv_confidences(&tsv);
        tracing::debug!(
            tokens = token_confidences.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "tesseract recognition complete"
        );
        Ok(EngineOutput {
            text,
            token_confidences,
        })
    }
}

/// Parse per-token confidence values out of tesseract TSV output.
///
/// The TSV has one row per detected element; column 10 is the confidence
/// (a float for word rows, -1 for structural page/block/line rows).
/// Rows that do not parse are skipped.
pub fn parse_tsv_confidences(tsv: &str) -> Vec<i32> {
    tsv.lines()
        .skip(1) // header row
        .filter_map(|line| {
            let field = line.split('\t').nth(TSV_CONF_COLUMN)?;
            field.trim().parse::<f32>().ok().map(|c| c.round() as i32)
        })
        .collect()
}
