//! Pipeline input and result types.

use std::path::Path;

use serde::Serialize;

use crate::ocr::EngineOutput;

/// A raw evidence image supplied by the caller.
///
/// Ephemeral: owned by the pipeline invocation that processes it and
/// discarded afterwards.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Caller-supplied file name, used in reports and combined text.
    pub file_name: String,
    /// Declared media type (e.g. "image/png").
    pub media_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl SourceImage {
    /// Create a source image from in-memory bytes.
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a source image from disk, sniffing the media type from the
    /// file content and falling back to the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let media_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| {
                mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            file_name,
            media_type,
            bytes,
        })
    }
}

/// Text extraction result for one image.
///
/// Invariants: `word_count` equals the whitespace-delimited token count
/// of `text`, and `character_count` equals its length in Unicode scalar
/// values. `token_confidences` holds only values in `[0, 100]`.
#[derive(Debug, Clone, Default)]
pub struct OcrOutcome {
    /// Extracted text, trimmed of surrounding whitespace.
    pub text: String,
    /// Per-token confidence values reported by the engine.
    pub token_confidences: Vec<i32>,
    /// Whitespace-delimited token count of `text`.
    pub word_count: usize,
    /// Length of `text` in Unicode scalar values.
    pub character_count: usize,
}

impl OcrOutcome {
    /// Build an outcome from raw engine output.
    ///
    /// Structural rows (confidence < 0) are dropped; anything the engine
    /// reports above 100 is clamped.
    pub fn from_engine(output: EngineOutput) -> Self {
        let text = output.text.trim().to_string();
        let token_confidences = output
            .token_confidences
            .into_iter()
            .filter(|c| *c >= 0)
            .map(|c| c.min(100))
            .collect();
        let word_count = text.split_whitespace().count();
        let character_count = text.chars().count();
        Self {
            text,
            token_confidences,
            word_count,
            character_count,
        }
    }

    /// Mean of per-token confidences greater than zero, or 0.0 when no
    /// token was detected with positive confidence. Always in [0, 100].
    pub fn confidence_score(&self) -> f64 {
        let detected: Vec<i32> = self
            .token_confidences
            .iter()
            .copied()
            .filter(|c| *c > 0)
            .collect();
        if detected.is_empty() {
            return 0.0;
        }
        detected.iter().map(|c| *c as f64).sum::<f64>() / detected.len() as f64
    }
}

/// Per-image pipeline result.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub success: bool,
    pub file_name: String,
    pub extracted_text: String,
    pub confidence_score: f64,
    pub analysis: String,
    pub word_count: usize,
    pub character_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    /// Successful extraction result.
    pub fn success(
        file_name: String,
        ocr: &OcrOutcome,
        analysis: String,
        thumbnail: Option<String>,
    ) -> Self {
        Self {
            success: true,
            file_name,
            extracted_text: ocr.text.clone(),
            confidence_score: ocr.confidence_score(),
            analysis,
            word_count: ocr.word_count,
            character_count: ocr.character_count,
            thumbnail,
            error: None,
        }
    }

    /// Failed extraction result carrying the error text.
    pub fn failure(file_name: String, error: String, thumbnail: Option<String>) -> Self {
        Self {
            success: false,
            file_name,
            extracted_text: String::new(),
            confidence_score: 0.0,
            analysis: format!("OCR processing error: {error}"),
            word_count: 0,
            character_count: 0,
            thumbnail,
            error: Some(error),
        }
    }
}

/// Aggregated result of a batch invocation.
///
/// `results[i]` always corresponds to the i-th input image; aggregate
/// statistics cover successful files only.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub success: bool,
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub results: Vec<FileOutcome>,
    pub combined_text: String,
    pub average_confidence: f64,
    pub combined_analysis: String,
    pub total_words: usize,
    pub total_characters: usize,
}
