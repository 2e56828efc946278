//! Collaborator seam for the external judgment generator.
//!
//! The pipeline does not call a language model itself; it prepares an
//! enhanced description (the submitted description plus the extraction
//! report) for an opaque generator to consume. Generator behavior, model
//! choice, and fallback wording are all outside this crate.

use crate::models::{BatchOutcome, FileOutcome};

/// Everything a judgment generator needs about one case.
#[derive(Debug, Clone)]
pub struct JudgmentContext<'a> {
    pub title: &'a str,
    /// Description, already enhanced with extraction results when OCR
    /// succeeded.
    pub description: &'a str,
    pub submitted_by: &'a str,
}

/// An external judgment generator.
pub trait JudgmentGenerator: Send + Sync {
    /// Produce a judgment for the given case context.
    fn generate(&self, context: &JudgmentContext<'_>) -> anyhow::Result<String>;
}

/// Append a single-file extraction report to a submitted description.
///
/// Only call this for successful extractions with nonempty text; the
/// caller keeps the original description otherwise.
pub fn enhance_description_single(description: &str, outcome: &FileOutcome) -> String {
    format!(
        "{description}\n\n---\n\nEXTRACTED TEXT FROM IMAGE EVIDENCE:\n\n{}\n\n---\n\n{}\n\n\
         OCR confidence: {:.1}%\nWords extracted: {}\nCharacters: {}",
        outcome.extracted_text,
        outcome.analysis,
        outcome.confidence_score,
        outcome.word_count,
        outcome.character_count,
    )
}

/// Append a batch extraction report to a submitted description.
pub fn enhance_description_batch(description: &str, batch: &BatchOutcome) -> String {
    format!(
        "{description}\n\n---\n\nMULTI-FILE OCR EXTRACTION RESULTS:\n\n\
         Files processed: {}/{}\nTotal words: {}\nAverage confidence: {:.1}%\n\n\
         {}\n\n---\n\n{}",
        batch.successful_files,
        batch.total_files,
        batch.total_words,
        batch.average_confidence,
        batch.combined_text,
        batch.combined_analysis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OcrOutcome;
    use crate::ocr::EngineOutput;

    #[test]
    fn test_single_enhancement_contains_all_sections() {
        let ocr = OcrOutcome::from_engine(EngineOutput {
            text: "signed contract".to_string(),
            token_confidences: vec![91, 88],
        });
        let outcome = FileOutcome::success(
            "scan.png".to_string(),
            &ocr,
            "analysis body".to_string(),
            None,
        );
        let enhanced = enhance_description_single("original description", &outcome);
        assert!(enhanced.starts_with("original description"));
        assert!(enhanced.contains("signed contract"));
        assert!(enhanced.contains("analysis body"));
        assert!(enhanced.contains("OCR confidence: 89.5%"));
        assert!(enhanced.contains("Words extracted: 2"));
    }
}
