//! Evidence triage service.
//!
//! Orchestrates the full pipeline for single images and batches:
//! validation, preprocessing, OCR, classification, report generation,
//! and batch aggregation. Per-file OCR failures never abort a batch;
//! only request-level validation rejects wholesale.

use std::io::Write;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::analysis::{batch_report, classify, single_file_report, BatchStats};
use crate::config::TriageConfig;
use crate::judge::{enhance_description_batch, enhance_description_single};
use crate::models::{
    BatchOutcome, EvidenceDraft, EvidenceRecord, EvidenceStore, FileOutcome, OcrOutcome,
    SourceImage,
};
use crate::ocr::{preprocess, thumbnail, OcrBackend};

/// Width of the separator rule between files in combined batch text.
const SEPARATOR_WIDTH: usize = 50;

/// Request-level validation errors. These reject the whole request;
/// per-file processing errors are carried inside [`FileOutcome`]s
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Too many files: {given} (maximum {max})")]
    BatchTooLarge { given: usize, max: usize },
}

/// The triage pipeline, generic over the OCR backend.
///
/// Cloning is cheap (the backend is shared); batch workers each hold a
/// clone.
#[derive(Clone)]
pub struct TriageService {
    backend: Arc<dyn OcrBackend>,
    config: TriageConfig,
}

impl TriageService {
    pub fn new(backend: Arc<dyn OcrBackend>, config: TriageConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Validate a batch request before any image is touched.
    pub fn validate(&self, images: &[SourceImage]) -> Result<(), TriageError> {
        if images.len() > self.config.max_batch_size {
            return Err(TriageError::BatchTooLarge {
                given: images.len(),
                max: self.config.max_batch_size,
            });
        }
        for image in images {
            if !self.config.is_media_type_allowed(&image.media_type) {
                return Err(TriageError::UnsupportedMediaType(image.media_type.clone()));
            }
        }
        Ok(())
    }

    /// Run the full pipeline on one image.
    ///
    /// Blocking: decodes and preprocesses in memory and shells out to the
    /// OCR engine. Batch callers wrap this in `spawn_blocking`.
    pub fn process_image(&self, image: &SourceImage) -> FileOutcome {
        let decoded = match image::load_from_memory(&image.bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(file = %image.file_name, error = %e, "image decode failed");
                return FileOutcome::failure(image.file_name.clone(), e.to_string(), None);
            }
        };

        // Thumbnail comes from the original image, not the enhanced one.
        let thumb = thumbnail::encode(
            &decoded,
            self.config.thumbnail_bound,
            self.config.thumbnail_quality,
        );

        let enhanced = preprocess::enhance_for_ocr(&decoded);
        // Enhanced bytes when the encoder cooperates, original otherwise.
        let ocr_input = preprocess::encode_png(&enhanced).unwrap_or_else(|| image.bytes.clone());

        let engine_output = match self.write_scratch(&ocr_input).and_then(|scratch| {
            self.backend
                .recognize(scratch.path())
                .map_err(|e| e.to_string())
        }) {
            Ok(output) => output,
            Err(error) => {
                tracing::warn!(file = %image.file_name, %error, "OCR failed");
                return FileOutcome::failure(image.file_name.clone(), error, thumb);
            }
        };

        let ocr = OcrOutcome::from_engine(engine_output);
        let analysis = single_file_report(&ocr.text, &classify(&ocr.text));
        tracing::info!(
            file = %image.file_name,
            words = ocr.word_count,
            confidence = ocr.confidence_score(),
            "image processed"
        );
        FileOutcome::success(image.file_name.clone(), &ocr, analysis, thumb)
    }

    /// Run the pipeline on one image after media-type validation.
    pub fn process_single(&self, image: &SourceImage) -> Result<FileOutcome, TriageError> {
        self.validate(std::slice::from_ref(image))?;
        Ok(self.process_image(image))
    }

    /// Process a batch of images with bounded parallelism.
    ///
    /// `results[i]` corresponds to `images[i]` regardless of completion
    /// order. An empty batch is valid and yields all-zero aggregates.
    pub async fn process_batch(
        &self,
        images: Vec<SourceImage>,
    ) -> Result<BatchOutcome, TriageError> {
        self.validate(&images)?;

        let workers = self.config.workers.max(1);
        let results: Vec<FileOutcome> = stream::iter(images.into_iter().map(|image| {
            let service = self.clone();
            async move {
                let file_name = image.file_name.clone();
                tokio::task::spawn_blocking(move || service.process_image(&image))
                    .await
                    .unwrap_or_else(|e| FileOutcome::failure(file_name, e.to_string(), None))
            }
        }))
        .buffered(workers)
        .collect()
        .await;

        Ok(self.aggregate(results))
    }

    /// Fold per-file outcomes into the batch result.
    fn aggregate(&self, results: Vec<FileOutcome>) -> BatchOutcome {
        let total_files = results.len();
        let successes: Vec<&FileOutcome> = results.iter().filter(|r| r.success).collect();
        let successful_files = successes.len();
        let failed_files = total_files - successful_files;

        let combined_text = successes
            .iter()
            .map(|r| {
                format!(
                    "FILE: {}\n{}\n{}",
                    r.file_name,
                    r.extracted_text,
                    "=".repeat(SEPARATOR_WIDTH)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let total_words: usize = successes.iter().map(|r| r.word_count).sum();
        let total_characters: usize = successes.iter().map(|r| r.character_count).sum();
        let average_confidence = if successful_files > 0 {
            successes.iter().map(|r| r.confidence_score).sum::<f64>() / successful_files as f64
        } else {
            0.0
        };

        let stats = BatchStats {
            total_files,
            successful_files,
            total_words,
            average_confidence,
        };
        let combined_analysis = batch_report(stats, &classify(&combined_text));

        tracing::info!(
            total = total_files,
            succeeded = successful_files,
            failed = failed_files,
            "batch complete"
        );

        BatchOutcome {
            success: successful_files > 0,
            total_files,
            successful_files,
            failed_files,
            results,
            combined_text,
            average_confidence,
            combined_analysis,
            total_words,
            total_characters,
        }
    }

    /// Submit evidence: run the pipeline over the attached images and
    /// store the record with an OCR-enhanced description.
    ///
    /// OCR failure never blocks submission; the record keeps the original
    /// description when nothing was extracted.
    pub async fn submit_evidence(
        &self,
        store: &dyn EvidenceStore,
        title: String,
        description: String,
        submitted_by: String,
        images: Vec<SourceImage>,
    ) -> Result<EvidenceRecord, TriageError> {
        let image_names: Vec<String> = images.iter().map(|i| i.file_name.clone()).collect();

        let description = match images.len() {
            0 => description,
            1 => {
                let outcome = self.process_single(&images[0])?;
                if outcome.success && !outcome.extracted_text.is_empty() {
                    enhance_description_single(&description, &outcome)
                } else {
                    description
                }
            }
            _ => {
                let batch = self.process_batch(images).await?;
                if batch.successful_files > 0 {
                    enhance_description_batch(&description, &batch)
                } else {
                    description
                }
            }
        };

        let record = store.append(EvidenceDraft {
            title,
            description,
            submitted_by,
            image_names,
        });
        tracing::info!(id = record.id, files = record.file_count, "evidence submitted");
        Ok(record)
    }

    /// Write OCR input bytes to a scratch file the engine can read.
    fn write_scratch(&self, bytes: &[u8]) -> Result<tempfile::NamedTempFile, String> {
        let mut scratch = tempfile::Builder::new()
            .prefix("evitriage-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| e.to_string())?;
        scratch.write_all(bytes).map_err(|e| e.to_string())?;
        scratch.flush().map_err(|e| e.to_string())?;
        Ok(scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{EngineOutput, OcrError};
    use std::path::Path;

    struct FixedBackend {
        text: &'static str,
        confidences: Vec<i32>,
    }

    impl OcrBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn availability_hint(&self) -> String {
            "always available".to_string()
        }
        fn recognize(&self, _image_path: &Path) -> Result<EngineOutput, OcrError> {
            Ok(EngineOutput {
                text: self.text.to_string(),
                token_confidences: self.confidences.clone(),
            })
        }
    }

    fn service(text: &'static str, confidences: Vec<i32>) -> Arc<TriageService> {
        Arc::new(TriageService::new(
            Arc::new(FixedBackend { text, confidences }),
            TriageConfig::default(),
        ))
    }

    fn png_image(name: &str) -> SourceImage {
        let png = preprocess::encode_png(&image::DynamicImage::ImageRgb8(
            image::RgbImage::from_pixel(8, 8, image::Rgb([128, 128, 128])),
        ))
        .unwrap();
        SourceImage::new(name, "image/png", png)
    }

    #[test]
    fn test_media_type_validation() {
        let service = service("", vec![]);
        let pdf = SourceImage::new("doc.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(matches!(
            service.process_single(&pdf),
            Err(TriageError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_batch_size_validation() {
        let service = service("", vec![]);
        let images: Vec<SourceImage> = (0..11).map(|i| png_image(&format!("{i}.png"))).collect();
        assert!(matches!(
            service.validate(&images),
            Err(TriageError::BatchTooLarge { given: 11, max: 10 })
        ));
    }

    #[test]
    fn test_undecodable_image_is_per_file_failure() {
        let service = service("ignored", vec![90]);
        let garbage = SourceImage::new("bad.png", "image/png", b"not a png".to_vec());
        let outcome = service.process_image(&garbage);
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
        assert!(outcome.analysis.starts_with("OCR processing error:"));
    }

    #[test]
    fn test_successful_image_carries_thumbnail_and_analysis() {
        let service = service("contract signed by the court", vec![90, 85, 92, 88, 91]);
        let outcome = service.process_image(&png_image("scan.png"));
        assert!(outcome.success);
        assert_eq!(outcome.extracted_text, "contract signed by the court");
        assert_eq!(outcome.word_count, 5);
        assert!(outcome.thumbnail.unwrap().starts_with("data:image/jpeg;base64,"));
        assert!(outcome.analysis.contains("URGENCY LEVEL: HIGH"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_well_formed() {
        let service = service("", vec![]);
        let batch = service.process_batch(Vec::new()).await.unwrap();
        assert!(!batch.success);
        assert_eq!(batch.total_files, 0);
        assert_eq!(batch.average_confidence, 0.0);
        assert!(batch.combined_text.is_empty());
        assert_eq!(batch.combined_analysis, "No files processed successfully");
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let service = service("court ruling", vec![80, 90]);
        let images = vec![
            png_image("first.png"),
            SourceImage::new("broken.png", "image/png", b"garbage".to_vec()),
            png_image("third.png"),
        ];
        let batch = service.process_batch(images).await.unwrap();

        assert!(batch.success);
        assert_eq!(batch.total_files, 3);
        assert_eq!(batch.successful_files, 2);
        assert_eq!(batch.failed_files, 1);
        assert_eq!(batch.results[0].file_name, "first.png");
        assert!(!batch.results[1].success);
        assert_eq!(batch.results[2].file_name, "third.png");

        // Aggregates cover successful files only.
        assert_eq!(batch.total_words, 4);
        assert!((batch.average_confidence - 85.0).abs() < 1e-9);
        assert!(batch.combined_text.contains("FILE: first.png"));
        assert!(!batch.combined_text.contains("broken.png"));
        assert!(batch.combined_text.contains(&"=".repeat(50)));
    }

    #[tokio::test]
    async fn test_submit_enhances_description() {
        let service = service("official seal on the contract", vec![95, 91, 90, 88, 93]);
        let store = crate::models::MemoryEvidenceStore::new();
        let record = service
            .submit_evidence(
                &store,
                "Permit irregularity".to_string(),
                "Photographed at the registry office".to_string(),
                "field-team".to_string(),
                vec![png_image("registry.png")],
            )
            .await
            .unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.file_count, 1);
        assert!(record.description.starts_with("Photographed at the registry office"));
        assert!(record.description.contains("EXTRACTED TEXT FROM IMAGE EVIDENCE:"));
        assert!(record.description.contains("official seal on the contract"));
    }

    #[tokio::test]
    async fn test_submit_without_images_keeps_description() {
        let service = service("", vec![]);
        let store = crate::models::MemoryEvidenceStore::new();
        let record = service
            .submit_evidence(
                &store,
                "Verbal report".to_string(),
                "No photographic evidence".to_string(),
                "field-team".to_string(),
                Vec::new(),
            )
            .await
            .unwrap();
        assert_eq!(record.description, "No photographic evidence");
        assert_eq!(record.file_count, 0);
    }
}
