//! Configuration for the triage pipeline.
//!
//! Settings are loaded from an optional TOML file (`evitriage.toml` by
//! default, or the path in `EVITRIAGE_CONFIG`), with serde defaults for
//! everything so a missing file is not an error.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable naming an alternate config file path.
pub const CONFIG_PATH_ENV: &str = "EVITRIAGE_CONFIG";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "evitriage.toml";

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Maximum number of images accepted per batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Declared media types accepted for processing.
    #[serde(default = "default_allowed_media_types")]
    pub allowed_media_types: Vec<String>,
    /// Tesseract language setting (e.g. "eng").
    #[serde(default = "default_language")]
    pub tesseract_language: String,
    /// Maximum thumbnail edge length in pixels.
    #[serde(default = "default_thumbnail_bound")]
    pub thumbnail_bound: u32,
    /// JPEG quality for thumbnails (1-100).
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: u8,
    /// Number of blocking OCR workers for batch processing.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_max_batch_size() -> usize {
    10
}

fn default_allowed_media_types() -> Vec<String> {
    [
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/gif",
        "image/bmp",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_thumbnail_bound() -> u32 {
    150
}

fn default_thumbnail_quality() -> u8 {
    85
}

fn default_workers() -> usize {
    2
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            allowed_media_types: default_allowed_media_types(),
            tesseract_language: default_language(),
            thumbnail_bound: default_thumbnail_bound(),
            thumbnail_quality: default_thumbnail_quality(),
            workers: default_workers(),
        }
    }
}

impl TriageConfig {
    /// Load configuration from an explicit path, the `EVITRIAGE_CONFIG`
    /// environment variable, or the default file name. A missing file
    /// yields the defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let candidate = path
            .map(|p| p.to_path_buf())
            .or_else(|| env_path.map(std::path::PathBuf::from))
            .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_CONFIG_FILE));

        if !candidate.exists() {
            tracing::debug!(path = %candidate.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&candidate)?;
        let config: Self = toml::from_str(&raw)?;
        tracing::info!(path = %candidate.display(), "loaded configuration");
        Ok(config)
    }

    /// Whether a declared media type is accepted for processing.
    pub fn is_media_type_allowed(&self, media_type: &str) -> bool {
        let normalized = media_type.to_ascii_lowercase();
        self.allowed_media_types.iter().any(|t| t == &normalized)
    }

    /// Set the tesseract language.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.tesseract_language = lang.to_string();
        self
    }

    /// Set the batch worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.max_batch_size, 10);
        assert_eq!(config.thumbnail_bound, 150);
        assert!(config.is_media_type_allowed("image/png"));
        assert!(config.is_media_type_allowed("IMAGE/JPEG"));
        assert!(!config.is_media_type_allowed("application/pdf"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TriageConfig = toml::from_str("tesseract_language = \"deu\"").unwrap();
        assert_eq!(config.tesseract_language, "deu");
        assert_eq!(config.max_batch_size, 10);
        assert_eq!(config.workers, 2);
    }
}
