//! Evitriage - evidence image triage pipeline.
//!
//! Ingests scanned or photographed evidence images, extracts text with
//! OCR, classifies the text against a fixed taxonomy of evidence
//! categories, and produces a human-readable triage report with an
//! urgency rating. Batches of images are processed with partial-failure
//! semantics: one bad image never blocks the rest.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod judge;
pub mod models;
pub mod ocr;
pub mod services;
