//! Triage report generation.
//!
//! Reports are deterministic given identical input: fixed header, one
//! finding line per nonzero category (label, count, first three matched
//! keywords), an urgency verdict, and a recommended action tied to the
//! verdict.

use super::classifier::{Category, Classification, Urgency};

/// How many matched keywords to sample into a finding line.
const KEYWORD_SAMPLE: usize = 3;

/// Aggregate statistics for the batch report header.
#[derive(Debug, Clone, Copy)]
pub struct BatchStats {
    pub total_files: usize,
    pub successful_files: usize,
    pub total_words: usize,
    pub average_confidence: f64,
}

/// Generate the analysis report for a single image's extracted text.
pub fn single_file_report(text: &str, classification: &Classification) -> String {
    if text.trim().is_empty() {
        return "No text found in image".to_string();
    }

    let mut lines = vec!["AUTOMATED OCR EVIDENCE ANALYSIS".to_string(), String::new()];

    if classification.is_empty() {
        lines.push("Content type: general text/document".to_string());
        lines.push("Relevance: requires manual review".to_string());
    } else {
        for (category, matched) in classification.iter() {
            if !matched.is_empty() {
                lines.push(finding_line(category, matched));
            }
        }
    }

    let urgency = Urgency::for_single(classification);
    lines.push(String::new());
    lines.push(format!("URGENCY LEVEL: {urgency}"));
    lines.push(format!("ACTION REQUIRED: {}", single_action(urgency)));

    lines.join("\n")
}

/// Generate the combined analysis report for a batch.
///
/// Classification here is over the combined text of all successful
/// files, not a merge of per-file classifications.
pub fn batch_report(stats: BatchStats, classification: &Classification) -> String {
    if stats.successful_files == 0 {
        return "No files processed successfully".to_string();
    }

    let mut lines = vec![
        "MULTI-FILE EVIDENCE ANALYSIS".to_string(),
        format!(
            "Files processed: {}/{}",
            stats.successful_files, stats.total_files
        ),
        format!("Total words extracted: {}", stats.total_words),
        format!("Average confidence: {:.1}%", stats.average_confidence),
        String::new(),
    ];

    if !classification.is_empty() {
        lines.push("DETECTED PATTERNS ACROSS ALL FILES:".to_string());
        for (category, matched) in classification.iter() {
            if !matched.is_empty() {
                lines.push(finding_line(category, matched));
            }
        }
        lines.push(String::new());
    }

    let urgency = Urgency::for_batch(classification);
    lines.push(format!("OVERALL URGENCY: {urgency}"));
    lines.push(format!("RECOMMENDATION: {}", batch_action(urgency)));

    lines.join("\n")
}

fn finding_line(category: Category, matched: &[&'static str]) -> String {
    let sample = matched
        .iter()
        .take(KEYWORD_SAMPLE)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}: {} {} ({})",
        category.label(),
        matched.len(),
        if matched.len() == 1 { "term" } else { "terms" },
        sample
    )
}

fn single_action(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "Immediate investigation recommended",
        Urgency::High => "Legal review recommended",
        Urgency::Standard => "Standard processing",
    }
}

fn batch_action(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "Immediate multi-file investigation required",
        Urgency::High => "Comprehensive legal document review needed",
        Urgency::Standard => "Standard multi-document processing",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify;

    #[test]
    fn test_empty_text_report() {
        let text = "";
        let report = single_file_report(text, &classify(text));
        assert_eq!(report, "No text found in image");
    }

    #[test]
    fn test_report_is_deterministic() {
        let text = "court order, contract dated march 2024";
        let classification = classify(text);
        assert_eq!(
            single_file_report(text, &classification),
            single_file_report(text, &classification)
        );
    }

    #[test]
    fn test_only_nonzero_categories_listed() {
        let text = "a contract was signed";
        let report = single_file_report(text, &classify(text));
        assert!(report.contains("DOCUMENT INDICATORS: 1 term (contract)"));
        assert!(!report.contains("CORRUPTION INDICATORS"));
        assert!(!report.contains("DATE REFERENCES"));
    }

    #[test]
    fn test_keyword_sample_limited_to_three() {
        let text = "court judge lawyer justice rights";
        let report = single_file_report(text, &classify(text));
        assert!(report.contains("LEGAL CONTENT: 5 terms (court, judge, lawyer)"));
    }

    #[test]
    fn test_no_pattern_report_mentions_manual_review() {
        let text = "nothing remarkable here";
        let report = single_file_report(text, &classify(text));
        assert!(report.contains("requires manual review"));
        assert!(report.contains("URGENCY LEVEL: STANDARD"));
        assert!(report.contains("Standard processing"));
    }

    #[test]
    fn test_critical_verdict_and_action() {
        let text = "evidence of fraud in the contract";
        let report = single_file_report(text, &classify(text));
        assert!(report.contains("URGENCY LEVEL: CRITICAL"));
        assert!(report.contains("Immediate investigation recommended"));
    }

    #[test]
    fn test_batch_report_header_and_thresholds() {
        let stats = BatchStats {
            total_files: 3,
            successful_files: 2,
            total_words: 123,
            average_confidence: 87.25,
        };
        let report = batch_report(stats, &classify("court judge lawyer"));
        assert!(report.contains("Files processed: 2/3"));
        assert!(report.contains("Total words extracted: 123"));
        assert!(report.contains("Average confidence: 87.2%"));
        assert!(report.contains("OVERALL URGENCY: HIGH"));
        assert!(report.contains("Comprehensive legal document review needed"));
    }

    #[test]
    fn test_batch_report_without_successes() {
        let stats = BatchStats {
            total_files: 2,
            successful_files: 0,
            total_words: 0,
            average_confidence: 0.0,
        };
        assert_eq!(
            batch_report(stats, &classify("")),
            "No files processed successfully"
        );
    }

    #[test]
    fn test_batch_two_legal_terms_stays_standard() {
        let stats = BatchStats {
            total_files: 1,
            successful_files: 1,
            total_words: 4,
            average_confidence: 90.0,
        };
        let report = batch_report(stats, &classify("court and judge"));
        assert!(report.contains("OVERALL URGENCY: STANDARD"));
    }
}
