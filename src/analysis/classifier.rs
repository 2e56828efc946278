//! Keyword-pattern evidence classifier.
//!
//! Classification is case-insensitive substring containment against a
//! fixed keyword table, and existence-based: a keyword counts once no
//! matter how often it occurs in the text.

use serde::Serialize;

/// Evidence categories in the fixed taxonomy, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Documents,
    Legal,
    Corruption,
    Identity,
    Dates,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Documents,
        Category::Legal,
        Category::Corruption,
        Category::Identity,
        Category::Dates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Legal => "legal",
            Self::Corruption => "corruption",
            Self::Identity => "identity",
            Self::Dates => "dates",
        }
    }

    /// Fixed descriptive label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Documents => "DOCUMENT INDICATORS",
            Self::Legal => "LEGAL CONTENT",
            Self::Corruption => "CORRUPTION INDICATORS",
            Self::Identity => "AUTHENTICATION MARKERS",
            Self::Dates => "DATE REFERENCES",
        }
    }

    /// Keyword table for this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Documents => &[
                "certificate",
                "license",
                "permit",
                "contract",
                "agreement",
                "receipt",
                "invoice",
            ],
            Self::Legal => &[
                "court",
                "judge",
                "lawyer",
                "legal",
                "law",
                "justice",
                "rights",
                "violation",
                "complaint",
            ],
            Self::Corruption => &[
                "bribe",
                "corruption",
                "illegal",
                "fraud",
                "embezzlement",
                "kickback",
                "money laundering",
            ],
            Self::Identity => &[
                "signature",
                "stamp",
                "seal",
                "official",
                "authorized",
                "certified",
            ],
            Self::Dates => &[
                "date", "dated", "2024", "2025", "january", "february", "march", "april",
                "may", "june",
            ],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category keyword matches for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    matched: [(Category, Vec<&'static str>); 5],
}

impl Classification {
    /// Keywords matched for a category, in keyword-table order.
    pub fn matched(&self, category: Category) -> &[&'static str] {
        // The array is built in `Category::ALL` order.
        &self.matched[category as usize].1
    }

    /// Number of distinct keywords matched for a category.
    pub fn count(&self, category: Category) -> usize {
        self.matched(category).len()
    }

    /// True when no category matched anything.
    pub fn is_empty(&self) -> bool {
        self.matched.iter().all(|(_, kws)| kws.is_empty())
    }

    /// Categories with their matched keywords, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'static str])> {
        self.matched.iter().map(|(c, kws)| (*c, kws.as_slice()))
    }
}

/// Classify text against the evidence taxonomy.
///
/// Matching is case-insensitive substring containment on the whole text,
/// not tokenized matching. Idempotent: identical text yields identical
/// classification.
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    let matched = Category::ALL.map(|category| {
        let keywords = category
            .keywords()
            .iter()
            .copied()
            .filter(|kw| lowered.contains(kw))
            .collect();
        (category, keywords)
    });
    Classification { matched }
}

/// Triage urgency verdict. Ordering: `Critical > High > Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Standard,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Standard => "STANDARD",
        }
    }

    /// Single-file urgency policy: any corruption match is CRITICAL,
    /// otherwise any legal match at all is HIGH.
    pub fn for_single(classification: &Classification) -> Urgency {
        if classification.count(Category::Corruption) > 0 {
            Urgency::Critical
        } else if classification.count(Category::Legal) > 0 {
            Urgency::High
        } else {
            Urgency::Standard
        }
    }

    /// Batch urgency policy: any corruption match is CRITICAL, otherwise
    /// HIGH requires more than two distinct legal matches.
    ///
    /// The stricter legal threshold relative to [`Urgency::for_single`]
    /// is deliberate observed behavior; see DESIGN.md before unifying.
    pub fn for_batch(classification: &Classification) -> Urgency {
        if classification.count(Category::Corruption) > 0 {
            Urgency::Critical
        } else if classification.count(Category::Legal) > 2 {
            Urgency::High
        } else {
            Urgency::Standard
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
