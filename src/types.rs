//! Core types for the docscout discovery engine
//!
//! Everything the engine consumes or produces crosses a JSON boundary in
//! the host product, so all public types derive serde both ways.

use serde::{Deserialize, Serialize};

/// Corpus locales supported by the host product.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// A free-text discovery request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRequest {
    /// The user's situation in their own words.
    pub text: String,
    #[serde(default)]
    pub locale: Locale,
}

impl DiscoveryRequest {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            locale: Locale::En,
        }
    }

    pub fn with_locale(text: &str, locale: Locale) -> Self {
        Self {
            text: text.to_string(),
            locale,
        }
    }
}

/// Text with an English source and optional Spanish translation.
///
/// A missing translation falls back to English rather than failing the
/// candidate (the corpus is only partially translated at any given time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es: Option<String>,
}

impl LocalizedText {
    pub fn new(en: &str) -> Self {
        Self {
            en: en.to_string(),
            es: None,
        }
    }

    pub fn bilingual(en: &str, es: &str) -> Self {
        Self {
            en: en.to_string(),
            es: Some(es.to_string()),
        }
    }

    /// Resolve for a locale, falling back to English.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Es => self.es.as_deref().unwrap_or(&self.en),
        }
    }
}

/// One template entry from the document corpus.
///
/// Supplied by the external document library; read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCandidate {
    pub id: String,
    /// Corpus category slug, e.g. "family-law" or "real-estate".
    pub category: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl DocumentCandidate {
    /// Locale-resolved name, lowercased for matching.
    pub fn name_text(&self, locale: Locale) -> String {
        self.name.get(locale).to_lowercase()
    }

    /// Locale-resolved description, lowercased for matching.
    pub fn description_text(&self, locale: Locale) -> String {
        self.description.get(locale).to_lowercase()
    }

    /// Every searchable field joined into one lowercased haystack.
    pub fn haystack(&self, locale: Locale) -> String {
        let mut text = String::new();
        text.push_str(&self.name_text(locale));
        text.push(' ');
        text.push_str(&self.description_text(locale));
        text.push(' ');
        text.push_str(&self.category.to_lowercase());
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(&keyword.to_lowercase());
        }
        text
    }

    /// Name text for matching: always the English name, with the
    /// requested locale's translation appended when one exists. The
    /// matching vocabulary is English; translations add, never replace.
    pub fn search_name(&self, locale: Locale) -> String {
        let mut text = self.name.en.to_lowercase();
        if locale == Locale::Es {
            if let Some(es) = &self.name.es {
                text.push(' ');
                text.push_str(&es.to_lowercase());
            }
        }
        text
    }

    /// Full haystack for matching, same union rule as `search_name`.
    pub fn search_text(&self, locale: Locale) -> String {
        let mut text = self.haystack(Locale::En);
        if locale == Locale::Es {
            for field in [&self.name, &self.description] {
                if let Some(es) = &field.es {
                    text.push(' ');
                    text.push_str(&es.to_lowercase());
                }
            }
        }
        text
    }
}

/// One scoring contribution, kept in the order it was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reason {
    /// Stable id of the rule that fired, e.g. "phrase-context".
    pub rule: String,
    /// Signed contribution to the raw score.
    pub delta: i32,
    /// Human-readable explanation shown in the UI.
    pub text: String,
}

impl Reason {
    pub fn new(rule: &str, delta: i32, text: String) -> Self {
        Self {
            rule: rule.to_string(),
            delta,
            text,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.delta < 0
    }
}

/// A candidate that survived scoring with a strictly positive total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub document: DocumentCandidate,
    pub score: i32,
    pub reasons: Vec<Reason>,
}

/// Discrete confidence tiers, strongest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Excellent,
    Good,
    Fair,
    Weak,
    Poor,
}

impl ConfidenceTier {
    /// Sort rank, higher is better.
    pub fn rank(&self) -> u8 {
        match self {
            ConfidenceTier::Excellent => 4,
            ConfidenceTier::Good => 3,
            ConfidenceTier::Fair => 2,
            ConfidenceTier::Weak => 1,
            ConfidenceTier::Poor => 0,
        }
    }
}

/// How sure the engine is that a candidate fits the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confidence {
    /// 5-95 inclusive.
    pub score: u8,
    pub tier: ConfidenceTier,
    pub message: String,
}

/// The fixed ambiguity patterns, in detection priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityType {
    TooGeneric,
    MultipleCategories,
    VagueSituation,
    UnclearResults,
    NeedsContext,
    ProcessOriented,
}

/// Clarification output attached uniformly to one result batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarificationResult {
    pub is_ambiguous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambiguity_type: Option<AmbiguityType>,
    pub questions: Vec<String>,
    pub example_queries: Vec<String>,
    /// Spread of the top-3 confidence scores, when three results exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_spread: Option<u8>,
    /// Categories competing for the query.
    pub candidate_categories: Vec<String>,
}

impl ClarificationResult {
    /// The unambiguous placeholder for batches that need no clarification.
    pub fn clear() -> Self {
        Self {
            is_ambiguous: false,
            ambiguity_type: None,
            questions: Vec::new(),
            example_queries: Vec::new(),
            confidence_spread: None,
            candidate_categories: Vec::new(),
        }
    }
}

/// One ranked entry of a discovery result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDocument {
    pub document: DocumentCandidate,
    pub confidence: Confidence,
    /// Raw heuristic score, kept for the UI's "why this?" panel.
    pub score: i32,
    pub reasons: Vec<Reason>,
}

/// Full response to one discovery request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub ranked: Vec<RankedDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification: Option<ClarificationResult>,
}

impl DiscoveryResult {
    pub fn empty() -> Self {
        Self {
            ranked: Vec::new(),
            clarification: None,
        }
    }
}
