//! Ambiguity detection and clarification prompts
//!
//! Six fixed patterns checked in priority order over the raw query and
//! the full, untruncated scored batch; the first detector that fires
//! wins and builds the clarification from its own question and example
//! templates. No detector firing means the batch needs no clarification.

use crate::types::{AmbiguityType, ClarificationResult, RankedDocument};

/// Queries that are a bare legal noun and nothing else.
const GENERIC_TERMS: &[&str] = &[
    "contract",
    "agreement",
    "document",
    "legal document",
    "legal form",
    "form",
    "template",
    "paperwork",
];

/// Short-query words that plausibly belong to two or more categories.
const MULTI_CATEGORY_WORDS: &[(&str, &[&str])] = &[
    ("sell", &["vehicle", "real-estate", "business"]),
    ("lease", &["real-estate", "vehicle"]),
    ("hire", &["employment", "business"]),
    ("buy", &["vehicle", "real-estate"]),
    ("partner", &["business", "family-law"]),
];

/// Distress wording with no legal subject attached.
const VAGUE_PHRASES: &[&str] = &[
    "legal problem",
    "legal issue",
    "need help",
    "what do i do",
    "what should i do",
    "i have a situation",
    "legal advice",
    "in trouble",
];

/// Terms that mean different documents in different contexts.
const CONTEXT_DEPENDENT_TERMS: &[&str] = &[
    "power of attorney",
    "will",
    "lease",
    "partnership",
    "custody",
];

/// Known multi-step processes, recognizable without a document named.
const PROCESS_PHRASES: &[&str] = &[
    "getting divorced",
    "getting a divorce",
    "starting a business",
    "starting an llc",
    "buying a house",
    "buying a home",
    "hiring employees",
    "hiring someone",
    "renting out",
    "getting married",
];

/// Nouns that show the user already has a document type in mind.
const DOCUMENT_NOUNS: &[&str] = &[
    "agreement",
    "contract",
    "form",
    "lease",
    "deed",
    "nda",
    "notice",
    "letter",
    "will",
    "settlement",
];

/// Top-3 confidence scores closer than this count as indistinct.
const UNCLEAR_SPREAD: u8 = 15;

struct Detector {
    kind: AmbiguityType,
    matches: fn(&str, &[RankedDocument]) -> bool,
}

/// The priority chain; evaluation stops at the first match.
const CHAIN: &[Detector] = &[
    Detector {
        kind: AmbiguityType::TooGeneric,
        matches: is_too_generic,
    },
    Detector {
        kind: AmbiguityType::MultipleCategories,
        matches: is_multiple_categories,
    },
    Detector {
        kind: AmbiguityType::VagueSituation,
        matches: is_vague_situation,
    },
    Detector {
        kind: AmbiguityType::UnclearResults,
        matches: is_unclear_results,
    },
    Detector {
        kind: AmbiguityType::NeedsContext,
        matches: is_needs_context,
    },
    Detector {
        kind: AmbiguityType::ProcessOriented,
        matches: is_process_oriented,
    },
];

/// Run the chain over one result batch.
///
/// `results` must be the full scored set, before rank truncation, so the
/// unclear-results detector sees everything the scorer kept.
pub fn analyze(query: &str, results: &[RankedDocument]) -> ClarificationResult {
    let normalized = query.trim().to_lowercase();

    for detector in CHAIN {
        if (detector.matches)(&normalized, results) {
            return build(detector.kind, &normalized, results);
        }
    }
    ClarificationResult::clear()
}

// ============================================================================
// Detectors
// ============================================================================

fn is_too_generic(query: &str, _results: &[RankedDocument]) -> bool {
    GENERIC_TERMS.iter().any(|t| query == *t)
}

fn is_multiple_categories(query: &str, _results: &[RankedDocument]) -> bool {
    if query.split_whitespace().count() > 3 {
        return false;
    }
    query
        .split_whitespace()
        .any(|word| MULTI_CATEGORY_WORDS.iter().any(|(w, _)| *w == word))
}

fn is_vague_situation(query: &str, _results: &[RankedDocument]) -> bool {
    VAGUE_PHRASES.iter().any(|p| query.contains(p))
}

fn is_unclear_results(_query: &str, results: &[RankedDocument]) -> bool {
    if results.len() < 3 {
        return false;
    }
    let top: Vec<&RankedDocument> = results.iter().take(3).collect();
    let high = top.iter().map(|r| r.confidence.score).max().unwrap_or(0);
    let low = top.iter().map(|r| r.confidence.score).min().unwrap_or(0);
    if high - low > UNCLEAR_SPREAD {
        return false;
    }
    let first_category = &top[0].document.category;
    top.iter().any(|r| &r.document.category != first_category)
}

fn is_needs_context(query: &str, _results: &[RankedDocument]) -> bool {
    CONTEXT_DEPENDENT_TERMS.iter().any(|t| query == *t)
}

fn is_process_oriented(query: &str, _results: &[RankedDocument]) -> bool {
    PROCESS_PHRASES.iter().any(|p| query.contains(p))
        && !DOCUMENT_NOUNS.iter().any(|n| query.contains(n))
}

// ============================================================================
// Clarification builders
// ============================================================================

fn build(
    kind: AmbiguityType,
    query: &str,
    results: &[RankedDocument],
) -> ClarificationResult {
    let (questions, examples) = templates(kind, query);
    ClarificationResult {
        is_ambiguous: true,
        ambiguity_type: Some(kind),
        questions,
        example_queries: examples,
        confidence_spread: top3_spread(results),
        candidate_categories: competing_categories(kind, query, results),
    }
}

fn templates(kind: AmbiguityType, query: &str) -> (Vec<String>, Vec<String>) {
    match kind {
        AmbiguityType::TooGeneric => (
            vec![
                format!("What situation do you need the {} for?", query),
                "Who are the parties involved?".to_string(),
            ],
            vec![
                "lease agreement for my apartment".to_string(),
                "contract for freelance design work".to_string(),
                "selling my car to a private buyer".to_string(),
            ],
        ),
        AmbiguityType::MultipleCategories => (
            vec![
                "Which area does this concern: a vehicle, property, a business, or something else?"
                    .to_string(),
            ],
            vec![
                "selling my car".to_string(),
                "selling my house".to_string(),
                "bringing a partner into my business".to_string(),
            ],
        ),
        AmbiguityType::VagueSituation => (
            vec![
                "Can you describe what happened in a sentence or two?".to_string(),
                "Is this about work, family, housing, or money?".to_string(),
            ],
            vec![
                "my landlord won't return my deposit".to_string(),
                "my business partner wants to leave".to_string(),
            ],
        ),
        AmbiguityType::UnclearResults => (
            vec![
                "Could you add a detail or two so I can narrow this down?".to_string(),
                "Is this for business or personal use?".to_string(),
            ],
            vec![
                "residential lease for a new tenant".to_string(),
                "nda for a new hire".to_string(),
            ],
        ),
        AmbiguityType::NeedsContext => (
            vec![
                format!("What should the {} cover?", query),
                "Who is it for?".to_string(),
            ],
            vec![
                "power of attorney for my elderly parent".to_string(),
                "will that covers my house and savings".to_string(),
                "lease for a two-bedroom apartment".to_string(),
            ],
        ),
        AmbiguityType::ProcessOriented => (
            vec![
                "Which step of the process are you at?".to_string(),
                "Do you already know which document you need?".to_string(),
            ],
            vec![
                "divorce settlement agreement".to_string(),
                "llc operating agreement".to_string(),
                "residential purchase agreement".to_string(),
            ],
        ),
    }
}

fn top3_spread(results: &[RankedDocument]) -> Option<u8> {
    if results.len() < 3 {
        return None;
    }
    let top: Vec<u8> = results.iter().take(3).map(|r| r.confidence.score).collect();
    let high = *top.iter().max().unwrap_or(&0);
    let low = *top.iter().min().unwrap_or(&0);
    Some(high - low)
}

fn competing_categories(
    kind: AmbiguityType,
    query: &str,
    results: &[RankedDocument],
) -> Vec<String> {
    if kind == AmbiguityType::MultipleCategories {
        for word in query.split_whitespace() {
            if let Some((_, categories)) =
                MULTI_CATEGORY_WORDS.iter().find(|(w, _)| *w == word)
            {
                return categories.iter().map(|c| c.to_string()).collect();
            }
        }
    }

    let mut categories = Vec::new();
    for ranked in results.iter().take(3) {
        if !categories.contains(&ranked.document.category) {
            categories.push(ranked.document.category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, ConfidenceTier, DocumentCandidate, LocalizedText};

    fn ranked(category: &str, name: &str, confidence: u8) -> RankedDocument {
        RankedDocument {
            document: DocumentCandidate {
                id: name.to_lowercase().replace(' ', "-"),
                category: category.to_string(),
                name: LocalizedText::new(name),
                description: LocalizedText::new("test"),
                keywords: Vec::new(),
            },
            confidence: Confidence {
                score: confidence,
                tier: ConfidenceTier::Fair,
                message: "Possible match, check the details".to_string(),
            },
            score: confidence as i32 * 4,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn test_bare_noun_is_too_generic() {
        let result = analyze("contract", &[]);
        assert!(result.is_ambiguous);
        assert_eq!(result.ambiguity_type, Some(AmbiguityType::TooGeneric));
        assert!(!result.questions.is_empty());
        assert!(result.example_queries.len() >= 2);
    }

    #[test]
    fn test_too_generic_requires_exact_match() {
        // "contract for plumbing work" is specific enough
        let result = analyze("contract for plumbing work", &[]);
        assert_ne!(result.ambiguity_type, Some(AmbiguityType::TooGeneric));
    }

    #[test]
    fn test_short_multi_category_word() {
        let result = analyze("want to sell", &[]);
        assert_eq!(
            result.ambiguity_type,
            Some(AmbiguityType::MultipleCategories)
        );
        assert!(result.candidate_categories.contains(&"vehicle".to_string()));
        assert!(result
            .candidate_categories
            .contains(&"real-estate".to_string()));
    }

    #[test]
    fn test_long_query_skips_multi_category() {
        let result = analyze("i want to sell my old pickup truck", &[]);
        assert_ne!(
            result.ambiguity_type,
            Some(AmbiguityType::MultipleCategories)
        );
    }

    #[test]
    fn test_vague_situation() {
        let result = analyze("i have a legal problem", &[]);
        assert_eq!(result.ambiguity_type, Some(AmbiguityType::VagueSituation));
    }

    #[test]
    fn test_unclear_results_needs_close_scores_and_mixed_categories() {
        let close_mixed = vec![
            ranked("vehicle", "Vehicle Bill of Sale", 40),
            ranked("real-estate", "Purchase Agreement", 38),
            ranked("business", "Sales Contract", 30),
        ];
        let result = analyze("transfer ownership papers", &close_mixed);
        assert_eq!(result.ambiguity_type, Some(AmbiguityType::UnclearResults));
        assert_eq!(result.confidence_spread, Some(10));

        let clear_winner = vec![
            ranked("vehicle", "Vehicle Bill of Sale", 90),
            ranked("real-estate", "Purchase Agreement", 40),
            ranked("business", "Sales Contract", 35),
        ];
        let result = analyze("transfer ownership papers", &clear_winner);
        assert!(!result.is_ambiguous);
    }

    #[test]
    fn test_unclear_results_same_category_is_fine() {
        let close_same = vec![
            ranked("vehicle", "Vehicle Bill of Sale", 40),
            ranked("vehicle", "Odometer Statement", 38),
            ranked("vehicle", "Title Transfer Form", 35),
        ];
        let result = analyze("transfer ownership papers", &close_same);
        assert!(!result.is_ambiguous);
    }

    #[test]
    fn test_needs_context_exact_term() {
        let result = analyze("power of attorney", &[]);
        assert_eq!(result.ambiguity_type, Some(AmbiguityType::NeedsContext));

        let specific = analyze("power of attorney for my mother", &[]);
        assert_ne!(specific.ambiguity_type, Some(AmbiguityType::NeedsContext));
    }

    #[test]
    fn test_process_oriented_without_document_noun() {
        let result = analyze("buying a house", &[]);
        assert_eq!(result.ambiguity_type, Some(AmbiguityType::ProcessOriented));

        let with_doc = analyze("buying a house purchase agreement", &[]);
        assert!(!with_doc.is_ambiguous);
    }

    #[test]
    fn test_priority_order_multi_category_beats_needs_context() {
        // "lease" is both a context-dependent term and a multi-category
        // word; the chain resolves it at the earlier detector.
        let result = analyze("lease", &[]);
        assert_eq!(
            result.ambiguity_type,
            Some(AmbiguityType::MultipleCategories)
        );
    }

    #[test]
    fn test_clear_query_not_ambiguous() {
        let result = analyze("residential lease agreement for my tenant", &[]);
        assert!(!result.is_ambiguous);
        assert!(result.questions.is_empty());
    }
}
