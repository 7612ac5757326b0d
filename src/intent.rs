//! Intent classification and the hard veto filter
//!
//! `detect_intent` runs ordered substring checks against the five
//! canonical intents; the first hit wins. Each intent then carries a
//! fixed veto list: candidates whose text contains a veto keyword are
//! removed before scoring ever sees them, independent of score. A second,
//! score-based exclusion layer lives in the domain-override rules; both
//! are kept deliberately.

use crate::types::{DocumentCandidate, Locale};
use serde::{Deserialize, Serialize};

/// The dominant intent detected in a query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Divorce,
    Vehicle,
    Business,
    Employment,
    RealEstate,
    #[default]
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Divorce => "divorce",
            Intent::Vehicle => "vehicle",
            Intent::Business => "business",
            Intent::Employment => "employment",
            Intent::RealEstate => "real-estate",
            Intent::General => "general",
        }
    }

    /// The corpus category this intent most strongly implies.
    pub fn expected_category(&self) -> Option<&'static str> {
        match self {
            Intent::Divorce => Some("family-law"),
            Intent::Vehicle => Some("vehicle"),
            Intent::Business => Some("business"),
            Intent::Employment => Some("employment"),
            Intent::RealEstate => Some("real-estate"),
            Intent::General => None,
        }
    }

    /// Categories incompatible with this intent; a candidate in one of
    /// them takes the category-exclusion penalty.
    pub fn excluded_categories(&self) -> &'static [&'static str] {
        match self {
            Intent::Divorce => &["business", "vehicle", "employment"],
            Intent::Vehicle => &["family-law", "employment"],
            Intent::Business => &["family-law", "vehicle"],
            Intent::Employment => &["family-law", "vehicle"],
            Intent::RealEstate => &["family-law", "vehicle"],
            Intent::General => &[],
        }
    }
}

/// Ordered trigger lists; first match wins, else General.
const INTENT_TRIGGERS: &[(Intent, &[&str])] = &[
    (
        Intent::Divorce,
        &[
            "divorce",
            "divorced",
            "custody",
            "separation",
            "separating",
            "alimony",
            "child support",
            "splitting up",
            "ending my marriage",
            "prenup",
        ],
    ),
    (
        Intent::Vehicle,
        &[
            "car",
            "vehicle",
            "auto",
            "truck",
            "motorcycle",
            "odometer",
        ],
    ),
    (
        Intent::Business,
        &[
            "llc",
            "business",
            "company",
            "corporation",
            "incorporate",
            "startup",
            "partnership",
        ],
    ),
    (
        Intent::Employment,
        &[
            "employee",
            "employment",
            "hiring",
            "hire",
            "job",
            "contractor",
            "salary",
            "severance",
            "fired",
        ],
    ),
    (
        Intent::RealEstate,
        &[
            "house",
            "home",
            "property",
            "real estate",
            "apartment",
            "lease",
            "rent",
            "landlord",
            "tenant",
            "eviction",
        ],
    ),
];

/// Per-intent veto keywords: a candidate containing any of these is
/// lexically associated with an incompatible category and dropped.
const VETO_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Divorce,
        &[
            "llc",
            "incorporation",
            "business formation",
            "operating agreement",
            "articles of organization",
            "vehicle",
            "bill of sale",
            "odometer",
        ],
    ),
    (
        Intent::Vehicle,
        &[
            "divorce",
            "custody",
            "alimony",
            "prenuptial",
            "severance",
        ],
    ),
    (
        Intent::Business,
        &["divorce", "custody", "alimony", "prenuptial"],
    ),
    (
        Intent::Employment,
        &["divorce", "custody", "alimony", "odometer"],
    ),
    (
        Intent::RealEstate,
        &["divorce", "custody", "alimony", "odometer"],
    ),
];

/// Keyword table for the primary-category snapshot recorded into session
/// history. Broader than the intent triggers; best keyword count wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "family-law",
        &[
            "divorce", "custody", "alimony", "marriage", "spouse", "child support",
            "prenup",
        ],
    ),
    (
        "vehicle",
        &["car", "vehicle", "auto", "truck", "motorcycle", "odometer"],
    ),
    (
        "business",
        &[
            "llc", "business", "company", "corporation", "partnership", "startup",
        ],
    ),
    (
        "employment",
        &[
            "employee", "employment", "hiring", "job", "contractor", "severance",
            "non-compete",
        ],
    ),
    (
        "real-estate",
        &[
            "house", "home", "property", "apartment", "lease", "rent", "landlord",
            "tenant",
        ],
    ),
    (
        "estate-planning",
        &["will", "testament", "power of attorney", "estate", "inheritance"],
    ),
];

/// Detect the dominant intent for a query. First trigger match wins.
pub fn detect_intent(query_lower: &str) -> Intent {
    for (intent, triggers) in INTENT_TRIGGERS {
        if triggers.iter().any(|t| query_lower.contains(t)) {
            return *intent;
        }
    }
    Intent::General
}

/// Hard-remove candidates lexically tied to categories incompatible with
/// the detected intent. Runs before scoring; score cannot rescue a
/// vetoed candidate.
pub fn apply_veto(
    intent: Intent,
    candidates: &[DocumentCandidate],
    locale: Locale,
) -> Vec<DocumentCandidate> {
    let Some((_, keywords)) = VETO_KEYWORDS.iter().find(|(i, _)| *i == intent) else {
        return candidates.to_vec();
    };

    candidates
        .iter()
        .filter(|candidate| {
            let hay = candidate.search_text(locale);
            !keywords.iter().any(|kw| hay.contains(kw))
        })
        .cloned()
        .collect()
}

/// Primary category for a query, used in session history snapshots.
/// Returns "general" when nothing in the table fires.
pub fn primary_category(query_lower: &str) -> String {
    let mut best: Option<(&str, usize)> = None;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let count = keywords
            .iter()
            .filter(|kw| query_lower.contains(*kw))
            .count();
        if count == 0 {
            continue;
        }
        let replace = match best {
            None => true,
            Some((_, existing)) => count > existing,
        };
        if replace {
            best = Some((category, count));
        }
    }
    best.map(|(c, _)| c.to_string())
        .unwrap_or_else(|| "general".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalizedText;

    fn doc(id: &str, category: &str, name: &str, description: &str) -> DocumentCandidate {
        DocumentCandidate {
            id: id.to_string(),
            category: category.to_string(),
            name: LocalizedText::new(name),
            description: LocalizedText::new(description),
            keywords: Vec::new(),
        }
    }

    // =========================================================================
    // detect_intent tests
    // =========================================================================

    #[test]
    fn test_detect_divorce() {
        assert_eq!(detect_intent("i'm getting divorced"), Intent::Divorce);
        assert_eq!(detect_intent("who gets custody"), Intent::Divorce);
    }

    #[test]
    fn test_detect_vehicle() {
        assert_eq!(detect_intent("buying a used car"), Intent::Vehicle);
    }

    #[test]
    fn test_detect_business() {
        assert_eq!(detect_intent("forming an llc with a friend"), Intent::Business);
    }

    #[test]
    fn test_detect_employment() {
        assert_eq!(detect_intent("hiring my first employee"), Intent::Employment);
    }

    #[test]
    fn test_detect_real_estate() {
        assert_eq!(detect_intent("renting an apartment"), Intent::RealEstate);
    }

    #[test]
    fn test_first_match_wins() {
        // Contains both divorce and business triggers; divorce is checked first
        assert_eq!(
            detect_intent("divorce and what happens to our business"),
            Intent::Divorce
        );
    }

    #[test]
    fn test_detect_general_fallback() {
        assert_eq!(detect_intent("what should i do next"), Intent::General);
    }

    // =========================================================================
    // apply_veto tests
    // =========================================================================

    #[test]
    fn test_divorce_vetoes_business_and_vehicle() {
        let candidates = vec![
            doc("d1", "family-law", "Divorce Settlement Agreement", "Divide assets"),
            doc("d2", "business", "LLC Operating Agreement", "Member structure"),
            doc("d3", "vehicle", "Vehicle Bill of Sale", "Transfer a car title"),
        ];
        let kept = apply_veto(Intent::Divorce, &candidates, Locale::En);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "d1");
    }

    #[test]
    fn test_general_intent_vetoes_nothing() {
        let candidates = vec![
            doc("d1", "family-law", "Divorce Settlement Agreement", "Divide assets"),
            doc("d2", "business", "LLC Operating Agreement", "Member structure"),
        ];
        let kept = apply_veto(Intent::General, &candidates, Locale::En);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_veto_scans_description_too() {
        let candidates = vec![doc(
            "d1",
            "forms",
            "Asset Transfer Form",
            "Commonly used alongside an operating agreement",
        )];
        let kept = apply_veto(Intent::Divorce, &candidates, Locale::En);
        assert!(kept.is_empty());
    }

    // =========================================================================
    // primary_category tests
    // =========================================================================

    #[test]
    fn test_primary_category_best_count_wins() {
        // Two real-estate keywords beat one vehicle keyword
        let category = primary_category("lease for a tenant with a car");
        assert_eq!(category, "real-estate");
    }

    #[test]
    fn test_primary_category_general_fallback() {
        assert_eq!(primary_category("hello there"), "general");
    }
}
