//! Situational phrase and wording analysis
//!
//! Four independent passes over the raw query:
//! - phrase context: which corpus category the wording points at
//! - negation: document types the user explicitly does not want
//! - synonyms: everyday words expanded to corpus vocabulary
//! - legal terms: common phrases mapped to the professional term a
//!   template would actually be named after
//!
//! Every table is a total function over arbitrary input: unknown text
//! yields zero matches, never an error.

use serde::{Deserialize, Serialize};

/// How strongly the query wording matched a known phrase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    High,
    Medium,
    Low,
}

/// The single best phrase match for a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseContext {
    pub category: String,
    pub phrase: String,
    pub confidence: MatchConfidence,
}

/// A document type the user ruled out ("don't want an NDA").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedType {
    /// Canonical type name, e.g. "non-disclosure agreement".
    pub doc_type: String,
    /// The alias that actually appeared after the negation marker.
    pub mention: String,
}

/// A synonym that fired in the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymHit {
    pub word: String,
    pub canonical: String,
}

/// A common-phrase to professional-term mapping that fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalTermHit {
    pub phrase: String,
    pub term: String,
    pub bonus: i32,
}

/// Category -> situational phrases that point at it.
const PHRASE_CONTEXTS: &[(&str, &[&str])] = &[
    (
        "family-law",
        &[
            "getting divorced",
            "getting a divorce",
            "ending my marriage",
            "splitting up with my spouse",
            "child custody",
            "custody of my kids",
            "custody of my children",
        ],
    ),
    (
        "vehicle",
        &[
            "buying a car",
            "buying a used car",
            "selling my car",
            "selling a vehicle",
            "trading in my car",
        ],
    ),
    (
        "business",
        &[
            "starting a business",
            "starting an llc",
            "forming a company",
            "opening a business",
            "going into business with",
        ],
    ),
    (
        "employment",
        &[
            "hiring an employee",
            "hiring someone",
            "bringing on a new employee",
            "leaving my job",
            "firing an employee",
            "letting someone go",
        ],
    ),
    (
        "real-estate",
        &[
            "buying a house",
            "buying a home",
            "selling my house",
            "renting an apartment",
            "renting out my property",
            "leasing my property",
        ],
    ),
];

/// Negation markers scanned left to right.
const NEGATION_MARKERS: &[&str] = &[
    "don't want",
    "do not want",
    "don't need",
    "do not need",
    "not looking for",
    "without",
    "no need for",
    "except",
];

/// Canonical document type -> aliases recognized after a negation marker.
const DOCUMENT_TYPE_ALIASES: &[(&str, &[&str])] = &[
    (
        "non-disclosure agreement",
        &["nda", "non-disclosure", "nondisclosure", "confidentiality agreement"],
    ),
    ("lease agreement", &["lease", "rental agreement"]),
    ("last will", &["will", "testament"]),
    (
        "llc formation",
        &["llc", "incorporation", "business formation"],
    ),
    (
        "employment contract",
        &["employment contract", "employment agreement"],
    ),
    ("power of attorney", &["power of attorney", "poa"]),
    ("non-compete agreement", &["non-compete", "noncompete"]),
    ("prenuptial agreement", &["prenup", "prenuptial"]),
    ("promissory note", &["promissory note", "loan agreement"]),
];

/// Everyday word -> corpus vocabulary.
const SYNONYMS: &[(&str, &str)] = &[
    ("car", "vehicle"),
    ("auto", "vehicle"),
    ("truck", "vehicle"),
    ("home", "house"),
    ("apartment", "lease"),
    ("landlord", "lease"),
    ("tenant", "lease"),
    ("rent", "lease"),
    ("job", "employment"),
    ("worker", "employee"),
    ("fired", "termination"),
    ("laid off", "termination"),
    ("company", "business"),
    ("startup", "business"),
    ("spouse", "marriage"),
    ("kid", "child"),
    ("kids", "child"),
    ("money owed", "promissory"),
    ("loan", "promissory"),
    ("secret", "non-disclosure"),
    ("confidential", "non-disclosure"),
];

/// Common phrase -> (professional term, score bonus).
///
/// The bonus lands only when the professional term appears in a
/// candidate's name; it is how "getting divorced" finds a template that
/// never contains the word "getting".
const LEGAL_TERMS: &[(&str, &str, i32)] = &[
    ("getting divorced", "divorce settlement", 200),
    ("getting a divorce", "divorce settlement", 200),
    ("custody", "custody", 150),
    ("buying a house", "purchase agreement", 150),
    ("buying a home", "purchase agreement", 150),
    ("starting a business", "llc formation", 150),
    ("starting an llc", "llc formation", 150),
    ("hiring someone", "employment contract", 150),
    ("hiring an employee", "employment contract", 150),
    ("selling my car", "bill of sale", 150),
    ("buying a car", "bill of sale", 120),
    ("renting out", "lease agreement", 150),
    ("keep it confidential", "non-disclosure", 120),
    ("keep things secret", "non-disclosure", 120),
    ("lending money", "promissory note", 150),
    ("someone owes me money", "promissory note", 120),
    ("getting fired", "severance", 100),
    ("lost my job", "severance", 100),
    ("roommate", "roommate agreement", 100),
    ("last wishes", "last will", 150),
    ("after i die", "last will", 120),
];

/// Find the single best phrase-context match for a query.
///
/// Exact substring containment wins with high confidence. Otherwise a
/// phrase matches partially when at least 60% of its words appear in the
/// query; the best partial match wins with medium confidence. No match
/// at all returns `None` and the query is treated as general.
pub fn phrase_context(query_lower: &str) -> Option<PhraseContext> {
    let mut best: Option<(PhraseContext, f64)> = None;

    for (category, phrases) in PHRASE_CONTEXTS {
        for phrase in *phrases {
            let exact = query_lower.contains(phrase);
            let fraction = if exact {
                1.0
            } else {
                let words: Vec<&str> = phrase.split_whitespace().collect();
                let present = words
                    .iter()
                    .filter(|w| query_lower.contains(*w))
                    .count();
                present as f64 / words.len() as f64
            };

            if fraction < 0.6 {
                continue;
            }

            let confidence = if exact {
                MatchConfidence::High
            } else {
                MatchConfidence::Medium
            };
            // Exact containment always outranks a word-overlap match.
            let strength = if exact { 1.0 + fraction } else { fraction };

            let replace = match &best {
                None => true,
                Some((_, existing)) => strength > *existing,
            };
            if replace {
                best = Some((
                    PhraseContext {
                        category: category.to_string(),
                        phrase: phrase.to_string(),
                        confidence,
                    },
                    strength,
                ));
            }
        }
    }

    best.map(|(ctx, _)| ctx)
}

/// Detect document types the user explicitly excluded.
///
/// Text after each negation marker (up to the next marker or end of
/// query) is scanned for known document-type aliases.
pub fn excluded_types(query_lower: &str) -> Vec<ExcludedType> {
    let mut excluded: Vec<ExcludedType> = Vec::new();

    for marker in NEGATION_MARKERS {
        let Some(idx) = query_lower.find(marker) else {
            continue;
        };
        let tail = &query_lower[idx + marker.len()..];
        // Stop at the next marker so "without X but don't want Y" scans
        // each negated span separately.
        let end = NEGATION_MARKERS
            .iter()
            .filter_map(|m| tail.find(m))
            .min()
            .unwrap_or(tail.len());
        let span = &tail[..end];

        for (doc_type, aliases) in DOCUMENT_TYPE_ALIASES {
            for alias in *aliases {
                if span.contains(alias)
                    && !excluded.iter().any(|e| e.doc_type == *doc_type)
                {
                    excluded.push(ExcludedType {
                        doc_type: doc_type.to_string(),
                        mention: alias.to_string(),
                    });
                }
            }
        }
    }

    excluded
}

/// Aliases for a canonical document type, for matching against candidates.
pub fn type_aliases(doc_type: &str) -> &'static [&'static str] {
    DOCUMENT_TYPE_ALIASES
        .iter()
        .find(|(t, _)| *t == doc_type)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// All synonym expansions present in the query.
pub fn synonym_hits(query_lower: &str) -> Vec<SynonymHit> {
    let mut hits: Vec<SynonymHit> = Vec::new();
    for (word, canonical) in SYNONYMS {
        if query_lower.contains(word)
            && !hits.iter().any(|h| h.canonical == *canonical)
        {
            hits.push(SynonymHit {
                word: word.to_string(),
                canonical: canonical.to_string(),
            });
        }
    }
    hits
}

/// All common-phrase to professional-term mappings present in the query.
pub fn legal_term_hits(query_lower: &str) -> Vec<LegalTermHit> {
    let mut hits: Vec<LegalTermHit> = Vec::new();
    for (phrase, term, bonus) in LEGAL_TERMS {
        if query_lower.contains(phrase) && !hits.iter().any(|h| h.term == *term) {
            hits.push(LegalTermHit {
                phrase: phrase.to_string(),
                term: term.to_string(),
                bonus: *bonus,
            });
        }
    }
    hits
}
