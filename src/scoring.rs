//! The scoring engine
//!
//! One `QueryAnalysis` pass extracts every signal from the query, then a
//! declarative rule table turns signals into score deltas per candidate.
//! The evaluator is generic: run every rule, sum the deltas, collect the
//! reasons. Tuning lives in `ScoreWeights` and the data tables, not in
//! control flow.
//!
//! Only candidates with a strictly positive total survive.

use crate::intent::{self, Intent};
use crate::locations;
use crate::phrases::{self, ExcludedType, LegalTermHit, MatchConfidence, PhraseContext, SynonymHit};
use crate::session::{self, ExperienceLevel, SessionStore, UserType};
use crate::types::{DiscoveryRequest, DocumentCandidate, Locale, Reason, ScoredCandidate};
use crate::weights::ScoreWeights;
use crate::workflows::{self, Workflow};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Stable rule ids, referenced by the confidence calculator.
pub mod rule_ids {
    pub const PHRASE: &str = "phrase-context";
    pub const NEGATION: &str = "negation";
    pub const SYNONYM: &str = "synonym";
    pub const LEGAL_TERM: &str = "legal-term";
    pub const CATEGORY: &str = "category";
    pub const PURPOSE: &str = "purpose";
    pub const PROFILE: &str = "profile";
    pub const WORKFLOW: &str = "workflow";
    pub const DOMAIN: &str = "domain";
    pub const LOCATION: &str = "location";
    pub const CONTINUITY: &str = "continuity";
    pub const TOKEN: &str = "token";
}

/// What the user is trying to do with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Purchase,
    Lease,
    Hire,
    Terminate,
}

impl Purpose {
    fn conflicts_with(&self, other: Purpose) -> bool {
        matches!(
            (self, other),
            (Purpose::Purchase, Purpose::Lease)
                | (Purpose::Lease, Purpose::Purchase)
                | (Purpose::Hire, Purpose::Terminate)
                | (Purpose::Terminate, Purpose::Hire)
        )
    }
}

/// How much ground the user wants the document to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityPreference {
    Simple,
    Comprehensive,
}

// Terminate is checked before Hire: "firing an employee" must not fall
// into Hire via the "employ" stem.
const QUERY_PURPOSES: &[(Purpose, &[&str])] = &[
    (Purpose::Purchase, &["buy", "buying", "purchase", "purchasing"]),
    (Purpose::Lease, &["rent", "renting", "lease", "leasing"]),
    (
        Purpose::Terminate,
        &["fired", "firing", "terminate", "evict", "letting go", "severance"],
    ),
    (Purpose::Hire, &["hire", "hiring", "employ", "onboard"]),
];

const CANDIDATE_PURPOSES: &[(Purpose, &[&str])] = &[
    (Purpose::Purchase, &["purchase", "bill of sale"]),
    (Purpose::Lease, &["lease", "rental"]),
    (Purpose::Hire, &["employment", "offer letter"]),
    (
        Purpose::Terminate,
        &["termination", "eviction", "severance", "notice to vacate"],
    ),
];

const URGENCY_MARKERS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "right away",
    "today",
    "deadline",
];

const SIMPLE_MARKERS: &[&str] = &["simple", "quick", "basic", "short"];
const THOROUGH_MARKERS: &[&str] = &["detailed", "comprehensive", "thorough", "cover everything"];

const SIMPLE_DOC_MARKERS: &[&str] = &["simple", "basic", "starter", "easy"];
const THOROUGH_DOC_MARKERS: &[&str] = &["comprehensive", "detailed", "advanced"];
const URGENT_DOC_MARKERS: &[&str] = &["notice", "demand", "emergency"];

const BUSINESS_DOC_MARKERS: &[&str] = &["business", "commercial", "corporate"];
const PERSONAL_DOC_MARKERS: &[&str] = &["personal", "individual", "family", "residential"];

/// Canonical intent-to-document bonuses and penalties, matched against
/// the candidate name. These dominate ranking and act as a second,
/// score-based exclusion layer on top of the hard veto.
const DOMAIN_OVERRIDES: &[(Intent, &[(&str, i32)])] = &[
    (
        Intent::Divorce,
        &[
            ("divorce", 500),
            ("custody", 300),
            ("separation", 300),
            ("child support", 200),
            ("alimony", 200),
            ("llc", -1000),
            ("incorporation", -1000),
            ("operating agreement", -800),
            ("bill of sale", -800),
            ("vehicle", -800),
            ("employment", -300),
        ],
    ),
    (
        Intent::Vehicle,
        &[
            ("bill of sale", 500),
            ("vehicle", 300),
            ("odometer", 200),
            ("title transfer", 200),
            ("divorce", -1000),
            ("custody", -1000),
            ("llc", -500),
            ("employment", -300),
        ],
    ),
    (
        Intent::Business,
        &[
            ("llc formation", 500),
            ("articles of organization", 300),
            ("operating agreement", 300),
            ("partnership", 200),
            ("divorce", -1000),
            ("custody", -1000),
            ("bill of sale", -400),
        ],
    ),
    (
        Intent::Employment,
        &[
            ("employment contract", 500),
            ("employment agreement", 500),
            ("offer letter", 300),
            ("non-compete", 300),
            ("severance", 300),
            ("non-disclosure", 200),
            ("divorce", -1000),
            ("custody", -1000),
            ("bill of sale", -400),
        ],
    ),
    (
        Intent::RealEstate,
        &[
            ("purchase agreement", 500),
            ("lease agreement", 500),
            ("deed", 300),
            ("mortgage", 300),
            ("eviction", 200),
            ("disclosure", 200),
            ("divorce", -1000),
            ("custody", -1000),
            ("odometer", -400),
        ],
    ),
];

/// The categories phrase tables know about; a high-confidence phrase
/// match into one of these conflicts hard with the others.
const PHRASE_CATEGORIES: &[&str] = &[
    "family-law",
    "vehicle",
    "business",
    "employment",
    "real-estate",
];

/// Every signal extracted from one query, computed once per call.
#[derive(Debug, Clone)]
pub struct QueryAnalysis {
    pub text: String,
    pub locale: Locale,
    pub tokens: Vec<String>,
    pub states: Vec<String>,
    pub intent: Intent,
    pub phrase: Option<PhraseContext>,
    pub excluded: Vec<ExcludedType>,
    pub synonyms: Vec<SynonymHit>,
    pub legal_terms: Vec<LegalTermHit>,
    pub purpose: Option<Purpose>,
    pub workflow: Option<&'static Workflow>,
    pub user_type: UserType,
    pub experience: ExperienceLevel,
    pub urgent: bool,
    pub complexity: Option<ComplexityPreference>,
}

impl QueryAnalysis {
    pub fn of(request: &DiscoveryRequest) -> Self {
        let text = request.text.to_lowercase();
        let synonyms = phrases::synonym_hits(&text);

        // Synonym hits expand the token set so exact-token matching sees
        // the canonical vocabulary ("car" also matches on "vehicle").
        let mut tokens = tokenize(&text);
        for hit in &synonyms {
            for token in tokenize(&hit.canonical) {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
        }

        Self {
            tokens,
            states: locations::extract_states(&text),
            intent: intent::detect_intent(&text),
            phrase: phrases::phrase_context(&text),
            excluded: phrases::excluded_types(&text),
            synonyms,
            legal_terms: phrases::legal_term_hits(&text),
            purpose: detect_query_purpose(&text),
            workflow: workflows::match_workflow(&text),
            user_type: session::detect_user_type(&text),
            experience: session::detect_experience(&text),
            urgent: URGENCY_MARKERS.iter().any(|m| text.contains(m)),
            complexity: detect_complexity(&text),
            locale: request.locale,
            text,
        }
    }
}

/// Candidate fields resolved once before the rules run.
struct CandidateView<'a> {
    document: &'a DocumentCandidate,
    name: String,
    haystack: String,
    tokens: HashSet<String>,
}

impl<'a> CandidateView<'a> {
    fn of(document: &'a DocumentCandidate, locale: Locale) -> Self {
        let haystack = document.search_text(locale);
        Self {
            name: document.search_name(locale),
            tokens: tokenize(&haystack).into_iter().collect(),
            haystack,
            document,
        }
    }
}

struct RuleCtx<'a> {
    analysis: &'a QueryAnalysis,
    session: Option<&'a SessionStore>,
    now: DateTime<Utc>,
    weights: &'a ScoreWeights,
}

/// One scoring rule: a stable id and an evaluator that may emit reasons.
struct ScoreRule {
    id: &'static str,
    eval: fn(&RuleCtx, &CandidateView) -> Vec<Reason>,
}

/// The full rule table, evaluated in order for every candidate.
const RULES: &[ScoreRule] = &[
    ScoreRule { id: rule_ids::PHRASE, eval: eval_phrase },
    ScoreRule { id: rule_ids::NEGATION, eval: eval_negation },
    ScoreRule { id: rule_ids::SYNONYM, eval: eval_synonyms },
    ScoreRule { id: rule_ids::LEGAL_TERM, eval: eval_legal_terms },
    ScoreRule { id: rule_ids::CATEGORY, eval: eval_category },
    ScoreRule { id: rule_ids::PURPOSE, eval: eval_purpose },
    ScoreRule { id: rule_ids::PROFILE, eval: eval_profile },
    ScoreRule { id: rule_ids::WORKFLOW, eval: eval_workflow },
    ScoreRule { id: rule_ids::DOMAIN, eval: eval_domain },
    ScoreRule { id: rule_ids::LOCATION, eval: eval_location },
    ScoreRule { id: rule_ids::CONTINUITY, eval: eval_continuity },
    ScoreRule { id: rule_ids::TOKEN, eval: eval_tokens },
];

/// Score every candidate and keep the ones with a positive total.
///
/// Deterministic for fixed (analysis, session, now, candidates, weights).
pub fn score_candidates(
    analysis: &QueryAnalysis,
    session: Option<&SessionStore>,
    now: DateTime<Utc>,
    candidates: &[DocumentCandidate],
    weights: &ScoreWeights,
) -> Vec<ScoredCandidate> {
    let ctx = RuleCtx {
        analysis,
        session,
        now,
        weights,
    };

    let mut scored = Vec::new();
    for candidate in candidates {
        let view = CandidateView::of(candidate, analysis.locale);
        let mut reasons: Vec<Reason> = Vec::new();
        for rule in RULES {
            let hits = (rule.eval)(&ctx, &view);
            debug_assert!(hits.iter().all(|r| r.rule == rule.id));
            reasons.extend(hits);
        }
        let score: i32 = reasons.iter().map(|r| r.delta).sum();
        if score > 0 {
            scored.push(ScoredCandidate {
                document: candidate.clone(),
                score,
                reasons,
            });
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        survivors = scored.len(),
        intent = analysis.intent.as_str(),
        "scoring pass complete"
    );
    scored
}

/// Whole-word tokens longer than two characters, deduplicated in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.len() > 2 && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

fn detect_query_purpose(text: &str) -> Option<Purpose> {
    for (purpose, markers) in QUERY_PURPOSES {
        if markers.iter().any(|m| text.contains(m)) {
            return Some(*purpose);
        }
    }
    None
}

fn candidate_purpose(name: &str) -> Option<Purpose> {
    for (purpose, markers) in CANDIDATE_PURPOSES {
        if markers.iter().any(|m| name.contains(m)) {
            return Some(*purpose);
        }
    }
    None
}

fn detect_complexity(text: &str) -> Option<ComplexityPreference> {
    if SIMPLE_MARKERS.iter().any(|m| text.contains(m)) {
        Some(ComplexityPreference::Simple)
    } else if THOROUGH_MARKERS.iter().any(|m| text.contains(m)) {
        Some(ComplexityPreference::Comprehensive)
    } else {
        None
    }
}

// ============================================================================
// Rule evaluators
// ============================================================================

fn eval_phrase(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let Some(phrase) = &ctx.analysis.phrase else {
        return Vec::new();
    };
    let same_category = view.document.category == phrase.category;

    match (phrase.confidence, same_category) {
        (MatchConfidence::High, true) => vec![Reason::new(
            rule_ids::PHRASE,
            ctx.weights.phrase_perfect,
            format!("Strong match for \"{}\"", phrase.phrase),
        )],
        (MatchConfidence::High, false) => {
            // A confident phrase match into one known category conflicts
            // hardest with candidates from the other known categories.
            let delta = if PHRASE_CATEGORIES.contains(&view.document.category.as_str()) {
                ctx.weights.phrase_mismatch_high
            } else {
                ctx.weights.phrase_mismatch_medium
            };
            vec![Reason::new(
                rule_ids::PHRASE,
                delta,
                format!("Different area than \"{}\"", phrase.phrase),
            )]
        }
        (MatchConfidence::Medium, true) => vec![Reason::new(
            rule_ids::PHRASE,
            ctx.weights.phrase_partial,
            format!("Related to \"{}\"", phrase.phrase),
        )],
        _ => Vec::new(),
    }
}

fn eval_negation(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let mut reasons = Vec::new();
    for excluded in &ctx.analysis.excluded {
        let aliases = phrases::type_aliases(&excluded.doc_type);
        let name_hit = aliases.iter().any(|a| view.name.contains(a));
        let text_hit = aliases.iter().any(|a| view.haystack.contains(a));
        let delta = if name_hit {
            ctx.weights.negation_name_hit
        } else if text_hit {
            ctx.weights.negation_text_hit
        } else {
            continue;
        };
        reasons.push(Reason::new(
            rule_ids::NEGATION,
            delta,
            format!("You asked to leave out {}", excluded.doc_type),
        ));
    }
    reasons
}

fn eval_synonyms(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    ctx.analysis
        .synonyms
        .iter()
        .filter(|hit| view.haystack.contains(&hit.canonical))
        .map(|hit| {
            Reason::new(
                rule_ids::SYNONYM,
                ctx.weights.synonym_hit,
                format!("\"{}\" relates to {}", hit.word, hit.canonical),
            )
        })
        .collect()
}

fn eval_legal_terms(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    ctx.analysis
        .legal_terms
        .iter()
        .filter(|hit| view.name.contains(&hit.term))
        .map(|hit| {
            Reason::new(
                rule_ids::LEGAL_TERM,
                hit.bonus,
                format!("\"{}\" usually calls for a {}", hit.phrase, hit.term),
            )
        })
        .collect()
}

fn eval_category(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let intent = ctx.analysis.intent;
    let category = view.document.category.as_str();

    if intent.expected_category() == Some(category) {
        return vec![Reason::new(
            rule_ids::CATEGORY,
            ctx.weights.category_match,
            format!("Fits the {} category", category),
        )];
    }
    if intent.excluded_categories().contains(&category) {
        return vec![Reason::new(
            rule_ids::CATEGORY,
            ctx.weights.category_excluded,
            format!("Outside {} matters", intent.as_str()),
        )];
    }
    Vec::new()
}

fn eval_purpose(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let Some(query_purpose) = ctx.analysis.purpose else {
        return Vec::new();
    };
    let Some(doc_purpose) = candidate_purpose(&view.name) else {
        return Vec::new();
    };

    if query_purpose == doc_purpose {
        vec![Reason::new(
            rule_ids::PURPOSE,
            ctx.weights.purpose_match,
            "Matches what you're trying to do".to_string(),
        )]
    } else if query_purpose.conflicts_with(doc_purpose) {
        vec![Reason::new(
            rule_ids::PURPOSE,
            ctx.weights.purpose_conflict,
            "Made for the opposite situation".to_string(),
        )]
    } else {
        Vec::new()
    }
}

fn eval_profile(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let mut reasons = Vec::new();
    let weights = ctx.weights;

    match ctx.analysis.experience {
        ExperienceLevel::Beginner
            if SIMPLE_DOC_MARKERS.iter().any(|m| view.haystack.contains(m)) =>
        {
            reasons.push(Reason::new(
                rule_ids::PROFILE,
                weights.experience_match,
                "Good for first-timers".to_string(),
            ));
        }
        ExperienceLevel::Experienced
            if THOROUGH_DOC_MARKERS.iter().any(|m| view.haystack.contains(m)) =>
        {
            reasons.push(Reason::new(
                rule_ids::PROFILE,
                weights.experience_match,
                "Suited to repeat use".to_string(),
            ));
        }
        _ => {}
    }

    let business_doc = BUSINESS_DOC_MARKERS.iter().any(|m| view.haystack.contains(m));
    let personal_doc = PERSONAL_DOC_MARKERS.iter().any(|m| view.haystack.contains(m));
    match ctx.analysis.user_type {
        UserType::Business if business_doc => reasons.push(Reason::new(
            rule_ids::PROFILE,
            weights.audience_match,
            "Suited to business use".to_string(),
        )),
        UserType::Business if personal_doc => reasons.push(Reason::new(
            rule_ids::PROFILE,
            weights.audience_mismatch,
            "Geared toward personal use".to_string(),
        )),
        UserType::Personal if personal_doc => reasons.push(Reason::new(
            rule_ids::PROFILE,
            weights.audience_match,
            "Suited to personal use".to_string(),
        )),
        UserType::Personal if business_doc => reasons.push(Reason::new(
            rule_ids::PROFILE,
            weights.audience_mismatch,
            "Geared toward business use".to_string(),
        )),
        _ => {}
    }

    if ctx.analysis.urgent && URGENT_DOC_MARKERS.iter().any(|m| view.haystack.contains(m)) {
        reasons.push(Reason::new(
            rule_ids::PROFILE,
            weights.urgency_match,
            "Quick to put to use".to_string(),
        ));
    }

    match ctx.analysis.complexity {
        Some(ComplexityPreference::Simple) => {
            if SIMPLE_DOC_MARKERS.iter().any(|m| view.haystack.contains(m)) {
                reasons.push(Reason::new(
                    rule_ids::PROFILE,
                    weights.complexity_match,
                    "Kept short and simple".to_string(),
                ));
            } else if THOROUGH_DOC_MARKERS.iter().any(|m| view.haystack.contains(m)) {
                reasons.push(Reason::new(
                    rule_ids::PROFILE,
                    weights.complexity_mismatch,
                    "More detailed than you asked for".to_string(),
                ));
            }
        }
        Some(ComplexityPreference::Comprehensive) => {
            if THOROUGH_DOC_MARKERS.iter().any(|m| view.haystack.contains(m)) {
                reasons.push(Reason::new(
                    rule_ids::PROFILE,
                    weights.complexity_match,
                    "Covers the details thoroughly".to_string(),
                ));
            }
        }
        None => {}
    }

    reasons
}

fn eval_workflow(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let Some(workflow) = ctx.analysis.workflow else {
        return Vec::new();
    };

    let (delta, role) = if workflow.primary.iter().any(|p| view.name.contains(p)) {
        (ctx.weights.workflow_primary, "core document")
    } else if workflow.secondary.iter().any(|p| view.name.contains(p)) {
        (ctx.weights.workflow_secondary, "companion document")
    } else if workflow.follow_up.iter().any(|p| view.name.contains(p)) {
        (ctx.weights.workflow_follow_up, "later step")
    } else {
        return Vec::new();
    };

    vec![Reason::new(
        rule_ids::WORKFLOW,
        delta,
        format!("A {} when {}", role, workflow.name.replace('-', " ")),
    )]
}

fn eval_domain(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let Some((_, overrides)) = DOMAIN_OVERRIDES
        .iter()
        .find(|(i, _)| *i == ctx.analysis.intent)
    else {
        return Vec::new();
    };

    // One best bonus and one worst penalty apiece, so stacked patterns
    // ("employment contract" + "employment agreement") don't double count.
    let mut best: Option<i32> = None;
    let mut worst: Option<i32> = None;
    for (pattern, delta) in *overrides {
        if !view.name.contains(pattern) {
            continue;
        }
        if *delta > 0 {
            best = Some(best.map_or(*delta, |b: i32| b.max(*delta)));
        } else {
            worst = Some(worst.map_or(*delta, |w: i32| w.min(*delta)));
        }
    }

    let intent_name = ctx.analysis.intent.as_str();
    let mut reasons = Vec::new();
    if let Some(delta) = best {
        reasons.push(Reason::new(
            rule_ids::DOMAIN,
            delta,
            format!("Standard document for {} matters", intent_name),
        ));
    }
    if let Some(delta) = worst {
        reasons.push(Reason::new(
            rule_ids::DOMAIN,
            delta,
            format!("Not used for {} matters", intent_name),
        ));
    }
    reasons
}

fn eval_location(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    // Query-side extraction is lenient by design; the candidate side
    // matches full state names only, so a detected "OR" never lights up
    // every template containing the word "form".
    let mut best: Option<(i32, &str)> = None;
    for code in &ctx.analysis.states {
        let Some(name) = locations::state_name(code) else {
            continue;
        };

        let delta = if view.name.contains(name) {
            ctx.weights.location_name_hit
        } else if view.haystack.contains(name) {
            ctx.weights.location_text_hit
        } else {
            continue;
        };
        if best.map_or(true, |(b, _)| delta > b) {
            best = Some((delta, code));
        }
    }

    best.map(|(delta, code)| {
        vec![Reason::new(
            rule_ids::LOCATION,
            delta,
            format!("Covers {}", code),
        )]
    })
    .unwrap_or_default()
}

fn eval_continuity(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let Some(store) = ctx.session else {
        return Vec::new();
    };
    let mut reasons = Vec::new();
    let weights = ctx.weights;

    if let Some(entry) = store.continuity_basis(ctx.now) {
        // State carry-over: the new query names no state but the last one did.
        if ctx.analysis.states.is_empty() && !entry.snapshot.states.is_empty() {
            let carried = entry.snapshot.states.iter().any(|code| {
                locations::state_name(code).map_or(false, |n| view.haystack.contains(n))
            });
            if carried {
                reasons.push(Reason::new(
                    rule_ids::CONTINUITY,
                    weights.continuity_state,
                    "Matches the state from your last search".to_string(),
                ));
            }
        }

        if view.document.category == entry.snapshot.primary_category {
            reasons.push(Reason::new(
                rule_ids::CONTINUITY,
                weights.continuity_category,
                "Continues your recent searches".to_string(),
            ));
        }

        let business_doc = BUSINESS_DOC_MARKERS.iter().any(|m| view.haystack.contains(m));
        let personal_doc = PERSONAL_DOC_MARKERS.iter().any(|m| view.haystack.contains(m));
        match entry.snapshot.user_type {
            UserType::Business if business_doc => reasons.push(Reason::new(
                rule_ids::CONTINUITY,
                weights.continuity_user_type,
                "Fits your business profile".to_string(),
            )),
            UserType::Business if personal_doc => reasons.push(Reason::new(
                rule_ids::CONTINUITY,
                weights.continuity_user_type_mismatch,
                "Leans personal, unlike your recent searches".to_string(),
            )),
            UserType::Personal if personal_doc => reasons.push(Reason::new(
                rule_ids::CONTINUITY,
                weights.continuity_user_type,
                "Fits your personal profile".to_string(),
            )),
            UserType::Personal if business_doc => reasons.push(Reason::new(
                rule_ids::CONTINUITY,
                weights.continuity_user_type_mismatch,
                "Leans business, unlike your recent searches".to_string(),
            )),
            _ => {}
        }

        if let Some(workflow) = workflows::match_workflow(&entry.query) {
            let mut texts: Vec<String> = vec![entry.query.clone()];
            texts.extend(entry.top_results.iter().map(|r| r.name.clone()));
            let furthest = workflows::furthest_step(workflow, &texts);
            let next_start = furthest.map_or(0, |idx| idx + 1);
            let is_next = workflow.sequence[next_start..]
                .iter()
                .any(|step| view.name.contains(step));
            if is_next {
                reasons.push(Reason::new(
                    rule_ids::CONTINUITY,
                    weights.continuity_next_step,
                    "The usual next step after your last search".to_string(),
                ));
            }
        }

        if entry
            .top_results
            .first()
            .map_or(false, |top| top.document_id == view.document.id)
        {
            reasons.push(Reason::new(
                rule_ids::CONTINUITY,
                weights.continuity_repeat,
                "You already searched this".to_string(),
            ));
        }
    }

    if store.was_selected(&view.document.id) {
        reasons.push(Reason::new(
            rule_ids::CONTINUITY,
            weights.continuity_selected,
            "You picked this before".to_string(),
        ));
    }

    reasons
}

fn eval_tokens(ctx: &RuleCtx, view: &CandidateView) -> Vec<Reason> {
    let matched: Vec<&str> = ctx
        .analysis
        .tokens
        .iter()
        .filter(|t| view.tokens.contains(*t))
        .map(|t| t.as_str())
        .collect();
    if matched.is_empty() {
        return Vec::new();
    }

    let delta = ctx.weights.token_match * matched.len() as i32;
    vec![Reason::new(
        rule_ids::TOKEN,
        delta,
        format!("Mentions: {}", matched.join(", ")),
    )]
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

    fn analyze(text: &str) -> QueryAnalysis {
        QueryAnalysis::of(&DiscoveryRequest::new(text))
    }

    fn score_one(
        analysis: &QueryAnalysis,
        session: Option<&SessionStore>,
        candidate: DocumentCandidate,
    ) -> Option<ScoredCandidate> {
        let weights = ScoreWeights::default();
        score_candidates(analysis, session, Utc::now(), &[candidate], &weights)
            .into_iter()
            .next()
    }

    // =========================================================================
    // tokenize tests
    // =========================================================================

    #[test]
    fn test_tokenize_drops_short_tokens() {
        let tokens = tokenize("i need a lease for my apartment");
        assert!(tokens.contains(&"lease".to_string()));
        assert!(tokens.contains(&"apartment".to_string()));
        assert!(!tokens.iter().any(|t| t == "i" || t == "a" || t == "my"));
    }

    #[test]
    fn test_tokenize_deduplicates() {
        let tokens = tokenize("lease lease lease");
        assert_eq!(tokens.len(), 1);
    }

    // =========================================================================
    // individual rule behavior, via full scoring of one candidate
    // =========================================================================

    #[test]
    fn test_phrase_match_awards_perfect_bonus() {
        let analysis = analyze("I'm getting divorced");
        let scored = score_one(
            &analysis,
            None,
            doc("d1", "family-law", "Divorce Settlement Agreement", "Divide assets"),
        )
        .unwrap();
        assert!(scored
            .reasons
            .iter()
            .any(|r| r.rule == rule_ids::PHRASE && r.delta == 300));
    }

    #[test]
    fn test_negation_pushes_candidate_negative() {
        let analysis = analyze("service agreement but don't want an nda");
        let weights = ScoreWeights::default();
        let nda = doc(
            "nda-1",
            "business",
            "Non-Disclosure Agreement (NDA)",
            "Keep shared information confidential",
        );
        let scored = score_candidates(&analysis, None, Utc::now(), &[nda], &weights);
        // The -300 name hit outweighs token/keyword bonuses
        assert!(scored.is_empty(), "negated NDA should not survive");
    }

    #[test]
    fn test_legal_term_requires_name_hit() {
        let analysis = analyze("I'm getting divorced");
        let hit = score_one(
            &analysis,
            None,
            doc("d1", "family-law", "Divorce Settlement Agreement", "Divide assets"),
        )
        .unwrap();
        assert!(hit
            .reasons
            .iter()
            .any(|r| r.rule == rule_ids::LEGAL_TERM && r.delta == 200));

        let miss = score_one(
            &analysis,
            None,
            doc("d2", "family-law", "Parenting Plan", "Custody schedule"),
        );
        if let Some(miss) = miss {
            assert!(!miss.reasons.iter().any(|r| r.rule == rule_ids::LEGAL_TERM));
        }
    }

    #[test]
    fn test_purpose_conflict_penalizes_lease_for_buyer() {
        let analysis = analyze("buying a car from a dealer");
        let weights = ScoreWeights::default();
        let lease = doc(
            "vl-1",
            "vehicle",
            "Vehicle Lease Agreement",
            "Lease a vehicle long-term",
        );
        let scored =
            score_candidates(&analysis, None, Utc::now(), &[lease], &weights);
        if let Some(s) = scored.first() {
            assert!(s
                .reasons
                .iter()
                .any(|r| r.rule == rule_ids::PURPOSE && r.delta == -200));
        }
    }

    #[test]
    fn test_domain_override_dominates_for_divorce_intent() {
        let analysis = analyze("divorce paperwork");
        let weights = ScoreWeights::default();
        let llc = doc(
            "llc-1",
            "forms",
            "LLC Formation Package",
            "Start a limited liability company",
        );
        // Vetoes aside (category "forms" dodges the excluded list), the
        // -1000 domain override alone must sink this candidate.
        let scored = score_candidates(&analysis, None, Utc::now(), &[llc], &weights);
        assert!(scored.is_empty());
    }

    #[test]
    fn test_location_bonus_prefers_name_hit() {
        let analysis = analyze("buying a car in texas");
        let texan = score_one(
            &analysis,
            None,
            doc(
                "v-tx",
                "vehicle",
                "Texas Vehicle Bill of Sale",
                "Transfer a car title in Texas",
            ),
        )
        .unwrap();
        assert!(texan
            .reasons
            .iter()
            .any(|r| r.rule == rule_ids::LOCATION && r.delta == 200));
    }

    #[test]
    fn test_token_fallback_counts_whole_words_only() {
        let analysis = analyze("notarized letter");
        let weights = ScoreWeights::default();
        // "letter" appears whole; "not" must not match inside "notarized"
        let candidate = doc(
            "misc-1",
            "forms",
            "Demand Letter",
            "Request payment or action",
        );
        let scored =
            score_candidates(&analysis, None, Utc::now(), &[candidate], &weights);
        let s = scored.first().expect("token match should keep it alive");
        let token_reason = s
            .reasons
            .iter()
            .find(|r| r.rule == rule_ids::TOKEN)
            .unwrap();
        assert_eq!(token_reason.delta, 20);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let analysis = analyze("hiring my first employee");
        let weights = ScoreWeights::default();
        let now = Utc::now();
        let docs = vec![
            doc("e1", "employment", "Employment Contract", "Hire an employee"),
            doc("e2", "employment", "Offer Letter", "Extend a job offer"),
        ];
        let first = score_candidates(&analysis, None, now, &docs, &weights);
        let second = score_candidates(&analysis, None, now, &docs, &weights);
        let left: Vec<(&str, i32)> = first
            .iter()
            .map(|s| (s.document.id.as_str(), s.score))
            .collect();
        let right: Vec<(&str, i32)> = second
            .iter()
            .map(|s| (s.document.id.as_str(), s.score))
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_all_survivors_positive() {
        let analysis = analyze("random unrelated words entirely");
        let weights = ScoreWeights::default();
        let docs = vec![
            doc("d1", "family-law", "Divorce Settlement Agreement", "Divide assets"),
            doc("d2", "vehicle", "Vehicle Bill of Sale", "Transfer a car"),
        ];
        for s in score_candidates(&analysis, None, Utc::now(), &docs, &weights) {
            assert!(s.score > 0);
        }
    }
}
