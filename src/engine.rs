//! The discovery pipeline
//!
//! Wires the stages together: analyze the query, veto incompatible
//! candidates, score the survivors, attach confidence, run the
//! ambiguity chain over the full batch, then rank and truncate.
//!
//! The engine is a pure function of (request, session store, corpus):
//! it never mutates the store, so repeated calls with the same inputs
//! return the same batch in the same order. History recording is the
//! caller's move, after the call returns.

use crate::clarify;
use crate::confidence;
use crate::intent;
use crate::scoring::{self, QueryAnalysis};
use crate::session::SessionStore;
use crate::types::{DiscoveryRequest, DiscoveryResult, DocumentCandidate, RankedDocument};
use crate::weights::ScoreWeights;
use chrono::Utc;

/// Results returned per batch.
const MAX_RESULTS: usize = 8;

/// The free-text discovery engine.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryEngine {
    weights: ScoreWeights,
}

impl DiscoveryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Run one discovery call.
    pub fn discover(
        &self,
        request: &DiscoveryRequest,
        session: &SessionStore,
        corpus: &[DocumentCandidate],
    ) -> DiscoveryResult {
        // 1. Nothing to analyze in an empty query
        if request.text.trim().is_empty() {
            return DiscoveryResult::empty();
        }

        // 2. One pass over the query for every signal
        let analysis = QueryAnalysis::of(request);

        // 3. Hard veto before any scoring
        let survivors = intent::apply_veto(analysis.intent, corpus, request.locale);

        // 4. Score what remains; only positive totals survive
        let now = Utc::now();
        let scored =
            scoring::score_candidates(&analysis, Some(session), now, &survivors, &self.weights);

        // 5. Confidence per candidate
        let mut batch: Vec<RankedDocument> = scored
            .into_iter()
            .map(|s| {
                let conf = confidence::calculate(s.score, &s.reasons);
                RankedDocument {
                    document: s.document,
                    confidence: conf,
                    score: s.score,
                    reasons: s.reasons,
                }
            })
            .collect();

        // 6. Strongest first, before the ambiguity chain sees the batch
        batch.sort_by(|a, b| {
            b.confidence
                .tier
                .rank()
                .cmp(&a.confidence.tier.rank())
                .then(b.confidence.score.cmp(&a.confidence.score))
                .then(b.score.cmp(&a.score))
        });

        // 7. Ambiguity over the full, untruncated batch
        let clarification = clarify::analyze(&request.text, &batch);

        // 8. Truncate
        batch.truncate(MAX_RESULTS);

        tracing::debug!(
            results = batch.len(),
            ambiguous = clarification.is_ambiguous,
            intent = analysis.intent.as_str(),
            "discovery call complete"
        );

        DiscoveryResult {
            ranked: batch,
            clarification: Some(clarification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::DocumentLibrary;
    use crate::types::{AmbiguityType, ConfidenceTier};

    fn engine() -> DiscoveryEngine {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        DiscoveryEngine::new()
    }

    fn discover(text: &str) -> DiscoveryResult {
        let library = DocumentLibrary::starter();
        engine().discover(
            &DiscoveryRequest::new(text),
            &SessionStore::new(),
            library.candidates(),
        )
    }

    // =========================================================================
    // contract invariants
    // =========================================================================

    #[test]
    fn test_empty_query_returns_nothing() {
        let result = discover("   ");
        assert!(result.ranked.is_empty());
        assert!(result.clarification.is_none());
    }

    #[test]
    fn test_all_results_positive_and_capped() {
        for query in [
            "lease for my apartment",
            "divorce",
            "contract",
            "starting a business with a partner",
            "buying a car in texas",
        ] {
            let result = discover(query);
            assert!(result.ranked.len() <= 8, "too many results for {:?}", query);
            for ranked in &result.ranked {
                assert!(
                    ranked.score > 0,
                    "non-positive score for {:?} on {:?}",
                    ranked.document.id,
                    query
                );
            }
        }
    }

    #[test]
    fn test_idempotent_for_fixed_session() {
        let library = DocumentLibrary::starter();
        let session = SessionStore::new();
        let request = DiscoveryRequest::new("hiring my first employee");

        let first = engine().discover(&request, &session, library.candidates());
        let second = engine().discover(&request, &session, library.candidates());

        let ids = |r: &DiscoveryResult| -> Vec<String> {
            r.ranked.iter().map(|d| d.document.id.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(
            first.ranked.first().map(|r| r.score),
            second.ranked.first().map(|r| r.score)
        );
    }

    #[test]
    fn test_unknown_corpus_never_errors() {
        let result = discover("zxcvbnm qwerty gibberish");
        assert!(result.ranked.is_empty() || result.ranked[0].score > 0);
    }

    // =========================================================================
    // end-to-end scenarios
    // =========================================================================

    #[test]
    fn test_divorce_query_never_surfaces_business_or_vehicle() {
        let result = discover("I'm getting divorced and need to figure out custody");
        assert!(!result.ranked.is_empty());

        let top = &result.ranked[0];
        assert_eq!(top.document.category, "family-law");
        assert_eq!(top.confidence.tier, ConfidenceTier::Excellent);

        for ranked in &result.ranked {
            let hay = ranked.document.haystack(crate::types::Locale::En);
            assert!(
                !hay.contains("llc") && !hay.contains("bill of sale"),
                "vetoed candidate leaked: {}",
                ranked.document.id
            );
        }
    }

    #[test]
    fn test_bare_contract_asks_for_clarification() {
        let result = discover("contract");
        let clarification = result.clarification.unwrap();
        assert!(clarification.is_ambiguous);
        assert_eq!(
            clarification.ambiguity_type,
            Some(AmbiguityType::TooGeneric)
        );
        assert!(!clarification.questions.is_empty());
    }

    #[test]
    fn test_texas_vehicle_outranks_generic() {
        let result = discover("buying a car in Texas");
        let tx_pos = result
            .ranked
            .iter()
            .position(|r| r.document.id == "vehicle-bill-of-sale-tx")
            .expect("texas document missing");
        let generic_pos = result
            .ranked
            .iter()
            .position(|r| r.document.id == "vehicle-bill-of-sale")
            .expect("generic document missing");
        assert!(tx_pos < generic_pos, "location bonus should win the tie");
    }

    #[test]
    fn test_session_continuity_boosts_followup_search() {
        let library = DocumentLibrary::starter();
        let eng = engine();

        // First search establishes business context and workflow position
        let mut session = SessionStore::new();
        let first_request = DiscoveryRequest::new("starting an LLC in California");
        let first = eng.discover(&first_request, &session, library.candidates());
        assert_eq!(first.ranked[0].document.id, "llc-formation");
        session.record_search(&first_request, &first).unwrap();

        // Second search scores strictly higher with the warm session
        let second_request = DiscoveryRequest::new("employee contract");
        let warm = eng.discover(&second_request, &session, library.candidates());
        let cold = eng.discover(
            &second_request,
            &SessionStore::new(),
            library.candidates(),
        );

        let warm_score = warm
            .ranked
            .iter()
            .find(|r| r.document.id == "employment-contract")
            .map(|r| r.score)
            .expect("employment contract missing from warm results");
        let cold_score = cold
            .ranked
            .iter()
            .find(|r| r.document.id == "employment-contract")
            .map(|r| r.score)
            .expect("employment contract missing from cold results");
        assert!(
            warm_score > cold_score,
            "continuity should add score: warm {} vs cold {}",
            warm_score,
            cold_score
        );
    }

    #[test]
    fn test_negated_nda_is_suppressed() {
        let result = discover("service agreement but don't want an NDA");
        assert!(result
            .ranked
            .iter()
            .all(|r| r.document.id != "nda"), "negated NDA appeared in results");
        // The service agreement itself still surfaces
        assert!(result
            .ranked
            .iter()
            .any(|r| r.document.id == "service-agreement"));
    }

    #[test]
    fn test_selection_reinforces_future_ranking() {
        let library = DocumentLibrary::starter();
        let eng = engine();
        let mut session = SessionStore::new();

        let request = DiscoveryRequest::new("lease for my apartment");
        let result = eng.discover(&request, &session, library.candidates());
        session.record_search(&request, &result).unwrap();
        session.record_selection("residential-lease");

        let again = eng.discover(&request, &session, library.candidates());
        let lease = again
            .ranked
            .iter()
            .find(|r| r.document.id == "residential-lease")
            .unwrap();
        assert!(lease
            .reasons
            .iter()
            .any(|r| r.text.contains("picked this before")));
    }
}
