//! Cross-query session memory
//!
//! A bounded, in-memory record of what the user searched, saw, and
//! clicked inside one session. Later discovery calls read it to bias
//! scoring toward continuity; nothing here is persisted to durable
//! storage. The store is an explicit value the host injects per call,
//! never a process-wide singleton, so sessions stay independent and
//! testable.

use crate::intent::{self, Intent};
use crate::locations;
use crate::types::{DiscoveryRequest, DiscoveryResult};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// History entries retained per session; oldest evicted first.
const MAX_HISTORY: usize = 10;

/// Recent states tracked in the aggregated context.
const MAX_RECENT_STATES: usize = 3;

/// Recent categories tracked in the aggregated context.
const MAX_RECENT_CATEGORIES: usize = 5;

/// Continuity bonuses only apply while the previous search is this fresh.
pub fn recency_window() -> Duration {
    Duration::minutes(5)
}

/// Whether the session leans business or personal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Business,
    Personal,
    #[default]
    Unknown,
}

/// Self-reported experience signals in the user's wording.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Experienced,
    #[default]
    Unknown,
}

const BUSINESS_INDICATORS: &[&str] = &[
    "my company",
    "our company",
    "my business",
    "llc",
    "employees",
    "corporate",
    "startup",
    "our clients",
    "vendor",
];

const PERSONAL_INDICATORS: &[&str] = &[
    "my spouse",
    "my wife",
    "my husband",
    "my landlord",
    "my apartment",
    "my family",
    "my kids",
    "my child",
    "my car",
    "roommate",
    "personal",
];

const BEGINNER_INDICATORS: &[&str] = &[
    "first time",
    "never done",
    "new to this",
    "don't know where to start",
    "not sure how",
    "help me understand",
    "what is a",
];

const EXPERIENCED_INDICATORS: &[&str] = &[
    "another",
    "again",
    "renew",
    "like last time",
    "standard",
    "routine",
];

/// Detect the business/personal leaning of a single query.
pub fn detect_user_type(query_lower: &str) -> UserType {
    let business = BUSINESS_INDICATORS
        .iter()
        .filter(|i| query_lower.contains(*i))
        .count();
    let personal = PERSONAL_INDICATORS
        .iter()
        .filter(|i| query_lower.contains(*i))
        .count();
    if business > personal {
        UserType::Business
    } else if personal > business {
        UserType::Personal
    } else {
        UserType::Unknown
    }
}

/// Detect experience-level wording in a single query.
pub fn detect_experience(query_lower: &str) -> ExperienceLevel {
    if BEGINNER_INDICATORS.iter().any(|i| query_lower.contains(i)) {
        ExperienceLevel::Beginner
    } else if EXPERIENCED_INDICATORS.iter().any(|i| query_lower.contains(i)) {
        ExperienceLevel::Experienced
    } else {
        ExperienceLevel::Unknown
    }
}

/// A slimmed result row kept in history for continuity matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResult {
    pub document_id: String,
    /// Lowercased locale-resolved name at the time of the search.
    pub name: String,
    pub category: String,
}

/// Context captured when a search completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub states: Vec<String>,
    pub primary_category: String,
    pub intent: Intent,
    pub user_type: UserType,
}

/// One completed discovery call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub top_results: Vec<HistoryResult>,
    /// Filled in later if the user clicks a result.
    pub selected: Option<String>,
    pub snapshot: ContextSnapshot,
}

/// Aggregated leanings across the whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub experience: ExperienceLevel,
    pub leaning: UserType,
    pub recent_states: Vec<String>,
    pub recent_categories: Vec<String>,
}

/// Read-only view the host UI can display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub searches: usize,
    pub leaning: UserType,
    pub recent_states: Vec<String>,
    pub recent_categories: Vec<String>,
}

/// The session memory: bounded history plus the aggregated context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    history: VecDeque<SearchHistoryEntry>,
    context: SessionContext,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed discovery call.
    ///
    /// Mutates only this store; the result that triggered the recording
    /// is never altered. Calls with no results are not recorded.
    pub fn record_search(
        &mut self,
        request: &DiscoveryRequest,
        result: &DiscoveryResult,
    ) -> Result<()> {
        if result.ranked.is_empty() {
            return Ok(());
        }

        let query_lower = request.text.to_lowercase();
        let snapshot = ContextSnapshot {
            states: locations::extract_states(&query_lower),
            primary_category: intent::primary_category(&query_lower),
            intent: intent::detect_intent(&query_lower),
            user_type: detect_user_type(&query_lower),
        };

        let top_results = result
            .ranked
            .iter()
            .map(|r| HistoryResult {
                document_id: r.document.id.clone(),
                name: r.document.name_text(request.locale),
                category: r.document.category.clone(),
            })
            .collect();

        self.absorb_snapshot(&snapshot, &query_lower, result);

        self.history.push_back(SearchHistoryEntry {
            id: Uuid::new_v4(),
            query: query_lower,
            timestamp: Utc::now(),
            top_results,
            selected: None,
            snapshot,
        });
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }

        tracing::debug!(searches = self.history.len(), "session search recorded");
        Ok(())
    }

    /// Attach a user's chosen document to the latest history entry.
    pub fn record_selection(&mut self, document_id: &str) {
        if let Some(entry) = self.history.back_mut() {
            entry.selected = Some(document_id.to_string());
        }
    }

    /// The most recent entry regardless of age.
    pub fn latest(&self) -> Option<&SearchHistoryEntry> {
        self.history.back()
    }

    /// The most recent entry, only if it is fresh enough to drive
    /// continuity bonuses.
    pub fn continuity_basis(&self, now: DateTime<Utc>) -> Option<&SearchHistoryEntry> {
        self.history
            .back()
            .filter(|entry| now - entry.timestamp <= recency_window())
    }

    /// Whether the user ever selected this document in the session.
    pub fn was_selected(&self, document_id: &str) -> bool {
        self.history
            .iter()
            .any(|entry| entry.selected.as_deref() == Some(document_id))
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            searches: self.history.len(),
            leaning: self.context.leaning,
            recent_states: self.context.recent_states.clone(),
            recent_categories: self.context.recent_categories.clone(),
        }
    }

    /// Fold one search's signals into the aggregated context.
    fn absorb_snapshot(
        &mut self,
        snapshot: &ContextSnapshot,
        query_lower: &str,
        result: &DiscoveryResult,
    ) {
        if snapshot.user_type != UserType::Unknown {
            self.context.leaning = snapshot.user_type;
        }
        let experience = detect_experience(query_lower);
        if experience != ExperienceLevel::Unknown {
            self.context.experience = experience;
        }

        for state in snapshot.states.iter().rev() {
            if !self.context.recent_states.contains(state) {
                self.context.recent_states.insert(0, state.clone());
            }
        }
        self.context.recent_states.truncate(MAX_RECENT_STATES);

        for ranked in &result.ranked {
            let category = &ranked.document.category;
            if !self.context.recent_categories.contains(category) {
                self.context.recent_categories.insert(0, category.clone());
            }
        }
        self.context.recent_categories.truncate(MAX_RECENT_CATEGORIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Confidence, ConfidenceTier, DocumentCandidate, LocalizedText, RankedDocument,
    };

    fn ranked(id: &str, category: &str, name: &str) -> RankedDocument {
        RankedDocument {
            document: DocumentCandidate {
                id: id.to_string(),
                category: category.to_string(),
                name: LocalizedText::new(name),
                description: LocalizedText::new("test"),
                keywords: Vec::new(),
            },
            confidence: Confidence {
                score: 50,
                tier: ConfidenceTier::Good,
                message: "Good match, worth reviewing".to_string(),
            },
            score: 200,
            reasons: Vec::new(),
        }
    }

    fn result_with(docs: Vec<RankedDocument>) -> DiscoveryResult {
        DiscoveryResult {
            ranked: docs,
            clarification: None,
        }
    }

    #[test]
    fn test_record_search_builds_snapshot() {
        let mut store = SessionStore::new();
        let request = DiscoveryRequest::new("starting an LLC in California");
        let result = result_with(vec![ranked("llc-1", "business", "LLC Formation")]);

        store.record_search(&request, &result).unwrap();

        let entry = store.latest().unwrap();
        assert_eq!(entry.snapshot.intent, Intent::Business);
        assert!(entry.snapshot.states.contains(&"CA".to_string()));
        assert_eq!(entry.top_results[0].name, "llc formation");
    }

    #[test]
    fn test_empty_result_not_recorded() {
        let mut store = SessionStore::new();
        let request = DiscoveryRequest::new("anything");
        store
            .record_search(&request, &DiscoveryResult::empty())
            .unwrap();
        assert!(store.latest().is_none());
    }

    #[test]
    fn test_history_evicts_oldest_beyond_ten() {
        let mut store = SessionStore::new();
        for i in 0..12 {
            let request = DiscoveryRequest::new(&format!("lease question {}", i));
            let result = result_with(vec![ranked("lease-1", "real-estate", "Lease")]);
            store.record_search(&request, &result).unwrap();
        }
        assert_eq!(store.summary().searches, 10);
        assert_eq!(store.latest().unwrap().query, "lease question 11");
    }

    #[test]
    fn test_record_selection_attaches_to_latest() {
        let mut store = SessionStore::new();
        let request = DiscoveryRequest::new("lease for my apartment");
        let result = result_with(vec![ranked("lease-1", "real-estate", "Lease")]);
        store.record_search(&request, &result).unwrap();

        store.record_selection("lease-1");
        assert!(store.was_selected("lease-1"));
        assert!(!store.was_selected("other-doc"));
    }

    #[test]
    fn test_selection_with_no_history_is_a_noop() {
        let mut store = SessionStore::new();
        store.record_selection("lease-1");
        assert!(!store.was_selected("lease-1"));
    }

    #[test]
    fn test_continuity_basis_respects_window() {
        let mut store = SessionStore::new();
        let request = DiscoveryRequest::new("lease for my apartment");
        let result = result_with(vec![ranked("lease-1", "real-estate", "Lease")]);
        store.record_search(&request, &result).unwrap();

        let now = Utc::now();
        assert!(store.continuity_basis(now).is_some());
        let later = now + Duration::minutes(6);
        assert!(store.continuity_basis(later).is_none());
    }

    #[test]
    fn test_context_accumulates_bounded_lists() {
        let mut store = SessionStore::new();
        let states = ["texas", "california", "florida", "nevada"];
        for (i, state) in states.iter().enumerate() {
            let request =
                DiscoveryRequest::new(&format!("lease in {} number {}", state, i));
            let result = result_with(vec![ranked("lease-1", "real-estate", "Lease")]);
            store.record_search(&request, &result).unwrap();
        }
        assert!(store.context().recent_states.len() <= 3);
        // Newest state is at the front
        assert_eq!(store.context().recent_states[0], "NV");
    }

    #[test]
    fn test_user_type_detection() {
        assert_eq!(detect_user_type("contract for my company"), UserType::Business);
        assert_eq!(
            detect_user_type("agreement with my landlord"),
            UserType::Personal
        );
        assert_eq!(detect_user_type("need a contract"), UserType::Unknown);
    }

    #[test]
    fn test_experience_detection() {
        assert_eq!(
            detect_experience("first time renting out my house"),
            ExperienceLevel::Beginner
        );
        assert_eq!(
            detect_experience("need another standard lease"),
            ExperienceLevel::Experienced
        );
    }
}
