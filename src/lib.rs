//! docscout - free-text discovery for legal document templates
//!
//! Given a short description of a user's situation, docscout selects,
//! scores, ranks, and explains which document templates fit best, and
//! notices when the wording is too ambiguous to rank confidently.
//!
//! It is a deterministic heuristic scorer, not a learned model: fixed
//! phrase, synonym, veto, and workflow tables drive an additive rule
//! evaluator, and every contribution comes back as a human-readable
//! reason. Nothing persists beyond one in-memory session.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use docscout::{DiscoveryService, Locale};
//!
//! // Once per user session
//! let service = DiscoveryService::with_starter_corpus();
//!
//! // Per keystroke or transcription update
//! let result = service.discover("I'm getting divorced", Locale::En).await?;
//! for item in &result.ranked {
//!     println!("{} ({})", item.document.name.en, item.confidence.score);
//! }
//!
//! // When the user picks a result
//! service.record_selection("divorce-settlement").await;
//! ```
//!
//! # Pipeline
//!
//! ```text
//! query text
//!   │ locations: detect US states
//!   │ phrases:   situational phrases, negations, synonyms, legal terms
//!   │ intent:    dominant intent + hard veto filter
//!   ▼
//! scoring:    rule table -> (score, reasons) per candidate, keep > 0
//! confidence: 5-95 number + tier per candidate
//! clarify:    six ambiguity patterns over the full batch
//! engine:     rank by (tier, confidence, score), truncate to 8
//! session:    record the call afterwards, bias the next one
//! ```

pub mod clarify;
pub mod confidence;
pub mod engine;
pub mod intent;
pub mod library;
pub mod locations;
pub mod phrases;
pub mod scoring;
pub mod session;
pub mod service;
pub mod types;
pub mod weights;
pub mod workflows;

// Core surface
pub use engine::DiscoveryEngine;
pub use library::DocumentLibrary;
pub use service::DiscoveryService;
pub use types::*;
pub use weights::ScoreWeights;

// Session memory
pub use session::{
    ExperienceLevel, SearchHistoryEntry, SessionContext, SessionStore, SessionSummary, UserType,
};

// Signal analysis, exposed for host-side debugging panels
pub use intent::Intent;
pub use phrases::{MatchConfidence, PhraseContext};
pub use scoring::QueryAnalysis;
