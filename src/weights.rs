//! Scoring weight configuration
//!
//! Every magnitude the scoring and continuity rules use, in one place.
//! The defaults are the tuned production values; hosts can deserialize a
//! modified table to recalibrate without touching pipeline code.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    // Phrase context
    pub phrase_perfect: i32,
    pub phrase_partial: i32,
    pub phrase_mismatch_high: i32,
    pub phrase_mismatch_medium: i32,

    // Negative keywords
    pub negation_name_hit: i32,
    pub negation_text_hit: i32,

    // Vocabulary
    pub synonym_hit: i32,

    // Category and purpose compatibility
    pub category_match: i32,
    pub category_excluded: i32,
    pub purpose_match: i32,
    pub purpose_conflict: i32,

    // User profile
    pub experience_match: i32,
    pub audience_match: i32,
    pub audience_mismatch: i32,
    pub urgency_match: i32,
    pub complexity_match: i32,
    pub complexity_mismatch: i32,

    // Workflow relationships
    pub workflow_primary: i32,
    pub workflow_secondary: i32,
    pub workflow_follow_up: i32,

    // Location
    pub location_name_hit: i32,
    pub location_text_hit: i32,

    // Session continuity
    pub continuity_state: i32,
    pub continuity_category: i32,
    pub continuity_user_type: i32,
    pub continuity_user_type_mismatch: i32,
    pub continuity_next_step: i32,
    pub continuity_repeat: i32,
    pub continuity_selected: i32,

    // Exact-token fallback
    pub token_match: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            phrase_perfect: 300,
            phrase_partial: 150,
            phrase_mismatch_high: -200,
            phrase_mismatch_medium: -150,

            negation_name_hit: -300,
            negation_text_hit: -200,

            synonym_hit: 50,

            category_match: 150,
            category_excluded: -250,
            purpose_match: 100,
            purpose_conflict: -200,

            experience_match: 40,
            audience_match: 60,
            audience_mismatch: -40,
            urgency_match: 50,
            complexity_match: 60,
            complexity_mismatch: -40,

            workflow_primary: 150,
            workflow_secondary: 80,
            workflow_follow_up: 40,

            location_name_hit: 200,
            location_text_hit: 100,

            continuity_state: 75,
            continuity_category: 60,
            continuity_user_type: 40,
            continuity_user_type_mismatch: -25,
            continuity_next_step: 100,
            continuity_repeat: -50,
            continuity_selected: 30,

            token_match: 20,
        }
    }
}
