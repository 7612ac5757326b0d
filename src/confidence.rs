//! Confidence calculation
//!
//! Maps a candidate's raw score and reason list onto a 5-95 confidence
//! number, a discrete tier, and a fixed user-facing message. The band
//! comes from the raw score; reason-based adjustments move the number
//! inside (and occasionally across) the band.

use crate::scoring::rule_ids;
use crate::types::{Confidence, ConfidenceTier, Reason};

/// Numeric confidence floor and ceiling.
const MIN_CONFIDENCE: i32 = 5;
const MAX_CONFIDENCE: i32 = 95;

/// Bonus when at least three independent positive signals agree.
const CORROBORATION_BONUS: i32 = 10;
const CORROBORATION_THRESHOLD: usize = 3;

/// Penalty per negative or exclusion reason.
const NEGATIVE_PENALTY: i32 = 15;

/// Bonus for a perfect phrase or legal-term match.
const PERFECT_MATCH_BONUS: i32 = 15;

/// Adjusted confidence at or above this promotes the tier to excellent
/// when a perfect-match reason is present.
const PROMOTION_FLOOR: i32 = 85;

/// Negative reasons force the poor tier below this number.
const DEMOTION_CEILING: i32 = 30;

/// Compute confidence for one scored candidate.
pub fn calculate(score: i32, reasons: &[Reason]) -> Confidence {
    let mut value = base_confidence(score);
    let mut tier = base_tier(score);

    let positives = reasons.iter().filter(|r| !r.is_negative()).count();
    if positives >= CORROBORATION_THRESHOLD {
        value += CORROBORATION_BONUS;
    }

    let negatives = reasons.iter().filter(|r| r.is_negative()).count() as i32;
    value -= NEGATIVE_PENALTY * negatives;

    let perfect = has_perfect_match(reasons);
    if perfect {
        value += PERFECT_MATCH_BONUS;
    }

    let value = value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

    if perfect && value >= PROMOTION_FLOOR {
        tier = ConfidenceTier::Excellent;
    }
    if negatives > 0 && value < DEMOTION_CEILING {
        tier = ConfidenceTier::Poor;
    }

    Confidence {
        score: value as u8,
        tier,
        message: tier_message(tier).to_string(),
    }
}

/// Piecewise band mapping from raw score to the 5-95 scale.
fn base_confidence(score: i32) -> i32 {
    if score >= 300 {
        (70 + (score - 300) / 20).min(95)
    } else if score >= 200 {
        (50 + (score - 200) / 5).min(69)
    } else if score >= 100 {
        (25 + (score - 100) / 4).min(49)
    } else if score >= 50 {
        (10 + (score - 50) / 4).min(24)
    } else {
        (5 + score.max(0) / 13).min(9)
    }
}

fn base_tier(score: i32) -> ConfidenceTier {
    if score >= 300 {
        ConfidenceTier::Excellent
    } else if score >= 200 {
        ConfidenceTier::Good
    } else if score >= 100 {
        ConfidenceTier::Fair
    } else if score >= 50 {
        ConfidenceTier::Weak
    } else {
        ConfidenceTier::Poor
    }
}

/// A reason counts as a perfect match when the phrase rule fired at full
/// strength or a strong legal-term mapping landed.
fn has_perfect_match(reasons: &[Reason]) -> bool {
    reasons.iter().any(|r| {
        (r.rule == rule_ids::PHRASE && r.delta >= 300)
            || (r.rule == rule_ids::LEGAL_TERM && r.delta >= 150)
    })
}

fn tier_message(tier: ConfidenceTier) -> &'static str {
    match tier {
        ConfidenceTier::Excellent => "Excellent match for your situation",
        ConfidenceTier::Good => "Good match, worth reviewing",
        ConfidenceTier::Fair => "Possible match, check the details",
        ConfidenceTier::Weak => "Weak match, consider refining your search",
        ConfidenceTier::Poor => "Low relevance to your search",
    }
}
