//! US state detection in query text
//!
//! Matching is raw substring containment against three fixed tables:
//! full state names, postal abbreviations, and major cities. There is no
//! word-boundary check, so short abbreviations can fire inside unrelated
//! words ("or" in "for", "la" in "land"). Scoring weights were tuned
//! against this lenient behavior; tightening it would silently re-rank.

/// Full state name -> postal code.
const STATE_NAMES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Lowercased postal abbreviations, matched by containment.
const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("al", "AL"),
    ("ak", "AK"),
    ("az", "AZ"),
    ("ar", "AR"),
    ("ca", "CA"),
    ("co", "CO"),
    ("ct", "CT"),
    ("de", "DE"),
    ("fl", "FL"),
    ("ga", "GA"),
    ("hi", "HI"),
    ("id", "ID"),
    ("il", "IL"),
    ("in", "IN"),
    ("ia", "IA"),
    ("ks", "KS"),
    ("ky", "KY"),
    ("la", "LA"),
    ("me", "ME"),
    ("md", "MD"),
    ("ma", "MA"),
    ("mi", "MI"),
    ("mn", "MN"),
    ("ms", "MS"),
    ("mo", "MO"),
    ("mt", "MT"),
    ("ne", "NE"),
    ("nv", "NV"),
    ("nh", "NH"),
    ("nj", "NJ"),
    ("nm", "NM"),
    ("ny", "NY"),
    ("nc", "NC"),
    ("nd", "ND"),
    ("oh", "OH"),
    ("ok", "OK"),
    ("or", "OR"),
    ("pa", "PA"),
    ("ri", "RI"),
    ("sc", "SC"),
    ("sd", "SD"),
    ("tn", "TN"),
    ("tx", "TX"),
    ("ut", "UT"),
    ("vt", "VT"),
    ("va", "VA"),
    ("wa", "WA"),
    ("wv", "WV"),
    ("wi", "WI"),
    ("wy", "WY"),
];

/// Major city -> state, for queries like "apartment in austin".
const MAJOR_CITIES: &[(&str, &str)] = &[
    ("new york city", "NY"),
    ("los angeles", "CA"),
    ("san francisco", "CA"),
    ("san diego", "CA"),
    ("sacramento", "CA"),
    ("chicago", "IL"),
    ("houston", "TX"),
    ("dallas", "TX"),
    ("austin", "TX"),
    ("san antonio", "TX"),
    ("phoenix", "AZ"),
    ("philadelphia", "PA"),
    ("seattle", "WA"),
    ("denver", "CO"),
    ("boston", "MA"),
    ("atlanta", "GA"),
    ("miami", "FL"),
    ("orlando", "FL"),
    ("las vegas", "NV"),
    ("portland", "OR"),
    ("detroit", "MI"),
    ("nashville", "TN"),
    ("charlotte", "NC"),
    ("minneapolis", "MN"),
    ("new orleans", "LA"),
];

/// Extract the deduplicated set of state codes mentioned in a query.
///
/// Expects lowercased text; order follows table order so output is
/// deterministic for a fixed input.
pub fn extract_states(text_lower: &str) -> Vec<String> {
    let mut codes = Vec::new();

    for (name, code) in STATE_NAMES {
        if text_lower.contains(name) {
            push_unique(&mut codes, code);
        }
    }
    for (abbrev, code) in STATE_ABBREVIATIONS {
        if text_lower.contains(abbrev) {
            push_unique(&mut codes, code);
        }
    }
    for (city, code) in MAJOR_CITIES {
        if text_lower.contains(city) {
            push_unique(&mut codes, code);
        }
    }

    codes
}

/// Full state name for a postal code, used when matching candidate text.
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

fn push_unique(codes: &mut Vec<String>, code: &str) {
    if !codes.iter().any(|c| c == code) {
        codes.push(code.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_full_state_name() {
        let states = extract_states("buying a used car in texas");
        assert!(states.contains(&"TX".to_string()));
    }

    #[test]
    fn test_extract_city() {
        let states = extract_states("renting an apartment in austin");
        assert!(states.contains(&"TX".to_string()));
    }

    #[test]
    fn test_extract_multiple_states() {
        let states = extract_states("moving from california to new york");
        assert!(states.contains(&"CA".to_string()));
        assert!(states.contains(&"NY".to_string()));
    }

    #[test]
    fn test_deduplicates_codes() {
        // "texas" hits the name table and "tx" hits the abbreviation table
        let states = extract_states("texas tx");
        let tx_count = states.iter().filter(|s| *s == "TX").count();
        assert_eq!(tx_count, 1);
    }

    #[test]
    fn test_substring_containment_is_lenient() {
        // Documented quirk: "or" matches inside "for". Locked in by the
        // tuned scoring constants, so the behavior is asserted, not fixed.
        let states = extract_states("looking for a lease");
        assert!(states.contains(&"OR".to_string()));
    }

    #[test]
    fn test_state_name_lookup() {
        assert_eq!(state_name("TX"), Some("texas"));
        assert_eq!(state_name("CA"), Some("california"));
        assert_eq!(state_name("ZZ"), None);
    }
}
