//! Known multi-document legal workflows
//!
//! Five fixed sequences of related templates. Scoring boosts a
//! candidate that is the primary, secondary, or follow-up document of a
//! workflow matched to the query; session continuity boosts the next
//! unvisited step of a workflow the user already started.

/// One known multi-step process and its document lineup.
#[derive(Debug, Clone, Copy)]
pub struct Workflow {
    pub name: &'static str,
    /// Query wording that activates the workflow.
    pub triggers: &'static [&'static str],
    /// The document the process centers on.
    pub primary: &'static [&'static str],
    /// Documents usually prepared alongside the primary.
    pub secondary: &'static [&'static str],
    /// Documents that typically come later in the process.
    pub follow_up: &'static [&'static str],
    /// The usual ordering of document types across the process.
    pub sequence: &'static [&'static str],
}

const WORKFLOWS: &[Workflow] = &[
    Workflow {
        name: "real-estate-purchase",
        triggers: &[
            "buying a house",
            "buying a home",
            "purchase a house",
            "home purchase",
            "buying property",
        ],
        primary: &["purchase agreement"],
        secondary: &["mortgage", "financing addendum", "disclosure"],
        follow_up: &["deed", "home inspection"],
        sequence: &["purchase agreement", "mortgage agreement", "deed"],
    },
    Workflow {
        name: "business-formation",
        triggers: &[
            "starting a business",
            "starting an llc",
            "form a company",
            "forming a company",
            "new business",
            "incorporate",
        ],
        primary: &["llc formation", "articles of organization"],
        secondary: &["operating agreement", "partnership agreement"],
        follow_up: &["employment contract", "non-disclosure"],
        sequence: &["llc formation", "operating agreement", "employment contract"],
    },
    Workflow {
        name: "employment-hiring",
        triggers: &[
            "hiring",
            "new employee",
            "bringing on staff",
            "onboarding",
        ],
        primary: &["employment contract", "employment agreement"],
        secondary: &["non-disclosure", "confidentiality"],
        follow_up: &["non-compete", "employee handbook"],
        sequence: &[
            "employment contract",
            "non-disclosure agreement",
            "non-compete agreement",
        ],
    },
    Workflow {
        name: "rental-property",
        triggers: &[
            "renting out",
            "rental property",
            "new tenant",
            "lease my house",
            "lease my apartment",
        ],
        primary: &["lease agreement", "rental agreement"],
        secondary: &["rental application", "background check"],
        follow_up: &["eviction notice", "lease renewal"],
        sequence: &["rental application", "lease agreement", "eviction notice"],
    },
    Workflow {
        name: "family-divorce",
        triggers: &[
            "getting divorced",
            "getting a divorce",
            "divorce",
            "separating from my",
            "splitting up",
        ],
        primary: &["divorce settlement"],
        secondary: &["child custody", "custody agreement"],
        follow_up: &["child support", "name change"],
        sequence: &[
            "separation agreement",
            "divorce settlement",
            "child custody agreement",
        ],
    },
];

/// The workflow a query activates, if any. First trigger match wins.
pub fn match_workflow(query_lower: &str) -> Option<&'static Workflow> {
    WORKFLOWS
        .iter()
        .find(|w| w.triggers.iter().any(|t| query_lower.contains(t)))
}

/// Index of the furthest sequence step mentioned by any of the given
/// texts, or `None` when no step has been touched yet.
pub fn furthest_step(workflow: &Workflow, texts: &[String]) -> Option<usize> {
    let mut furthest = None;
    for (idx, step) in workflow.sequence.iter().enumerate() {
        if texts.iter().any(|t| t.contains(step)) {
            furthest = Some(idx);
        }
    }
    furthest
}
