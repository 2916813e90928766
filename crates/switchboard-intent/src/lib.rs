//! Intent classification and specialist-state transitions.
//!
//! The classifier maps a free-text utterance to a specialist [`Domain`] by
//! weighted keyword matching; the [`switch`] function is the single place a
//! session's active specialist changes.

use switchboard_types::{Domain, Specialist};

mod keywords;

pub use keywords::keywords_for;

/// Classifies an utterance into a specialist domain.
///
/// The utterance is lowercased and each domain's keyword table is scored by
/// the number of members occurring as substrings. The strictly highest score
/// wins. An all-zero score means no confident match and returns `None`.
///
/// Ties between nonzero scores resolve by the fixed priority
/// sales > support > operations > technical ([`Domain::ALL`] order), so
/// classification is deterministic for every input.
pub fn classify(utterance: &str) -> Option<Domain> {
    let lowered = utterance.to_lowercase();

    let mut best: Option<(Domain, usize)> = None;
    for domain in Domain::ALL {
        let score = keywords_for(domain)
            .iter()
            .filter(|kw| lowered.contains(*kw))
            .count();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((domain, score));
        }
    }

    best.map(|(domain, _)| domain)
}

/// Outcome of a specialist switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// The specialist that was active before the switch.
    pub previous: Specialist,
    /// Whether the active specialist actually changed.
    pub changed: bool,
}

/// Transitions a session's active specialist.
///
/// Total over all (current, requested) pairs: requesting the already-active
/// specialist leaves the state untouched and reports `changed == false`.
pub fn switch(current: &mut Specialist, requested: Domain) -> SwitchOutcome {
    let previous = *current;
    if previous == Specialist::Domain(requested) {
        return SwitchOutcome {
            previous,
            changed: false,
        };
    }
    *current = Specialist::Domain(requested);
    SwitchOutcome {
        previous,
        changed: true,
    }
}
