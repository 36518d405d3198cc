use std::collections::BTreeMap;
use std::fmt;

use crate::store::OutcomeValue;

/// Position of a candidate set in the fallback cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKind {
    /// A configured tier, by position (0 = most restrictive).
    Configured(usize),
    /// Every valid sample, regardless of outcomes.
    AllValid,
    /// Every sample. Only reached when no sample is valid.
    Terminal,
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierKind::Configured(i) => write!(f, "tier-{i}"),
            TierKind::AllValid => write!(f, "all-valid"),
            TierKind::Terminal => write!(f, "terminal"),
        }
    }
}

/// Sample positions admitted by one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTier {
    pub kind: TierKind,
    /// Positions into the instance's record slice, ascending.
    pub indices: Vec<usize>,
}

impl CandidateTier {
    pub fn new(kind: TierKind, indices: Vec<usize>) -> Self {
        Self { kind, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Samples within a tier sharing one normalized key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteGroup {
    /// BLAKE3 digest of the normalized key.
    pub key_hash: [u8; 32],
    /// Member count.
    pub votes: usize,
    /// Smallest `sample_index` among members.
    pub first_appear_index: usize,
    /// Record position of the member with `first_appear_index`.
    pub representative: usize,
}

/// Outcome of one vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Record position whose raw patch is emitted.
    pub winner: usize,
    /// All groups, best first (votes descending, then earliest first appearance).
    pub groups: Vec<VoteGroup>,
}

impl Vote {
    /// The winning group.
    pub fn winning_group(&self) -> &VoteGroup {
        // groups is never empty: the voter errors instead of returning an empty vote
        &self.groups[0]
    }
}

/// How an instance's patch was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A tier was non-empty and a vote picked `sample_index`.
    Voted {
        tier: TierKind,
        sample_index: usize,
        votes: usize,
        groups: usize,
    },
    /// No valid sample; the empty patch is emitted.
    EmptyPatch,
}

impl Decision {
    pub fn is_empty_patch(&self) -> bool {
        matches!(self, Decision::EmptyPatch)
    }

    pub fn tier(&self) -> Option<TierKind> {
        match self {
            Decision::Voted { tier, .. } => Some(*tier),
            Decision::EmptyPatch => None,
        }
    }

    pub fn sample_index(&self) -> Option<usize> {
        match self {
            Decision::Voted { sample_index, .. } => Some(*sample_index),
            Decision::EmptyPatch => None,
        }
    }
}

/// Final choice for one instance, ready for the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub instance_id: String,
    pub decision: Decision,
    /// Raw patch text of the winner, or empty.
    pub patch: String,
    /// Winner's values for every outcome used in a tier. Empty when no tiers are
    /// configured or no sample won.
    pub outcomes: BTreeMap<String, OutcomeValue>,
}

impl Selection {
    pub fn empty(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            decision: Decision::EmptyPatch,
            patch: String::new(),
            outcomes: BTreeMap::new(),
        }
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Instances processed (one output record each).
    pub instances: usize,
    /// Decisions made in each configured tier, by position.
    pub configured: Vec<usize>,
    /// Decisions made by the all-valid fallback.
    pub all_valid: usize,
    /// Empty-patch results.
    pub empty: usize,
    /// Instances with fewer samples than expected.
    pub short_instances: usize,
}

impl RunSummary {
    pub fn with_tiers(tiers: usize) -> Self {
        Self {
            configured: vec![0; tiers],
            ..Self::default()
        }
    }

    pub fn record(&mut self, decision: &Decision) {
        self.instances += 1;
        match decision.tier() {
            Some(TierKind::Configured(i)) => {
                if let Some(slot) = self.configured.get_mut(i) {
                    *slot += 1;
                }
            }
            Some(TierKind::AllValid) => self.all_valid += 1,
            Some(TierKind::Terminal) | None => self.empty += 1,
        }
    }
}
