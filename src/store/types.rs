use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a test-outcome value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    /// Pass/fail.
    Bool,
    /// Orderable count (e.g. failing regression tests). Lower is better.
    Count,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Bool => write!(f, "bool"),
            OutcomeKind::Count => write!(f, "count"),
        }
    }
}

/// One test outcome attached to a sample.
///
/// Serializes untagged, so it round-trips as a plain JSON `true` / `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutcomeValue {
    /// Pass/fail outcome.
    Bool(bool),
    /// Count outcome.
    Count(u64),
}

impl OutcomeValue {
    /// Returns the kind of this value.
    #[inline]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            OutcomeValue::Bool(_) => OutcomeKind::Bool,
            OutcomeValue::Count(_) => OutcomeKind::Count,
        }
    }

    /// Returns the boolean, if this is a `Bool`.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OutcomeValue::Bool(b) => Some(*b),
            OutcomeValue::Count(_) => None,
        }
    }

    /// Returns the count, if this is a `Count`.
    #[inline]
    pub fn as_count(&self) -> Option<u64> {
        match self {
            OutcomeValue::Count(n) => Some(*n),
            OutcomeValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for OutcomeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeValue::Bool(b) => write!(f, "{b}"),
            OutcomeValue::Count(n) => write!(f, "{n}"),
        }
    }
}

/// One candidate patch for one instance from one repair attempt.
///
/// `sample_index` is assigned by [`ExecutionStore::push`](super::ExecutionStore::push)
/// and is the record's position in its instance's generation-ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    /// Task identifier.
    pub instance_id: String,
    /// Position in generation order (0-based, unique per instance).
    pub sample_index: usize,
    /// Unmodified patch text. May be empty.
    pub raw_patch: String,
    /// Canonical form used only for equality comparison.
    pub normalized_key: String,
    /// Test outcomes keyed by outcome name.
    pub outcomes: BTreeMap<String, OutcomeValue>,
}

impl SampleRecord {
    /// Creates a record with no outcomes. `sample_index` is set on insertion.
    pub fn new(
        instance_id: impl Into<String>,
        raw_patch: impl Into<String>,
        normalized_key: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            sample_index: 0,
            raw_patch: raw_patch.into(),
            normalized_key: normalized_key.into(),
            outcomes: BTreeMap::new(),
        }
    }

    /// Attaches an outcome value.
    pub fn with_outcome(mut self, name: impl Into<String>, value: OutcomeValue) -> Self {
        self.outcomes.insert(name.into(), value);
        self
    }

    /// A sample takes part in voting only if both its raw patch and its key are non-blank.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.normalized_key.trim().is_empty() && !self.raw_patch.trim().is_empty()
    }

    /// Looks up an outcome by name.
    #[inline]
    pub fn outcome(&self, name: &str) -> Option<OutcomeValue> {
        self.outcomes.get(name).copied()
    }
}
