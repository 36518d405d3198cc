//! Patch selection: outcome tiers, equivalence voting and the fallback cascade.
//!
//! For each instance the [`OutcomeClassifier`] produces candidate sets from most to
//! least restrictive, the [`CascadeController`] takes the first non-empty one and
//! hands it to [`voter::select`], and the winning sample's raw patch is emitted.
//!
//! # Tie-breaking
//!
//! Groups are ranked by vote count, then by the smallest `sample_index` among their
//! members. The result depends only on the records, so reruns produce identical output.

pub mod cascade;
pub mod classifier;
pub mod error;
pub mod types;
pub mod voter;


pub use cascade::CascadeController;
pub use classifier::OutcomeClassifier;
pub use error::{SelectionError, SelectionResult};
pub use types::{CandidateTier, Decision, RunSummary, Selection, TierKind, Vote, VoteGroup};
