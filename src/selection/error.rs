use thiserror::Error;

use crate::emitter::EmitError;

#[derive(Debug, Error)]
pub enum SelectionError {
    /// The voter was handed no candidates. The cascade never does this.
    #[error("internal invariant violated: empty candidate set for instance {instance_id}")]
    EmptyCandidateSet { instance_id: String },

    /// Every candidate had an empty normalized key. The classifier filters these out.
    #[error("internal invariant violated: no candidate with a non-empty key for instance {instance_id}")]
    NoValidCandidates { instance_id: String },

    /// A tier names an outcome that is not in the vocabulary.
    #[error("tier '{tier}' references unknown outcome '{outcome}'")]
    UnknownOutcome { tier: String, outcome: String },

    #[error("emit failed: {0}")]
    Emit(#[from] EmitError),
}

pub type SelectionResult<T> = Result<T, SelectionError>;
