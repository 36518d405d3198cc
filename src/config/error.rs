//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
///
/// All of these surface at startup, before any feed is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("failed to parse {name} '{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A boolean setting was not one of the accepted spellings.
    #[error("invalid boolean for {name}: '{value}'")]
    InvalidBool { name: &'static str, value: String },

    /// Preset name not recognized.
    #[error("unknown preset '{value}'")]
    UnknownPreset { value: String },

    /// Tier expression could not be parsed.
    #[error("invalid tier '{value}': {reason}")]
    InvalidTier { value: String, reason: String },

    /// No patch folder was configured.
    #[error("no patch folder configured (set RERANK_PATCH_FOLDERS or pass --patch-folder)")]
    NoPatchFolders,

    /// `num_samples` was zero.
    #[error("num_samples must be at least 1")]
    ZeroSamples,

    /// Fewer samples than folders, so no attempt would be loaded from any folder.
    #[error("num_samples ({num_samples}) is smaller than the number of patch folders ({folders})")]
    TooFewSamples { num_samples: usize, folders: usize },

    /// A configured tier has no predicates.
    #[error("tier {position} has no outcome predicates")]
    EmptyTier { position: usize },

    /// A tier references an outcome that is not in the vocabulary.
    #[error("tier '{tier}' references unknown outcome '{outcome}'")]
    UnknownOutcome { tier: String, outcome: String },

    /// Two outcomes share a name.
    #[error("outcome '{name}' is defined more than once")]
    DuplicateOutcome { name: String },

    /// An outcome's default value does not match its kind.
    #[error("outcome '{name}' has a default of the wrong kind")]
    DefaultKindMismatch { name: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
