use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON at {path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record at {path}:{line} has no instance_id")]
    MissingInstanceId { path: PathBuf, line: usize },

    #[error(
        "record at {path}:{line} has no normalized_patch (run patch normalization first, or disable deduplication)"
    )]
    MissingNormalizedPatch { path: PathBuf, line: usize },
}

pub type FeedResult<T> = Result<T, FeedError>;
