//! Line-oriented JSON reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::{FeedError, FeedResult};

/// Reads one `T` per non-blank line, paired with its 1-based line number.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> FeedResult<Vec<(usize, T)>> {
    let file = File::open(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let row = serde_json::from_str(&line).map_err(|source| FeedError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        rows.push((idx + 1, row));
    }

    Ok(rows)
}
