//! Result emitter: one JSON line per instance.
//!
//! Record shape (SWE-bench predictions format):
//!
//! ```json
//! {"model_name_or_path": "...", "instance_id": "...", "model_patch": "...", "<outcome>": ...}
//! ```
//!
//! Outcome fields appear only when tiers were configured and a sample won.

pub mod error;


pub use error::EmitError;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::selection::Selection;
use crate::store::OutcomeValue;

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub model_name_or_path: String,
    pub instance_id: String,
    pub model_patch: String,
    #[serde(flatten)]
    pub outcomes: BTreeMap<String, OutcomeValue>,
}

impl PredictionRecord {
    pub fn from_selection(model_name: &str, selection: &Selection) -> Self {
        Self {
            model_name_or_path: model_name.to_string(),
            instance_id: selection.instance_id.clone(),
            model_patch: selection.patch.clone(),
            outcomes: selection.outcomes.clone(),
        }
    }
}

/// Appends [`PredictionRecord`]s to a writer, one per call.
#[derive(Debug)]
pub struct ResultEmitter<W: Write> {
    writer: W,
    model_name: String,
    written: usize,
}

impl ResultEmitter<BufWriter<File>> {
    /// Creates (truncating) `path` and writes to it.
    pub fn create(path: &Path, model_name: impl Into<String>) -> Result<Self, EmitError> {
        let file = File::create(path).map_err(|source| EmitError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), model_name))
    }
}

impl<W: Write> ResultEmitter<W> {
    pub fn new(writer: W, model_name: impl Into<String>) -> Self {
        Self {
            writer,
            model_name: model_name.into(),
            written: 0,
        }
    }

    /// Writes one line for `selection`.
    pub fn emit(&mut self, selection: &Selection) -> Result<(), EmitError> {
        let record = PredictionRecord::from_selection(&self.model_name, selection);
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, EmitError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
