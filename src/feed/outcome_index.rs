//! Per-file `instance_id` → outcome record index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::warn;

use super::error::{FeedError, FeedResult};
use super::jsonl::read_jsonl;
use crate::config::OutcomeSpec;
use crate::store::{OutcomeKind, OutcomeValue};

/// One test-outcome feed file, indexed by instance id.
///
/// Built once per file so lookups are O(1) per sample.
#[derive(Debug, Clone)]
pub struct OutcomeIndex {
    path: PathBuf,
    records: HashMap<String, Map<String, Value>>,
}

impl OutcomeIndex {
    /// Loads and indexes a feed file. The first record per instance wins.
    pub fn load(path: &Path) -> FeedResult<Self> {
        let rows: Vec<(usize, Map<String, Value>)> = read_jsonl(path)?;
        let mut records = HashMap::with_capacity(rows.len());

        for (line, row) in rows {
            let instance_id = match row.get("instance_id").and_then(Value::as_str) {
                Some(id) => id.to_string(),
                None => {
                    return Err(FeedError::MissingInstanceId {
                        path: path.to_path_buf(),
                        line,
                    });
                }
            };

            if records.contains_key(&instance_id) {
                warn!(
                    path = %path.display(),
                    line,
                    instance_id = %instance_id,
                    "Duplicate outcome record, keeping the first"
                );
                continue;
            }
            records.insert(instance_id, row);
        }

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Index for a feed file that does not exist; every lookup yields the default.
    pub fn missing(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: HashMap::new(),
        }
    }

    /// Number of indexed instances.
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, instance_id: &str) -> Option<&Map<String, Value>> {
        self.records.get(instance_id)
    }

    /// Resolves one outcome for one instance, falling back to the outcome default when
    /// the record or field is missing or has the wrong JSON type.
    ///
    /// Returns the value and whether the default was used.
    pub fn resolve(&self, instance_id: &str, spec: &OutcomeSpec) -> (OutcomeValue, bool) {
        let Some(record) = self.get(instance_id) else {
            warn!(
                instance_id = %instance_id,
                outcome = %spec.name,
                path = %self.path.display(),
                default = %spec.default,
                "No outcome record for instance, using default"
            );
            return (spec.default, true);
        };

        let Some(raw) = record.get(&spec.field) else {
            warn!(
                instance_id = %instance_id,
                outcome = %spec.name,
                field = %spec.field,
                path = %self.path.display(),
                default = %spec.default,
                "Outcome field absent, using default"
            );
            return (spec.default, true);
        };

        match decode_outcome(raw, spec.kind) {
            Some(value) => (value, false),
            None => {
                warn!(
                    instance_id = %instance_id,
                    outcome = %spec.name,
                    kind = %spec.kind,
                    value = %raw,
                    "Outcome value has unexpected type, using default"
                );
                (spec.default, true)
            }
        }
    }
}

/// Decodes a JSON outcome value.
///
/// Counts accept an array (its length, e.g. the list of failing tests) or a
/// non-negative integer. Booleans accept only JSON booleans.
pub fn decode_outcome(value: &Value, kind: OutcomeKind) -> Option<OutcomeValue> {
    match kind {
        OutcomeKind::Bool => value.as_bool().map(OutcomeValue::Bool),
        OutcomeKind::Count => match value {
            Value::Array(items) => Some(OutcomeValue::Count(items.len() as u64)),
            Value::Number(n) => n.as_u64().map(OutcomeValue::Count),
            _ => None,
        },
    }
}
