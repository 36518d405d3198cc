use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::{FeedError, FeedResult};
use super::jsonl::read_jsonl;
use super::outcome_index::OutcomeIndex;
use crate::config::RerankConfig;
use crate::constants::{PATCH_FEED_STEM, feed_file_name};
use crate::store::{ExecutionStore, SampleRecord};

/// One line of `output_{i}_normalized.jsonl`.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchLine {
    pub instance_id: String,
    #[serde(default)]
    pub model_patch: Option<String>,
    #[serde(default)]
    pub normalized_patch: Option<String>,
}

/// Counters gathered while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Patch files read.
    pub patch_files: usize,
    /// Patch files that did not exist.
    pub missing_patch_files: usize,
    /// Outcome feed files that did not exist.
    pub missing_outcome_files: usize,
    /// Samples appended to the store.
    pub samples: usize,
    /// Outcome values that fell back to their default.
    pub defaulted_outcomes: usize,
}

/// Reads patch and outcome feeds from the configured folders into an [`ExecutionStore`].
///
/// Attempt `i` is read from every folder (in configured order) before attempt `i + 1`,
/// so each instance's samples land in generation order.
#[derive(Debug)]
pub struct FeedLoader<'a> {
    config: &'a RerankConfig,
}

impl<'a> FeedLoader<'a> {
    pub fn new(config: &'a RerankConfig) -> Self {
        Self { config }
    }

    /// Loads everything into a fresh store.
    pub fn load(&self) -> FeedResult<(ExecutionStore, LoadReport)> {
        let mut store = ExecutionStore::new();
        let report = self.load_into(&mut store)?;
        Ok((store, report))
    }

    /// Appends every attempt from every folder to `store`.
    pub fn load_into(&self, store: &mut ExecutionStore) -> FeedResult<LoadReport> {
        let mut report = LoadReport::default();
        let attempts = self.config.samples_per_folder();

        if self.config.num_samples % self.config.patch_folders.len().max(1) != 0 {
            warn!(
                num_samples = self.config.num_samples,
                folders = self.config.patch_folders.len(),
                attempts_per_folder = attempts,
                "num_samples is not a multiple of the folder count, extra samples are ignored"
            );
        }

        for attempt in 0..attempts {
            for root in &self.config.patch_folders {
                self.load_attempt(root, attempt, store, &mut report)?;
            }
        }

        info!(
            instances = store.len(),
            samples = report.samples,
            patch_files = report.patch_files,
            missing_patch_files = report.missing_patch_files,
            missing_outcome_files = report.missing_outcome_files,
            defaulted_outcomes = report.defaulted_outcomes,
            "Loaded execution results"
        );

        Ok(report)
    }

    fn load_attempt(
        &self,
        root: &Path,
        attempt: usize,
        store: &mut ExecutionStore,
        report: &mut LoadReport,
    ) -> FeedResult<()> {
        let patch_path = root.join(feed_file_name(attempt, PATCH_FEED_STEM));
        if !patch_path.is_file() {
            warn!(path = %patch_path.display(), "Patch file missing, skipping attempt");
            report.missing_patch_files += 1;
            return Ok(());
        }

        let patches: Vec<(usize, PatchLine)> = read_jsonl(&patch_path)?;
        report.patch_files += 1;
        info!(
            path = %patch_path.display(),
            patches = patches.len(),
            "Loaded patches"
        );

        let indices = self.load_outcome_indices(root, attempt, report)?;

        for (line, patch) in patches {
            let raw_patch = patch.model_patch.unwrap_or_default();
            let normalized_key = if self.config.deduplicate {
                match patch.normalized_patch {
                    Some(normalized) => normalized.trim().to_string(),
                    None => {
                        return Err(FeedError::MissingNormalizedPatch {
                            path: patch_path.clone(),
                            line,
                        });
                    }
                }
            } else {
                raw_patch.trim().to_string()
            };

            let mut record = SampleRecord::new(patch.instance_id, raw_patch, normalized_key);
            for spec in &self.config.outcomes {
                // Every feed named by the vocabulary was indexed above.
                let Some(index) = indices.get(spec.feed.as_str()) else {
                    continue;
                };
                let (value, defaulted) = index.resolve(&record.instance_id, spec);
                if defaulted {
                    report.defaulted_outcomes += 1;
                }
                record.outcomes.insert(spec.name.clone(), value);
            }

            let sample_index = store.push(record);
            report.samples += 1;
            debug!(attempt, sample_index, "Appended sample");
        }

        Ok(())
    }

    fn load_outcome_indices(
        &self,
        root: &Path,
        attempt: usize,
        report: &mut LoadReport,
    ) -> FeedResult<HashMap<&'a str, OutcomeIndex>> {
        let mut indices = HashMap::new();

        for feed in self.config.outcome_feeds() {
            let path = root.join(feed_file_name(attempt, feed));
            let index = if path.is_file() {
                let index = OutcomeIndex::load(&path)?;
                debug!(path = %path.display(), records = index.len(), "Indexed outcome feed");
                index
            } else {
                warn!(
                    path = %path.display(),
                    "Outcome feed missing, all samples in this attempt use defaults"
                );
                report.missing_outcome_files += 1;
                OutcomeIndex::missing(&path)
            };
            indices.insert(feed, index);
        }

        Ok(indices)
    }
}
