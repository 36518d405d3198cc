//! Test fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use rerank::{PredictionRecord, RerankConfig, feed_file_name};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const PATCH_STEM: &str = "normalized";

/// A temporary patch folder laid out like a repair run's output directory.
pub struct PatchFolder {
    dir: TempDir,
}

impl PatchFolder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `output_{attempt}_normalized.jsonl` from `(instance_id, raw, normalized)`.
    pub fn write_patches(&self, attempt: usize, patches: &[(&str, &str, &str)]) {
        let lines: Vec<Value> = patches
            .iter()
            .map(|(id, raw, normalized)| {
                json!({
                    "instance_id": id,
                    "model_patch": raw,
                    "normalized_patch": normalized,
                })
            })
            .collect();
        self.write_feed(attempt, PATCH_STEM, &lines);
    }

    /// Writes `output_{attempt}_{stem}.jsonl`, one JSON value per line.
    pub fn write_feed(&self, attempt: usize, stem: &str, lines: &[Value]) {
        let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
        fs::write(self.path().join(feed_file_name(attempt, stem)), body).expect("write feed");
    }
}

/// Config reading `folders` and writing to `output`.
pub fn config_for(folders: &[&PatchFolder], num_samples: usize, output: PathBuf) -> RerankConfig {
    RerankConfig {
        patch_folders: folders.iter().map(|f| f.path().to_path_buf()).collect(),
        num_samples,
        output_file: output,
        ..Default::default()
    }
}

pub fn read_predictions(path: &Path) -> Vec<PredictionRecord> {
    fs::read_to_string(path)
        .expect("read predictions")
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid prediction line"))
        .collect()
}

pub fn prediction<'a>(records: &'a [PredictionRecord], instance_id: &str) -> &'a PredictionRecord {
    records
        .iter()
        .find(|r| r.instance_id == instance_id)
        .unwrap_or_else(|| panic!("no prediction for {instance_id}"))
}
