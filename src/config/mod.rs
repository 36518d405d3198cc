//! Environment-backed run configuration.
//!
//! Most settings have defaults. Override with `RERANK_*` environment variables; the
//! binary layers command-line flags on top of [`RerankConfig::from_env`].

pub mod error;
pub mod vocabulary;


pub use error::ConfigError;
pub use vocabulary::{OutcomeSpec, Preset, TierSpec};

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MODEL_NAME, DEFAULT_NUM_SAMPLES, DEFAULT_OUTPUT_FILE};

/// Reranking run configuration.
///
/// Use [`RerankConfig::from_env`] to read `RERANK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct RerankConfig {
    /// Folders holding per-attempt feed files, loaded in this order.
    pub patch_folders: Vec<PathBuf>,

    /// Samples expected per instance, across all folders. Default: `11`.
    pub num_samples: usize,

    /// Vote on normalized patches (`true`) or on raw patch text. Default: `true`.
    pub deduplicate: bool,

    /// Output JSON-lines path. Default: `all_preds.jsonl`.
    pub output_file: PathBuf,

    /// Value of `model_name_or_path` in output records.
    pub model_name: String,

    /// Outcome vocabulary read from the test-outcome feeds.
    pub outcomes: Vec<OutcomeSpec>,

    /// Priority tiers, most restrictive first. Empty means plain majority vote.
    pub tiers: Vec<TierSpec>,

    /// Instance whose vote groups are logged in full.
    pub target: Option<String>,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            patch_folders: Vec::new(),
            num_samples: DEFAULT_NUM_SAMPLES,
            deduplicate: true,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            outcomes: Vec::new(),
            tiers: Vec::new(),
            target: None,
        }
    }
}

impl RerankConfig {
    const ENV_PATCH_FOLDERS: &'static str = "RERANK_PATCH_FOLDERS";
    const ENV_NUM_SAMPLES: &'static str = "RERANK_NUM_SAMPLES";
    const ENV_DEDUPLICATE: &'static str = "RERANK_DEDUPLICATE";
    const ENV_OUTPUT_FILE: &'static str = "RERANK_OUTPUT_FILE";
    const ENV_MODEL_NAME: &'static str = "RERANK_MODEL_NAME";
    const ENV_PRESET: &'static str = "RERANK_PRESET";
    const ENV_TIERS: &'static str = "RERANK_TIERS";
    const ENV_TARGET: &'static str = "RERANK_TARGET";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let patch_folders = Self::parse_paths_from_env(Self::ENV_PATCH_FOLDERS);
        let num_samples = Self::parse_usize_from_env(Self::ENV_NUM_SAMPLES, defaults.num_samples)?;
        let deduplicate = Self::parse_bool_from_env(Self::ENV_DEDUPLICATE, defaults.deduplicate)?;
        let output_file = env::var(Self::ENV_OUTPUT_FILE)
            .map(PathBuf::from)
            .unwrap_or(defaults.output_file);
        let model_name = env::var(Self::ENV_MODEL_NAME).unwrap_or(defaults.model_name);
        let target = Self::parse_optional_string_from_env(Self::ENV_TARGET);

        let preset = match Self::parse_optional_string_from_env(Self::ENV_PRESET) {
            Some(value) => value
                .parse::<Preset>()
                .map_err(|_| ConfigError::UnknownPreset { value })?,
            None => Preset::default(),
        };

        let mut config = Self {
            patch_folders,
            num_samples,
            deduplicate,
            output_file,
            model_name,
            target,
            ..Self::default()
        }
        .with_preset(preset);

        if let Some(value) = Self::parse_optional_string_from_env(Self::ENV_TIERS) {
            config.tiers = Self::parse_tier_list(&value)?;
        }

        Ok(config)
    }

    /// Replaces the outcome vocabulary and tiers with those of `preset`.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.outcomes = preset.outcomes();
        self.tiers = preset.tiers();
        self
    }

    /// Replaces the tiers, keeping the outcome vocabulary.
    pub fn with_tiers(mut self, tiers: Vec<TierSpec>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Parses a comma-separated tier list such as `regression+reproduction,regression`.
    pub fn parse_tier_list(value: &str) -> Result<Vec<TierSpec>, ConfigError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<TierSpec>()
                    .map_err(|reason| ConfigError::InvalidTier {
                        value: t.to_string(),
                        reason,
                    })
            })
            .collect()
    }

    /// Validates folders, sample count and the tier/outcome vocabulary.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patch_folders.is_empty() {
            return Err(ConfigError::NoPatchFolders);
        }

        for path in &self.patch_folders {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.num_samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.num_samples < self.patch_folders.len() {
            return Err(ConfigError::TooFewSamples {
                num_samples: self.num_samples,
                folders: self.patch_folders.len(),
            });
        }

        self.validate_vocabulary()
    }

    /// Checks outcome names are unique, defaults match kinds, and every tier
    /// predicate names a known outcome.
    pub fn validate_vocabulary(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for outcome in &self.outcomes {
            if !names.insert(outcome.name.as_str()) {
                return Err(ConfigError::DuplicateOutcome {
                    name: outcome.name.clone(),
                });
            }
            if outcome.default.kind() != outcome.kind {
                return Err(ConfigError::DefaultKindMismatch {
                    name: outcome.name.clone(),
                });
            }
        }

        for (position, tier) in self.tiers.iter().enumerate() {
            if tier.is_empty() {
                return Err(ConfigError::EmptyTier { position });
            }
            if let Some(unknown) = tier.outcomes().iter().find(|o| !names.contains(o.as_str())) {
                return Err(ConfigError::UnknownOutcome {
                    tier: tier.to_string(),
                    outcome: unknown.clone(),
                });
            }
        }

        Ok(())
    }

    /// Attempts loaded from each folder (`num_samples / folders`).
    pub fn samples_per_folder(&self) -> usize {
        if self.patch_folders.is_empty() {
            return 0;
        }
        self.num_samples / self.patch_folders.len()
    }

    /// Outcomes copied from the winning sample into each output record.
    ///
    /// The whole vocabulary when any tier is configured, nothing for a plain vote.
    pub fn echoed_outcomes(&self) -> Vec<&OutcomeSpec> {
        if self.tiers.is_empty() {
            return Vec::new();
        }
        self.outcomes.iter().collect()
    }

    /// Distinct feed stems named by the vocabulary, in first-use order.
    pub fn outcome_feeds(&self) -> Vec<&str> {
        let mut feeds: Vec<&str> = Vec::new();
        for outcome in &self.outcomes {
            if !feeds.contains(&outcome.feed.as_str()) {
                feeds.push(outcome.feed.as_str());
            }
        }
        feeds
    }

    fn parse_paths_from_env(var_name: &str) -> Vec<PathBuf> {
        env::var(var_name)
            .map(|v| Self::split_folder_list(&v))
            .unwrap_or_default()
    }

    /// Splits a comma-separated folder list, dropping blanks.
    pub fn split_folder_list(value: &str) -> Vec<PathBuf> {
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
