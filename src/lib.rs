//! Patch reranking library crate (used by the binary and integration tests).
//!
//! Picks one patch per benchmark instance out of the candidates produced by several
//! independent repair attempts.
//!
//! # Pipeline
//!
//! 1. [`FeedLoader`] reads `output_{i}_normalized.jsonl` and the configured outcome
//!    feeds from each patch folder into an [`ExecutionStore`].
//! 2. [`CascadeController`] asks the [`OutcomeClassifier`] for candidate tiers, most
//!    restrictive first, and votes on the first non-empty one.
//! 3. [`ResultEmitter`] writes one prediction line per instance, in load order.
//!
//! # Public API Surface
//!
//! - [`RerankConfig`], [`ConfigError`], [`Preset`], [`OutcomeSpec`], [`TierSpec`] - Configuration
//! - [`ExecutionStore`], [`SampleRecord`], [`OutcomeValue`] - Loaded results
//! - [`FeedLoader`], [`FeedError`] - JSON-lines input
//! - [`CascadeController`], [`Selection`], [`RunSummary`] - Selection
//! - [`ResultEmitter`], [`PredictionRecord`] - JSON-lines output

pub mod config;
pub mod constants;
pub mod emitter;
pub mod feed;
pub mod hashing;
pub mod selection;
pub mod store;

pub use config::{ConfigError, OutcomeSpec, Preset, RerankConfig, TierSpec};
pub use constants::{
    DEFAULT_MODEL_NAME, DEFAULT_NUM_SAMPLES, DEFAULT_OUTPUT_FILE, REGRESSION_SENTINEL_COUNT,
    feed_file_name,
};
pub use emitter::{EmitError, PredictionRecord, ResultEmitter};
pub use feed::{FeedError, FeedLoader, FeedResult, LoadReport, OutcomeIndex};
pub use hashing::{fingerprint_hex, hash_patch_key, patch_fingerprint};
pub use selection::{
    CandidateTier, CascadeController, Decision, OutcomeClassifier, RunSummary, Selection,
    SelectionError, SelectionResult, TierKind, Vote, VoteGroup, voter,
};
pub use store::{ExecutionStore, OutcomeKind, OutcomeValue, SampleRecord};

/// Loads the configured feeds, selects a patch per instance and writes the output file.
pub fn run(config: &RerankConfig) -> anyhow::Result<RunSummary> {
    config.validate()?;

    let (store, report) = FeedLoader::new(config).load()?;
    tracing::info!(
        instances = store.len(),
        samples = report.samples,
        "Execution results ready"
    );

    let cascade = CascadeController::new(config)?;
    let mut emitter = ResultEmitter::create(&config.output_file, config.model_name.clone())?;
    let summary = cascade.run(&store, &mut emitter)?;
    let written = emitter.written();
    emitter.finish()?;

    tracing::info!(
        output = %config.output_file.display(),
        records = written,
        "Wrote predictions"
    );

    Ok(summary)
}
