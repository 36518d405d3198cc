//! Cross-cutting, shared constants.
//!
//! File-name fragments here must stay in sync with the tools that produce the
//! feeds (patch normalization, regression/reproduction runners, ground-truth runner).

/// Samples expected per instance when nothing else is configured.
pub const DEFAULT_NUM_SAMPLES: usize = 11;

/// Default output path for the selected predictions.
pub const DEFAULT_OUTPUT_FILE: &str = "all_preds.jsonl";

/// Value written to `model_name_or_path` in every output record.
pub const DEFAULT_MODEL_NAME: &str = "patch-rerank";

/// Stem of the per-attempt patch file: `output_{i}_normalized.jsonl`.
pub const PATCH_FEED_STEM: &str = "normalized";

/// Regression-failure count assumed when a regression record is missing.
///
/// Large enough that any sample with real results beats it on the
/// fewest-failures predicate.
pub const REGRESSION_SENTINEL_COUNT: u64 = 10_000;

/// Feed stem for regression test results.
pub const REGRESSION_FEED: &str = "regression_test_results";
/// Feed stem for reproduction test results.
pub const REPRODUCTION_FEED: &str = "reproduction_test_results";
/// Feed stem for ground-truth (FAIL_TO_PASS / PASS_TO_PASS) results.
pub const GROUND_TRUTH_FEED: &str = "ground_truth_results";

/// Builds the file name for attempt `attempt` of feed `stem`.
#[inline]
pub fn feed_file_name(attempt: usize, stem: &str) -> String {
    format!("output_{attempt}_{stem}.jsonl")
}
