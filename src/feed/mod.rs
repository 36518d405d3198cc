//! JSON-lines feed loading.
//!
//! Each patch folder holds, per attempt `i`:
//! - `output_{i}_normalized.jsonl`: `instance_id`, `model_patch`, `normalized_patch`
//! - `output_{i}_{feed}.jsonl` for every outcome feed named by the vocabulary
//!
//! Missing outcome records are not errors; they resolve to the outcome's default.

pub mod error;
pub mod jsonl;
pub mod loader;
pub mod outcome_index;

#[cfg(test)]
mod tests;

pub use error::{FeedError, FeedResult};
pub use jsonl::read_jsonl;
pub use loader::{FeedLoader, LoadReport, PatchLine};
pub use outcome_index::{OutcomeIndex, decode_outcome};
