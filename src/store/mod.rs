//! Execution result store.
//!
//! Holds every [`SampleRecord`] in generation order, grouped by instance. Instances
//! iterate in the order they were first seen during loading, which is also the order
//! results are emitted in.
//!
//! Records are append-only: nothing is removed or reordered after [`ExecutionStore::push`].

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{OutcomeKind, OutcomeValue, SampleRecord};

use std::collections::HashMap;

#[derive(Debug, Clone)]
struct InstanceSamples {
    instance_id: String,
    samples: Vec<SampleRecord>,
}

/// In-memory mapping from instance id to its ordered samples.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStore {
    instances: Vec<InstanceSamples>,
    index: HashMap<String, usize>,
}

impl ExecutionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to its instance and returns the assigned `sample_index`.
    pub fn push(&mut self, mut record: SampleRecord) -> usize {
        let slot = match self.index.get(&record.instance_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.instances.len();
                self.index.insert(record.instance_id.clone(), slot);
                self.instances.push(InstanceSamples {
                    instance_id: record.instance_id.clone(),
                    samples: Vec::new(),
                });
                slot
            }
        };

        let samples = &mut self.instances[slot].samples;
        let sample_index = samples.len();
        record.sample_index = sample_index;
        samples.push(record);
        sample_index
    }

    /// Returns the samples for `instance_id` in generation order.
    pub fn records_for(&self, instance_id: &str) -> Option<&[SampleRecord]> {
        self.index
            .get(instance_id)
            .map(|&slot| self.instances[slot].samples.as_slice())
    }

    /// Iterates `(instance_id, samples)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SampleRecord])> {
        self.instances
            .iter()
            .map(|i| (i.instance_id.as_str(), i.samples.as_slice()))
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances holding fewer than `expected` samples, with their actual count.
    pub fn short_instances(&self, expected: usize) -> Vec<(&str, usize)> {
        self.instances
            .iter()
            .filter(|i| i.samples.len() < expected)
            .map(|i| (i.instance_id.as_str(), i.samples.len()))
            .collect()
    }
}
