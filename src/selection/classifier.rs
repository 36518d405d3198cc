//! Outcome classifier: partitions an instance's samples into priority tiers.

use std::collections::HashMap;

use crate::config::{OutcomeSpec, TierSpec};
use crate::store::{OutcomeKind, SampleRecord};

use super::error::{SelectionError, SelectionResult};
use super::types::{CandidateTier, TierKind};

/// Turns the configured tier list into candidate index sets for one instance.
///
/// Count outcomes pass when they equal the smallest value seen across the
/// instance's valid samples, so every sample tied for the fewest failures passes,
/// including when that minimum is non-zero. Boolean outcomes pass when `true`.
#[derive(Debug, Clone)]
pub struct OutcomeClassifier<'a> {
    tiers: Vec<Vec<&'a OutcomeSpec>>,
}

impl<'a> OutcomeClassifier<'a> {
    /// Resolves tier predicates against the vocabulary.
    pub fn new(tiers: &'a [TierSpec], outcomes: &'a [OutcomeSpec]) -> SelectionResult<Self> {
        let tiers = tiers
            .iter()
            .map(|tier| {
                tier.outcomes()
                    .iter()
                    .map(|name| {
                        outcomes.iter().find(|o| &o.name == name).ok_or_else(|| {
                            SelectionError::UnknownOutcome {
                                tier: tier.to_string(),
                                outcome: name.clone(),
                            }
                        })
                    })
                    .collect::<SelectionResult<Vec<_>>>()
            })
            .collect::<SelectionResult<Vec<_>>>()?;

        Ok(Self { tiers })
    }

    /// Number of configured tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Candidate sets, most restrictive first: each configured tier, then all valid
    /// samples, then every sample. If no sample is valid only the last is returned.
    pub fn classify(&self, records: &[SampleRecord]) -> Vec<CandidateTier> {
        let all: Vec<usize> = (0..records.len()).collect();
        let valid: Vec<usize> = all
            .iter()
            .copied()
            .filter(|&i| records[i].is_valid())
            .collect();

        if valid.is_empty() {
            return vec![CandidateTier::new(TierKind::Terminal, all)];
        }

        let minima = self.count_minima(records, &valid);

        let mut out = Vec::with_capacity(self.tiers.len() + 2);
        for (position, predicates) in self.tiers.iter().enumerate() {
            let indices = valid
                .iter()
                .copied()
                .filter(|&i| {
                    predicates
                        .iter()
                        .all(|spec| passes(&records[i], spec, &minima))
                })
                .collect();
            out.push(CandidateTier::new(TierKind::Configured(position), indices));
        }
        out.push(CandidateTier::new(TierKind::AllValid, valid));
        out.push(CandidateTier::new(TierKind::Terminal, all));
        out
    }

    /// Instance-wide minimum of each count outcome, over valid samples only.
    fn count_minima(&self, records: &[SampleRecord], valid: &[usize]) -> HashMap<&'a str, u64> {
        let mut minima = HashMap::new();
        for spec in self.tiers.iter().flatten() {
            if spec.kind != OutcomeKind::Count || minima.contains_key(spec.name.as_str()) {
                continue;
            }
            if let Some(min) = valid.iter().filter_map(|&i| count_of(&records[i], spec)).min() {
                minima.insert(spec.name.as_str(), min);
            }
        }
        minima
    }
}

fn count_of(record: &SampleRecord, spec: &OutcomeSpec) -> Option<u64> {
    record
        .outcome(&spec.name)
        .and_then(|v| v.as_count())
        .or_else(|| spec.default.as_count())
}

fn passes(record: &SampleRecord, spec: &OutcomeSpec, minima: &HashMap<&str, u64>) -> bool {
    match spec.kind {
        OutcomeKind::Bool => record
            .outcome(&spec.name)
            .and_then(|v| v.as_bool())
            .or_else(|| spec.default.as_bool())
            .unwrap_or(false),
        OutcomeKind::Count => match (count_of(record, spec), minima.get(spec.name.as_str())) {
            (Some(value), Some(&min)) => value == min,
            _ => false,
        },
    }
}
