//! Fallback cascade: tiers in priority order, then all valid samples, then the empty patch.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::{OutcomeSpec, RerankConfig};
use crate::emitter::ResultEmitter;
use crate::hashing::fingerprint_hex;
use crate::store::{ExecutionStore, OutcomeValue, SampleRecord};

use super::classifier::OutcomeClassifier;
use super::error::SelectionResult;
use super::types::{Decision, RunSummary, Selection, TierKind, Vote};
use super::voter;

/// Walks the candidate tiers for each instance and votes on the first non-empty one.
///
/// Every instance with at least one record produces exactly one [`Selection`]:
/// a vote in the first non-empty configured tier, else a vote over all valid
/// samples, else the empty patch.
#[derive(Debug)]
pub struct CascadeController<'a> {
    config: &'a RerankConfig,
    classifier: OutcomeClassifier<'a>,
    echoed: Vec<&'a OutcomeSpec>,
}

impl<'a> CascadeController<'a> {
    pub fn new(config: &'a RerankConfig) -> SelectionResult<Self> {
        let classifier = OutcomeClassifier::new(&config.tiers, &config.outcomes)?;
        Ok(Self {
            config,
            classifier,
            echoed: config.echoed_outcomes(),
        })
    }

    /// Picks one patch for one instance.
    pub fn select_instance(
        &self,
        instance_id: &str,
        records: &[SampleRecord],
    ) -> SelectionResult<Selection> {
        for tier in self.classifier.classify(records) {
            if tier.is_empty() {
                debug!(instance_id = %instance_id, tier = %tier.kind, "Tier empty, falling back");
                continue;
            }

            if tier.kind == TierKind::Terminal {
                break;
            }

            let vote = voter::select(instance_id, &tier.indices, records)?;
            if self.is_target(instance_id) {
                self.log_vote(instance_id, tier.kind, &vote, records);
            }

            let winner = &records[vote.winner];
            let group = vote.winning_group();
            debug!(
                instance_id = %instance_id,
                tier = %tier.kind,
                candidates = tier.indices.len(),
                groups = vote.groups.len(),
                votes = group.votes,
                sample_index = winner.sample_index,
                "Selected patch"
            );

            return Ok(Selection {
                instance_id: instance_id.to_string(),
                decision: Decision::Voted {
                    tier: tier.kind,
                    sample_index: winner.sample_index,
                    votes: group.votes,
                    groups: vote.groups.len(),
                },
                patch: winner.raw_patch.clone(),
                outcomes: self.echo_outcomes(winner),
            });
        }

        warn!(instance_id = %instance_id, "No valid patches, emitting empty patch");
        Ok(Selection::empty(instance_id))
    }

    /// Selects and emits every instance in store order.
    pub fn run<W: Write>(
        &self,
        store: &ExecutionStore,
        emitter: &mut ResultEmitter<W>,
    ) -> SelectionResult<RunSummary> {
        let mut summary = RunSummary::with_tiers(self.classifier.tier_count());

        let short = store.short_instances(self.config.num_samples);
        for &(instance_id, samples) in &short {
            warn!(
                instance_id = %instance_id,
                samples,
                expected = self.config.num_samples,
                "Fewer samples than expected"
            );
        }
        summary.short_instances = short.len();

        for (instance_id, records) in store.iter() {
            let selection = self.select_instance(instance_id, records)?;
            emitter.emit(&selection)?;
            summary.record(&selection.decision);
        }

        info!(
            instances = summary.instances,
            configured = ?summary.configured,
            all_valid = summary.all_valid,
            empty = summary.empty,
            short_instances = summary.short_instances,
            "Reranking complete"
        );

        Ok(summary)
    }

    fn echo_outcomes(&self, winner: &SampleRecord) -> BTreeMap<String, OutcomeValue> {
        self.echoed
            .iter()
            .map(|spec| {
                let value = winner.outcome(&spec.name).unwrap_or(spec.default);
                (spec.name.clone(), value)
            })
            .collect()
    }

    fn is_target(&self, instance_id: &str) -> bool {
        self.config.target.as_deref() == Some(instance_id)
    }

    fn log_vote(&self, instance_id: &str, tier: TierKind, vote: &Vote, records: &[SampleRecord]) {
        for group in &vote.groups {
            let key = &records[group.representative].normalized_key;
            info!(
                instance_id = %instance_id,
                tier = %tier,
                votes = group.votes,
                first_appear_index = group.first_appear_index,
                fingerprint = %fingerprint_hex(key),
                "Vote group\n{key}"
            );
        }
    }
}
