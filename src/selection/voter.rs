//! Equivalence voter: majority vote over normalized-patch groups.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::hashing::hash_patch_key;
use crate::store::SampleRecord;

use super::error::{SelectionError, SelectionResult};
use super::types::{Vote, VoteGroup};

/// Groups candidates by normalized key and picks the group with the most votes.
///
/// Ties go to the group whose patch first appeared earliest in generation order.
/// The emitted sample is that earliest member.
pub fn select(
    instance_id: &str,
    candidates: &[usize],
    records: &[SampleRecord],
) -> SelectionResult<Vote> {
    if candidates.is_empty() {
        return Err(SelectionError::EmptyCandidateSet {
            instance_id: instance_id.to_string(),
        });
    }

    let mut slots: HashMap<[u8; 32], usize> = HashMap::new();
    let mut groups: Vec<VoteGroup> = Vec::new();

    for &position in candidates {
        let record = &records[position];
        if record.normalized_key.trim().is_empty() {
            continue;
        }

        let key_hash = hash_patch_key(&record.normalized_key);
        match slots.get(&key_hash) {
            Some(&slot) => {
                let group = &mut groups[slot];
                group.votes += 1;
                if record.sample_index < group.first_appear_index {
                    group.first_appear_index = record.sample_index;
                    group.representative = position;
                }
            }
            None => {
                slots.insert(key_hash, groups.len());
                groups.push(VoteGroup {
                    key_hash,
                    votes: 1,
                    first_appear_index: record.sample_index,
                    representative: position,
                });
            }
        }
    }

    if groups.is_empty() {
        return Err(SelectionError::NoValidCandidates {
            instance_id: instance_id.to_string(),
        });
    }

    groups.sort_by(rank);
    let winner = groups[0].representative;

    Ok(Vote { winner, groups })
}

/// Best first: more votes, then earlier first appearance.
fn rank(a: &VoteGroup, b: &VoteGroup) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then(a.first_appear_index.cmp(&b.first_appear_index))
}
