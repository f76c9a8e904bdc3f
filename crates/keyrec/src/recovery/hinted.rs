//! Hinted recovery: consuming a share reveals a pointer to another person.
//!
//! Every trustee's packet carries a hint naming one of the hint-target
//! trustees. Whenever shares from a packet are consumed toward a
//! reconstruction, the hints learned promote their targets to the front of
//! the unvisited suffix of the access order.

use crate::packets::{Distribution, HintMaps};
use crate::recovery::engine::{RecoveryOutcome, TrialState};
use crate::rng::shuffled_indices;
use crate::tree::{ShareId, ROOT_ID};
use keyrec_util::{intersection, promote_hinted};
use rand::{CryptoRng, RngCore};
use std::collections::BTreeMap;

fn note_hint(hinted: &mut Vec<usize>, target: Option<&usize>) {
    if let Some(&target) = target {
        if !hinted.contains(&target) {
            hinted.push(target);
        }
    }
}

/// [`TrialState::note_reused_shares`] plus hint collection: an overlap with
/// an already-reconstructed subsecret also reveals the visited person's
/// hint.
fn note_reused_shares_hinted(
    state: &mut TrialState,
    new_shares: &[ShareId],
    leaf_layer: &BTreeMap<ShareId, Vec<ShareId>>,
    person: usize,
    hints: &HintMaps,
    hinted: &mut Vec<usize>,
) {
    let recovered: Vec<ShareId> = state.used_shares_map.keys().copied().collect();
    for subsecret in recovered {
        let overlap = intersection(&leaf_layer[&subsecret], new_shares);
        if !overlap.is_empty() {
            state
                .used_shares_map
                .get_mut(&subsecret)
                .expect("key taken from the map")
                .extend_from_slice(&overlap);
            state.used_shares.extend_from_slice(&overlap);
            note_hint(hinted, hints.hint_for.get(&person));
        }
    }
}

/// [`TrialState::check_leaves`] plus hint collection: every consumed share
/// reveals the hint of its owning person.
fn check_leaves_hinted(
    state: &mut TrialState,
    leaf_layer: &BTreeMap<ShareId, Vec<ShareId>>,
    leaf_threshold: usize,
    hints: &HintMaps,
    hinted: &mut Vec<usize>,
) -> bool {
    let relevant = state.relevant_shares();
    let mut recovered_any = false;
    for (&parent, children) in leaf_layer {
        let overlap = intersection(&relevant, children);
        if overlap.len() >= leaf_threshold {
            state.used_shares.extend_from_slice(&overlap);
            for share in &overlap {
                if let Some(owner) = hints.share_owner.get(share) {
                    note_hint(hinted, hints.hint_for.get(owner));
                }
            }
            if !state.obtained_subsecrets.contains(&parent) {
                recovered_any = true;
                state.obtained_subsecrets.push(parent);
                state.used_shares_map.insert(parent, overlap);
            }
        }
    }
    recovered_any
}

/// Runs one hinted trial: a uniformly shuffled start order, reordered after
/// every contact that produced fresh hints.
pub fn run_hinted_trial<R: RngCore + CryptoRng>(
    dist: &Distribution,
    hints: &HintMaps,
    leaf_threshold: usize,
    upper_threshold: usize,
    rng: &mut R,
) -> Option<RecoveryOutcome> {
    let mut state = TrialState::new();
    let mut hinted: Vec<usize> = Vec::new();
    let mut order = shuffled_indices(rng, dist.people());
    let mut index = 0;
    while index < order.len() {
        let person = order[index];
        let visited = index + 1;
        let packet = &dist.packets[person];
        state.absorb_packet(person, packet);
        note_reused_shares_hinted(
            &mut state,
            packet,
            dist.tree.leaf_layer(),
            person,
            hints,
            &mut hinted,
        );
        if check_leaves_hinted(
            &mut state,
            dist.tree.leaf_layer(),
            leaf_threshold,
            hints,
            &mut hinted,
        ) {
            let newly = state.check_upper_layers(&dist.tree, upper_threshold);
            if newly.contains(&ROOT_ID) {
                return Some(state.outcome(dist.trustees));
            }
        }
        if !hinted.is_empty() {
            promote_hinted(&mut order, &hinted, visited);
        }
        index += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::create_hinted_packets;
    use crate::params::SchemeParams;
    use crate::tree::ShareTree;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashMap;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(23)
    }

    #[test]
    fn consumed_shares_reveal_owner_hints() {
        let (tree, leaves, _) = ShareTree::build(2, 2, 2).unwrap();
        // One leaf per person; 1 owns {3,4} children parent 1.
        let dist = Distribution {
            packets: leaves.iter().map(|&id| vec![id]).collect(),
            tree,
            trustees: 4,
        };
        let mut share_owner = HashMap::new();
        for (person, packet) in dist.packets.iter().enumerate() {
            share_owner.insert(packet[0], person);
        }
        let hint_for: HashMap<usize, usize> =
            [(0, 3), (1, 3), (2, 0), (3, 0)].into_iter().collect();
        let hints = HintMaps {
            share_owner,
            hint_for,
        };
        let mut state = TrialState::new();
        let mut hinted = Vec::new();
        state.absorb_packet(0, &dist.packets[0]);
        state.absorb_packet(1, &dist.packets[1]);
        assert!(check_leaves_hinted(
            &mut state,
            dist.tree.leaf_layer(),
            2,
            &hints,
            &mut hinted
        ));
        // Both consumed shares point at person 3, recorded once.
        assert_eq!(hinted, vec![3]);
    }

    #[test]
    fn hinted_trials_recover_with_full_information() {
        let params = SchemeParams::additive(2, 50, 2, 2, 4, 8);
        let mut rng = rng();
        for _ in 0..20 {
            let (dist, hints) = create_hinted_packets(&params, 2, &mut rng).unwrap();
            // All real shares live with the trustees, so a full walk
            // always ends in recovery.
            let outcome = run_hinted_trial(
                &dist,
                &hints,
                params.leaf_threshold(),
                params.upper_threshold(),
                &mut rng,
            )
            .expect("hinted walk over everyone recovers");
            assert!(outcome.contacts <= dist.people());
        }
    }
}
