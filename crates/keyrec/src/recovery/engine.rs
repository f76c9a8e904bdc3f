//! The incremental threshold-recovery engine.
//!
//! One trial walks an access order over the people of a [`Distribution`],
//! accumulating shares and bubbling reconstructed subsecrets upward until
//! the root secret appears or the order is exhausted. All per-trial state
//! lives in a single [`TrialState`] owned by the walk; nothing is shared or
//! aliased across trials.

use crate::packets::Distribution;
use crate::rng::shuffled_indices;
use crate::tree::{ShareId, ShareTree, ROOT_ID};
use keyrec_util::{count_less_than, difference, intersection};
use rand::{CryptoRng, RngCore};
use std::collections::BTreeMap;

/// How one successful trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryOutcome {
    /// People contacted until the root secret was recovered.
    pub contacts: usize,
    /// How many of them were trustees.
    pub trustees_contacted: usize,
}

/// Mutable state of one recovery trial. Created fresh per trial and
/// discarded with it.
///
/// `obtained_*` grow monotonically; `used_*` track what has already been
/// consumed toward some reconstruction, so the relevant sets are always
/// `obtained − used`.
#[derive(Debug, Default)]
pub(crate) struct TrialState {
    pub obtained_shares: Vec<ShareId>,
    pub used_shares: Vec<ShareId>,
    /// Shares consumed per reconstructed leaf-layer subsecret.
    pub used_shares_map: BTreeMap<ShareId, Vec<ShareId>>,
    pub obtained_subsecrets: Vec<ShareId>,
    pub used_subsecrets: Vec<ShareId>,
    pub people_contacted: Vec<usize>,
}

impl TrialState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit: the person's packet joins the obtained shares.
    pub fn absorb_packet(&mut self, person: usize, packet: &[ShareId]) {
        self.obtained_shares.extend_from_slice(packet);
        self.people_contacted.push(person);
    }

    /// Marks any overlap between the newly obtained packet and the children
    /// of an already-reconstructed subsecret as used, so leftover shares of
    /// a recovered subsecret never count toward a threshold again.
    pub fn note_reused_shares(&mut self, new_shares: &[ShareId], tree: &ShareTree) {
        let leaf_layer = tree.leaf_layer();
        let recovered: Vec<ShareId> = self.used_shares_map.keys().copied().collect();
        for subsecret in recovered {
            let overlap = intersection(&leaf_layer[&subsecret], new_shares);
            if !overlap.is_empty() {
                self.used_shares_map
                    .get_mut(&subsecret)
                    .expect("key taken from the map")
                    .extend_from_slice(&overlap);
                self.used_shares.extend_from_slice(&overlap);
            }
        }
    }

    /// Shares not yet consumed toward any reconstruction.
    pub fn relevant_shares(&self) -> Vec<ShareId> {
        difference(&self.obtained_shares, &self.used_shares)
    }

    /// Checks every leaf-layer parent against the relevant shares.
    ///
    /// A parent whose children intersect the relevant set at or above
    /// `leaf_threshold` has those shares consumed; if the parent is new it
    /// joins the obtained subsecrets. Returns whether any new subsecret was
    /// reconstructed. Re-running on already-consumed data is a no-op.
    pub fn check_leaves(
        &mut self,
        leaf_layer: &BTreeMap<ShareId, Vec<ShareId>>,
        leaf_threshold: usize,
    ) -> bool {
        let relevant = self.relevant_shares();
        let mut recovered_any = false;
        for (&parent, children) in leaf_layer {
            let overlap = intersection(&relevant, children);
            if overlap.len() >= leaf_threshold {
                self.used_shares.extend_from_slice(&overlap);
                if !self.obtained_subsecrets.contains(&parent) {
                    recovered_any = true;
                    self.obtained_subsecrets.push(parent);
                    self.used_shares_map.insert(parent, overlap);
                }
            }
        }
        recovered_any
    }

    /// Checks every non-leaf-layer parent against the reconstructed-but-
    /// unconsumed subsecrets, one upward hop per call.
    ///
    /// The relevant set is snapshot on entry: a parent recovered during
    /// this call never feeds a grandparent within the same call. Returns
    /// the newly obtained parent identifiers.
    pub fn check_upper_layers(&mut self, tree: &ShareTree, upper_threshold: usize) -> Vec<ShareId> {
        let relevant = difference(&self.obtained_subsecrets, &self.used_subsecrets);
        let mut newly = Vec::new();
        if relevant.len() < upper_threshold {
            return newly;
        }
        for layer in tree.upper_layers() {
            for (&parent, children) in layer {
                let overlap = intersection(&relevant, children);
                if overlap.len() >= upper_threshold && !self.obtained_subsecrets.contains(&parent) {
                    self.obtained_subsecrets.push(parent);
                    self.used_subsecrets.extend_from_slice(&overlap);
                    newly.push(parent);
                }
            }
        }
        newly
    }

    /// The outcome counters of a successful trial.
    pub fn outcome(&self, trustees: usize) -> RecoveryOutcome {
        RecoveryOutcome {
            contacts: self.people_contacted.len(),
            trustees_contacted: count_less_than(&self.people_contacted, trustees),
        }
    }
}

/// Runs one trial over a caller-supplied access order.
///
/// Returns `None` when the order is exhausted without recovering the root:
/// a valid non-recovery, not an error.
pub fn run_trial_with_order(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    order: &[usize],
) -> Option<RecoveryOutcome> {
    let mut state = TrialState::new();
    for &person in order {
        let packet = &dist.packets[person];
        state.absorb_packet(person, packet);
        state.note_reused_shares(packet, &dist.tree);
        if state.check_leaves(dist.tree.leaf_layer(), leaf_threshold) {
            let newly = state.check_upper_layers(&dist.tree, upper_threshold);
            if newly.contains(&ROOT_ID) {
                return Some(state.outcome(dist.trustees));
            }
        }
    }
    None
}

/// Runs one trial over a uniformly shuffled access order.
pub fn run_trial<R: RngCore + CryptoRng>(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    rng: &mut R,
) -> Option<RecoveryOutcome> {
    let order = shuffled_indices(rng, dist.people());
    run_trial_with_order(dist, leaf_threshold, upper_threshold, &order)
}
