//! Numwise recovery: walks stopped at a fixed contact budget.
//!
//! Instead of running to completion, the walk stops once `run_size` people
//! (or trustees, in the trustee-counting variant) have been contacted. The
//! tri-state outcome distinguishes recovery exactly at the budget from
//! recovery before it, which is what the CDF/PDF aggregation needs.

use crate::packets::Distribution;
use crate::recovery::engine::TrialState;
use crate::rng::shuffled_indices;
use crate::tree::ROOT_ID;
use keyrec_util::count_less_than;
use rand::{CryptoRng, RngCore};

/// Outcome of one budgeted walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumwiseOutcome {
    /// The root was recovered exactly when the budget was reached.
    AtBudget,
    /// The root was recovered strictly before the budget.
    BeforeBudget,
    /// The budget ran out without recovery.
    NotRecovered,
}

impl NumwiseOutcome {
    /// Whether the root was recovered within the budget.
    pub fn recovered(self) -> bool {
        !matches!(self, Self::NotRecovered)
    }

    /// Whether recovery happened exactly at the budget.
    pub fn exactly_at_budget(self) -> bool {
        matches!(self, Self::AtBudget)
    }
}

/// What the budget counts.
#[derive(Debug, Clone, Copy)]
enum Budget {
    Contacts,
    Trustees,
}

fn budgeted_walk(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    run_size: usize,
    order: &[usize],
    budget: Budget,
) -> NumwiseOutcome {
    let mut state = TrialState::new();
    for &person in order {
        state.absorb_packet(person, &dist.packets[person]);
        let spent = match budget {
            Budget::Contacts => state.people_contacted.len(),
            Budget::Trustees => count_less_than(&state.people_contacted, dist.trustees),
        };
        if state.check_leaves(dist.tree.leaf_layer(), leaf_threshold) {
            let newly = state.check_upper_layers(&dist.tree, upper_threshold);
            if newly.contains(&ROOT_ID) {
                return if spent == run_size {
                    NumwiseOutcome::AtBudget
                } else {
                    NumwiseOutcome::BeforeBudget
                };
            }
        }
        if spent == run_size {
            break;
        }
    }
    NumwiseOutcome::NotRecovered
}

/// Runs one budgeted trial over a shuffled order, counting all contacts.
pub fn run_numwise_trial<R: RngCore + CryptoRng>(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    run_size: usize,
    rng: &mut R,
) -> NumwiseOutcome {
    let order = shuffled_indices(rng, dist.people());
    budgeted_walk(
        dist,
        leaf_threshold,
        upper_threshold,
        run_size,
        &order,
        Budget::Contacts,
    )
}

/// Runs one budgeted trial counting only trustees contacted.
pub fn run_numwise_trustees_trial<R: RngCore + CryptoRng>(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    run_size: usize,
    rng: &mut R,
) -> NumwiseOutcome {
    let order = shuffled_indices(rng, dist.people());
    budgeted_walk(
        dist,
        leaf_threshold,
        upper_threshold,
        run_size,
        &order,
        Budget::Trustees,
    )
}
