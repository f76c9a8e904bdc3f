//! The per-trial recovery state machine and its variant policies.

/// Adversary-observation variant: biased orders and per-person probabilities
pub mod adversary;
/// The core incremental threshold-recovery engine
pub mod engine;
/// Hinted variant: consumed shares reveal whom to contact next
pub mod hinted;
/// Numwise variant: walks stopped at a fixed contact budget
pub mod numwise;

pub use adversary::{
    run_adversary_trial, run_numwise_adversary_trial, AdversaryParams, OrderBias,
};
pub use engine::{run_trial, run_trial_with_order, RecoveryOutcome};
pub use hinted::run_hinted_trial;
pub use numwise::{run_numwise_trial, run_numwise_trustees_trial, NumwiseOutcome};
