#![warn(missing_docs)]
//! Statistical evaluation of hierarchical threshold secret sharing under
//! simulated social recovery.
//!
//! A secret is split into a tree of threshold nodes (secret → subsecrets →
//! leaf shares); the leaves are padded and dealt out in equal-size packets
//! to trustees hidden inside a larger anonymity set. A simulated recoverer
//! contacts people in some order, accumulates shares, and bubbles
//! reconstructed subsecrets upward until the root secret falls out. Running
//! many independent trials yields empirical distributions of how many
//! people (and how many trustees) had to be contacted.
//!
//! The crate exposes pure computational entry points; all randomness is
//! injected by the caller as `R: RngCore + CryptoRng`, so every simulation
//! is reproducible from a seed.

pub mod histogram;
pub mod packets;
pub mod params;
pub mod recovery;
pub mod rng;
pub mod simulation;
pub mod tree;

pub use histogram::Histogram;
pub use packets::{create_hinted_packets, create_packets, Distribution, HintMaps};
pub use params::{BatchParams, SchemeParams};
pub use recovery::{
    run_hinted_trial, run_numwise_trial, run_trial, run_trial_with_order, AdversaryParams,
    NumwiseOutcome, OrderBias, RecoveryOutcome,
};
pub use simulation::BatchHistograms;
pub use tree::{ShareId, ShareTree, ROOT_ID};

/// The errors surfaced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A percentage threshold exceeds 100.
    #[error("percentage threshold {0} exceeds 100")]
    InvalidThreshold(u32),

    /// A configuration parameter is degenerate (zero-size partitions,
    /// anonymity set smaller than the trustee set, and similar).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The random-byte source failed. Propagated so callers can choose a
    /// retry or abort policy.
    #[error("randomness source failure: {0}")]
    RandomnessFailure(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// The Result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_display() {
        assert_eq!(
            Error::InvalidThreshold(120).to_string(),
            "percentage threshold 120 exceeds 100"
        );
        assert_eq!(
            Error::config("trustees must not be zero").to_string(),
            "invalid configuration: trustees must not be zero"
        );
    }
}
