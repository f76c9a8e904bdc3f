//! Scheme and batch parameters, with eager validation.

use crate::{Error, Result};
use keyrec_util::floor_div;

/// Parameters of one hierarchical sharing scheme instantiation.
///
/// The leaf threshold is expressed twice: `absolute_threshold` is the fixed
/// number of distinct shares needed to rebuild one subsecret, and
/// `threshold_pct` is the percentage of a subsecret's shares that number
/// represents. Together they determine how many shares each subsecret is
/// split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeParams {
    /// Number of tree layers below the root; layer `layers - 1` holds the
    /// leaf shares.
    pub layers: usize,
    /// Percentage threshold of the leaves layer, in `1..=100`.
    pub threshold_pct: u32,
    /// Percentage threshold of the non-leaf layers. `None` selects the
    /// additive scheme, where every child is required.
    pub upper_threshold_pct: Option<u32>,
    /// Distinct shares needed to reconstruct one subsecret.
    pub absolute_threshold: usize,
    /// Fan-out of every non-leaf node.
    pub subsecrets: usize,
    /// Shares dealt per subsecret beyond the reconstruction minimum.
    pub extra_shares: usize,
    /// Number of people holding real shares.
    pub trustees: usize,
    /// Total number of contactable people, trustees included.
    pub anonymity: usize,
}

impl SchemeParams {
    /// Additive scheme with no extra shares; the common case.
    pub fn additive(
        layers: usize,
        threshold_pct: u32,
        absolute_threshold: usize,
        subsecrets: usize,
        trustees: usize,
        anonymity: usize,
    ) -> Self {
        Self {
            layers,
            threshold_pct,
            upper_threshold_pct: None,
            absolute_threshold,
            subsecrets,
            extra_shares: 0,
            trustees,
            anonymity,
        }
    }

    /// Validates all parameters. Called eagerly by every harness entry
    /// point before any simulation work.
    pub fn validate(&self) -> Result<()> {
        if self.threshold_pct > 100 {
            return Err(Error::InvalidThreshold(self.threshold_pct));
        }
        if let Some(pct) = self.upper_threshold_pct {
            if pct > 100 {
                return Err(Error::InvalidThreshold(pct));
            }
        }
        if self.threshold_pct == 0 {
            return Err(Error::config("leaf threshold percentage must be at least 1"));
        }
        if self.layers == 0 {
            return Err(Error::config("tree must have at least one layer"));
        }
        if self.subsecrets == 0 {
            return Err(Error::config("non-leaf fan-out must be at least 1"));
        }
        if self.absolute_threshold == 0 {
            return Err(Error::config("absolute threshold must be at least 1"));
        }
        if self.trustees == 0 {
            return Err(Error::config("trustee count must be at least 1"));
        }
        if self.anonymity < self.trustees {
            return Err(Error::config(
                "anonymity set must be at least as large as the trustee set",
            ));
        }
        Ok(())
    }

    /// Number of shares each subsecret is split into, derived from the
    /// percentage threshold.
    pub fn shares_per_subsecret(&self) -> usize {
        floor_div(self.absolute_threshold * 100, self.threshold_pct as usize) + self.extra_shares
    }

    /// Distinct shares needed to rebuild one leaf-layer subsecret.
    pub fn leaf_threshold(&self) -> usize {
        self.absolute_threshold
    }

    /// Distinct reconstructed children needed to rebuild a non-leaf node.
    pub fn upper_threshold(&self) -> usize {
        match self.upper_threshold_pct {
            None => self.subsecrets,
            Some(pct) => floor_div(pct as usize * self.subsecrets, 100),
        }
    }
}

/// Sizing of one Monte-Carlo batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchParams {
    /// Independent tree + packet instantiations.
    pub simulations_dist: usize,
    /// Recovery trials per instantiation.
    pub simulations_run: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SchemeParams {
        SchemeParams::additive(2, 50, 2, 2, 3, 6)
    }

    #[test]
    fn valid_params_pass() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn threshold_above_hundred_rejected() {
        let mut p = base();
        p.threshold_pct = 101;
        assert_eq!(p.validate(), Err(Error::InvalidThreshold(101)));

        let mut p = base();
        p.upper_threshold_pct = Some(150);
        assert_eq!(p.validate(), Err(Error::InvalidThreshold(150)));
    }

    #[test]
    fn degenerate_counts_rejected() {
        for f in [
            |p: &mut SchemeParams| p.trustees = 0,
            |p: &mut SchemeParams| p.layers = 0,
            |p: &mut SchemeParams| p.subsecrets = 0,
            |p: &mut SchemeParams| p.absolute_threshold = 0,
            |p: &mut SchemeParams| p.anonymity = 1,
        ] {
            let mut p = base();
            f(&mut p);
            assert!(matches!(p.validate(), Err(Error::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn derived_thresholds() {
        let p = base();
        // 2 of 4 shares per subsecret at 50%.
        assert_eq!(p.shares_per_subsecret(), 4);
        assert_eq!(p.leaf_threshold(), 2);
        // Additive: all subsecrets required.
        assert_eq!(p.upper_threshold(), 2);

        let mut p = base();
        p.upper_threshold_pct = Some(50);
        p.subsecrets = 4;
        assert_eq!(p.upper_threshold(), 2);

        let mut p = base();
        p.extra_shares = 2;
        assert_eq!(p.shares_per_subsecret(), 6);
    }
}
