//! Adversary-observation recovery: biased orders, flaky data, detection.
//!
//! Models a whitebox adversary who has observed (imperfectly) who the
//! trustees are: the access order approaches likely trustees first, each
//! person's data is only obtained with some probability, and an
//! independent per-person probability terminates the whole walk early
//! (the adversary being detected or giving up).

use crate::packets::Distribution;
use crate::recovery::engine::{RecoveryOutcome, TrialState};
use crate::recovery::numwise::NumwiseOutcome;
use crate::rng::{biased_access_order, probability_array, shuffled_indices};
use crate::tree::ROOT_ID;
use crate::Result;
use itertools::izip;
use rand::{CryptoRng, RngCore};

/// Observation noise on the trustee/non-trustee partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBias {
    /// Probability (percent) that a trustee is misread as a non-trustee.
    pub flip_trustee_pct: u16,
    /// Probability (percent) that a non-trustee is misread as a trustee.
    pub flip_other_pct: u16,
}

/// Parameters of the adversary-observation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdversaryParams {
    /// Two-phase visiting order biased by observed trusteeship, or a
    /// uniform order when `None`.
    pub order_bias: Option<OrderBias>,
    /// Probability (percent) that a visited person's data is obtained.
    pub obtain_prob: u8,
    /// Probability (percent) that the walk terminates after a visit.
    pub whitebox_prob: u8,
}

impl AdversaryParams {
    /// Bias-only adversary: data always obtained, walk never cut short.
    pub fn biased(flip_trustee_pct: u16, flip_other_pct: u16) -> Self {
        Self {
            order_bias: Some(OrderBias {
                flip_trustee_pct,
                flip_other_pct,
            }),
            obtain_prob: 100,
            whitebox_prob: 0,
        }
    }
}

fn access_order<R: RngCore + CryptoRng>(
    dist: &Distribution,
    adv: &AdversaryParams,
    rng: &mut R,
) -> Result<Vec<usize>> {
    match adv.order_bias {
        Some(bias) => biased_access_order(
            rng,
            dist.trustees,
            dist.people(),
            bias.flip_trustee_pct,
            bias.flip_other_pct,
        ),
        None => Ok(shuffled_indices(rng, dist.people())),
    }
}

/// Runs one adversary trial to completion (or early termination).
pub fn run_adversary_trial<R: RngCore + CryptoRng>(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    adv: &AdversaryParams,
    rng: &mut R,
) -> Result<Option<RecoveryOutcome>> {
    let order = access_order(dist, adv, rng)?;
    let obtain = probability_array(rng, dist.people())?;
    let whitebox = probability_array(rng, dist.people())?;
    let mut state = TrialState::new();
    for (&person, &obt, &wb) in izip!(&order, &obtain, &whitebox) {
        if obt < adv.obtain_prob {
            let packet = &dist.packets[person];
            state.absorb_packet(person, packet);
            state.note_reused_shares(packet, &dist.tree);
            if state.check_leaves(dist.tree.leaf_layer(), leaf_threshold) {
                let newly = state.check_upper_layers(&dist.tree, upper_threshold);
                if newly.contains(&ROOT_ID) {
                    return Ok(Some(state.outcome(dist.trustees)));
                }
            }
        }
        if wb < adv.whitebox_prob {
            break;
        }
    }
    Ok(None)
}

/// Runs one budgeted adversary trial, counting contacts where data was
/// actually obtained.
pub fn run_numwise_adversary_trial<R: RngCore + CryptoRng>(
    dist: &Distribution,
    leaf_threshold: usize,
    upper_threshold: usize,
    run_size: usize,
    adv: &AdversaryParams,
    rng: &mut R,
) -> Result<NumwiseOutcome> {
    let order = access_order(dist, adv, rng)?;
    let obtain = probability_array(rng, dist.people())?;
    let whitebox = probability_array(rng, dist.people())?;
    let mut state = TrialState::new();
    for (&person, &obt, &wb) in izip!(&order, &obtain, &whitebox) {
        if obt < adv.obtain_prob {
            state.absorb_packet(person, &dist.packets[person]);
            if state.check_leaves(dist.tree.leaf_layer(), leaf_threshold) {
                let newly = state.check_upper_layers(&dist.tree, upper_threshold);
                if newly.contains(&ROOT_ID) {
                    return Ok(if state.people_contacted.len() == run_size {
                        NumwiseOutcome::AtBudget
                    } else {
                        NumwiseOutcome::BeforeBudget
                    });
                }
            }
        }
        if state.people_contacted.len() == run_size || wb < adv.whitebox_prob {
            break;
        }
    }
    Ok(NumwiseOutcome::NotRecovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::create_packets;
    use crate::params::SchemeParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(31)
    }

    #[test]
    fn bias_only_adversary_always_recovers() {
        // Perfect observation, data always obtained, never detected.
        let params = SchemeParams::additive(2, 50, 2, 2, 4, 12);
        let adv = AdversaryParams::biased(0, 0);
        let mut rng = rng();
        for _ in 0..20 {
            let dist = create_packets(&params, &mut rng).unwrap();
            let outcome = run_adversary_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                &adv,
                &mut rng,
            )
            .unwrap()
            .expect("perfect observation recovers");
            // Trustees come first under a perfect bias, so recovery never
            // needs to reach into the decoys.
            assert!(outcome.contacts <= params.trustees);
            assert_eq!(outcome.trustees_contacted, outcome.contacts);
        }
    }

    #[test]
    fn certain_detection_stops_after_one_visit() {
        let params = SchemeParams::additive(2, 50, 2, 2, 4, 8);
        let adv = AdversaryParams {
            order_bias: None,
            obtain_prob: 100,
            whitebox_prob: 100,
        };
        let mut rng = rng();
        let dist = create_packets(&params, &mut rng).unwrap();
        // One person is never enough for leaf threshold 2 over packets of
        // two shares of distinct subsecrets to bubble to the root.
        let outcome = run_adversary_trial(&dist, 2, 2, &adv, &mut rng).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn zero_obtain_probability_never_recovers() {
        let params = SchemeParams::additive(2, 50, 2, 2, 4, 8);
        let adv = AdversaryParams {
            order_bias: None,
            obtain_prob: 0,
            whitebox_prob: 0,
        };
        let mut rng = rng();
        let dist = create_packets(&params, &mut rng).unwrap();
        assert!(run_adversary_trial(&dist, 2, 2, &adv, &mut rng)
            .unwrap()
            .is_none());
        assert_eq!(
            run_numwise_adversary_trial(&dist, 2, 2, 4, &adv, &mut rng).unwrap(),
            NumwiseOutcome::NotRecovered
        );
    }
}
