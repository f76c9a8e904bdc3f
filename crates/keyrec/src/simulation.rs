//! Monte-Carlo batches over distributions and recovery trials.
//!
//! Every entry point validates its parameters eagerly, draws all of its
//! randomness from a caller-supplied rng, and returns histograms of trial
//! outcomes. The parallel variants draw one seed per distribution up front
//! from the caller's rng, hand each rayon worker its own `ChaCha20Rng`, and
//! merge the workers' local histograms after the join, so a batch is
//! reproducible from the caller's seed regardless of scheduling.

use crate::histogram::Histogram;
use crate::packets::{create_hinted_packets, create_packets};
use crate::params::{BatchParams, SchemeParams};
use crate::recovery::adversary::{
    run_adversary_trial, run_numwise_adversary_trial, AdversaryParams,
};
use crate::recovery::engine::{run_trial, RecoveryOutcome};
use crate::recovery::hinted::run_hinted_trial;
use crate::recovery::numwise::{run_numwise_trial, run_numwise_trustees_trial};
use crate::rng::{biased_access_order, probability_array, shuffled_indices};
use crate::{Error, Result};
use itertools::izip;
use keyrec_util::{count_less_than, floor_div};
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

/// The pair of outcome histograms a batch produces: how many trustees and
/// how many people in total were contacted per successful trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHistograms {
    /// Trustees contacted until recovery, per trial.
    pub trustees_contacted: Histogram,
    /// People contacted until recovery, per trial.
    pub contacts: Histogram,
}

impl BatchHistograms {
    fn new(domain: usize) -> Self {
        Self {
            trustees_contacted: Histogram::with_domain(domain),
            contacts: Histogram::with_domain(domain),
        }
    }

    fn record(&mut self, outcome: &RecoveryOutcome) {
        self.trustees_contacted.record(outcome.trustees_contacted);
        self.contacts.record(outcome.contacts);
    }

    fn merge(&mut self, other: &BatchHistograms) {
        self.trustees_contacted.merge(&other.trustees_contacted);
        self.contacts.merge(&other.contacts);
    }
}

/// Seeds drawn up front so the batch is a pure function of the caller rng.
fn worker_seeds<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.gen()).collect()
}

/// Runs `simulations_dist` fresh distributions with `simulations_run`
/// uniform-order trials each, sequentially.
pub fn contact_cdf<R: RngCore + CryptoRng>(
    batch: &BatchParams,
    params: &SchemeParams,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for _ in 0..batch.simulations_dist {
        let dist = create_packets(params, rng)?;
        for _ in 0..batch.simulations_run {
            if let Some(outcome) = run_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                rng,
            ) {
                hists.record(&outcome);
            }
        }
    }
    Ok(hists)
}

/// Parallel [`contact_cdf`]: one rayon worker per distribution.
pub fn contact_cdf_par<R: RngCore + CryptoRng>(
    batch: &BatchParams,
    params: &SchemeParams,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let seeds = worker_seeds(rng, batch.simulations_dist);
    let locals = seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut local = BatchHistograms::new(params.anonymity);
            let dist = create_packets(params, &mut rng)?;
            for _ in 0..batch.simulations_run {
                if let Some(outcome) = run_trial(
                    &dist,
                    params.leaf_threshold(),
                    params.upper_threshold(),
                    &mut rng,
                ) {
                    local.record(&outcome);
                }
            }
            Ok(local)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for local in &locals {
        hists.merge(local);
    }
    Ok(hists)
}

/// Like [`contact_cdf`], with `hint_count` hint targets and hint-driven
/// reordering of the access order.
pub fn hinted_contact_cdf<R: RngCore + CryptoRng>(
    batch: &BatchParams,
    params: &SchemeParams,
    hint_count: usize,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for _ in 0..batch.simulations_dist {
        let (dist, hints) = create_hinted_packets(params, hint_count, rng)?;
        for _ in 0..batch.simulations_run {
            if let Some(outcome) = run_hinted_trial(
                &dist,
                &hints,
                params.leaf_threshold(),
                params.upper_threshold(),
                rng,
            ) {
                hists.record(&outcome);
            }
        }
    }
    Ok(hists)
}

/// Parallel [`hinted_contact_cdf`].
pub fn hinted_contact_cdf_par<R: RngCore + CryptoRng>(
    batch: &BatchParams,
    params: &SchemeParams,
    hint_count: usize,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let seeds = worker_seeds(rng, batch.simulations_dist);
    let locals = seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut local = BatchHistograms::new(params.anonymity);
            let (dist, hints) = create_hinted_packets(params, hint_count, &mut rng)?;
            for _ in 0..batch.simulations_run {
                if let Some(outcome) = run_hinted_trial(
                    &dist,
                    &hints,
                    params.leaf_threshold(),
                    params.upper_threshold(),
                    &mut rng,
                ) {
                    local.record(&outcome);
                }
            }
            Ok(local)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for local in &locals {
        hists.merge(local);
    }
    Ok(hists)
}

/// Parallel adversary-observation batch: biased orders, flaky data and
/// early termination per [`AdversaryParams`]. Trials cut short without
/// recovery simply go unrecorded.
pub fn adversary_contact_cdf_par<R: RngCore + CryptoRng>(
    batch: &BatchParams,
    params: &SchemeParams,
    adv: &AdversaryParams,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let seeds = worker_seeds(rng, batch.simulations_dist);
    let locals = seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut local = BatchHistograms::new(params.anonymity);
            let dist = create_packets(params, &mut rng)?;
            for _ in 0..batch.simulations_run {
                if let Some(outcome) = run_adversary_trial(
                    &dist,
                    params.leaf_threshold(),
                    params.upper_threshold(),
                    adv,
                    &mut rng,
                )? {
                    local.record(&outcome);
                }
            }
            Ok(local)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for local in &locals {
        hists.merge(local);
    }
    Ok(hists)
}

/// Sweeps contact budgets over one distribution: for every budget in
/// `[1, anonymity]` (and every trustee budget in `[1, trustees]`) the
/// histograms count how many of `simulations` trials recover within it.
///
/// Counts accumulate toward larger budgets, so each histogram reads as an
/// empirical CDF over budgets rather than a distribution of outcomes.
pub fn numwise_cdf<R: RngCore + CryptoRng>(
    simulations: usize,
    params: &SchemeParams,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let dist = create_packets(params, rng)?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for run_size in 1..=params.anonymity {
        for _ in 0..simulations {
            let outcome = run_numwise_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                run_size,
                rng,
            );
            if outcome.recovered() {
                hists.contacts.record(run_size);
            }
        }
    }
    for run_size in 1..=params.trustees {
        for _ in 0..simulations {
            let outcome = run_numwise_trustees_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                run_size,
                rng,
            );
            if outcome.recovered() {
                hists.trustees_contacted.record(run_size);
            }
        }
    }
    Ok(hists)
}

/// Like [`numwise_cdf`], counting only trials that recover exactly when the
/// budget runs out, so the histograms read as an empirical PDF.
pub fn numwise_pdf<R: RngCore + CryptoRng>(
    simulations: usize,
    params: &SchemeParams,
    rng: &mut R,
) -> Result<BatchHistograms> {
    params.validate()?;
    let dist = create_packets(params, rng)?;
    let mut hists = BatchHistograms::new(params.anonymity);
    for run_size in 1..=params.anonymity {
        for _ in 0..simulations {
            let outcome = run_numwise_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                run_size,
                rng,
            );
            if outcome.exactly_at_budget() {
                hists.contacts.record(run_size);
            }
        }
    }
    for run_size in 1..=params.trustees {
        for _ in 0..simulations {
            let outcome = run_numwise_trustees_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                run_size,
                rng,
            );
            if outcome.exactly_at_budget() {
                hists.trustees_contacted.record(run_size);
            }
        }
    }
    Ok(hists)
}

/// Contact-budget sweep under adversary observation. Only the total-contact
/// budget applies, so a single histogram comes back.
pub fn numwise_adversary_cdf<R: RngCore + CryptoRng>(
    simulations: usize,
    params: &SchemeParams,
    adv: &AdversaryParams,
    rng: &mut R,
) -> Result<Histogram> {
    params.validate()?;
    let dist = create_packets(params, rng)?;
    let mut contacts = Histogram::with_domain(params.anonymity);
    for run_size in 1..=params.anonymity {
        for _ in 0..simulations {
            let outcome = run_numwise_adversary_trial(
                &dist,
                params.leaf_threshold(),
                params.upper_threshold(),
                run_size,
                adv,
                rng,
            )?;
            if outcome.recovered() {
                contacts.record(run_size);
            }
        }
    }
    Ok(contacts)
}

/// Flat non-hierarchical baseline: recovery happens as soon as
/// `floor(threshold_pct * trustees / 100)` trustees appear in a shuffled
/// order over the anonymity set. Prefixes shorter than two people are never
/// counted.
pub fn baseline_cdf<R: RngCore + CryptoRng>(
    simulations: usize,
    threshold_pct: u32,
    trustees: usize,
    anonymity: usize,
    rng: &mut R,
) -> Result<BatchHistograms> {
    if threshold_pct > 100 {
        return Err(Error::InvalidThreshold(threshold_pct));
    }
    if trustees == 0 || anonymity < trustees {
        return Err(Error::config(
            "anonymity set must contain at least one trustee",
        ));
    }
    let threshold_num = floor_div(threshold_pct as usize * trustees, 100);
    let mut hists = BatchHistograms::new(anonymity);
    for _ in 0..simulations {
        let order = shuffled_indices(rng, anonymity);
        for contacts in 2..=anonymity {
            let reached = count_less_than(&order[..contacts], trustees);
            if reached >= threshold_num {
                hists.contacts.record(contacts);
                hists.trustees_contacted.record(reached);
                break;
            }
        }
    }
    Ok(hists)
}

/// [`baseline_cdf`] under adversary observation: the order follows the
/// adversary's bias (or stays uniform without one), each person's data is
/// only obtained with `obtain_prob`, and an obtained visit can terminate
/// the walk early with `whitebox_prob`.
///
/// Contacts count every person visited; only obtained trustees count
/// toward the threshold. A failed obtain moves straight to the next
/// person without risking detection.
pub fn adversary_baseline_cdf<R: RngCore + CryptoRng>(
    simulations: usize,
    threshold_pct: u32,
    trustees: usize,
    anonymity: usize,
    adv: &AdversaryParams,
    rng: &mut R,
) -> Result<BatchHistograms> {
    if threshold_pct > 100 {
        return Err(Error::InvalidThreshold(threshold_pct));
    }
    if trustees == 0 || anonymity < trustees {
        return Err(Error::config(
            "anonymity set must contain at least one trustee",
        ));
    }
    let threshold_num = floor_div(threshold_pct as usize * trustees, 100);
    let mut hists = BatchHistograms::new(anonymity);
    for _ in 0..simulations {
        let order = match adv.order_bias {
            Some(bias) => biased_access_order(
                rng,
                trustees,
                anonymity,
                bias.flip_trustee_pct,
                bias.flip_other_pct,
            )?,
            None => shuffled_indices(rng, anonymity),
        };
        let obtain = probability_array(rng, anonymity)?;
        let whitebox = probability_array(rng, anonymity)?;
        let mut collected: Vec<usize> = Vec::with_capacity(anonymity);
        for (visited, (&person, &obt, &wb)) in izip!(&order, &obtain, &whitebox).enumerate() {
            if obt >= adv.obtain_prob {
                continue;
            }
            collected.push(person);
            let reached = count_less_than(&collected, trustees);
            if reached >= threshold_num {
                hists.contacts.record(visited + 1);
                hists.trustees_contacted.record(reached);
                break;
            }
            if wb < adv.whitebox_prob {
                break;
            }
        }
    }
    Ok(hists)
}
