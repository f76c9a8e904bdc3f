//! Prints contact histograms for a small two-layer scheme, comparing the
//! uniform, hinted and flat-baseline recoverers over the same batch size.

use keyrec::simulation::{baseline_cdf, contact_cdf_par, hinted_contact_cdf_par};
use keyrec::{BatchParams, SchemeParams};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = SchemeParams::additive(2, 50, 2, 3, 6, 30);
    let batch = BatchParams {
        simulations_dist: 100,
        simulations_run: 100,
    };
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    let uniform = contact_cdf_par(&batch, &params, &mut rng)?;
    println!("uniform order, contacts until recovery:");
    print!("{}", uniform.contacts);
    println!("uniform order, trustees contacted:");
    print!("{}", uniform.trustees_contacted);

    let hinted = hinted_contact_cdf_par(&batch, &params, 2, &mut rng)?;
    println!("hinted order (2 hint targets), contacts until recovery:");
    print!("{}", hinted.contacts);

    let baseline = baseline_cdf(
        batch.simulations_dist * batch.simulations_run,
        params.threshold_pct,
        params.trustees,
        params.anonymity,
        &mut rng,
    )?;
    println!("flat baseline, contacts until threshold:");
    print!("{}", baseline.contacts);

    Ok(())
}
