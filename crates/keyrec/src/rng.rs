//! Randomness helpers consumed by the engine and the harness.
//!
//! All entry points take the caller's `R: RngCore + CryptoRng`, so trials
//! are reproducible from a seed and concurrent workers can be given
//! independent generators. Byte-source failures are propagated, never
//! fatal.

use crate::{Error, Result};
use keyrec_util::indices;
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};

/// A uniformly shuffled permutation of `0..n`.
pub fn shuffled_indices<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Vec<usize> {
    let mut order = indices(n);
    order.shuffle(rng);
    order
}

/// One random percentage value in `[0, 100)` per position.
///
/// Compared against caller-supplied byte-valued probability thresholds:
/// `array[i] < pct` holds with probability close to `pct / 100`. The modulo
/// bias of reducing a byte is under 1% and irrelevant at these sample sizes.
pub fn probability_array<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; n];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| Error::RandomnessFailure(e.to_string()))?;
    for b in &mut bytes {
        *b %= 100;
    }
    Ok(bytes)
}

/// Flips each of the first `trustees` bits of the trustee/non-trustee
/// indicator vector with probability `flip_trustee_pct`, and each of the
/// remaining bits with probability `flip_other_pct` (both in percent).
///
/// The indicator vector marks trustees with 1 and everyone else with 0;
/// the flips model the imprecision of an adversary's observation.
pub fn flipped_trustee_bits<R: RngCore + CryptoRng>(
    rng: &mut R,
    trustees: usize,
    total: usize,
    flip_trustee_pct: u16,
    flip_other_pct: u16,
) -> Result<Vec<u8>> {
    let mut bits = vec![0u8; total];
    for b in bits.iter_mut().take(trustees) {
        *b = 1;
    }
    let mut buf = [0u8; 2];
    for (i, bit) in bits.iter_mut().enumerate() {
        let pct = if i < trustees {
            flip_trustee_pct
        } else {
            flip_other_pct
        };
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| Error::RandomnessFailure(e.to_string()))?;
        if u16::from_be_bytes(buf) % 100 < pct {
            *bit = 1 - *bit;
        }
    }
    Ok(bits)
}

/// Builds the adversary's two-phase access order: people flagged as likely
/// trustees (after observation noise) first, everyone else after, each
/// partition independently shuffled.
pub fn biased_access_order<R: RngCore + CryptoRng>(
    rng: &mut R,
    trustees: usize,
    total: usize,
    flip_trustee_pct: u16,
    flip_other_pct: u16,
) -> Result<Vec<usize>> {
    let bits = flipped_trustee_bits(rng, trustees, total, flip_trustee_pct, flip_other_pct)?;
    let mut first: Vec<usize> = Vec::new();
    let mut last: Vec<usize> = Vec::new();
    for (person, bit) in bits.iter().enumerate() {
        if *bit == 1 {
            first.push(person);
        } else {
            last.push(person);
        }
    }
    first.shuffle(rng);
    last.shuffle(rng);
    first.extend_from_slice(&last);
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrec_util::has_duplicates;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn shuffled_indices_is_a_permutation() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let order = shuffled_indices(&mut rng, 50);
        assert_eq!(order.len(), 50);
        assert!(!has_duplicates(&order));
        assert!(order.iter().all(|&p| p < 50));
    }

    #[test]
    fn probability_array_values_below_hundred() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let probs = probability_array(&mut rng, 1000).unwrap();
        assert_eq!(probs.len(), 1000);
        assert!(probs.iter().all(|&p| p < 100));
    }

    #[test]
    fn zero_flip_keeps_indicator_exact() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let bits = flipped_trustee_bits(&mut rng, 3, 8, 0, 0).unwrap();
        assert_eq!(bits, vec![1, 1, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn full_flip_inverts_indicator() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let bits = flipped_trustee_bits(&mut rng, 3, 8, 100, 100).unwrap();
        assert_eq!(bits, vec![0, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn biased_order_is_a_permutation() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let order = biased_access_order(&mut rng, 5, 20, 10, 10).unwrap();
        assert_eq!(order.len(), 20);
        assert!(!has_duplicates(&order));
    }

    #[test]
    fn perfect_observation_puts_trustees_first() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let order = biased_access_order(&mut rng, 5, 20, 0, 0).unwrap();
        assert!(order[..5].iter().all(|&p| p < 5));
        assert!(order[5..].iter().all(|&p| p >= 5));
    }
}
