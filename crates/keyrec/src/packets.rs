//! Packet allocation: dealing leaf shares out to people.
//!
//! Every person holds a packet of identical size. Trustees receive the real
//! leaf shares (padded with filler identifiers when the leaves do not divide
//! evenly); decoy people in the anonymity set receive packets of pure
//! filler. Filler identifiers are drawn from the offset returned by the
//! tree builder, so they never collide with real node ids.

use crate::params::SchemeParams;
use crate::rng::shuffled_indices;
use crate::tree::{ShareId, ShareTree};
use crate::Result;
use keyrec_util::{ceil_div, offset_range};
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use std::collections::HashMap;

/// One fresh random instantiation of the scheme: the tree plus the
/// person → packet assignment. People are indexed with trustees first and
/// decoys appended.
#[derive(Debug, Clone)]
pub struct Distribution {
    /// Packet of share identifiers held by each person.
    pub packets: Vec<Vec<ShareId>>,
    /// The identifier tree the packets were dealt from.
    pub tree: ShareTree,
    /// Number of people counted as trustees (indices `0..trustees`).
    pub trustees: usize,
}

impl Distribution {
    /// Total number of contactable people.
    pub fn people(&self) -> usize {
        self.packets.len()
    }
}

/// Hint bookkeeping for the hinted variant.
#[derive(Debug, Clone)]
pub struct HintMaps {
    /// Owning person of every dealt share identifier.
    pub share_owner: HashMap<ShareId, usize>,
    /// The person each trustee's packet points the recoverer toward.
    pub hint_for: HashMap<usize, usize>,
}

/// Shuffles the dealt identifiers and chunks them into `people` packets of
/// `size` each.
fn deal_packets<R: RngCore + CryptoRng>(
    rng: &mut R,
    ids: &[ShareId],
    people: usize,
    size: usize,
) -> Vec<Vec<ShareId>> {
    debug_assert_eq!(ids.len(), people * size);
    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);
    shuffled.chunks(size).map(<[ShareId]>::to_vec).collect()
}

/// Builds a fresh tree and deals its leaves into equal-size packets.
///
/// `packets_per_trustee = ceil(leaves / trustees)`; when the leaves do not
/// divide evenly the leaf set is padded with filler ids. When the anonymity
/// set exceeds the trustee set, decoy packets of pure filler are appended.
pub fn create_packets<R: RngCore + CryptoRng>(
    params: &SchemeParams,
    rng: &mut R,
) -> Result<Distribution> {
    params.validate()?;
    let (tree, leaves, mut offset) = ShareTree::build(
        params.layers,
        params.subsecrets,
        params.shares_per_subsecret(),
    )?;
    let total_shares = leaves.len();
    let packets_per_trustee = ceil_div(total_shares, params.trustees);
    let padded_total = packets_per_trustee * params.trustees;

    let mut trustee_data = leaves;
    trustee_data.extend(offset_range(padded_total - total_shares, offset));
    offset += (padded_total - total_shares) as ShareId;

    let mut packets = deal_packets(rng, &trustee_data, params.trustees, packets_per_trustee);
    if params.anonymity > params.trustees {
        let decoys = params.anonymity - params.trustees;
        let filler = offset_range(decoys * packets_per_trustee, offset);
        packets.extend(deal_packets(rng, &filler, decoys, packets_per_trustee));
    }
    Ok(Distribution {
        packets,
        tree,
        trustees: params.trustees,
    })
}

/// Like [`create_packets`], additionally producing the hint maps of the
/// hinted variant.
///
/// `hint_count` trustees are chosen as hint targets; every trustee's packet
/// points at one of them, cycling through the targets and stepping past a
/// target that would name the trustee themself.
pub fn create_hinted_packets<R: RngCore + CryptoRng>(
    params: &SchemeParams,
    hint_count: usize,
    rng: &mut R,
) -> Result<(Distribution, HintMaps)> {
    if hint_count == 0 || hint_count > params.trustees {
        return Err(crate::Error::config(
            "hint count must be between 1 and the trustee count",
        ));
    }
    let dist = create_packets(params, rng)?;

    let mut share_owner = HashMap::new();
    for (person, packet) in dist.packets.iter().enumerate() {
        for &id in packet {
            share_owner.insert(id, person);
        }
    }

    let hinted = {
        let mut order = shuffled_indices(rng, params.trustees);
        order.truncate(hint_count);
        order
    };
    let mut hint_for = HashMap::new();
    for trustee in 0..params.trustees {
        let target = hinted[trustee % hint_count];
        if target != trustee {
            hint_for.insert(trustee, target);
        } else {
            hint_for.insert(trustee, hinted[(trustee + 1) % hint_count]);
        }
    }
    Ok((dist, HintMaps { share_owner, hint_for }))
}
