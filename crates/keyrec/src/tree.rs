//! Layered identifier tree construction.
//!
//! The tree names every node of the sharing hierarchy with an opaque
//! identifier: the root secret is `0`, and fresh identifiers are handed out
//! contiguously layer by layer. Identifier assignment is fully
//! deterministic given the shape parameters; randomness enters only when
//! the leaves are dealt into packets.

use crate::{Error, Result};
use keyrec_util::offset_range;
use std::collections::BTreeMap;

/// Opaque identifier of a share, subsecret, or the root secret.
pub type ShareId = u64;

/// Identifier of the root secret.
pub const ROOT_ID: ShareId = 0;

/// Parent → ordered children, one map per layer (0 = topmost).
type LayerChildren = BTreeMap<ShareId, Vec<ShareId>>;

/// The layered parent/children structure of one sharing instantiation.
///
/// Every identifier is a child in exactly one (layer, parent) pair. The
/// children of layer `layers - 1` are the raw leaf shares; children of all
/// other layers are subsecrets that are themselves parents one layer down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTree {
    layers: Vec<LayerChildren>,
}

impl ShareTree {
    /// Builds a tree of `layers` layers below the root, with
    /// `subsecrets_per_node` children per non-leaf node and
    /// `leaves_per_subsecret` leaf shares per bottom-layer parent.
    ///
    /// Returns the tree, the flat list of leaf identifiers, and the next
    /// free identifier (the offset for filler generation).
    pub fn build(
        layers: usize,
        subsecrets_per_node: usize,
        leaves_per_subsecret: usize,
    ) -> Result<(Self, Vec<ShareId>, ShareId)> {
        if layers == 0 {
            return Err(Error::config("tree must have at least one layer"));
        }
        if subsecrets_per_node == 0 || leaves_per_subsecret == 0 {
            return Err(Error::config("tree fan-outs must be at least 1"));
        }
        let mut offset: ShareId = 1;
        let mut layer_maps: Vec<LayerChildren> = Vec::with_capacity(layers);
        let mut parents: Vec<ShareId> = vec![ROOT_ID];
        // All layers above the leaves.
        for _ in 0..layers - 1 {
            let mut children_map = LayerChildren::new();
            let mut next_parents = Vec::with_capacity(parents.len() * subsecrets_per_node);
            for &parent in &parents {
                let children = offset_range(subsecrets_per_node, offset);
                offset += subsecrets_per_node as ShareId;
                next_parents.extend_from_slice(&children);
                children_map.insert(parent, children);
            }
            layer_maps.push(children_map);
            parents = next_parents;
        }
        // The leaves layer.
        let mut leaf_map = LayerChildren::new();
        let mut leaves = Vec::with_capacity(parents.len() * leaves_per_subsecret);
        for &parent in &parents {
            let children = offset_range(leaves_per_subsecret, offset);
            offset += leaves_per_subsecret as ShareId;
            leaves.extend_from_slice(&children);
            leaf_map.insert(parent, children);
        }
        layer_maps.push(leaf_map);
        Ok((Self { layers: layer_maps }, leaves, offset))
    }

    /// Number of layers below the root.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Parent → children of the leaves layer.
    pub fn leaf_layer(&self) -> &BTreeMap<ShareId, Vec<ShareId>> {
        self.layers.last().expect("tree has at least one layer")
    }

    /// Parent → children maps of every non-leaf layer, topmost first.
    pub fn upper_layers(&self) -> &[LayerChildren] {
        &self.layers[..self.layers.len() - 1]
    }

    /// Parent → children of a single layer.
    pub fn layer(&self, index: usize) -> &BTreeMap<ShareId, Vec<ShareId>> {
        &self.layers[index]
    }
}
