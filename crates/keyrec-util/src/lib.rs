#![warn(missing_docs)]
//! Utilities crate for the keyrec.rs library.
//!
//! Small, generic helpers shared across the workspace: set operations over
//! slices, access-order editing, and integer division helpers. Everything
//! here is deterministic; randomness lives with the callers.

mod arith;
mod order;
mod set;

pub use arith::{ceil_div, floor_div};
pub use order::{move_element, promote_hinted};
pub use set::{count_less_than, difference, has_duplicates, indices, intersection, offset_range};
