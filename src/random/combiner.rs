use std::fmt::Debug;

use crate::random::seed::{mix64, GOLDEN_GAMMA};

/// Combine a parent stream key with a child key into the key of the child stream.
///
/// Implementations must be pure, non-commutative (forking `a` then `b` must differ from forking
/// `b` then `a`) and must mix the bits well enough that sibling streams are statistically
/// independent.
pub trait KeyCombiner: Debug + Send + Sync {
    /// Derive the child stream key.
    ///
    /// # Arguments
    ///
    /// * `parent_key`: The key of the stream being forked.
    /// * `child_key`: The key identifying the child.
    ///
    /// returns: `u64`
    fn combine(&self, parent_key: u64, child_key: u64) -> u64;
}

/// The default combiner. The child key is mixed on its own first and then folded into an odd
/// multiple of the parent key, so the two arguments go through different transformations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixKeyCombiner;

/// An odd multiplier (from the PCG 64-bit LCG) applied to the parent key.
const PARENT_MULTIPLIER: u64 = 0x5851_F42D_4C95_7F2D;

impl KeyCombiner for MixKeyCombiner {
    fn combine(&self, parent_key: u64, child_key: u64) -> u64 {
        let child = mix64(child_key.wrapping_add(GOLDEN_GAMMA));
        mix64(parent_key.wrapping_mul(PARENT_MULTIPLIER) ^ child)
    }
}
