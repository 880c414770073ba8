//! Broad phase collision detection algorithms
//! are responsible for detecting pairs of possibly intersecting bodies
//! for further, more accurate narrow phase inspection.

use crate::physics::{BodyKey, BodySet};

use itertools::Itertools;

/// A broad phase algorithm.
pub trait BroadPhase {
    /// Returns pairs of potentially intersecting bodies.
    ///
    /// Within each pair the first body must come before the second in insertion order,
    /// so that collision normals always point the same way for the same pair.
    fn pairs(bodies: &BodySet) -> Vec<[BodyKey; 2]>;
}

/// The simplest possible broad phase algorithm,
/// which pairs every body with every other body.
/// Very inefficient, but can work for small systems.
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn pairs(bodies: &BodySet) -> Vec<[BodyKey; 2]> {
        bodies
            .keys()
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| [a, b])
            .collect()
    }
}
