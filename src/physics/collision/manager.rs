use super::{
    broadphase::{BroadPhase, BruteForce},
    CollisionGroup, CollisionHandler, ShapeInstance, ShapeKind,
};
use crate::physics::{solver, BodySet};

/// Finds contacts between bodies and resolves them.
///
/// Keeps an ordered list of [`CollisionHandler`]s.
/// For each pair of bodies the first handler that accepts both shapes is used.
#[derive(Clone, Debug)]
pub struct CollisionManager {
    handlers: Vec<CollisionHandler>,
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self {
            handlers: CollisionHandler::ALL.to_vec(),
        }
    }
}

impl CollisionManager {
    /// Create a manager with a handler for every combination of shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with no handlers. Nothing collides until some are added.
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    #[inline]
    pub fn handlers(&self) -> &[CollisionHandler] {
        &self.handlers
    }

    /// Add a handler to the end of the list. Handlers added earlier take priority.
    pub fn add_handler(&mut self, handler: CollisionHandler) {
        self.handlers.push(handler);
    }

    /// Remove the first occurrence of a handler.
    /// Returns whether there was one to remove.
    pub fn remove_handler(&mut self, handler: CollisionHandler) -> bool {
        match self.handlers.iter().position(|h| *h == handler) {
            Some(idx) => {
                self.handlers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The first handler that accepts the given shape kinds.
    pub fn find_handler(&self, kind_a: ShapeKind, kind_b: ShapeKind) -> Option<CollisionHandler> {
        self.handlers
            .iter()
            .copied()
            .find(|h| h.can_handle(kind_a, kind_b))
    }

    /// Check every pair of bodies where at least one is dynamic for contact.
    ///
    /// Pairs follow the insertion order of bodies and the normal of each group
    /// points from the earlier body to the later one.
    /// Only contacts with at least one contact point produce a group.
    pub fn detect_collisions(&self, bodies: &BodySet) -> Vec<CollisionGroup> {
        let _span = tracy_span!("detect collisions", "detect_collisions");

        let mut groups = Vec::new();
        for [key_a, key_b] in BruteForce::pairs(bodies) {
            let (Some(body_a), Some(body_b)) = (bodies.get(key_a), bodies.get(key_b)) else {
                continue;
            };
            if !body_a.is_dynamic() && !body_b.is_dynamic() {
                continue;
            }
            let (Some(inst_a), Some(inst_b)) = (ShapeInstance::of(body_a), ShapeInstance::of(body_b))
            else {
                log::debug!("skipping pair {key_a:?}, {key_b:?}: body without a shape");
                continue;
            };
            let Some(handler) = self.find_handler(inst_a.shape.kind(), inst_b.shape.kind()) else {
                log::debug!(
                    "skipping pair {key_a:?}, {key_b:?}: no handler for {:?} and {:?}",
                    inst_a.shape.kind(),
                    inst_b.shape.kind(),
                );
                continue;
            };

            if let Some(contact) = handler.handle(inst_a, inst_b) {
                if !contact.points.is_empty() {
                    groups.push(CollisionGroup::new(key_a, key_b, contact));
                }
            }
        }

        log::trace!("detected {} collision groups", groups.len());
        groups
    }

    /// Resolve collisions with `iterations` passes of impulses over every group,
    /// followed by positional correction of penetration beyond `penetration_allowance`.
    ///
    /// Groups whose bodies no longer exist are ignored.
    pub fn process_collisions(
        &self,
        groups: &[CollisionGroup],
        iterations: usize,
        penetration_allowance: f64,
        bodies: &mut BodySet,
    ) {
        solver::solve(groups, iterations, penetration_allowance, bodies);
    }
}
