use super::Body;

use thunderdome as td;

/// Key type to look up a body stored in the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyKey(pub(super) td::Index);

impl BodyKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    /// Useful for creating your own mappings from bodies to other things
    /// such as sprites or game entities.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// Storage for the bodies in the physics world.
///
/// Bodies live in an arena, and a separate list of keys
/// remembers the order they were inserted in.
/// Everything that iterates over bodies does it in insertion order,
/// which keeps collision pairs in a stable order from one step to the next.
#[derive(Default)]
pub struct BodySet {
    pub(super) bodies: td::Arena<Body>,
    pub(super) order: Vec<BodyKey>,
}

impl BodySet {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a body, returning a key that can be used to access or remove it later.
    pub fn insert(&mut self, body: Body) -> BodyKey {
        let key = BodyKey(self.bodies.insert(body));
        self.order.push(key);
        key
    }

    /// Remove a body, returning it if it still existed.
    pub fn remove(&mut self, key: BodyKey) -> Option<Body> {
        let body = self.bodies.remove(key.0)?;
        self.order.retain(|k| *k != key);
        Some(body)
    }

    #[inline]
    pub fn get(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key.0)
    }

    #[inline]
    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key.0)
    }

    /// Mutably access two different bodies at once.
    ///
    /// Returns `None` if the keys share a slot or either body doesn't exist.
    pub fn get2_mut(&mut self, a: BodyKey, b: BodyKey) -> Option<(&mut Body, &mut Body)> {
        // thunderdome panics on the same slot even if generations differ
        if a.0.slot() == b.0.slot() {
            return None;
        }
        match self.bodies.get2_mut(a.0, b.0) {
            (Some(body_a), Some(body_b)) => Some((body_a, body_b)),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, key: BodyKey) -> bool {
        self.bodies.contains(key.0)
    }

    /// Keys of all bodies in insertion order.
    #[inline]
    pub fn keys(&self) -> &[BodyKey] {
        &self.order
    }

    /// Iterate over bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &Body)> + '_ {
        self.order.iter().map(move |&k| (k, &self.bodies[k.0]))
    }

    /// Mutably iterate over bodies. The order is unspecified.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyKey, &mut Body)> + '_ {
        self.bodies.iter_mut().map(|(idx, body)| (BodyKey(idx), body))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // not exposed to users, must use through World::clear
    pub(super) fn clear(&mut self) {
        self.bodies.clear();
        self.order.clear();
    }
}
