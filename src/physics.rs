use crate::math as m;

//

pub mod body;
pub use body::{Body, BodyType};

pub mod body_set;
pub use body_set::{BodyKey, BodySet};

pub mod collision;
pub use collision::{
    CollisionGroup, CollisionHandler, CollisionManager, Contact, Polygon, Shape, ShapeError,
    ShapeKind,
};

mod solver;

//

/// Parameters to control the behavior of the physics world.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WorldParams {
    /// Acceleration applied to every dynamic body, scaled by its mass.
    ///
    /// Positive y points down, so the default gravity pulls towards +y.
    pub gravity: [f64; 2],
    /// Number of impulse passes over all contacts each step.
    ///
    /// Higher values make stacks of bodies more stable at a linear performance cost.
    pub iterations: usize,
    /// Penetration depth that is left alone by positional correction.
    /// A little overlap keeps resting contacts from jittering.
    pub penetration_allowance: f64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: [0.0, 10.0],
            iterations: 10,
            penetration_allowance: 0.05,
        }
    }
}

/// The physics world. Owns all bodies and advances them through time.
///
/// Each [`update`][World::update] detects collisions from the current positions,
/// integrates forces and gravity into velocities, resolves collisions with impulses
/// and then integrates velocities into positions.
pub struct World {
    bodies: BodySet,
    collision_manager: CollisionManager,
    gravity: m::Vec2,
    iterations: usize,
    penetration_allowance: f64,
    // groups detected in the latest update, kept for inspection
    last_collisions: Vec<CollisionGroup>,
}

impl Default for World {
    fn default() -> Self {
        Self::with_params(WorldParams::default())
    }
}

impl World {
    /// Create an empty world with default gravity `(0, 10)` and 10 solver iterations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world. See [`WorldParams`][self::WorldParams] for explanation.
    pub fn with_params(params: WorldParams) -> Self {
        Self {
            bodies: BodySet::new(),
            collision_manager: CollisionManager::new(),
            gravity: m::Vec2::new(params.gravity[0], params.gravity[1]),
            iterations: params.iterations,
            penetration_allowance: params.penetration_allowance,
            last_collisions: Vec::new(),
        }
    }

    /// The current parameters of the world.
    pub fn params(&self) -> WorldParams {
        WorldParams {
            gravity: [self.gravity.x, self.gravity.y],
            iterations: self.iterations,
            penetration_allowance: self.penetration_allowance,
        }
    }

    /// Advance the simulation by a timestep of `dt` seconds.
    ///
    /// Forces and torques on every body are cleared afterwards.
    pub fn update(&mut self, dt: f64) {
        let _span = tracy_span!("physics update", "update");

        self.last_collisions = self.collision_manager.detect_collisions(&self.bodies);

        for (_, body) in self.bodies.iter_mut() {
            if !body.is_dynamic() {
                continue;
            }
            body.velocity += (body.force * body.mass + self.gravity * body.mass) * dt;
            body.angular_velocity += body.torque * body.inertia * dt;
        }

        if !self.last_collisions.is_empty() {
            self.collision_manager.process_collisions(
                &self.last_collisions,
                self.iterations,
                self.penetration_allowance,
                &mut self.bodies,
            );
        }

        for (_, body) in self.bodies.iter_mut() {
            if body.is_dynamic() {
                body.position += body.velocity * dt;
                body.orientation += body.angular_velocity * dt;
            }
            body.force = m::Vec2::zero();
            body.torque = 0.0;
        }
    }

    // bodies

    /// Add a body to the world, returning a key to access it with.
    pub fn add_body(&mut self, body: Body) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world. Returns the body if it still existed.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<Body> {
        self.bodies.remove(key)
    }

    #[inline]
    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    #[inline]
    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    /// Read-only view of all bodies. Iterating it goes in insertion order.
    #[inline]
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Remove every body from the world.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.last_collisions.clear();
    }

    // settings

    #[inline]
    pub fn gravity(&self) -> m::Vec2 {
        self.gravity
    }

    #[inline]
    pub fn set_gravity(&mut self, x: f64, y: f64) {
        self.gravity = m::Vec2::new(x, y);
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[inline]
    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    #[inline]
    pub fn penetration_allowance(&self) -> f64 {
        self.penetration_allowance
    }

    #[inline]
    pub fn set_penetration_allowance(&mut self, allowance: f64) {
        self.penetration_allowance = allowance;
    }

    /// Collision groups detected during the latest update.
    #[inline]
    pub fn step_collisions(&self) -> &[CollisionGroup] {
        &self.last_collisions
    }

    #[inline]
    pub fn collision_manager(&self) -> &CollisionManager {
        &self.collision_manager
    }

    /// Access the collision manager to add or remove handlers.
    #[inline]
    pub fn collision_manager_mut(&mut self) -> &mut CollisionManager {
        &mut self.collision_manager
    }
}
