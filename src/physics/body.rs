use super::Shape;
use crate::math as m;

use std::any::Any;

/// The type of a body determines how it is treated in physics updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum BodyType {
    /// The default type of body; responds to forces, gravity and collisions.
    #[default]
    Dynamic,
    /// Never moves, but other bodies still collide with it.
    Static,
}

/// A body is something that moves, typically a physics-enabled rigid body or particle.
/// Give it a [`Shape`][super::Shape] to make it collide with other things.
///
/// `mass` and `inertia` are response factors:
/// forces, gravity and impulses are multiplied by them when changing velocity.
/// Inertia defaults to zero, so bodies don't rotate unless it's set explicitly.
pub struct Body {
    pub(crate) body_type: BodyType,
    pub(crate) shape: Option<Shape>,
    pub(crate) position: m::Vec2,
    pub(crate) velocity: m::Vec2,
    pub(crate) force: m::Vec2,
    pub(crate) orientation: f64,
    pub(crate) angular_velocity: f64,
    pub(crate) torque: f64,
    pub(crate) mass: f64,
    pub(crate) inertia: f64,
    pub(crate) restitution: f64,
    pub(crate) static_friction: f64,
    pub(crate) dynamic_friction: f64,
    attachment: Option<Box<dyn Any>>,
}

impl Body {
    /// Create a dynamic body at the given position, at rest and without a shape.
    pub fn new(position: m::Vec2) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            shape: None,
            position,
            velocity: m::Vec2::zero(),
            force: m::Vec2::zero(),
            orientation: 0.0,
            angular_velocity: 0.0,
            torque: 0.0,
            mass: 1.0,
            inertia: 0.0,
            restitution: 0.5,
            static_friction: 0.1,
            dynamic_friction: 0.1,
            attachment: None,
        }
    }

    /// Set the shape in a builder-like chain.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the body type in a builder-like chain.
    pub fn with_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    /// Set the velocity in a builder-like chain.
    pub fn with_velocity(mut self, velocity: m::Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// Zero out both linear and angular velocity.
    pub fn reset_velocity(&mut self) {
        self.velocity = m::Vec2::zero();
        self.angular_velocity = 0.0;
    }

    /// Push the body along the direction it's facing.
    pub fn apply_forward_impulse(&mut self, magnitude: f64) {
        let (sin, cos) = self.orientation.sin_cos();
        self.velocity += m::Vec2::new(cos, sin) * magnitude;
    }

    /// Apply an impulse at a point offset from the body's position.
    pub fn apply_impulse(&mut self, impulse: m::Vec2, contact_offset: m::Vec2) {
        self.velocity += impulse * self.mass;
        self.angular_velocity += self.inertia * m::cross(contact_offset, impulse);
    }

    /// Add to the force accumulator. Forces are cleared at the end of every world update,
    /// so they need to be applied again each frame.
    pub fn apply_force(&mut self, force: m::Vec2) {
        self.force += force;
    }

    /// Add to the torque accumulator. Cleared at the end of every world update.
    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    // accessors

    #[inline]
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    #[inline]
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
    }

    #[inline]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Replace the shape, returning the old one if there was one.
    #[inline]
    pub fn set_shape(&mut self, shape: Shape) -> Option<Shape> {
        self.shape.replace(shape)
    }

    #[inline]
    pub fn position(&self) -> m::Vec2 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: m::Vec2) {
        self.position = position;
    }

    #[inline]
    pub fn velocity(&self) -> m::Vec2 {
        self.velocity
    }

    #[inline]
    pub fn set_velocity(&mut self, velocity: m::Vec2) {
        self.velocity = velocity;
    }

    #[inline]
    pub fn force(&self) -> m::Vec2 {
        self.force
    }

    #[inline]
    pub fn set_force(&mut self, force: m::Vec2) {
        self.force = force;
    }

    /// Orientation in radians.
    #[inline]
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    #[inline]
    pub fn set_orientation(&mut self, orientation: f64) {
        self.orientation = orientation;
    }

    /// Angular velocity in radians per second.
    #[inline]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    #[inline]
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    #[inline]
    pub fn torque(&self) -> f64 {
        self.torque
    }

    #[inline]
    pub fn set_torque(&mut self, torque: f64) {
        self.torque = torque;
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    #[inline]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    #[inline]
    pub fn set_inertia(&mut self, inertia: f64) {
        self.inertia = inertia;
    }

    #[inline]
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Bounciness, conceptually between 0 and 1.
    #[inline]
    pub fn set_restitution(&mut self, restitution: f64) {
        self.restitution = restitution;
    }

    #[inline]
    pub fn static_friction(&self) -> f64 {
        self.static_friction
    }

    #[inline]
    pub fn set_static_friction(&mut self, coef: f64) {
        self.static_friction = coef;
    }

    #[inline]
    pub fn dynamic_friction(&self) -> f64 {
        self.dynamic_friction
    }

    #[inline]
    pub fn set_dynamic_friction(&mut self, coef: f64) {
        self.dynamic_friction = coef;
    }

    // attachment

    /// Attach arbitrary data to the body, replacing whatever was there.
    /// The physics engine never looks at it.
    pub fn set_attachment<T: Any>(&mut self, value: T) {
        self.attachment = Some(Box::new(value));
    }

    /// Get the attachment if there is one and it has the type `T`.
    pub fn attachment<T: Any>(&self) -> Option<&T> {
        self.attachment.as_ref()?.downcast_ref()
    }

    pub fn attachment_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.attachment.as_mut()?.downcast_mut()
    }

    #[inline]
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// Remove the attachment from the body and return it.
    pub fn take_attachment(&mut self) -> Option<Box<dyn Any>> {
        self.attachment.take()
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("body_type", &self.body_type)
            .field("shape", &self.shape)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("force", &self.force)
            .field("orientation", &self.orientation)
            .field("angular_velocity", &self.angular_velocity)
            .field("torque", &self.torque)
            .field("mass", &self.mass)
            .field("inertia", &self.inertia)
            .field("restitution", &self.restitution)
            .field("static_friction", &self.static_friction)
            .field("dynamic_friction", &self.dynamic_friction)
            .field("has_attachment", &self.attachment.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn defaults() {
        let body = Body::new(m::Vec2::new(3.0, 4.0));
        assert_eq!(body.position(), m::Vec2::new(3.0, 4.0));
        assert_eq!(body.velocity(), m::Vec2::zero());
        assert_eq!(body.force(), m::Vec2::zero());
        assert_eq!(body.body_type(), BodyType::Dynamic);
        assert_eq!(body.mass(), 1.0);
        assert_eq!(body.inertia(), 0.0);
        assert_eq!(body.restitution(), 0.5);
        assert_eq!(body.static_friction(), 0.1);
        assert_eq!(body.dynamic_friction(), 0.1);
        assert!(body.shape().is_none());
        assert!(!body.has_attachment());
    }

    #[test]
    fn impulses() {
        let mut body = Body::new(m::Vec2::zero());
        body.set_mass(2.0);
        body.apply_impulse(m::Vec2::new(1.0, 0.0), m::Vec2::new(0.0, 1.0));
        assert_eq!(body.velocity(), m::Vec2::new(2.0, 0.0));
        // zero inertia means no rotation
        assert_eq!(body.angular_velocity(), 0.0);

        body.set_inertia(0.5);
        body.apply_impulse(m::Vec2::new(1.0, 0.0), m::Vec2::new(0.0, 1.0));
        assert_eq!(body.angular_velocity(), -0.5);

        body.reset_velocity();
        assert_eq!(body.velocity(), m::Vec2::zero());
        assert_eq!(body.angular_velocity(), 0.0);

        body.set_orientation(FRAC_PI_2);
        body.apply_forward_impulse(3.0);
        assert!(body.velocity().x.abs() < 1e-12);
        assert!((body.velocity().y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn replacing_shape_returns_old() {
        let mut body = Body::new(m::Vec2::zero()).with_shape(Shape::new_circle(1.0).unwrap());
        let old = body.set_shape(Shape::new_square(2.0).unwrap());
        assert_eq!(old, Some(Shape::Circle { r: 1.0 }));
        assert!(body.shape().unwrap().as_polygon().is_some());
    }

    #[test]
    fn attachments() {
        #[derive(Debug, PartialEq)]
        struct SpriteId(u32);

        let mut body = Body::new(m::Vec2::zero());
        body.set_attachment(SpriteId(7));
        assert_eq!(body.attachment::<SpriteId>(), Some(&SpriteId(7)));
        assert_eq!(body.attachment::<String>(), None);
        if let Some(id) = body.attachment_mut::<SpriteId>() {
            id.0 = 8;
        }
        let taken = body.take_attachment().unwrap();
        assert_eq!(taken.downcast_ref::<SpriteId>(), Some(&SpriteId(8)));
        assert!(!body.has_attachment());
    }
}
