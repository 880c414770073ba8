pub mod broadphase;
pub use broadphase::BroadPhase;

mod manager;
pub use manager::CollisionManager;

pub mod query;

mod shape;
pub use shape::{Polygon, Shape, ShapeError, ShapeKind};

pub mod shape_shape;
pub use shape_shape::{CollisionHandler, Contact, ShapeInstance};

use super::BodyKey;
use crate::math::{self as m, Unit};

/// A contact between two bodies detected during a world update.
///
/// Groups are created fresh every step and not carried over to the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionGroup {
    pub(crate) a: BodyKey,
    pub(crate) b: BodyKey,
    pub(crate) normal: Unit<m::Vec2>,
    pub(crate) penetration: f64,
    pub(crate) contact_points: Vec<m::Vec2>,
}

impl CollisionGroup {
    /// Create a group for the ordered pair `(a, b)` from a narrow phase result.
    pub fn new(a: BodyKey, b: BodyKey, contact: Contact) -> Self {
        Self {
            a,
            b,
            normal: contact.normal,
            penetration: contact.penetration,
            contact_points: contact.points,
        }
    }

    /// The first body of the pair.
    #[inline]
    pub fn a(&self) -> BodyKey {
        self.a
    }

    /// The second body of the pair.
    #[inline]
    pub fn b(&self) -> BodyKey {
        self.b
    }

    /// The contact normal, pointing from body A towards body B.
    #[inline]
    pub fn normal(&self) -> Unit<m::Vec2> {
        self.normal
    }

    /// How far the bodies overlap along the normal.
    #[inline]
    pub fn penetration(&self) -> f64 {
        self.penetration
    }

    /// Points of contact in world space.
    #[inline]
    pub fn contact_points(&self) -> &[m::Vec2] {
        &self.contact_points
    }

    /// Groups without contact points are never resolved.
    #[inline]
    pub fn has_contact_points(&self) -> bool {
        !self.contact_points.is_empty()
    }
}
