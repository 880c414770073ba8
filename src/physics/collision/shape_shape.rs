//! Narrow phase intersection checks between pairs of shapes.

use super::{query, Polygon, Shape, ShapeKind};
use crate::math::{self as m, Unit};
use crate::physics::Body;

/// An intersection between two shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    /// The normal, facing away from the first shape towards the second.
    pub normal: Unit<m::Vec2>,
    /// How deep the shapes overlap along the normal.
    pub penetration: f64,
    /// Points of contact in world space.
    /// May be empty when the shapes overlap but only touch at their boundaries.
    pub points: Vec<m::Vec2>,
}

impl Contact {
    fn flipped(self) -> Self {
        Contact {
            normal: -self.normal,
            ..self
        }
    }
}

/// A shape placed in the world with a position and orientation.
#[derive(Clone, Copy, Debug)]
pub struct ShapeInstance<'a> {
    pub shape: &'a Shape,
    pub position: m::Vec2,
    pub orientation: f64,
}

impl<'a> ShapeInstance<'a> {
    /// Get the shape of a body at its current pose, if it has one.
    pub fn of(body: &'a Body) -> Option<Self> {
        Some(Self {
            shape: body.shape()?,
            position: body.position(),
            orientation: body.orientation(),
        })
    }
}

/// A strategy for computing contacts between one combination of shape kinds.
///
/// Handlers are registered in a [`CollisionManager`][super::CollisionManager],
/// which picks the first one that accepts a pair of shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum CollisionHandler {
    CircleCircle,
    CirclePolygon,
    PolygonPolygon,
}

impl CollisionHandler {
    /// Every handler, in the order a new collision manager probes them.
    pub const ALL: [CollisionHandler; 3] = [
        CollisionHandler::CircleCircle,
        CollisionHandler::CirclePolygon,
        CollisionHandler::PolygonPolygon,
    ];

    /// Whether this handler knows how to collide the given kinds of shapes, in either order.
    pub fn can_handle(self, kind_a: ShapeKind, kind_b: ShapeKind) -> bool {
        use ShapeKind::*;
        match self {
            CollisionHandler::CircleCircle => matches!((kind_a, kind_b), (Circle, Circle)),
            CollisionHandler::CirclePolygon => {
                matches!((kind_a, kind_b), (Circle, Polygon) | (Polygon, Circle))
            }
            CollisionHandler::PolygonPolygon => matches!((kind_a, kind_b), (Polygon, Polygon)),
        }
    }

    /// Compute the contact between two shapes, with the normal pointing from `a` to `b`.
    ///
    /// Returns `None` if the shapes don't intersect
    /// or this handler doesn't accept their kinds.
    pub fn handle(self, a: ShapeInstance, b: ShapeInstance) -> Option<Contact> {
        use CollisionHandler::*;
        match (self, a.shape, b.shape) {
            (CircleCircle, Shape::Circle { r: r1 }, Shape::Circle { r: r2 }) => {
                circle_circle(a.position, *r1, b.position, *r2)
            }
            (CirclePolygon, Shape::Circle { r }, Shape::Polygon(poly)) => {
                let poly = WorldPolygon::new(poly, b.position, b.orientation);
                circle_polygon(a.position, *r, &poly).map(Contact::flipped)
            }
            (CirclePolygon, Shape::Polygon(poly), Shape::Circle { r }) => {
                let poly = WorldPolygon::new(poly, a.position, a.orientation);
                circle_polygon(b.position, *r, &poly)
            }
            (PolygonPolygon, Shape::Polygon(poly1), Shape::Polygon(poly2)) => {
                let poly1 = WorldPolygon::new(poly1, a.position, a.orientation);
                let poly2 = WorldPolygon::new(poly2, b.position, b.orientation);
                polygon_polygon(&poly1, &poly2)
            }
            _ => None,
        }
    }
}

/// Polygon data transformed into world space for a single check.
struct WorldPolygon {
    vertices: Vec<m::Vec2>,
    axes: Vec<Unit<m::Vec2>>,
    centroid: m::Vec2,
}

impl WorldPolygon {
    fn new(poly: &Polygon, position: m::Vec2, orientation: f64) -> Self {
        Self {
            vertices: poly.world_vertices(position, orientation),
            axes: poly.world_axes(orientation),
            centroid: poly.world_centroid(position, orientation),
        }
    }

    fn edge(&self, idx: usize) -> (m::Vec2, m::Vec2) {
        let n = self.vertices.len();
        (self.vertices[idx], self.vertices[(idx + 1) % n])
    }

    /// Minimum and maximum of the vertices projected onto an axis.
    fn project(&self, axis: m::Vec2) -> (f64, f64) {
        self.vertices
            .iter()
            .map(|v| v.dot(axis))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                (min.min(p), max.max(p))
            })
    }
}

//
// CIRCLE <-> CIRCLE
//

fn circle_circle(pos1: m::Vec2, r1: f64, pos2: m::Vec2, r2: f64) -> Option<Contact> {
    let dist = pos2 - pos1;
    let dist_sq = dist.mag_sq();
    let r_sum = r1 + r2;
    if dist_sq >= r_sum * r_sum {
        return None;
    }

    let dist_len = dist_sq.sqrt();
    if dist_len == 0.0 {
        // same position, consider penetration to be on x axis
        return Some(Contact {
            normal: Unit::unit_x(),
            penetration: r1,
            points: vec![pos1],
        });
    }

    let normal = Unit::new_unchecked(dist / dist_len);
    Some(Contact {
        normal,
        penetration: r_sum - dist_len,
        points: vec![pos1 + *normal * r1],
    })
}

//
// CIRCLE <-> POLYGON
//

/// The normal of the result faces from the polygon towards the circle.
fn circle_polygon(center: m::Vec2, r: f64, poly: &WorldPolygon) -> Option<Contact> {
    // signed distance from the center to each face, positive outside
    let (face_idx, separation) = poly
        .axes
        .iter()
        .enumerate()
        .map(|(i, axis)| (i, axis.dot(center - poly.vertices[i])))
        .max_by(|(_, s1), (_, s2)| s1.total_cmp(s2))?;

    if separation > r {
        // a face separates the shapes
        return None;
    }

    if separation <= 0.0 {
        // center is inside the polygon, push out through the shallowest face
        let normal = poly.axes[face_idx];
        return Some(Contact {
            normal,
            penetration: r - separation,
            points: vec![center - *normal * separation],
        });
    }

    let closest = (0..poly.vertices.len())
        .map(|i| {
            let (start, end) = poly.edge(i);
            query::closest_point_on_segment(center, start, end)
        })
        .min_by(|p1, p2| (center - *p1).mag_sq().total_cmp(&(center - *p2).mag_sq()))?;

    let to_center = center - closest;
    let dist_sq = to_center.mag_sq();
    if dist_sq >= r * r {
        return None;
    }
    // center is strictly outside so the distance is nonzero
    let dist = dist_sq.sqrt();
    Some(Contact {
        normal: Unit::new_unchecked(to_center / dist),
        penetration: r - dist,
        points: vec![closest],
    })
}

//
// POLYGON <-> POLYGON
//

/// Overlaps closer together than this count as equally deep when picking the separating axis.
const AXIS_TIE_TOLERANCE: f64 = 1e-9;

/// Separating axis test over the face normals of both polygons.
///
/// When several axes overlap equally little, the choice between them depends only on
/// their direction, so swapping the polygons picks the same axis and reverses the normal.
fn polygon_polygon(poly1: &WorldPolygon, poly2: &WorldPolygon) -> Option<Contact> {
    let mut overlaps: Vec<(Unit<m::Vec2>, f64)> =
        Vec::with_capacity(poly1.axes.len() + poly2.axes.len());
    for &axis in poly1.axes.iter().chain(&poly2.axes) {
        let (min1, max1) = poly1.project(*axis);
        let (min2, max2) = poly2.project(*axis);
        let overlap = max1.min(max2) - min1.max(min2);
        if overlap <= 0.0 {
            return None;
        }
        overlaps.push((axis, overlap));
    }
    let min_overlap = overlaps
        .iter()
        .map(|&(_, overlap)| overlap)
        .fold(f64::INFINITY, f64::min);
    let (axis, penetration) = overlaps
        .into_iter()
        .filter(|&(_, overlap)| overlap - min_overlap <= AXIS_TIE_TOLERANCE)
        .max_by(|(a1, _), (a2, _)| {
            let (k1, k2) = (axis_line_key(**a1), axis_line_key(**a2));
            k1.0.total_cmp(&k2.0).then(k1.1.total_cmp(&k2.1))
        })?;

    let normal = if (poly2.centroid - poly1.centroid).dot(*axis) < 0.0 {
        -axis
    } else {
        axis
    };

    let points = poly1
        .vertices
        .iter()
        .filter(|v| query::point_in_polygon(**v, &poly2.vertices))
        .chain(
            poly2
                .vertices
                .iter()
                .filter(|v| query::point_in_polygon(**v, &poly1.vertices)),
        )
        .copied()
        .collect();

    Some(Contact {
        normal,
        penetration,
        points,
    })
}

/// The same key for an axis and its opposite: the direction flipped into the half-plane x > 0.
fn axis_line_key(axis: m::Vec2) -> (f64, f64) {
    if axis.x > 0.0 || (axis.x == 0.0 && axis.y > 0.0) {
        (axis.x, axis.y)
    } else {
        (-axis.x, -axis.y)
    }
}
