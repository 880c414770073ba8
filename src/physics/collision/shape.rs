use crate::math::{self as m, Unit};

/// Errors that can occur when constructing a [`Shape`].
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ShapeError {
    #[error("Circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("A polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("Polygon vertex {0} is not finite")]
    NonFiniteVertex(usize),
    #[error("Polygon edge starting at vertex {0} has zero length")]
    DegenerateEdge(usize),
    #[error("Polygon has zero area")]
    ZeroArea,
}

/// The geometric shape of a body.
///
/// Shapes never store a world position. They are always evaluated relative to
/// the position and orientation of the body that owns them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Shape {
    /// A circle centered on the body's position.
    Circle { r: f64 },
    /// A convex polygon in body-local space.
    Polygon(Polygon),
}

/// Discriminant of [`Shape`], used to pick a collision handler for a pair of shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Polygon,
}

impl Shape {
    /// Create a circle shape from a radius.
    pub fn new_circle(radius: f64) -> Result<Self, ShapeError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(Shape::Circle { r: radius })
    }

    /// Create a convex polygon shape from body-local vertices.
    /// See [`Polygon::new`] for the requirements on the vertices.
    pub fn new_polygon(vertices: Vec<m::Vec2>) -> Result<Self, ShapeError> {
        Polygon::new(vertices).map(Shape::Polygon)
    }

    /// Create an axis-aligned rectangle centered on the body's position.
    pub fn new_rect(width: f64, height: f64) -> Result<Self, ShapeError> {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Shape::new_polygon(vec![
            m::Vec2::new(-hw, -hh),
            m::Vec2::new(hw, -hh),
            m::Vec2::new(hw, hh),
            m::Vec2::new(-hw, hh),
        ])
    }

    /// Create a rectangle with both sides set to the same length.
    pub fn new_square(side_length: f64) -> Result<Self, ShapeError> {
        Shape::new_rect(side_length, side_length)
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle { r } => std::f64::consts::PI * r * r,
            Shape::Polygon(poly) => poly.area,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(poly) => Some(poly),
            Shape::Circle { .. } => None,
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Shape::Circle { r } => Some(*r),
            Shape::Polygon(_) => None,
        }
    }
}

/// A convex polygon stored in body-local space.
///
/// The centroid and the outward face normals ("axes") are cached
/// and rebuilt whenever the vertices change.
/// Fields are private so the caches can't go stale.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")
)]
pub struct Polygon {
    vertices: Vec<m::Vec2>,
    axes: Vec<Unit<m::Vec2>>,
    centroid: m::Vec2,
    area: f64,
}

impl Polygon {
    /// Create a polygon from an ordered ring of vertices.
    ///
    /// The polygon is assumed to be convex. Counterclockwise winding is expected,
    /// but clockwise input still gets outward-facing axes.
    /// Fails if there are fewer than 3 vertices, a vertex isn't finite,
    /// two consecutive vertices coincide or all vertices are collinear.
    pub fn new(vertices: Vec<m::Vec2>) -> Result<Self, ShapeError> {
        let mut poly = Polygon {
            vertices: Vec::new(),
            axes: Vec::new(),
            centroid: m::Vec2::zero(),
            area: 0.0,
        };
        poly.set_vertices(vertices)?;
        Ok(poly)
    }

    /// Replace the vertices of the polygon and recompute cached data.
    /// On error the polygon is left unchanged.
    pub fn set_vertices(&mut self, vertices: Vec<m::Vec2>) -> Result<(), ShapeError> {
        let n = vertices.len();
        if n < 3 {
            return Err(ShapeError::TooFewVertices(n));
        }
        if let Some(idx) = vertices
            .iter()
            .position(|v| !(v.x.is_finite() && v.y.is_finite()))
        {
            return Err(ShapeError::NonFiniteVertex(idx));
        }

        let edges: Vec<m::Vec2> = (0..n)
            .map(|i| vertices[(i + 1) % n] - vertices[i])
            .collect();
        if let Some(idx) = edges.iter().position(|e| e.mag_sq() == 0.0) {
            return Err(ShapeError::DegenerateEdge(idx));
        }

        // shoelace formula, positive for counterclockwise winding
        let signed_area = (0..n)
            .map(|i| m::cross(vertices[i], vertices[(i + 1) % n]))
            .sum::<f64>()
            / 2.0;
        if signed_area == 0.0 {
            return Err(ShapeError::ZeroArea);
        }
        let ccw = signed_area > 0.0;

        self.axes = edges
            .iter()
            .map(|&e| {
                let normal = if ccw {
                    m::right_normal(e)
                } else {
                    m::left_normal(e)
                };
                Unit::new_normalize(normal)
            })
            .collect();
        self.centroid = vertices.iter().copied().sum::<m::Vec2>() / n as f64;
        self.area = signed_area.abs();
        self.vertices = vertices;
        Ok(())
    }

    /// Vertices in body-local space.
    #[inline]
    pub fn vertices(&self) -> &[m::Vec2] {
        &self.vertices
    }

    /// Outward face normals in body-local space, one per edge.
    /// Axis `i` belongs to the edge from vertex `i` to vertex `i + 1`.
    #[inline]
    pub fn axes(&self) -> &[Unit<m::Vec2>] {
        &self.axes
    }

    /// Average of the vertices in body-local space.
    #[inline]
    pub fn centroid(&self) -> m::Vec2 {
        self.centroid
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Vertices transformed into world space by a body's position and orientation.
    pub fn world_vertices(&self, position: m::Vec2, orientation: f64) -> Vec<m::Vec2> {
        self.vertices
            .iter()
            .map(|&v| position + m::rotate(v, orientation))
            .collect()
    }

    /// Face normals rotated into world space.
    pub fn world_axes(&self, orientation: f64) -> Vec<Unit<m::Vec2>> {
        self.axes.iter().map(|a| a.rotated(orientation)).collect()
    }

    pub fn world_centroid(&self, position: m::Vec2, orientation: f64) -> m::Vec2 {
        position + m::rotate(self.centroid, orientation)
    }
}

impl TryFrom<Vec<[f64; 2]>> for Polygon {
    type Error = ShapeError;

    fn try_from(points: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Polygon::new(points.into_iter().map(|[x, y]| m::Vec2::new(x, y)).collect())
    }
}

impl From<Polygon> for Vec<[f64; 2]> {
    fn from(poly: Polygon) -> Self {
        poly.vertices.iter().map(|v| [v.x, v.y]).collect()
    }
}
