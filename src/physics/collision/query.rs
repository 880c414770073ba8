//! Geometric queries for points vs. world-space shapes.

use crate::math as m;

/// Points closer than this to an edge count as lying on it.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Check whether a point lies inside a polygon given as a world-space vertex ring.
///
/// Points on the boundary (within a small tolerance) count as inside.
/// Everything else goes through the ray crossing parity test: a horizontal ray is cast
/// from the point towards +x and the edges it crosses are counted.
pub fn point_in_polygon(point: m::Vec2, vertices: &[m::Vec2]) -> bool {
    let n = vertices.len();
    let on_edge = (0..n).any(|i| {
        let closest = closest_point_on_segment(point, vertices[i], vertices[(i + 1) % n]);
        (point - closest).mag_sq() <= EDGE_TOLERANCE * EDGE_TOLERANCE
    });
    if on_edge {
        return true;
    }

    let mut inside = false;
    for i in 0..n {
        let v1 = vertices[i];
        let v2 = vertices[(i + 1) % n];
        // half-open comparison so a ray through a vertex is only counted once
        if (v1.y > point.y) != (v2.y > point.y) {
            let x_at_y = v1.x + (point.y - v1.y) * (v2.x - v1.x) / (v2.y - v1.y);
            if point.x < x_at_y {
                inside = !inside;
            }
        }
    }
    inside
}

/// The closest point to `point` on the line segment from `start` to `end`.
pub fn closest_point_on_segment(point: m::Vec2, start: m::Vec2, end: m::Vec2) -> m::Vec2 {
    let edge = end - start;
    let len_sq = edge.mag_sq();
    if len_sq == 0.0 {
        return start;
    }
    let t = ((point - start).dot(edge) / len_sq).clamp(0.0, 1.0);
    start + edge * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(center: m::Vec2, side: f64) -> Vec<m::Vec2> {
        let h = side / 2.0;
        vec![
            center + m::Vec2::new(-h, -h),
            center + m::Vec2::new(h, -h),
            center + m::Vec2::new(h, h),
            center + m::Vec2::new(-h, h),
        ]
    }

    #[test]
    fn points_inside_and_outside() {
        let sq = square(m::Vec2::zero(), 2.0);
        assert!(point_in_polygon(m::Vec2::zero(), &sq));
        assert!(point_in_polygon(m::Vec2::new(0.9, -0.9), &sq));
        assert!(!point_in_polygon(m::Vec2::new(1.1, 0.0), &sq));
        assert!(!point_in_polygon(m::Vec2::new(-3.0, 0.0), &sq));
        assert!(!point_in_polygon(m::Vec2::new(0.0, 5.0), &sq));

        // ray passing exactly through a vertex of a diamond
        let diamond = vec![
            m::Vec2::new(0.0, -1.0),
            m::Vec2::new(1.0, 0.0),
            m::Vec2::new(0.0, 1.0),
            m::Vec2::new(-1.0, 0.0),
        ];
        assert!(point_in_polygon(m::Vec2::new(0.5, 0.0), &diamond));
        assert!(!point_in_polygon(m::Vec2::new(-2.0, 0.0), &diamond));
    }

    #[test]
    fn boundary_points_are_inside() {
        let sq = square(m::Vec2::zero(), 2.0);
        // every side, including the ones the crossing test alone would reject
        assert!(point_in_polygon(m::Vec2::new(-1.0, 0.3), &sq));
        assert!(point_in_polygon(m::Vec2::new(1.0, 0.3), &sq));
        assert!(point_in_polygon(m::Vec2::new(0.3, -1.0), &sq));
        assert!(point_in_polygon(m::Vec2::new(0.3, 1.0), &sq));
        // corners
        assert!(point_in_polygon(m::Vec2::new(1.0, 1.0), &sq));
        assert!(point_in_polygon(m::Vec2::new(-1.0, -1.0), &sq));
        // on the extension of an edge but past its end
        assert!(!point_in_polygon(m::Vec2::new(1.0, 1.5), &sq));
        assert!(!point_in_polygon(m::Vec2::new(1.0 + 1e-6, 0.0), &sq));

        let triangle = vec![
            m::Vec2::new(0.0, 0.0),
            m::Vec2::new(2.0, 0.0),
            m::Vec2::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(m::Vec2::new(1.0, 1.0), &triangle));
        assert!(!point_in_polygon(m::Vec2::new(1.1, 1.1), &triangle));
    }

    #[test]
    fn closest_points() {
        let a = m::Vec2::new(0.0, 0.0);
        let b = m::Vec2::new(2.0, 0.0);
        assert_eq!(
            closest_point_on_segment(m::Vec2::new(1.0, 3.0), a, b),
            m::Vec2::new(1.0, 0.0)
        );
        assert_eq!(closest_point_on_segment(m::Vec2::new(-4.0, 1.0), a, b), a);
        assert_eq!(closest_point_on_segment(m::Vec2::new(9.0, -1.0), a, b), b);
    }
}
