//! Impulse-based resolution of detected contacts.

use super::{collision::CollisionGroup, Body, BodySet};
use crate::math as m;

/// Material coefficients of a contact, mixed from the two bodies once per step.
#[derive(Clone, Copy, Debug)]
struct ContactMaterial {
    restitution: f64,
    static_friction: f64,
    dynamic_friction: f64,
}

impl ContactMaterial {
    fn mix(a: &Body, b: &Body) -> Self {
        Self {
            restitution: a.restitution.min(b.restitution),
            static_friction: a.static_friction.hypot(b.static_friction),
            dynamic_friction: a.dynamic_friction.hypot(b.dynamic_friction),
        }
    }
}

/// Resolve contacts by applying impulses over several passes,
/// then push overlapping bodies apart.
pub(crate) fn solve(
    groups: &[CollisionGroup],
    iterations: usize,
    penetration_allowance: f64,
    bodies: &mut BodySet,
) {
    let _span = tracy_span!("solve contacts", "solve");

    let materials: Vec<(&CollisionGroup, ContactMaterial)> = groups
        .iter()
        .filter(|group| group.has_contact_points())
        .filter_map(|group| {
            let a = bodies.get(group.a)?;
            let b = bodies.get(group.b)?;
            if !a.is_dynamic() && !b.is_dynamic() {
                return None;
            }
            Some((group, ContactMaterial::mix(a, b)))
        })
        .collect();

    {
        let _span = tracy_span!("contact impulses", "solve");
        for _ in 0..iterations {
            for (group, material) in &materials {
                apply_impulses(group, material, bodies);
            }
        }
    }

    let _span = tracy_span!("position correction", "solve");
    for (group, _) in &materials {
        correct_positions(group, penetration_allowance, bodies);
    }
}

/// How much a body's velocity responds to an impulse. Static bodies don't respond at all.
#[inline]
fn response(body: &Body) -> (f64, f64) {
    if body.is_dynamic() {
        (body.mass, body.inertia)
    } else {
        (0.0, 0.0)
    }
}

fn apply_impulses(group: &CollisionGroup, material: &ContactMaterial, bodies: &mut BodySet) {
    let Some((body_a, body_b)) = bodies.get2_mut(group.a, group.b) else {
        return;
    };

    let n = *group.normal;
    let (mass_a, inertia_a) = response(body_a);
    let (mass_b, inertia_b) = response(body_b);
    // impulse is shared between all the points of the contact
    let point_count = group.contact_points.len() as f64;

    // every point of the group sees the velocities from the start of the pass,
    // so mirrored contact points produce mirrored impulses
    let (vel_a, ang_vel_a) = (body_a.velocity, body_a.angular_velocity);
    let (vel_b, ang_vel_b) = (body_b.velocity, body_b.angular_velocity);
    let mut impulses: Vec<(m::Vec2, m::Vec2, m::Vec2, m::Vec2)> =
        Vec::with_capacity(group.contact_points.len());

    for &point in &group.contact_points {
        let offset_a = point - body_a.position;
        let offset_b = point - body_b.position;

        let rel_vel = (vel_b + m::cross_scalar(ang_vel_b, offset_b))
            - (vel_a + m::cross_scalar(ang_vel_a, offset_a));
        let normal_vel = rel_vel.dot(n);
        if normal_vel > 0.0 {
            // already separating, the remaining points of this contact are skipped too
            break;
        }

        let offset_a_n = m::cross(offset_a, n);
        let offset_b_n = m::cross(offset_b, n);
        let response_sum = mass_a
            + mass_b
            + offset_a_n * offset_a_n * inertia_a
            + offset_b_n * offset_b_n * inertia_b;
        if response_sum <= 0.0 {
            break;
        }

        let j = -(1.0 + material.restitution) * normal_vel / response_sum / point_count;

        // friction

        let tangent = rel_vel - n * rel_vel.dot(n);
        let tangent_len = tangent.mag();
        let friction_impulse = if tangent_len == 0.0 {
            m::Vec2::zero()
        } else {
            let tangent = tangent / tangent_len;
            let jt = -rel_vel.dot(tangent) / response_sum / point_count;
            // Coulomb's law: stick if the impulse fits inside the static cone, otherwise slide
            if jt.abs() < j * material.static_friction {
                tangent * jt
            } else {
                tangent * (-j * material.dynamic_friction)
            }
        };

        impulses.push((n * j, friction_impulse, offset_a, offset_b));
    }

    for (impulse, friction_impulse, offset_a, offset_b) in impulses {
        if body_a.is_dynamic() {
            body_a.apply_impulse(-impulse, offset_a);
            body_a.apply_impulse(-friction_impulse, offset_a);
        }
        if body_b.is_dynamic() {
            body_b.apply_impulse(impulse, offset_b);
            body_b.apply_impulse(friction_impulse, offset_b);
        }
    }
}

/// Move bodies apart along the contact normal by however much the penetration
/// exceeds the allowance. A dynamic body against a static one takes the whole correction,
/// two dynamic bodies split it evenly.
fn correct_positions(group: &CollisionGroup, penetration_allowance: f64, bodies: &mut BodySet) {
    let correction = group.penetration - penetration_allowance;
    if correction <= 0.0 {
        return;
    }
    let Some((body_a, body_b)) = bodies.get2_mut(group.a, group.b) else {
        return;
    };
    let n = *group.normal;

    // not scaled by mass, two dynamic bodies split the correction evenly
    match (body_a.is_dynamic(), body_b.is_dynamic()) {
        (true, true) => {
            body_a.position -= n * (correction / 2.0);
            body_b.position += n * (correction / 2.0);
        }
        (true, false) => body_a.position -= n * correction,
        (false, true) => body_b.position += n * correction,
        (false, false) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Unit;
    use crate::physics::{
        collision::{Contact, Shape},
        BodyType,
    };

    fn group(bodies: &BodySet, a: usize, b: usize, contact: Contact) -> CollisionGroup {
        let keys = bodies.keys();
        CollisionGroup::new(keys[a], keys[b], contact)
    }

    fn circle_body(x: f64, vx: f64) -> Body {
        Body::new(m::Vec2::new(x, 0.0))
            .with_shape(Shape::new_circle(1.0).unwrap())
            .with_velocity(m::Vec2::new(vx, 0.0))
    }

    #[test]
    fn head_on_bounce() {
        let mut bodies = BodySet::new();
        let mut a = circle_body(0.0, 1.0);
        let mut b = circle_body(1.9, -1.0);
        a.set_restitution(1.0);
        b.set_restitution(1.0);
        bodies.insert(a);
        bodies.insert(b);
        let contact = Contact {
            normal: Unit::unit_x(),
            penetration: 0.1,
            points: vec![m::Vec2::new(0.95, 0.0)],
        };
        let groups = [group(&bodies, 0, 1, contact)];

        solve(&groups, 10, 0.05, &mut bodies);

        let keys = bodies.keys().to_vec();
        let a = bodies.get(keys[0]).unwrap();
        let b = bodies.get(keys[1]).unwrap();
        // perfectly elastic equal masses swap velocities, later passes see separation
        assert!((a.velocity().x + 1.0).abs() < 1e-12);
        assert!((b.velocity().x - 1.0).abs() < 1e-12);
        // no tangential motion, so no friction
        assert_eq!(a.velocity().y, 0.0);
        // 0.05 of excess penetration split between the two
        assert!((a.position().x + 0.025).abs() < 1e-12);
        assert!((b.position().x - 1.925).abs() < 1e-12);
    }

    #[test]
    fn static_bodies_take_no_impulse() {
        let mut bodies = BodySet::new();
        bodies.insert(circle_body(0.0, 0.0).with_type(BodyType::Static));
        bodies.insert(circle_body(1.5, -2.0));
        let contact = Contact {
            normal: Unit::unit_x(),
            penetration: 0.5,
            points: vec![m::Vec2::new(0.75, 0.0)],
        };
        let groups = [group(&bodies, 0, 1, contact)];

        solve(&groups, 5, 0.05, &mut bodies);

        let keys = bodies.keys().to_vec();
        let ground = bodies.get(keys[0]).unwrap();
        let ball = bodies.get(keys[1]).unwrap();
        assert_eq!(ground.velocity(), m::Vec2::zero());
        assert_eq!(ground.position(), m::Vec2::zero());
        // restitution 0.5 reflects half of the approach speed
        assert!((ball.velocity().x - 1.0).abs() < 1e-12);
        // dynamic body takes the whole correction
        assert!((ball.position().x - 1.95).abs() < 1e-12);
    }

    #[test]
    fn separating_and_empty_groups_are_ignored() {
        let mut bodies = BodySet::new();
        bodies.insert(circle_body(0.0, -1.0));
        bodies.insert(circle_body(1.9, 1.0));
        let separating = Contact {
            normal: Unit::unit_x(),
            penetration: 0.01,
            points: vec![m::Vec2::new(0.95, 0.0)],
        };
        let empty = Contact {
            normal: Unit::unit_x(),
            penetration: 1.0,
            points: Vec::new(),
        };
        let groups = [
            group(&bodies, 0, 1, separating),
            group(&bodies, 0, 1, empty),
        ];

        solve(&groups, 10, 0.05, &mut bodies);

        let keys = bodies.keys().to_vec();
        let a = bodies.get(keys[0]).unwrap();
        let b = bodies.get(keys[1]).unwrap();
        assert_eq!(a.velocity(), m::Vec2::new(-1.0, 0.0));
        assert_eq!(b.velocity(), m::Vec2::new(1.0, 0.0));
        // penetration under the allowance and the empty group are both left alone
        assert_eq!(a.position(), m::Vec2::zero());
        assert_eq!(b.position(), m::Vec2::new(1.9, 0.0));
    }

    #[test]
    fn sliding_friction_slows_tangential_motion() {
        let mut bodies = BodySet::new();
        bodies.insert(
            Body::new(m::Vec2::zero())
                .with_shape(Shape::new_rect(10.0, 1.0).unwrap())
                .with_type(BodyType::Static),
        );
        bodies.insert(
            Body::new(m::Vec2::new(0.0, 1.0))
                .with_shape(Shape::new_square(1.0).unwrap())
                .with_velocity(m::Vec2::new(3.0, -1.0)),
        );
        let contact = Contact {
            normal: Unit::unit_y(),
            penetration: 0.0,
            points: vec![m::Vec2::new(0.0, 0.5)],
        };
        let groups = [group(&bodies, 0, 1, contact)];

        solve(&groups, 1, 0.05, &mut bodies);

        let keys = bodies.keys().to_vec();
        let block = bodies.get(keys[1]).unwrap();
        // normal impulse j = 1.5 stops and reflects half the approach speed
        assert!((block.velocity().y - 0.5).abs() < 1e-12);
        // needed tangential impulse 3.0 exceeds the static limit, so dynamic friction applies
        let mu = 0.1f64.hypot(0.1);
        assert!((block.velocity().x - (3.0 - 1.5 * mu)).abs() < 1e-12);
    }

    #[test]
    fn off_center_contact_spins_body_with_inertia() {
        let mut bodies = BodySet::new();
        bodies.insert(circle_body(0.0, 0.0).with_type(BodyType::Static));
        let mut block = Body::new(m::Vec2::new(0.0, 1.0))
            .with_shape(Shape::new_square(1.0).unwrap())
            .with_velocity(m::Vec2::new(0.0, -1.0));
        block.set_inertia(2.0);
        block.set_restitution(0.0);
        bodies.insert(block);
        let contact = Contact {
            normal: Unit::unit_y(),
            penetration: 0.0,
            points: vec![m::Vec2::new(0.5, 0.5)],
        };
        let groups = [group(&bodies, 0, 1, contact)];

        solve(&groups, 1, 0.05, &mut bodies);

        let keys = bodies.keys().to_vec();
        let block = bodies.get(keys[1]).unwrap();
        // offset (0.5, -0.5) gives k = 1 + 0.5² * 2 = 1.5, so j = 2/3 instead of the full 1
        assert!((block.velocity().y + 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(block.velocity().x, 0.0);
        // the rest of the impulse goes into rotation: ω = 2 * cross((0.5, -0.5), (0, 2/3))
        assert!((block.angular_velocity() - 2.0 / 3.0).abs() < 1e-12);
        // the contact point itself stops moving along the normal
        let point_vel = block.velocity()
            + m::cross_scalar(block.angular_velocity(), m::Vec2::new(0.5, -0.5));
        assert!(point_vel.y.abs() < 1e-12);
    }

    #[test]
    fn mirrored_contact_points_cause_no_spin() {
        let mut bodies = BodySet::new();
        bodies.insert(circle_body(0.0, 0.0).with_type(BodyType::Static));
        let mut block = Body::new(m::Vec2::new(0.0, 1.0))
            .with_shape(Shape::new_square(1.0).unwrap())
            .with_velocity(m::Vec2::new(0.0, -1.0));
        block.set_inertia(1.0);
        bodies.insert(block);
        let contact = Contact {
            normal: Unit::unit_y(),
            penetration: 0.0,
            points: vec![m::Vec2::new(-0.5, 0.5), m::Vec2::new(0.5, 0.5)],
        };
        let groups = [group(&bodies, 0, 1, contact)];

        solve(&groups, 10, 0.05, &mut bodies);

        let keys = bodies.keys().to_vec();
        let block = bodies.get(keys[1]).unwrap();
        assert_eq!(block.angular_velocity(), 0.0);
        assert_eq!(block.velocity().x, 0.0);
        // k = 1 + 0.5² per point, each point carries half: j = 1.5 / 1.25 / 2 twice
        assert!((block.velocity().y - 0.2).abs() < 1e-12);
    }
}
