use std::borrow::Cow;

use crate::{
    collision::clipping::{clip_segment, Plane},
    core::{
        body::Body,
        shape::{Polygon, Shape},
    },
    utils::math::{rotation, Rotation, Vector2, Vector2Ext},
};

/// Geometric result of a shape test. The normal points from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    pub normal: Vector2,
    pub penetration: f64,
    pub contacts: [Vector2; 2],
    pub contact_count: usize,
}

impl ContactGeometry {
    fn single(normal: Vector2, penetration: f64, point: Vector2) -> Self {
        Self {
            normal,
            penetration: penetration.max(0.0),
            contacts: [point, Vector2::ZERO],
            contact_count: 1,
        }
    }

    pub fn points(&self) -> &[Vector2] {
        &self.contacts[..self.contact_count]
    }
}

/// Polygon placed in the world by its owning body.
struct Placed<'a> {
    polygon: Cow<'a, Polygon>,
    position: Vector2,
    rotation: Rotation,
}

impl<'a> Placed<'a> {
    fn of(body: &'a Body) -> Option<Self> {
        Some(Self {
            polygon: body.shape.as_polygon()?,
            position: body.position,
            rotation: rotation(body.orientation),
        })
    }

    fn to_world(&self, local: Vector2) -> Vector2 {
        self.position + self.rotation * local
    }

    fn to_local(&self, world: Vector2) -> Vector2 {
        self.rotation.transpose() * (world - self.position)
    }
}

/// Shape-pair dispatch for the 2D narrow phase.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Relative weight in the reference-face tie-break.
    const BIAS_RELATIVE: f64 = 0.95;
    const BIAS_ABSOLUTE: f64 = 0.01;

    /// Pairs that never need a contact test: two static bodies, or two
    /// dynamic bodies on different layers.
    pub fn should_ignore(a: &Body, b: &Body) -> bool {
        (a.is_static && b.is_static) || (a.layer != b.layer && !a.is_static && !b.is_static)
    }

    /// Tests two bodies; `None` when they do not touch or either shape is degenerate.
    pub fn collide(a: &Body, b: &Body) -> Option<ContactGeometry> {
        if a.shape.is_degenerate() || b.shape.is_degenerate() {
            return None;
        }
        if !(a.position.is_finite_vec() && b.position.is_finite_vec()) {
            return None;
        }
        if !(a.orientation.is_finite() && b.orientation.is_finite()) {
            return None;
        }

        match (&a.shape, &b.shape) {
            (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                Self::circle_circle(a.position, *ra, b.position, *rb)
            }
            (Shape::Circle { radius }, _) => {
                Self::circle_polygon(a.position, *radius, &Placed::of(b)?)
            }
            (_, Shape::Circle { radius }) => {
                let mut geometry = Self::circle_polygon(b.position, *radius, &Placed::of(a)?)?;
                geometry.normal = -geometry.normal;
                Some(geometry)
            }
            _ => Self::polygon_polygon(&Placed::of(a)?, &Placed::of(b)?),
        }
    }

    fn circle_circle(pa: Vector2, ra: f64, pb: Vector2, rb: f64) -> Option<ContactGeometry> {
        let offset = pb - pa;
        let radius = ra + rb;
        let dist_sq = offset.length_squared();
        if dist_sq >= radius * radius {
            return None;
        }

        let distance = dist_sq.sqrt();
        if distance == 0.0 {
            return Some(ContactGeometry::single(Vector2::X, ra, pa));
        }

        let normal = offset / distance;
        Some(ContactGeometry::single(normal, radius - distance, pa + normal * ra))
    }

    /// Circle as `a`, polygon as `b`.
    fn circle_polygon(
        centre: Vector2,
        radius: f64,
        polygon: &Placed<'_>,
    ) -> Option<ContactGeometry> {
        let local = polygon.to_local(centre);
        let vertices = &polygon.polygon.vertices;
        let normals = &polygon.polygon.normals;

        // Face with the least penetration.
        let mut separation = f64::NEG_INFINITY;
        let mut face = 0;
        for (i, (normal, vertex)) in normals.iter().zip(vertices).enumerate() {
            let s = normal.dot(local - *vertex);
            if s > radius {
                return None;
            }
            if s > separation {
                separation = s;
                face = i;
            }
        }

        let (v1, v2) = polygon.polygon.face(face);

        if separation < f64::EPSILON {
            let normal = -(polygon.rotation * normals[face]);
            return Some(ContactGeometry::single(normal, radius, centre + normal * radius));
        }

        // Voronoi region of the face the centre falls in.
        let corner = if (local - v1).dot(v2 - v1) <= 0.0 {
            Some(v1)
        } else if (local - v2).dot(v1 - v2) <= 0.0 {
            Some(v2)
        } else {
            None
        };

        match corner {
            Some(vertex) => {
                let to_vertex = vertex - local;
                let dist_sq = to_vertex.length_squared();
                if dist_sq > radius * radius {
                    return None;
                }
                let distance = dist_sq.sqrt();
                let normal = polygon.rotation * (to_vertex / distance);
                Some(ContactGeometry::single(
                    normal,
                    radius - distance,
                    polygon.to_world(vertex),
                ))
            }
            None => {
                let normal = -(polygon.rotation * normals[face]);
                Some(ContactGeometry::single(
                    normal,
                    radius - separation,
                    centre + normal * radius,
                ))
            }
        }
    }

    fn polygon_polygon(a: &Placed<'_>, b: &Placed<'_>) -> Option<ContactGeometry> {
        let (face_a, separation_a) = Self::axis_of_least_penetration(a, b);
        if separation_a >= 0.0 {
            return None;
        }
        let (face_b, separation_b) = Self::axis_of_least_penetration(b, a);
        if separation_b >= 0.0 {
            return None;
        }

        let (reference, incident, reference_face, flip) =
            if Self::bias_greater_than(separation_a, separation_b) {
                (a, b, face_a, false)
            } else {
                (b, a, face_b, true)
            };

        let incident_face = Self::incident_face(reference, incident, reference_face);

        let (r1, r2) = reference.polygon.face(reference_face);
        let v1 = reference.to_world(r1);
        let v2 = reference.to_world(r2);

        let side = (v2 - v1).normalize_or_zero();
        let face_normal = Vector2::new(side.y, -side.x);
        let face_offset = face_normal.dot(v1);

        let clipped = clip_segment(incident_face, Plane::from_point_normal(v1, -side))?;
        let clipped = clip_segment(clipped, Plane::from_point_normal(v2, side))?;

        // Keep the clipped points that lie behind the reference face.
        let mut contacts = [Vector2::ZERO; 2];
        let mut contact_count = 0;
        let mut depth = 0.0;
        for point in clipped {
            let separation = face_normal.dot(point) - face_offset;
            if separation <= 0.0 {
                contacts[contact_count] = point;
                contact_count += 1;
                depth -= separation;
            }
        }
        if contact_count == 0 {
            return None;
        }

        Some(ContactGeometry {
            normal: if flip { -face_normal } else { face_normal },
            penetration: depth / contact_count as f64,
            contacts,
            contact_count,
        })
    }

    /// Face of `a` whose normal separates the shapes the most, and that separation.
    fn axis_of_least_penetration(a: &Placed<'_>, b: &Placed<'_>) -> (usize, f64) {
        let to_b = b.rotation.transpose();
        let mut best = (0, f64::NEG_INFINITY);

        for (i, (normal, vertex)) in a.polygon.normals.iter().zip(&a.polygon.vertices).enumerate() {
            let normal_in_b = to_b * (a.rotation * *normal);
            let support = b.polygon.support(-normal_in_b);
            let vertex_in_b = b.to_local(a.to_world(*vertex));
            let distance = normal_in_b.dot(support - vertex_in_b);
            if distance > best.1 {
                best = (i, distance);
            }
        }
        best
    }

    /// World-space edge of `incident` most anti-parallel to the reference normal.
    fn incident_face(
        reference: &Placed<'_>,
        incident: &Placed<'_>,
        reference_face: usize,
    ) -> [Vector2; 2] {
        let reference_normal = incident.rotation.transpose()
            * (reference.rotation * reference.polygon.normals[reference_face]);

        let mut face = 0;
        let mut min_dot = f64::INFINITY;
        for (i, normal) in incident.polygon.normals.iter().enumerate() {
            let dot = reference_normal.dot(*normal);
            if dot < min_dot {
                min_dot = dot;
                face = i;
            }
        }

        let (start, end) = incident.polygon.face(face);
        [incident.to_world(start), incident.to_world(end)]
    }

    /// Reference-face choice between two negative separations. `a` only
    /// wins when it is shallower by a few percent; exact and near ties go to
    /// `b`, so the choice does not flicker from one step to the next.
    fn bias_greater_than(a: f64, b: f64) -> bool {
        a >= b * Self::BIAS_RELATIVE + a * Self::BIAS_ABSOLUTE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{body::BodyOptions, shape::Polygon};
    use approx::assert_abs_diff_eq;

    fn ball(x: f64, y: f64, radius: f64) -> Body {
        Body::circle(Vector2::new(x, y), radius, BodyOptions::dynamic()).unwrap()
    }

    fn crate_at(x: f64, y: f64) -> Body {
        Body::rect(Vector2::new(x, y), Vector2::ONE, BodyOptions::dynamic()).unwrap()
    }

    #[test]
    fn overlapping_circles() {
        let geometry = NarrowPhase::collide(&ball(0.0, 0.0, 1.0), &ball(1.5, 0.0, 1.0)).unwrap();
        assert_eq!(geometry.contact_count, 1);
        assert_eq!(geometry.normal, Vector2::X);
        assert_abs_diff_eq!(geometry.penetration, 0.5, epsilon = 1e-12);
        assert_eq!(geometry.points(), &[Vector2::new(1.0, 0.0)]);
    }

    #[test]
    fn separated_circles_do_not_touch() {
        assert!(NarrowPhase::collide(&ball(0.0, 0.0, 1.0), &ball(3.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn coincident_circles_use_fixed_axis() {
        let geometry = NarrowPhase::collide(&ball(2.0, 2.0, 1.5), &ball(2.0, 2.0, 1.0)).unwrap();
        assert_eq!(geometry.normal, Vector2::X);
        assert_eq!(geometry.penetration, 1.5);
        assert_eq!(geometry.contacts[0], Vector2::new(2.0, 2.0));
    }

    #[test]
    fn stacked_boxes_produce_two_contacts() {
        let geometry = NarrowPhase::collide(&crate_at(0.0, 0.0), &crate_at(0.0, 1.5)).unwrap();
        assert_eq!(geometry.contact_count, 2);
        assert_abs_diff_eq!(geometry.normal.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.normal.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.penetration, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn circle_against_box_face() {
        let geometry = NarrowPhase::collide(&ball(0.0, 1.5, 1.0), &crate_at(0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(geometry.normal.y, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.penetration, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.contacts[0].y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn box_against_circle_flips_the_normal() {
        let geometry = NarrowPhase::collide(&crate_at(0.0, 0.0), &ball(0.0, 1.5, 1.0)).unwrap();
        assert_abs_diff_eq!(geometry.normal.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.penetration, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn circle_near_box_corner() {
        let geometry = NarrowPhase::collide(&ball(1.5, 1.5, 1.0), &crate_at(0.0, 0.0)).unwrap();
        let expected = -Vector2::splat(std::f64::consts::FRAC_1_SQRT_2);
        assert_abs_diff_eq!(geometry.normal.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.normal.y, expected.y, epsilon = 1e-12);
        assert_eq!(geometry.contacts[0], Vector2::ONE);
        assert!(NarrowPhase::collide(&ball(1.8, 1.8, 1.0), &crate_at(0.0, 0.0)).is_none());
    }

    #[test]
    fn circle_centre_inside_polygon() {
        let geometry = NarrowPhase::collide(&ball(0.0, 0.9, 0.5), &crate_at(0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(geometry.normal.y, -1.0, epsilon = 1e-12);
        assert_eq!(geometry.penetration, 0.5);
    }

    #[test]
    fn rotated_boxes_touch_on_a_corner() {
        let mut diamond = crate_at(0.0, 2.0);
        diamond.orientation = std::f64::consts::FRAC_PI_4;
        let geometry = NarrowPhase::collide(&crate_at(0.0, 0.0), &diamond).unwrap();
        assert_eq!(geometry.contact_count, 1);
        assert!(geometry.normal.y > 0.9);
        let depth = 1.0 - (2.0 - std::f64::consts::SQRT_2);
        assert_abs_diff_eq!(geometry.penetration, depth, epsilon = 1e-9);
    }

    #[test]
    fn tie_break_prefers_the_second_body() {
        assert!(!NarrowPhase::bias_greater_than(-0.5, -0.5));
        assert!(!NarrowPhase::bias_greater_than(-0.50, -0.51));
        assert!(NarrowPhase::bias_greater_than(-0.40, -0.50));
        assert!(NarrowPhase::bias_greater_than(-0.5, -1.0));
    }

    #[test]
    fn near_equal_overlap_takes_the_reference_face_from_b() {
        // The tilted box overlaps slightly deeper along its own bottom face
        // than along the flat box's top face, but not by enough to win.
        let flat = crate_at(0.0, 0.0);
        let mut tilted = crate_at(0.0, 1.5);
        tilted.orientation = 0.01;

        let forward = NarrowPhase::collide(&flat, &tilted).unwrap();
        assert_eq!(forward.contact_count, 2);
        // Reference face is the tilted box's bottom face.
        assert_abs_diff_eq!(forward.normal.x, -(0.01f64).sin(), epsilon = 1e-12);
        assert_abs_diff_eq!(forward.normal.y, (0.01f64).cos(), epsilon = 1e-12);
        // Contacts sit on the flat box's top face, the incident edge.
        for point in forward.points() {
            assert_abs_diff_eq!(point.y, 1.0, epsilon = 1e-12);
        }

        let backward = NarrowPhase::collide(&tilted, &flat).unwrap();
        assert_eq!(backward.contact_count, 2);
        // Now the flat box is `b` and provides the reference face.
        assert_abs_diff_eq!(backward.normal.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(backward.normal.y, -1.0, epsilon = 1e-12);
        let bottom = Vector2::new((0.01f64).sin(), -(0.01f64).cos());
        let bottom_offset = bottom.dot(tilted.position) + 1.0;
        for point in backward.points() {
            assert_abs_diff_eq!(bottom.dot(*point), bottom_offset, epsilon = 1e-9);
            assert!(point.y < 1.0);
        }

        // The choice holds while the overlap changes a little.
        tilted.position.y -= 0.02;
        let deeper = NarrowPhase::collide(&flat, &tilted).unwrap();
        assert_abs_diff_eq!(deeper.normal.x, forward.normal.x, epsilon = 1e-12);
    }

    #[test]
    fn ignore_rules() {
        let fixed_a = Body::circle(Vector2::ZERO, 1.0, BodyOptions::fixed()).unwrap();
        let fixed_b = Body::circle(Vector2::ZERO, 1.0, BodyOptions::fixed()).unwrap();
        assert!(NarrowPhase::should_ignore(&fixed_a, &fixed_b));

        let low = Body::circle(Vector2::ZERO, 1.0, BodyOptions::dynamic().on_layer(1)).unwrap();
        let high = Body::circle(Vector2::ZERO, 1.0, BodyOptions::dynamic().on_layer(2)).unwrap();
        assert!(NarrowPhase::should_ignore(&low, &high));
        assert!(!NarrowPhase::should_ignore(&low, &fixed_a));
        assert!(!NarrowPhase::should_ignore(&low, &low.clone()));
    }

    #[test]
    fn degenerate_shapes_never_collide() {
        let mut flat = crate_at(0.0, 0.0);
        flat.shape = Shape::Polygon(Polygon {
            vertices: vec![Vector2::ZERO, Vector2::X, Vector2::new(2.0, 0.0)],
            normals: vec![Vector2::Y; 3],
        });
        assert!(NarrowPhase::collide(&flat, &crate_at(0.5, 0.0)).is_none());

        let mut empty = ball(0.0, 0.0, 1.0);
        empty.shape = Shape::circle(0.0);
        assert!(NarrowPhase::collide(&empty, &ball(0.0, 0.0, 1.0)).is_none());
    }
}
