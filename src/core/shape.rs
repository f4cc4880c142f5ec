use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    error::{PhysicsError, Result},
    utils::math::{Vector2, Vector2Ext},
};

/// Smallest vertex count accepted for a polygon.
pub const MIN_VERTEX_COUNT: usize = 3;
/// Largest vertex count accepted for a polygon.
pub const MAX_VERTEX_COUNT: usize = 16;

const AREA_EPSILON: f64 = 1e-9;

/// Enumeration of supported body geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f64 },
    /// Rectangle described by its half extents along the body's local axes.
    Box { half_extents: Vector2 },
    Polygon(Polygon),
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    pub fn rect(half_extents: Vector2) -> Self {
        Shape::Box { half_extents }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "Ball",
            Shape::Box { .. } => "Box",
            Shape::Polygon(_) => "Poly",
        }
    }

    /// Boxes and polygons viewed as a convex polygon in body space.
    pub fn as_polygon(&self) -> Option<Cow<'_, Polygon>> {
        match self {
            Shape::Circle { .. } => None,
            Shape::Box { half_extents } => {
                Some(Cow::Owned(Polygon::from_half_extents(*half_extents)))
            }
            Shape::Polygon(polygon) => Some(Cow::Borrowed(polygon)),
        }
    }

    pub fn bounding_radius(&self) -> f64 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Box { half_extents } => half_extents.length(),
            Shape::Polygon(polygon) => polygon
                .vertices
                .iter()
                .map(|v| v.length())
                .fold(0.0, f64::max),
        }
    }

    /// Shapes the narrow phase refuses to test.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Circle { radius } => !(radius.is_finite() && *radius > 0.0),
            Shape::Box { half_extents } => {
                !(half_extents.is_finite_vec() && half_extents.x > 0.0 && half_extents.y > 0.0)
            }
            Shape::Polygon(polygon) => polygon.is_degenerate(),
        }
    }
}

/// Convex polygon with outward face normals, one per edge.
///
/// `normals[i]` belongs to the edge running from `vertices[i]` to
/// `vertices[(i + 1) % n]`. Vertices wind counter-clockwise in a y-up frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vector2>,
    pub normals: Vec<Vector2>,
}

/// Area, centroid and unit-density moment of inertia about the centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonMassProperties {
    pub area: f64,
    pub centroid: Vector2,
    pub unit_inertia: f64,
}

impl Polygon {
    /// Validates the vertex list and computes face normals.
    ///
    /// Clockwise input is reversed so the normals point outward.
    pub fn new(mut vertices: Vec<Vector2>) -> Result<Self> {
        let count = vertices.len();
        if !(MIN_VERTEX_COUNT..=MAX_VERTEX_COUNT).contains(&count) {
            return Err(PhysicsError::VertexCount {
                count,
                min: MIN_VERTEX_COUNT,
                max: MAX_VERTEX_COUNT,
            });
        }
        if vertices.iter().any(|v| !v.is_finite_vec()) {
            return Err(PhysicsError::DegeneratePolygon);
        }

        let area = signed_area(&vertices);
        if area.abs() <= AREA_EPSILON {
            return Err(PhysicsError::DegeneratePolygon);
        }
        if area < 0.0 {
            log::debug!("reversing clockwise polygon with {count} vertices");
            vertices.reverse();
        }

        let normals = face_normals(&vertices).ok_or(PhysicsError::DegeneratePolygon)?;
        let polygon = Self { vertices, normals };
        if !polygon.is_convex() {
            return Err(PhysicsError::NonConvexPolygon);
        }
        Ok(polygon)
    }

    /// Axis aligned rectangle centred on the origin.
    pub fn from_half_extents(half_extents: Vector2) -> Self {
        let (hx, hy) = (half_extents.x, half_extents.y);
        Self {
            vertices: vec![
                Vector2::new(-hx, -hy),
                Vector2::new(hx, -hy),
                Vector2::new(hx, hy),
                Vector2::new(-hx, hy),
            ],
            normals: vec![
                Vector2::new(0.0, -1.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(-1.0, 0.0),
            ],
        }
    }

    /// Regular polygon inscribed in a circle of `radius`.
    pub fn regular(sides: usize, radius: f64) -> Result<Self> {
        let step = std::f64::consts::TAU / sides.max(1) as f64;
        let vertices = (0..sides)
            .map(|i| Vector2::from_angle(step * i as f64) * radius)
            .collect();
        Self::new(vertices)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edge endpoints for face `index`.
    pub fn face(&self, index: usize) -> (Vector2, Vector2) {
        let next = (index + 1) % self.vertices.len();
        (self.vertices[index], self.vertices[next])
    }

    /// Vertex furthest along `direction`.
    pub fn support(&self, direction: Vector2) -> Vector2 {
        let mut best = self.vertices[0];
        let mut best_projection = best.dot(direction);
        for vertex in &self.vertices[1..] {
            let projection = vertex.dot(direction);
            if projection > best_projection {
                best_projection = projection;
                best = *vertex;
            }
        }
        best
    }

    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < MIN_VERTEX_COUNT
            || self.normals.len() != self.vertices.len()
            || self.vertices.iter().any(|v| !v.is_finite_vec())
            || self
                .normals
                .iter()
                .any(|n| !n.is_finite_vec() || n.length_squared() < 0.5)
            || signed_area(&self.vertices).abs() <= AREA_EPSILON
    }

    fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i| {
            let (a, b) = self.face(i);
            let (_, c) = self.face((i + 1) % n);
            (b - a).cross(c - b) >= -AREA_EPSILON
        })
    }

    /// Fan triangulation from the local origin.
    ///
    /// Returns `None` when the polygon encloses no area.
    pub fn mass_properties(&self) -> Option<PolygonMassProperties> {
        const INV3: f64 = 1.0 / 3.0;

        let mut area = 0.0;
        let mut first_moment = Vector2::ZERO;
        let mut second_moment = 0.0;

        for i in 0..self.vertices.len() {
            let (p1, p2) = self.face(i);
            let d = p1.cross(p2);
            let triangle_area = 0.5 * d;
            area += triangle_area;

            first_moment += (p1 + p2) * (triangle_area * INV3);

            let int_x2 = p1.x * p1.x + p2.x * p1.x + p2.x * p2.x;
            let int_y2 = p1.y * p1.y + p2.y * p1.y + p2.y * p2.y;
            second_moment += (0.25 * INV3 * d) * (int_x2 + int_y2);
        }

        if !(area.is_finite() && area > AREA_EPSILON) {
            return None;
        }

        let centroid = first_moment / area;
        // Shift the origin moment to the centroid.
        let unit_inertia = second_moment - area * centroid.length_squared();

        Some(PolygonMassProperties {
            area,
            centroid,
            unit_inertia,
        })
    }

    /// Moves every vertex by `offset`; normals are unaffected.
    pub fn translate(&mut self, offset: Vector2) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }
}

/// Shoelace area; positive for counter-clockwise winding in a y-up frame.
pub fn signed_area(vertices: &[Vector2]) -> f64 {
    let n = vertices.len();
    if n < MIN_VERTEX_COUNT {
        return 0.0;
    }
    0.5 * (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum::<f64>()
}

fn face_normals(vertices: &[Vector2]) -> Option<Vec<Vector2>> {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let edge = vertices[(i + 1) % n] - vertices[i];
            let normal = Vector2::new(edge.y, -edge.x);
            let length = normal.length();
            (length > AREA_EPSILON).then(|| normal / length)
        })
        .collect()
}
