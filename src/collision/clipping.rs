use crate::utils::math::Vector2;

/// Half-plane `normal · p <= offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector2,
    offset: f64,
}

impl Plane {
    pub fn from_point_normal(point: Vector2, normal: Vector2) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            offset: n.dot(point),
        }
    }

    pub fn signed_distance(&self, point: Vector2) -> f64 {
        self.normal.dot(point) - self.offset
    }
}

/// Clips a segment against `plane`, keeping the part behind it.
///
/// Returns `None` when fewer than two points survive.
pub fn clip_segment(segment: [Vector2; 2], plane: Plane) -> Option<[Vector2; 2]> {
    let [start, end] = segment;
    let start_dist = plane.signed_distance(start);
    let end_dist = plane.signed_distance(end);

    let mut out = [start, end];
    let mut count = 0;

    if start_dist <= 0.0 {
        out[count] = start;
        count += 1;
    }
    if end_dist <= 0.0 {
        out[count] = end;
        count += 1;
    }
    if start_dist * end_dist < 0.0 && count < 2 {
        let alpha = start_dist / (start_dist - end_dist);
        out[count] = start + (end - start) * alpha;
        count += 1;
    }

    (count == 2).then_some(out)
}
