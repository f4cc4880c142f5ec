use crate::{
    collision::narrowphase::{ContactGeometry, NarrowPhase},
    core::{body::Body, group::pair_mut, types::MaterialPairProperties},
    utils::math::{Vector2, Vector2Ext},
};

/// Impulses below this magnitude are not applied.
const IMPULSE_EPSILON: f64 = 1e-9;

/// Collision record for one body pair, valid for a single step.
///
/// `a` and `b` index the body slice the manifold was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    pub a: usize,
    pub b: usize,
    pub normal: Vector2,
    pub penetration: f64,
    pub contacts: [Vector2; 2],
    pub contact_count: usize,
    pub restitution: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
}

impl ContactManifold {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            normal: Vector2::ZERO,
            penetration: 0.0,
            contacts: [Vector2::ZERO; 2],
            contact_count: 0,
            restitution: 0.0,
            static_friction: 0.0,
            dynamic_friction: 0.0,
        }
    }

    /// Runs the narrow phase for the pair and stores the result.
    pub fn solve(&mut self, bodies: &[Body]) {
        let geometry = match (bodies.get(self.a), bodies.get(self.b)) {
            (Some(a), Some(b)) if self.a != self.b => NarrowPhase::collide(a, b),
            _ => None,
        };
        self.apply_geometry(geometry);
    }

    fn apply_geometry(&mut self, geometry: Option<ContactGeometry>) {
        match geometry {
            Some(geometry) => {
                self.normal = geometry.normal;
                self.penetration = geometry.penetration;
                self.contacts = geometry.contacts;
                self.contact_count = geometry.contact_count;
            }
            None => {
                self.contact_count = 0;
                self.penetration = 0.0;
            }
        }
    }

    /// Mixes pair coefficients and zeroes restitution for resting contacts.
    ///
    /// A contact is resting when its relative speed is no more than what
    /// gravity alone adds in one step.
    pub fn init_collision(&mut self, bodies: &[Body], gravity: Vector2, dt: f64) {
        let (Some(a), Some(b)) = (bodies.get(self.a), bodies.get(self.b)) else {
            return;
        };

        let pair = MaterialPairProperties::combine(
            (a.material.clamped_restitution(), b.material.clamped_restitution()),
            (a.static_friction, b.static_friction),
            (a.dynamic_friction, b.dynamic_friction),
        );
        self.restitution = pair.restitution;
        self.static_friction = pair.static_friction;
        self.dynamic_friction = pair.dynamic_friction;

        let resting_speed_sq = (gravity * dt).length_squared() + f64::EPSILON;
        let resting = self.contacts().iter().any(|&contact| {
            let relative =
                b.point_velocity(contact - b.position) - a.point_velocity(contact - a.position);
            relative.length_squared() < resting_speed_sq
        });
        if resting {
            self.restitution = 0.0;
        }
    }

    pub fn contacts(&self) -> &[Vector2] {
        &self.contacts[..self.contact_count.min(2)]
    }

    pub fn is_touching(&self) -> bool {
        self.contact_count > 0
    }

    /// Applies normal and friction impulses at every contact point.
    pub fn resolve_collision(&self, bodies: &mut [Body]) {
        let Some((a, b)) = pair_mut(bodies, self.a, self.b) else {
            return;
        };
        if a.is_static && b.is_static {
            return;
        }
        if a.inv_mass + b.inv_mass <= f64::EPSILON {
            return;
        }

        let count = self.contact_count as f64;
        for contact in self.contacts() {
            let ra = *contact - a.position;
            let rb = *contact - b.position;

            let relative = b.point_velocity(rb) - a.point_velocity(ra);
            let contact_velocity = relative.dot(self.normal);
            if contact_velocity > 0.0 {
                continue;
            }

            let ra_cross_n = ra.cross(self.normal);
            let rb_cross_n = rb.cross(self.normal);
            let inv_mass_sum = a.inv_mass
                + b.inv_mass
                + ra_cross_n * ra_cross_n * a.inv_inertia
                + rb_cross_n * rb_cross_n * b.inv_inertia;

            let j = -(1.0 + self.restitution) * contact_velocity / inv_mass_sum / count;
            let impulse = self.normal * j;
            a.apply_impulse(-impulse, ra);
            b.apply_impulse(impulse, rb);

            // Friction against the post-impulse tangential velocity.
            let relative = b.point_velocity(rb) - a.point_velocity(ra);
            let tangent = (relative - self.normal * relative.dot(self.normal)).normalize_or_zero();

            let jt = -relative.dot(tangent) / inv_mass_sum / count;
            if jt.abs() <= IMPULSE_EPSILON {
                continue;
            }

            let friction = if jt.abs() < j * self.static_friction {
                tangent * jt
            } else {
                tangent * (-j * self.dynamic_friction)
            };
            a.apply_impulse(-friction, ra);
            b.apply_impulse(friction, rb);
        }
    }

    /// Pushes the pair apart along the normal by `percent` of the penetration beyond `slop`.
    pub fn positional_correction(&self, bodies: &mut [Body], slop: f64, percent: f64) {
        let Some((a, b)) = pair_mut(bodies, self.a, self.b) else {
            return;
        };
        let inv_mass_sum = a.inv_mass + b.inv_mass;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let depth = (self.penetration - slop).max(0.0);
        let correction = self.normal * (depth / inv_mass_sum * percent);
        a.position -= correction * a.inv_mass;
        b.position += correction * b.inv_mass;
    }

    /// Re-runs the narrow phase against the current positions and returns the
    /// penetration, or zero when the pair no longer touches.
    pub fn measure_penetration(&self, bodies: &[Body]) -> f64 {
        match (bodies.get(self.a), bodies.get(self.b)) {
            (Some(a), Some(b)) if self.a != self.b => {
                NarrowPhase::collide(a, b).map_or(0.0, |geometry| geometry.penetration)
            }
            _ => 0.0,
        }
    }
}
