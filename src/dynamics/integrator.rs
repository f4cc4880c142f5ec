use crate::{core::body::Body, utils::math::Vector2};

/// Symplectic Euler split into two velocity half-steps around the position update.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub dt: f64,
    /// Gravity plus ambient air, applied to every dynamic body.
    pub ambient: Vector2,
}

impl Integrator {
    pub fn new(dt: f64, ambient: Vector2) -> Self {
        Self { dt, ambient }
    }

    /// First velocity half-step, before contacts are resolved.
    pub fn integrate_velocities(&self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.integrate_velocity(self.dt, self.ambient);
        }
    }

    /// Position update and second velocity half-step.
    pub fn integrate_positions(&self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.integrate_position(self.dt, self.ambient);
        }
    }

    pub fn clear_forces(bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.clear_forces();
        }
    }

    /// Both halves back to back, for callers without a contact phase.
    pub fn step(&self, bodies: &mut [Body]) {
        self.integrate_velocities(bodies);
        self.integrate_positions(bodies);
        Self::clear_forces(bodies);
    }
}
