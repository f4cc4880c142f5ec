use crate::{
    collision::contact::ContactManifold,
    config::{DEFAULT_CORRECTION_PERCENT, DEFAULT_ITERATIONS, DEFAULT_PENETRATION_SLOP},
    core::body::Body,
};

/// Sequential impulse solver over a step's contact manifolds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseSolver {
    pub iterations: u32,
    pub slop: f64,
    pub correction_percent: f64,
}

impl Default for ImpulseSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpulseSolver {
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            slop: DEFAULT_PENETRATION_SLOP,
            correction_percent: DEFAULT_CORRECTION_PERCENT,
        }
    }

    /// Runs `iterations` passes of impulse resolution over every manifold.
    pub fn solve_velocities(&self, bodies: &mut [Body], manifolds: &[ContactManifold]) {
        for _ in 0..self.iterations {
            for manifold in manifolds {
                manifold.resolve_collision(bodies);
            }
        }
    }

    /// One positional correction per manifold.
    pub fn correct_positions(&self, bodies: &mut [Body], manifolds: &[ContactManifold]) {
        for manifold in manifolds {
            manifold.positional_correction(bodies, self.slop, self.correction_percent);
        }
    }
}
