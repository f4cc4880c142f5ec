//! Global configuration constants and the serializable world configuration.

use serde::{Deserialize, Serialize};

use crate::{
    error::{PhysicsError, Result},
    utils::math::Vector2,
};

/// Default gravity in screen space (y grows downward).
pub const DEFAULT_GRAVITY: [f64; 2] = [0.0, 98.0];

/// Default ambient air velocity added to every dynamic body alongside gravity.
pub const DEFAULT_AIR_VELOCITY: [f64; 2] = [0.0, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;

/// Number of impulse resolution iterations performed per step.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Penetration tolerated before positional correction pushes bodies apart.
pub const DEFAULT_PENETRATION_SLOP: f64 = 0.05;

/// Fraction of the remaining penetration removed by positional correction.
pub const DEFAULT_CORRECTION_PERCENT: f64 = 0.4;

/// Simulation bounds used for out-of-bounds pruning.
pub const DEFAULT_SCREEN_WIDTH: f64 = 800.0;
pub const DEFAULT_SCREEN_HEIGHT: f64 = 600.0;

/// Layer assigned to bodies that do not ask for one.
pub const DEFAULT_LAYER: i32 = 10;

/// Velocity kept per steering call when a body is dragged toward a target.
pub const DEFAULT_STEER_DAMPING: f64 = 0.85;

/// Upper bound on fixed steps run by a single `PhysicsEngine::advance` call.
pub const DEFAULT_MAX_STEPS_PER_ADVANCE: u32 = 8;

/// Step duration above which a warning is logged (milliseconds).
pub const DEFAULT_FRAME_BUDGET_MS: f64 = 4.0;

/// Region outside of which bodies are pruned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
    /// Also prune bodies that leave through the top edge.
    pub check_top: bool,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            check_top: false,
        }
    }
}

/// Tunables consumed by [`World`](crate::world::World).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vector2,
    pub air_velocity: Vector2,
    pub time_step: f64,
    pub iterations: u32,
    pub penetration_slop: f64,
    pub correction_percent: f64,
    pub bounds: Bounds,
    pub steer_damping: f64,
    pub max_steps_per_advance: u32,
    pub frame_budget_ms: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector2::from_array(DEFAULT_GRAVITY),
            air_velocity: Vector2::from_array(DEFAULT_AIR_VELOCITY),
            time_step: DEFAULT_TIME_STEP,
            iterations: DEFAULT_ITERATIONS,
            penetration_slop: DEFAULT_PENETRATION_SLOP,
            correction_percent: DEFAULT_CORRECTION_PERCENT,
            bounds: Bounds::default(),
            steer_damping: DEFAULT_STEER_DAMPING,
            max_steps_per_advance: DEFAULT_MAX_STEPS_PER_ADVANCE,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl WorldConfig {
    /// Zero gravity and no ambient air, otherwise default.
    pub fn weightless() -> Self {
        Self {
            gravity: Vector2::ZERO,
            air_velocity: Vector2::ZERO,
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: Vector2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Acceleration applied to every dynamic body besides its own forces.
    pub fn ambient_acceleration(&self) -> Vector2 {
        self.gravity + self.air_velocity
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.iterations == 0 {
            return Err(PhysicsError::InvalidConfig("iterations must be at least 1".into()));
        }
        if self.max_steps_per_advance == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_steps_per_advance must be at least 1".into(),
            ));
        }
        if !(self.bounds.width > 0.0 && self.bounds.height > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "bounds must be positive, got {}x{}",
                self.bounds.width, self.bounds.height
            )));
        }
        if !(self.correction_percent > 0.0 && self.correction_percent <= 1.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "correction_percent must lie in (0, 1], got {}",
                self.correction_percent
            )));
        }
        if self.penetration_slop < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "penetration_slop must not be negative, got {}",
                self.penetration_slop
            )));
        }
        Ok(())
    }
}
