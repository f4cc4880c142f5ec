//! impulse2d – 2D rigid-body physics for Rust.
//!
//! Circles, boxes and convex polygons collide through a separating-axis
//! narrow phase and are resolved with sequential impulses, Coulomb friction
//! and positional correction. Bodies live in a layer-ordered store so that
//! renderers can draw them back to front.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::DVec2;

pub use collision::{
    broadphase::{ExhaustivePairs, PairSource},
    contact::ContactManifold,
    narrowphase::NarrowPhase,
};
pub use config::{Bounds, WorldConfig};
pub use core::{
    body::{Body, BodyId, BodyOptions},
    group::BodyGroup,
    shape::{Polygon, Shape},
    types::{Material, MaterialTable},
};
pub use dynamics::{integrator::Integrator, solver::ImpulseSolver};
pub use error::{PhysicsError, Result};
pub use utils::{math::Vector2, profiling::StepProfile};
pub use world::World;

/// High-level convenience wrapper that owns a [`World`] and turns wall-clock
/// time into fixed steps.
pub struct PhysicsEngine {
    world: World,
    accumulator: f64,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self {
            world: World::default(),
            accumulator: 0.0,
        }
    }
}

impl PhysicsEngine {
    pub fn new(config: WorldConfig) -> Result<Self> {
        Ok(Self {
            world: World::new(config)?,
            accumulator: 0.0,
        })
    }

    /// Adds `elapsed` seconds and runs as many fixed steps as fit.
    ///
    /// At most `max_steps_per_advance` steps run per call; time beyond that
    /// is dropped. Returns the number of steps executed.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return 0;
        }

        let dt = self.world.config().time_step;
        let max_steps = self.world.config().max_steps_per_advance;
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= dt && steps < max_steps {
            self.world.step();
            self.accumulator -= dt;
            steps += 1;
        }

        if self.accumulator >= dt {
            log::warn!(
                "simulation fell behind, dropping {:.3} s after {steps} steps",
                self.accumulator
            );
            self.accumulator %= dt;
        }
        steps
    }

    /// Runs exactly one fixed step, bypassing the accumulator.
    pub fn step(&mut self) {
        self.world.step();
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / self.world.config().time_step
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.world.add(body)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        self.world.remove(id)
    }

    pub fn get_body(&self, id: BodyId) -> Option<&Body> {
        self.world.body(id)
    }

    pub fn get_body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.world.body_mut(id)
    }

    pub fn bodies(&self) -> &[Body] {
        self.world.bodies()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
