use std::time::Instant;

use crate::{
    collision::{broadphase::PairSource, contact::ContactManifold},
    config::WorldConfig,
    core::{
        body::{Body, BodyId},
        group::BodyGroup,
    },
    dynamics::integrator::Integrator,
    error::Result,
    utils::{
        math::Vector2,
        profiling::{PhaseTimer, StepProfile},
    },
};

mod collision_manager;
mod dynamics_manager;

pub use collision_manager::CollisionManager;
pub use dynamics_manager::DynamicsManager;

/// Central simulation container: owns the bodies, the contacts of the last
/// step and the tunables.
///
/// Manifold indices refer to [`World::bodies`]. Pruning re-points them at
/// the surviving bodies; explicit edits such as `add` or `remove` drop them.
pub struct World {
    bodies: BodyGroup,
    config: WorldConfig,
    collision: CollisionManager,
    dynamics: DynamicsManager,
    last_profile: StepProfile,
    step_count: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate().map_err(|err| {
            log::debug!("rejected world configuration: {err}");
            err
        })?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        Self {
            bodies: BodyGroup::new(),
            collision: CollisionManager::new(),
            dynamics: DynamicsManager::from_config(&config),
            config,
            last_profile: StepProfile::default(),
            step_count: 0,
        }
    }

    /// Swaps the candidate pair generator.
    pub fn set_pair_source<P>(&mut self, source: P)
    where
        P: PairSource + 'static,
    {
        self.collision.pair_source = Box::new(source);
    }

    pub fn pair_source_name(&self) -> &str {
        self.collision.pair_source.name()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replaces the configuration after validating it.
    pub fn set_config(&mut self, config: WorldConfig) -> Result<()> {
        config.validate()?;
        self.dynamics = DynamicsManager::from_config(&config);
        self.config = config;
        Ok(())
    }

    /// Runs one fixed step of `config.time_step` seconds.
    pub fn step(&mut self) {
        let started = Instant::now();
        let mut profile = StepProfile::default();
        let dt = self.config.time_step;

        let pair_count = {
            let _phase = PhaseTimer::new("contacts::generate", &mut profile.narrow_phase_time);
            self.collision.generate(self.bodies.all(), self.config.gravity, dt)
        };
        profile.pair_count = pair_count;

        let integrator = Integrator::new(dt, self.config.ambient_acceleration());
        self.dynamics.advance(
            self.bodies.all_mut(),
            &self.collision.contacts,
            &integrator,
            &mut profile,
        );

        let bounds = &self.config.bounds;
        let pruned_count = if self.bodies.iter().any(|body| body.is_out_of_bounds(bounds)) {
            let ids = self.collision.body_ids(self.bodies.all());
            let pruned = self.bodies.retain_in_bounds(bounds);
            self.collision.reindex(&ids, self.bodies.all());
            log::debug!(
                "pruned {} out-of-bounds bodies, {} contacts kept",
                pruned.len(),
                self.collision.contacts.len()
            );
            pruned.len()
        } else {
            0
        };

        self.step_count += 1;
        profile.pruned_count = pruned_count;
        profile.contact_count = self.collision.contacts.len();
        profile.body_count = self.bodies.len();
        profile.total_time = started.elapsed();
        profile.report();
        profile.exceeds_budget(self.config.frame_budget_ms);
        self.last_profile = profile;
    }

    /// Adds a body, keeping layer order.
    pub fn add(&mut self, body: Body) -> BodyId {
        self.collision.clear();
        self.bodies.add(body)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let removed = self.bodies.remove(id);
        if removed.is_some() {
            self.collision.clear();
        }
        removed
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Body> {
        let removed = self.bodies.remove_at(index);
        if removed.is_some() {
            self.collision.clear();
        }
        removed
    }

    /// Moves a body to another layer; `false` when the id is unknown.
    pub fn set_layer(&mut self, id: BodyId, layer: i32) -> bool {
        self.collision.clear();
        self.bodies.set_layer(id, layer)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    /// Bodies in ascending layer order.
    pub fn bodies(&self) -> &[Body] {
        self.bodies.all()
    }

    pub fn group(&self) -> &BodyGroup {
        &self.bodies
    }

    /// Manifolds found by the last step.
    pub fn contacts(&self) -> &[ContactManifold] {
        &self.collision.contacts
    }

    /// Pulls a body toward `target`, e.g. while it is dragged by a pointer.
    pub fn steer_body(&mut self, id: BodyId, target: Vector2, max_force: f64) -> bool {
        let damping = self.config.steer_damping;
        match self.bodies.get_mut(id) {
            Some(body) => {
                body.steer_towards(target, max_force, damping);
                true
            }
            None => false,
        }
    }

    pub fn last_profile(&self) -> &StepProfile {
        &self.last_profile
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.collision.clear();
    }
}
