use crate::{
    collision::contact::ContactManifold,
    config::WorldConfig,
    core::body::Body,
    dynamics::{integrator::Integrator, solver::ImpulseSolver},
    utils::profiling::{PhaseTimer, StepProfile},
};

/// Integration and contact resolution for one step.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicsManager {
    pub solver: ImpulseSolver,
}

impl DynamicsManager {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            solver: ImpulseSolver {
                iterations: config.iterations,
                slop: config.penetration_slop,
                correction_percent: config.correction_percent,
            },
        }
    }

    /// Velocity half-step, impulses, positions, correction, then force reset.
    pub fn advance(
        &self,
        bodies: &mut [Body],
        contacts: &[ContactManifold],
        integrator: &Integrator,
        profile: &mut StepProfile,
    ) {
        {
            let _phase = PhaseTimer::new("integrate::velocity", &mut profile.integrator_time);
            integrator.integrate_velocities(bodies);
        }
        {
            let _phase = PhaseTimer::new("solver::impulses", &mut profile.solver_time);
            self.solver.solve_velocities(bodies, contacts);
        }
        {
            let _phase = PhaseTimer::new("integrate::position", &mut profile.integrator_time);
            integrator.integrate_positions(bodies);
        }
        {
            let _phase = PhaseTimer::new("solver::correction", &mut profile.solver_time);
            self.solver.correct_positions(bodies, contacts);
        }
        Integrator::clear_forces(bodies);
    }
}
