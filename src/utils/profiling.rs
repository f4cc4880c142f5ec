use std::time::{Duration, Instant};

/// Timing and size figures gathered while running one world step.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfile {
    pub narrow_phase_time: Duration,
    pub solver_time: Duration,
    pub integrator_time: Duration,
    pub total_time: Duration,

    pub body_count: usize,
    pub pair_count: usize,
    pub contact_count: usize,
    pub pruned_count: usize,
}

impl StepProfile {
    /// Emits the profile at debug level.
    pub fn report(&self) {
        let total_us = self.total_time.as_micros() as f64;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "step: {} bodies, {} pairs, {} contacts, {} pruned, {:.3} ms \
             (narrow {:.1}%, solver {:.1}%, integrate {:.1}%)",
            self.body_count,
            self.pair_count,
            self.contact_count,
            self.pruned_count,
            self.total_time.as_secs_f64() * 1000.0,
            share(self.narrow_phase_time, total_us),
            share(self.solver_time, total_us),
            share(self.integrator_time, total_us),
        );
    }

    /// Warns when the whole step ran past `budget_ms`.
    pub fn exceeds_budget(&self, budget_ms: f64) -> bool {
        let elapsed_ms = self.total_time.as_secs_f64() * 1000.0;
        if elapsed_ms > budget_ms {
            log::warn!(
                "physics step with {} bodies took {elapsed_ms:.2} ms, budget is {budget_ms:.2} ms",
                self.body_count
            );
            return true;
        }
        false
    }
}

fn share(part: Duration, total_us: f64) -> f64 {
    part.as_micros() as f64 / total_us * 100.0
}

/// Guard around one step phase. On drop it adds the elapsed time to its
/// profile slot and traces the phase.
pub struct PhaseTimer<'a> {
    phase: &'static str,
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(phase: &'static str, slot: &'a mut Duration) -> Self {
        Self {
            phase,
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.slot += elapsed;
        log::trace!("{}: {} µs", self.phase, elapsed.as_micros());
    }
}
