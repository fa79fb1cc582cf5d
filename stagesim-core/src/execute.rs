use crate::config::SimulationConfig;
use crate::Simulation;

/// Simulation execution trait.
pub trait Execute {
    /// Runs the simulation until the executor's stopping condition is reached.
    fn execute(self, sim: &mut Simulation);
}

/// Executor runs a fixed number of ticks, then drains the remaining requests
/// as lost.
///
/// ```
/// use stagesim_core::{Executor, Simulation, SimulationConfig};
///
/// let config = SimulationConfig::single_stage(3, 4, 2).with_seed(1);
/// let mut sim = Simulation::new(config).unwrap();
/// sim.execute(Executor::ticks(20));
/// assert_eq!(sim.counters().created(), 60);
/// assert_eq!(sim.in_flight(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    ticks: u64,
    drain: bool,
}

impl Executor {
    /// Run exactly `ticks` ticks followed by the final drain.
    #[must_use]
    pub fn ticks(ticks: u64) -> Self {
        Self { ticks, drain: true }
    }

    /// Run the tick count the configuration asks for.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::ticks(config.ticks)
    }

    /// Skip the final drain, leaving residual requests in place for inspection.
    #[must_use]
    pub fn without_drain(self) -> Self {
        Self {
            drain: false,
            ..self
        }
    }

    /// Registers a side effect that is called _after_ each tick.
    #[must_use]
    pub fn side_effect<F>(self, func: F) -> ExecutorWithSideEffect<F>
    where
        F: FnMut(&Simulation),
    {
        ExecutorWithSideEffect {
            ticks: self.ticks,
            drain: self.drain,
            side_effect: func,
        }
    }
}

impl Execute for Executor {
    fn execute(self, sim: &mut Simulation) {
        run_with(sim, self.ticks, self.drain, |_| {});
    }
}

pub struct ExecutorWithSideEffect<F>
where
    F: FnMut(&Simulation),
{
    ticks: u64,
    drain: bool,
    side_effect: F,
}

impl<F> Execute for ExecutorWithSideEffect<F>
where
    F: FnMut(&Simulation),
{
    fn execute(self, sim: &mut Simulation) {
        run_with(sim, self.ticks, self.drain, self.side_effect);
    }
}

fn run_with<F>(sim: &mut Simulation, ticks: u64, drain: bool, mut side_effect: F)
where
    F: FnMut(&Simulation),
{
    for _ in 0..ticks {
        sim.step();
        side_effect(sim);
    }
    if drain {
        sim.drain_all_as_lost();
    }
}
