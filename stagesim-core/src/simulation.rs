//! Simulation state and the tick loop
//!
//! [`Simulation`] owns everything a run mutates: the bus, the stages, the
//! arrival sources, the id allocator and the counters. Nothing is global, so a
//! fresh run is just a fresh `Simulation`.

use crate::arrivals::{ArrivalSource, UniformArrivals};
use crate::bus::RequestBus;
use crate::config::SimulationConfig;
use crate::counters::{Counters, LossReason};
use crate::error::SimError;
use crate::execute::Execute;
use crate::logging::{stage_span, tick_span};
use crate::request::{Priority, Request, RequestId, RequestIdGen, StageNumber, FIRST_STAGE};
use crate::stage::{Stage, StageSnapshot};
use crate::tick::Tick;
use tracing::{debug, info, instrument, trace};

pub struct Simulation {
    config: SimulationConfig,
    bus: RequestBus,
    stages: Vec<Stage>,
    sources: Vec<Box<dyn ArrivalSource>>,
    ids: RequestIdGen,
    counters: Counters,
    time: Tick,
    drained: bool,
}

impl Simulation {
    /// Build a simulation with uniform arrival sources.
    ///
    /// When the configuration carries a seed, source `i` is seeded with
    /// `seed + i` so that every source draws an independent stream.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let sources = (0..config.generators)
            .map(|i| -> Box<dyn ArrivalSource> {
                match config.seed {
                    Some(seed) => Box::new(UniformArrivals::with_seed(
                        config.low_priority_threshold,
                        seed.wrapping_add(i as u64),
                    )),
                    None => Box::new(UniformArrivals::new(config.low_priority_threshold)),
                }
            })
            .collect();
        Self::with_sources(config, sources)
    }

    /// Build a simulation driven by caller-provided arrival sources.
    ///
    /// The number of sources must match `config.generators`.
    pub fn with_sources(
        config: SimulationConfig,
        sources: Vec<Box<dyn ArrivalSource>>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if sources.len() != config.generators {
            return Err(SimError::ArrivalSourceCount {
                expected: config.generators,
                actual: sources.len(),
            });
        }

        let stages = config
            .stages
            .iter()
            .zip(1..)
            .map(|(shape, number)| Stage::new(number, shape.queues, shape.queue_capacity, shape.servers))
            .collect();

        debug!(
            stages = config.stages.len(),
            generators = sources.len(),
            "Simulation built"
        );

        Ok(Self {
            config,
            bus: RequestBus::new(),
            stages,
            sources,
            ids: RequestIdGen::new(),
            counters: Counters::new(),
            time: Tick::zero(),
            drained: false,
        })
    }

    /// Run one tick: generate arrivals, then distribute and serve every stage
    /// in pipeline order.
    ///
    /// All stages share one bus and are visited in order within the tick, so
    /// a request advanced by stage `s` is distributed to and may be served by
    /// stage `s + 1` in the same tick.
    pub fn step(&mut self) {
        let tick = self.time.next();
        let _span = tick_span(tick).entered();

        for source in &mut self.sources {
            let request = source.generate(&mut self.ids);
            self.counters.record_created();
            self.bus.add(request);
        }
        trace!(bus = %self.bus, "Arrivals generated");

        let total_stages = self.total_stages();
        for stage in &mut self.stages {
            let _stage = stage_span(stage.stage_number()).entered();
            stage.distribute_to_queues(&mut self.bus, &mut self.counters);
            trace!(stage = stage.stage_number(), queues = %stage, "After distribution");
            stage.process_requests_in_phase(&mut self.bus, &mut self.counters, total_stages);
            trace!(stage = stage.stage_number(), queues = %stage, "After service");
        }

        self.time = tick;
        debug!(
            %tick,
            bus_depth = self.bus.len(),
            queue_depths = ?self.stages.iter().map(Stage::queued).collect::<Vec<_>>(),
            processed = self.counters.processed(),
            lost = self.counters.lost(),
            "Tick complete"
        );
        debug_assert!(self.is_conserved(), "request conservation violated at {tick}");
    }

    /// Create a request outside the arrival sources and place it on the bus.
    ///
    /// The id comes from the run's allocator, so it never collides with
    /// generated requests. The request counts as created.
    pub fn inject(&mut self, priority: Priority, stage: StageNumber) -> Result<RequestId, SimError> {
        let total_stages = self.total_stages();
        if !(FIRST_STAGE..=total_stages).contains(&stage) {
            return Err(SimError::StageOutOfRange {
                stage,
                total_stages,
            });
        }
        let request = Request::new(self.ids.next_id(), priority, stage);
        let id = request.id();
        trace!(request = %request, "Injected request");
        self.counters.record_created();
        self.bus.add(request);
        Ok(id)
    }

    /// Count everything still queued or on the bus as lost.
    ///
    /// Stages are drained in pipeline order, then the bus. Calling this again
    /// finds nothing left and changes nothing.
    #[instrument(skip(self), fields(tick = %self.time))]
    pub fn drain_all_as_lost(&mut self) -> usize {
        let mut drained = 0;
        for stage in &mut self.stages {
            drained += stage.drain_all_as_lost(&mut self.counters);
        }
        let on_bus = self.bus.drain_as_lost();
        self.counters.record_lost(LossReason::Drain, on_bus as u64);
        drained += on_bus;
        self.drained = true;

        debug!(drained, on_bus, "Drained remaining requests as lost");
        drained
    }

    /// Run the simulation with the given executor.
    #[instrument(skip(self, executor), fields(stages = self.stages.len()))]
    pub fn execute<E: Execute>(&mut self, executor: E) {
        info!(start = %self.time, "Starting simulation execution");
        executor.execute(self);
        info!(
            final_time = %self.time,
            created = self.counters.created(),
            processed = self.counters.processed(),
            lost = self.counters.lost(),
            "Simulation execution completed"
        );
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn bus(&self) -> &RequestBus {
        &self.bus
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn total_stages(&self) -> StageNumber {
        self.stages.len() as StageNumber
    }

    pub fn stage_snapshots(&self) -> Vec<StageSnapshot> {
        self.stages.iter().map(Stage::snapshot).collect()
    }

    /// Requests currently on the bus or in any stage queue.
    pub fn in_flight(&self) -> usize {
        self.bus.len() + self.stages.iter().map(Stage::queued).sum::<usize>()
    }

    /// Whether the final drain has run.
    pub fn is_drained(&self) -> bool {
        self.drained
    }

    /// `created == processed + lost + in_flight`
    pub fn is_conserved(&self) -> bool {
        self.counters.created() == self.counters.processed() + self.counters.lost() + self.in_flight() as u64
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.time)
            .field("bus_depth", &self.bus.len())
            .field("stages", &self.stages.len())
            .field("sources", &self.sources.len())
            .field("counters", &self.counters)
            .finish()
    }
}
