//! Invariants that must hold for every run, checked over seeded random arrivals.

use stagesim_core::{Execute, Executor, Simulation, SimulationConfig, StageConfig};

fn configs() -> Vec<SimulationConfig> {
    vec![
        SimulationConfig::default(),
        SimulationConfig::single_stage(1, 1, 1).with_generators(5),
        SimulationConfig::single_stage(4, 8, 3).with_generators(2),
        SimulationConfig::pipeline(vec![
            StageConfig::new(3, 4, 2),
            StageConfig::new(2, 3, 2),
            StageConfig::new(1, 2, 1),
        ]),
        SimulationConfig::pipeline(vec![StageConfig::new(1, 2, 1); 5]).with_generators(4),
    ]
}

#[test]
fn created_equals_processed_plus_lost_after_drain() {
    for (i, config) in configs().into_iter().enumerate() {
        for seed in 0..10 {
            let config = config.clone().with_ticks(60).with_seed(seed);
            let mut sim = Simulation::new(config.clone()).unwrap();
            sim.execute(Executor::from_config(&config));

            let c = sim.counters();
            assert_eq!(c.created(), 60 * config.generators as u64, "config {i} seed {seed}");
            assert_eq!(c.created(), c.processed() + c.lost(), "config {i} seed {seed}");
            assert_eq!(sim.in_flight(), 0);
        }
    }
}

#[test]
fn conservation_holds_after_every_tick() {
    for config in configs() {
        let mut sim = Simulation::new(config.with_seed(11)).unwrap();
        Executor::ticks(40)
            .without_drain()
            .side_effect(|s: &Simulation| {
                let c = s.counters();
                assert_eq!(c.created(), c.processed() + c.lost() + s.in_flight() as u64);
            })
            .execute(&mut sim);
    }
}

#[test]
fn queues_never_exceed_capacity() {
    for config in configs() {
        let mut sim = Simulation::new(config.with_seed(3)).unwrap();
        Executor::ticks(80)
            .side_effect(|s: &Simulation| {
                for stage in s.stages() {
                    for queue in stage.queues() {
                        assert!(queue.len() <= queue.capacity());
                    }
                }
            })
            .execute(&mut sim);
    }
}

#[test]
fn at_most_k_requests_served_per_stage_per_tick() {
    let config = SimulationConfig::pipeline(vec![StageConfig::new(3, 4, 2), StageConfig::new(2, 2, 1)])
        .with_generators(6)
        .with_seed(5);
    let mut sim = Simulation::new(config).unwrap();

    let mut previous: Vec<u64> = vec![0; 2];
    Executor::ticks(50)
        .side_effect(|s: &Simulation| {
            for (stage, prev) in s.stages().iter().zip(previous.iter_mut()) {
                let total: u64 = stage.served_by_server().iter().sum();
                assert!(total - *prev <= stage.servers().len() as u64);
                *prev = total;
            }
        })
        .execute(&mut sim);
}

#[test]
fn every_low_priority_request_ends_up_lost() {
    // Threshold 1.0 makes every arrival low priority.
    let config = SimulationConfig::default().with_threshold(1.0).with_seed(1);
    let mut sim = Simulation::new(config.clone()).unwrap();
    sim.execute(Executor::from_config(&config));

    let c = sim.counters();
    assert_eq!(c.processed(), 0);
    assert_eq!(c.lost_at_drain(), c.created());
}
