use approx::assert_relative_eq;
use pvtrack_core::{ChangeDetector, Measurement, SearchInterval};

use crate::{
    LocalKind, TrackerConfig,
    local::LocalTracker,
    test_utils::{drive, measure, parabola, two_peaks},
};

use super::{
    Action, Event, Exploration, Explorer, GlobalKind, GlobalTracker, Handoff, Phase,
    orchestrator::Orchestrator,
};

/// Emits fixed probes, then hands off a fixed bound.
struct Scripted {
    probes: Vec<f64>,
    handoff: Handoff,
    cursor: usize,
}

impl Explorer for Scripted {
    fn explore(&mut self, _measurement: &Measurement) -> Exploration {
        match self.probes.get(self.cursor) {
            Some(&v) => {
                self.cursor += 1;
                Exploration::Continue(v)
            }
            None => Exploration::Complete(self.handoff),
        }
    }

    fn restart(&mut self) {
        self.cursor = 0;
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Fires whenever irradiance drops below 500 W/m².
struct Dimming;

impl ChangeDetector for Dimming {
    fn observe(&mut self, measurement: &Measurement) -> bool {
        measurement.irradiance < 500.0
    }

    fn reset(&mut self) {}
}

fn scripted(local: LocalKind, vmpp: f64) -> Orchestrator {
    let config = TrackerConfig {
        local,
        ..TrackerConfig::with_cells(125)
    };
    let domain = config.domain().unwrap();
    let explorer = Scripted {
        probes: vec![10.0, 90.0],
        handoff: Handoff {
            vmpp,
            interval: SearchInterval::new(40.0, 80.0, &domain).unwrap(),
        },
        cursor: 0,
    };
    Orchestrator::new(
        domain,
        Box::new(explorer),
        LocalTracker::build(&config, domain),
        Box::new(Dimming),
        &config.handoff,
    )
}

fn at(v: f64) -> Measurement {
    measure(parabola, v)
}

/// Steps through exploration, handoff, kick and settling with `Hold`.
fn settle(orchestrator: &mut Orchestrator) {
    for v in [0.0, 10.0, 90.0, 60.0] {
        orchestrator.step(&at(v), &mut ());
    }
    for _ in 0..10 {
        orchestrator.step(&at(60.02), &mut ());
    }
    assert_eq!(orchestrator.phase(), Phase::SteadyState);
}

#[test]
fn names_resolve_with_default_fallback() {
    assert_eq!(GlobalKind::from_name("Default"), GlobalKind::Direct);
    assert_eq!(GlobalKind::from_name("pso"), GlobalKind::ParticleSwarm);
    assert_eq!(GlobalKind::from_name("Voltage Sweep"), GlobalKind::VoltageSweep);
    assert_eq!(GlobalKind::from_name("trapeziummethod"), GlobalKind::Trapezium);
    assert_eq!(GlobalKind::from_name("Quantum"), GlobalKind::Direct);
    for kind in GlobalKind::ALL {
        assert_eq!(GlobalKind::from_name(kind.name()), kind);
    }
}

#[test]
fn lifecycle_runs_through_every_phase() {
    let mut orchestrator = scripted(LocalKind::Hold, 60.0);
    let mut phases = Vec::new();
    let mut record = |event: &Event| -> Option<Action> {
        if let Event::PhaseChanged { from, to } = event {
            phases.push((*from, *to));
        }
        None
    };

    assert_relative_eq!(orchestrator.step(&at(0.0), &mut record), 10.0);
    assert_relative_eq!(orchestrator.step(&at(10.0), &mut record), 90.0);
    assert_eq!(orchestrator.phase(), Phase::Exploring);

    assert_relative_eq!(orchestrator.step(&at(90.0), &mut record), 60.0);
    assert_eq!(orchestrator.phase(), Phase::BoundEstablished);
    assert_relative_eq!(orchestrator.handoff().unwrap().vmpp, 60.0);

    assert_relative_eq!(orchestrator.step(&at(60.0), &mut record), 60.02);
    assert_eq!(orchestrator.phase(), Phase::LocalConverging);

    for cycle in 1..=10 {
        assert_relative_eq!(orchestrator.step(&at(60.02), &mut record), 60.02);
        let expected = if cycle < 10 {
            Phase::LocalConverging
        } else {
            Phase::SteadyState
        };
        assert_eq!(orchestrator.phase(), expected);
    }

    assert_eq!(
        phases,
        [
            (Phase::Exploring, Phase::BoundEstablished),
            (Phase::BoundEstablished, Phase::LocalConverging),
            (Phase::LocalConverging, Phase::SteadyState),
        ]
    );
}

#[test]
fn local_output_stays_inside_the_bound() {
    let mut orchestrator = scripted(LocalKind::Hold, 60.0);
    for v in [0.0, 10.0, 90.0, 60.0] {
        orchestrator.step(&at(v), &mut ());
    }
    assert_relative_eq!(orchestrator.step(&at(95.0), &mut ()), 80.0);
    assert_relative_eq!(orchestrator.step(&at(20.0), &mut ()), 40.0);
}

#[test]
fn kick_points_down_from_the_right_edge() {
    let mut orchestrator = scripted(LocalKind::Hold, 80.0);
    for v in [0.0, 10.0, 90.0] {
        orchestrator.step(&at(v), &mut ());
    }
    assert_relative_eq!(orchestrator.step(&at(80.0), &mut ()), 79.98);
}

#[test]
fn environment_change_restarts_exploration_in_the_same_cycle() {
    let mut orchestrator = scripted(LocalKind::Hold, 60.0);
    settle(&mut orchestrator);

    let mut events = Vec::new();
    let mut record = |event: &Event| -> Option<Action> {
        events.push(*event);
        None
    };
    let dim = Measurement::new(60.02, 10.0, 300.0, 25.0);
    assert_relative_eq!(orchestrator.step(&dim, &mut record), 10.0);

    assert_eq!(orchestrator.phase(), Phase::Exploring);
    assert_eq!(orchestrator.handoff(), None);
    assert_eq!(events[0], Event::EnvironmentChanged { measurement: dim });
    assert_eq!(
        events[1],
        Event::PhaseChanged {
            from: Phase::SteadyState,
            to: Phase::Exploring,
        }
    );
    assert!(matches!(
        events[2],
        Event::Reference { voltage, phase: Phase::Exploring, .. } if voltage == 10.0
    ));
}

#[test]
fn reexplore_action_applies_from_the_next_cycle() {
    let mut orchestrator = scripted(LocalKind::Hold, 60.0);
    settle(&mut orchestrator);

    let mut reexplore = |event: &Event| match event {
        Event::Reference { .. } => Some(Action::Reexplore),
        _ => None,
    };
    assert_relative_eq!(orchestrator.step(&at(60.02), &mut reexplore), 60.02);
    assert_eq!(orchestrator.phase(), Phase::Exploring);
    assert_relative_eq!(orchestrator.step(&at(60.02), &mut ()), 10.0);
}

#[test]
fn reexploration_is_a_no_op_while_exploring() {
    let mut orchestrator = scripted(LocalKind::Hold, 60.0);
    orchestrator.step(&at(0.0), &mut ());
    orchestrator.request_reexploration();
    assert_relative_eq!(orchestrator.step(&at(10.0), &mut ()), 90.0);

    orchestrator.reset();
    settle(&mut orchestrator);
    orchestrator.request_reexploration();
    orchestrator.request_reexploration();
    assert_eq!(orchestrator.phase(), Phase::Exploring);
    assert_relative_eq!(orchestrator.step(&at(60.02), &mut ()), 10.0);
    assert_relative_eq!(orchestrator.step(&at(10.0), &mut ()), 90.0);
}

fn config(global: GlobalKind, local: LocalKind) -> TrackerConfig {
    let mut config = TrackerConfig {
        global,
        local,
        seed: 2024,
        ..TrackerConfig::with_cells(125)
    };
    config.sweep.stride = 0.5;
    config.trapezium.stride = 0.5;
    config
}

#[test]
fn direct_forwards_to_the_local_strategy() {
    let mut tracker = GlobalTracker::new(&config(GlobalKind::Direct, LocalKind::Bisection)).unwrap();
    assert_relative_eq!(tracker.step(&measure(parabola, 0.0)), 50.0);
    assert_eq!(tracker.phase(), Phase::LocalConverging);
    assert_eq!(tracker.handoff(), None);

    tracker.request_reexploration();
    assert_relative_eq!(tracker.step(&measure(parabola, 0.0)), 50.0);
}

#[test]
fn every_combination_stays_in_the_domain_and_the_bound() {
    for global in GlobalKind::ALL {
        for local in LocalKind::ALL {
            for curve in [parabola, two_peaks] {
                let mut tracker = GlobalTracker::new(&config(global, local)).unwrap();
                drive(curve, 0.0, 400, |m| {
                    let v = tracker.step(m);
                    assert!((0.0..=100.0).contains(&v), "{global}/{local}: {v}");
                    if tracker.phase() == Phase::SteadyState {
                        let bound = tracker.handoff().unwrap().interval;
                        assert!(bound.contains(v), "{global}/{local}: {v} outside {bound:?}");
                    }
                    v
                });
            }
        }
    }
}

#[test]
fn sweeps_settle_on_the_global_peak() {
    for global in [GlobalKind::VoltageSweep, GlobalKind::Trapezium] {
        for local in LocalKind::ALL {
            let mut tracker = GlobalTracker::new(&config(global, local)).unwrap();
            let trace = drive(two_peaks, 0.0, 400, |m| tracker.step(m));

            assert_eq!(tracker.phase(), Phase::SteadyState, "{global}/{local}");
            let v = trace[trace.len() - 1];
            assert!(two_peaks(v) > 10.0, "{global}/{local} settled at {v}");
        }
    }
}

#[test]
fn reset_replays_the_same_trace() {
    for global in GlobalKind::ALL {
        let mut tracker = GlobalTracker::new(&config(global, LocalKind::PerturbAndObserve)).unwrap();
        let first = drive(two_peaks, 0.0, 300, |m| tracker.step(m));

        tracker.reset();
        tracker.reset();
        assert_eq!(tracker.handoff(), None);
        let second = drive(two_peaks, 0.0, 300, |m| tracker.step(m));
        assert_eq!(first, second, "{global}");
    }
}

#[test]
fn accessors_report_the_configured_kinds() {
    let config = config(GlobalKind::Firefly, LocalKind::Golden);
    let tracker = GlobalTracker::new(&config).unwrap();
    assert_eq!(tracker.kind(), GlobalKind::Firefly);
    assert_eq!(tracker.local_kind(), LocalKind::Golden);
    assert_eq!(tracker.stride_kind(), config.stride);
    assert_eq!(tracker.phase(), Phase::Exploring);
    assert_relative_eq!(tracker.domain().max_voltage(), 100.0);
}
