use approx::assert_relative_eq;
use integration_tests::{Array, Scenario, init_logging, parabola, two_peaks};
use pvtrack_core::{Observer, SearchInterval};
use pvtrack_observers::{LogObserver, Recorder, StallGuard};
use pvtrack_trackers::{
    Action, Event, GlobalKind, LocalKind, Mppt, Phase, StrideKind, TrackerConfig,
};

const SHADED_ARRAY: &str = r#"
cycles = 400

[tracker]
num_cells = 125
seed = 2024

[tracker.sweep]
stride = 0.5

[tracker.trapezium]
stride = 0.5
"#;

fn shaded(global: GlobalKind, local: LocalKind) -> (TrackerConfig, usize) {
    let scenario: Scenario = toml::from_str(SHADED_ARRAY).unwrap();
    let config = TrackerConfig {
        global,
        local,
        ..scenario.tracker
    };
    (config, scenario.cycles)
}

#[test]
fn every_combination_respects_domain_and_bound() {
    init_logging();
    let array = Array::new(two_peaks);

    for global in GlobalKind::ALL {
        for local in LocalKind::ALL {
            for stride in [StrideKind::Fixed, StrideKind::Optimal] {
                let (mut config, cycles) = shaded(global, local);
                config.stride = stride;
                let mut mppt = Mppt::new(config).unwrap();
                let max = mppt.domain().max_voltage();

                let mut bound: Option<SearchInterval> = None;
                let mut check = |event: &Event| -> Option<Action> {
                    match *event {
                        Event::HandedOff { interval, .. } => bound = Some(interval),
                        Event::Reference { voltage, phase, .. } => {
                            assert!(
                                (0.0..=max).contains(&voltage),
                                "{global}/{local}/{stride}: emitted {voltage}"
                            );
                            if phase == Phase::SteadyState {
                                let bound = bound.unwrap();
                                assert!(
                                    bound.contains(voltage),
                                    "{global}/{local}/{stride}: {voltage} outside {bound:?}"
                                );
                            }
                        }
                        _ => {}
                    }
                    None
                };
                array.run(0.0, cycles, |m| mppt.step_observed(m, &mut check));
            }
        }
    }
}

#[test]
fn bisection_converges_on_a_single_peak() {
    let config = TrackerConfig {
        local: LocalKind::Bisection,
        ..TrackerConfig::with_cells(125)
    };
    let mut mppt = Mppt::new(config).unwrap();
    let trace = Array::new(parabola).run(0.0, 200, |m| mppt.step(m));

    let last = trace[trace.len() - 1];
    assert!((last - 60.0).abs() < 0.5, "settled at {last}");
}

#[test]
fn sweep_bound_excludes_the_lower_peak() {
    let (config, cycles) = shaded(GlobalKind::VoltageSweep, LocalKind::Golden);
    let mut mppt = Mppt::new(config).unwrap();
    let mut recorder = Recorder::new();
    Array::new(two_peaks).run(0.0, cycles, |m| mppt.step_observed(m, &mut recorder));

    let handoff = recorder.handoffs()[0];
    assert_relative_eq!(handoff.vmpp, 70.0);
    assert_relative_eq!(handoff.interval.left(), 45.0);
    assert_relative_eq!(handoff.interval.right(), 100.0);
    assert!(!handoff.interval.contains(20.0));
    assert_eq!(mppt.phase(), Phase::SteadyState);
}

#[test]
fn swarm_bootstrap_visits_agents_in_order() {
    let config: TrackerConfig = serde_json::from_str(
        r#"{ "num_cells": 125, "global": "PSO", "swarm": { "agents": 4, "jitter": 0.0 } }"#,
    )
    .unwrap();
    let mut mppt = Mppt::new(config).unwrap();
    let trace = Array::new(two_peaks).run(0.0, 4, |m| mppt.step(m));

    assert_eq!(trace, [0.0, 25.0, 50.0, 75.0]);
}

#[test]
fn fuzzy_logic_opens_with_its_probe_voltage() {
    let config = TrackerConfig {
        local: LocalKind::FuzzyLogic,
        ..TrackerConfig::with_cells(125)
    };
    let mut mppt = Mppt::new(config).unwrap();
    let v = mppt.step(&Array::new(parabola).measure(42.0));
    assert_relative_eq!(v, 0.05);
}

#[test]
fn irradiance_drop_triggers_a_new_sweep() {
    init_logging();
    let (config, _) = shaded(GlobalKind::VoltageSweep, LocalKind::PerturbAndObserve);
    let mut mppt = Mppt::new(config).unwrap();
    let mut recorder = Recorder::new();
    let mut log = LogObserver::new();
    let mut observer = |event: &Event| -> Option<Action> {
        recorder.record(event);
        Observer::<Event, Action>::observe(&mut log, event)
    };

    let sunny = Array::new(two_peaks);
    let trace = sunny.run(0.0, 260, |m| mppt.step_observed(m, &mut observer));
    assert_eq!(mppt.phase(), Phase::SteadyState);

    let cloudy = sunny.under(500.0);
    let start = trace[trace.len() - 1];
    let first = cloudy.run(start, 1, |m| mppt.step_observed(m, &mut observer));
    assert_relative_eq!(first[0], 0.0);
    assert_eq!(mppt.phase(), Phase::Exploring);

    cloudy.run(0.0, 260, |m| mppt.step_observed(m, &mut observer));
    assert_eq!(mppt.phase(), Phase::SteadyState);

    assert_eq!(recorder.changes().len(), 1);
    assert_relative_eq!(recorder.changes()[0].irradiance, 500.0);
    assert_eq!(recorder.handoffs().len(), 2);
    assert_relative_eq!(recorder.handoffs()[1].vmpp, 70.0);
}

fn faded(v: f64) -> f64 {
    0.5 * two_peaks(v)
}

#[test]
fn stall_guard_forces_reexploration() {
    let (mut config, _) = shaded(GlobalKind::VoltageSweep, LocalKind::PerturbAndObserve);
    config.environment.enabled = false;
    let mut mppt = Mppt::new(config).unwrap();
    let mut recorder = Recorder::new();
    let mut guard = StallGuard::new(0.8, 3);
    let mut observer = |event: &Event| -> Option<Action> {
        recorder.record(event);
        guard.observe(event)
    };

    let trace = Array::new(two_peaks).run(0.0, 260, |m| mppt.step_observed(m, &mut observer));
    assert_eq!(mppt.phase(), Phase::SteadyState);

    // Without the environment monitor only the guard notices the fade.
    let start = trace[trace.len() - 1];
    let dim = Array::new(faded);
    let trace = dim.run(start, 2, |m| mppt.step_observed(m, &mut observer));
    assert_eq!(mppt.phase(), Phase::SteadyState);
    dim.run(trace[1], 1, |m| mppt.step_observed(m, &mut observer));
    assert_eq!(mppt.phase(), Phase::Exploring);
    assert_eq!(mppt.tracker().handoff(), None);

    // The fresh sweep starts from the bottom of the domain.
    let trace = dim.run(30.0, 1, |m| mppt.step_observed(m, &mut observer));
    assert_relative_eq!(trace[0], 0.0);
    assert!(recorder.changes().is_empty());
}

#[test]
fn reset_replays_a_seeded_run() {
    for global in [
        GlobalKind::ParticleSwarm,
        GlobalKind::SimulatedAnnealing,
        GlobalKind::Firefly,
    ] {
        let (config, cycles) = shaded(global, LocalKind::Golden);
        let mut mppt = Mppt::new(config).unwrap();
        let array = Array::new(two_peaks);

        let first = array.run(0.0, cycles, |m| mppt.step(m));
        mppt.reset();
        let second = array.run(0.0, cycles, |m| mppt.step(m));
        assert_eq!(first, second, "{global}");
    }
}

#[test]
fn reconfigure_switches_to_a_fresh_exploration() {
    let (config, _) = shaded(GlobalKind::Direct, LocalKind::PerturbAndObserve);
    let mut mppt = Mppt::new(config).unwrap();
    let array = Array::new(two_peaks);
    array.run(30.0, 50, |m| mppt.step(m));

    let (sweep, _) = shaded(GlobalKind::VoltageSweep, LocalKind::Ternary);
    mppt.reconfigure(sweep).unwrap();
    assert_eq!(mppt.global_kind().name(), "VoltageSweep");
    assert_eq!(mppt.local_kind().name(), "Ternary");

    let trace = array.run(30.0, 3, |m| mppt.step(m));
    assert_eq!(trace, [0.0, 0.5, 1.0]);
}
