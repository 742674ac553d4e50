use super::*;
use crate::init::InitialState;
use crate::moves::BoundaryPolicy;
use crate::site::Site;

fn single_site_config(move_kind: MoveKind) -> SimConfig {
    SimConfig {
        width: 5,
        height: 5,
        initial_state: InitialState::SingleSite {
            site: Site::new(2, 3),
            energy: 10,
        },
        move_kind,
        seed: 9,
        steps: 500,
        sample_every: 100,
    }
}

#[test]
fn same_seed_gives_same_trajectory() {
    let mut a = Simulation::new(single_site_config(MoveKind::Global));
    let mut b = Simulation::new(single_site_config(MoveKind::Global));
    for _ in 0..200 {
        assert_eq!(a.step().unwrap(), b.step().unwrap());
    }
    assert_eq!(a.lattice(), b.lattice());
}

#[test]
fn different_seeds_diverge() {
    let mut a = Simulation::new(single_site_config(MoveKind::Global));
    let mut b = Simulation::new(SimConfig {
        seed: 10,
        ..single_site_config(MoveKind::Global)
    });
    a.run_configured().unwrap();
    b.run_configured().unwrap();
    assert_ne!(a.lattice(), b.lattice());
}

#[test]
fn run_conserves_energy_and_reports_every_step() {
    let mut sim = Simulation::new(single_site_config(MoveKind::NearestNeighbor {
        policy: BoundaryPolicy::Clamp,
    }));
    let mut seen = Vec::new();
    let counters = sim
        .run(300, |step, lattice, outcome| {
            assert_eq!(lattice.total_energy(), 10);
            assert_eq!(lattice.cells().iter().map(|&c| u64::from(c)).sum::<u64>(), 10);
            if let MoveOutcome::Exchanged { from, to } = outcome {
                assert!(from.is_adjacent(*to));
            }
            seen.push(step);
        })
        .unwrap();
    assert_eq!(seen, (1..=300).collect::<Vec<_>>());
    assert_eq!(counters.steps, 300);
    assert_eq!(counters.exchanges, 300, "clamping always exchanges");
    assert_eq!(sim.counters(), counters);
}

#[test]
fn reject_policy_counts_skipped_moves() {
    let mut sim = Simulation::new(SimConfig {
        width: 2,
        height: 2,
        initial_state: InitialState::Uniform { energy_per_site: 3 },
        ..single_site_config(MoveKind::NearestNeighbor {
            policy: BoundaryPolicy::Reject,
        })
    });
    let counters = sim.run_configured().unwrap();
    assert_eq!(counters.steps, 500);
    assert_eq!(counters.exchanges + counters.skipped, 500);
    // Every site of a 2x2 lattice is on two edges, so half of all draws leave it.
    assert!(counters.skipped > 150 && counters.skipped < 350, "{counters:?}");
    assert_eq!(sim.lattice().total_energy(), 12);
}

#[test]
fn counters_accumulate_across_runs() {
    let mut sim = Simulation::new(single_site_config(MoveKind::Global));
    let first = sim.run(10, |_, _, _| {}).unwrap();
    let second = sim.run(15, |_, _, _| {}).unwrap();
    assert_eq!(first.steps, 10);
    assert_eq!(second.steps, 15);
    assert_eq!(sim.counters().steps, 25);
}

#[test]
fn invalid_config_is_reported() {
    let config = SimConfig {
        initial_state: InitialState::SingleSite {
            site: Site::new(9, 9),
            energy: 1,
        },
        ..single_site_config(MoveKind::Global)
    };
    assert!(matches!(
        Simulation::try_new(config),
        Err(LatticeError::Config(_))
    ));
}

#[test]
fn empty_lattice_step_fails_without_counting() {
    let mut sim = Simulation::new(SimConfig {
        initial_state: InitialState::Uniform { energy_per_site: 0 },
        ..single_site_config(MoveKind::Global)
    });
    assert_eq!(sim.step(), Err(LatticeError::EmptyGrid));
    assert_eq!(sim.counters(), StepCounters::default());
}

#[test]
fn caller_exchanges_between_moves_are_kept() {
    let mut sim = Simulation::new(single_site_config(MoveKind::Global));
    assert!(sim.lattice_mut().exchange(Site::new(2, 3), Site::new(0, 0)));
    assert_eq!(sim.lattice().get(Site::new(0, 0)), 1);
    let lattice = sim.into_lattice();
    assert_eq!(lattice.total_energy(), 10);
}
