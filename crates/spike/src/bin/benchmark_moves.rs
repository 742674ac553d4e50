use thermal_grid_core::{BoundaryPolicy, InitialState, MoveKind, SimConfig, Simulation};
use std::time::Instant;

fn bench(label: &str, config: SimConfig) {
    let steps = config.steps;
    let mut sim = Simulation::new(config);
    let start = Instant::now();
    let counters = sim
        .run_configured()
        .unwrap_or_else(|e| panic!("{label}: {e}"));
    let elapsed = start.elapsed();
    println!(
        "{label:<12} {steps} moves in {elapsed:?} ({:.1} ns/move), {} exchanged, {} skipped",
        elapsed.as_nanos() as f64 / steps as f64,
        counters.exchanges,
        counters.skipped
    );
}

fn main() {
    let side = 256;
    let steps = 2_000_000;
    println!("Benchmarking {side}x{side} lattice, {steps} moves per generator");

    let base = SimConfig {
        width: side,
        height: side,
        steps,
        seed: 42,
        ..SimConfig::default()
    };

    // Dense start: source rejection almost never resamples.
    let dense = SimConfig {
        initial_state: InitialState::Uniform { energy_per_site: 4 },
        ..base.clone()
    };
    bench("global", SimConfig { move_kind: MoveKind::Global, ..dense.clone() });
    for policy in [BoundaryPolicy::Clamp, BoundaryPolicy::Reject] {
        bench(
            &format!("nn/{policy:?}").to_lowercase(),
            SimConfig {
                move_kind: MoveKind::NearestNeighbor { policy },
                ..dense.clone()
            },
        );
    }

    // Sparse start: most draws land on empty sites and are rejected.
    let sparse = SimConfig {
        initial_state: InitialState::UniformSubgrid {
            x_sub: 8,
            y_sub: 8,
            energy_per_site: 16,
        },
        steps: steps / 100,
        ..base
    };
    bench("sparse/nn", sparse);
}
