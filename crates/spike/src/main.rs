use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thermal_grid_core::{BoundaryPolicy, InitialState, MoveKind, SimConfig, Simulation, Site};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InitKind {
    Uniform,
    Subgrid,
    Single,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Moves {
    Global,
    Nn,
}

/// Run a seeded lattice energy-exchange simulation.
#[derive(Debug, Parser)]
#[command(name = "thermal-grid", version)]
struct Args {
    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long, value_enum)]
    init: Option<InitKind>,
    /// Energy per site (uniform, subgrid) or on the single site.
    #[arg(long, default_value_t = 1)]
    energy: u32,
    #[arg(long, default_value_t = 1)]
    x_sub: usize,
    #[arg(long, default_value_t = 1)]
    y_sub: usize,
    /// Single-site position as ROW,COL.
    #[arg(long, value_parser = parse_site)]
    site: Option<Site>,
    #[arg(long, value_enum)]
    moves: Option<Moves>,
    /// Discard nearest-neighbour moves that leave the lattice instead of clamping them.
    #[arg(long)]
    skip_invalid_exchanges: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    steps: Option<usize>,
    #[arg(long)]
    sample_every: Option<usize>,
    /// Print the final grid to stdout.
    #[arg(long)]
    print_grid: bool,
    /// Print the resolved config as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn parse_site(s: &str) -> Result<Site, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {s:?}"))?;
    let row = row.trim().parse().map_err(|e| format!("row: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("col: {e}"))?;
    Ok(Site::new(row, col))
}

fn resolve_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<SimConfig>(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(kind) = args.init {
        config.initial_state = match kind {
            InitKind::Uniform => InitialState::Uniform {
                energy_per_site: args.energy,
            },
            InitKind::Subgrid => InitialState::UniformSubgrid {
                x_sub: args.x_sub,
                y_sub: args.y_sub,
                energy_per_site: args.energy,
            },
            InitKind::Single => InitialState::SingleSite {
                site: args
                    .site
                    .unwrap_or_else(|| Site::new(config.width / 2, config.height / 2)),
                energy: args.energy,
            },
        };
    } else if args.site.is_some() {
        bail!("--site only applies with --init single");
    }
    match args.moves {
        Some(Moves::Global) => config.move_kind = MoveKind::Global,
        Some(Moves::Nn) => {
            config.move_kind = MoveKind::NearestNeighbor {
                policy: BoundaryPolicy::from_skip_invalid(args.skip_invalid_exchanges),
            }
        }
        None if args.skip_invalid_exchanges => {
            if let MoveKind::NearestNeighbor { policy } = &mut config.move_kind {
                *policy = BoundaryPolicy::Reject;
            }
        }
        None => {}
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(sample_every) = args.sample_every {
        config.sample_every = sample_every;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    if args.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    info!(
        width = config.width,
        height = config.height,
        seed = config.seed,
        steps = config.steps,
        move_kind = ?config.move_kind,
        "starting run"
    );
    let (steps, sample_every) = (config.steps, config.sample_every);
    let mut sim = Simulation::try_new(config)?;
    let counters = sim.run(steps, |step, lattice, _| {
        if step % sample_every == 0 {
            let peak = lattice.cells().iter().copied().max().unwrap_or(0);
            info!(
                step,
                occupied = lattice.occupied_sites(),
                peak,
                "progress"
            );
        }
    })?;
    info!(
        steps = counters.steps,
        exchanges = counters.exchanges,
        skipped = counters.skipped,
        total_energy = sim.lattice().total_energy(),
        "run complete"
    );

    if args.print_grid {
        for row in sim.lattice().rows() {
            let line = row
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
    }
    Ok(())
}
