#[cfg(test)]
mod tests;

use crate::config::{MoveKind, SimConfig};
use crate::lattice::{Lattice, LatticeError};
use crate::moves::{MoveOutcome, SiteSampler};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Running tallies of the moves a simulation has performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepCounters {
    pub steps: usize,
    pub exchanges: usize,
    pub skipped: usize,
}

impl StepCounters {
    fn record(&mut self, outcome: &MoveOutcome) {
        self.steps += 1;
        if outcome.is_exchange() {
            self.exchanges += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// One simulation run: a lattice plus the random source that drives it.
///
/// Independent runs each own their own `Simulation`; nothing is shared.
pub struct Simulation<R = ChaCha12Rng> {
    lattice: Lattice,
    rng: R,
    config: SimConfig,
    counters: StepCounters,
}

impl Simulation<ChaCha12Rng> {
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Seeds a `ChaCha12Rng` from `config.seed`.
    pub fn try_new(config: SimConfig) -> Result<Self, LatticeError> {
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: SiteSampler> Simulation<R> {
    pub fn with_rng(config: SimConfig, rng: R) -> Result<Self, LatticeError> {
        config.validate()?;
        let lattice = Lattice::from_initial_state(config.width, config.height, &config.initial_state)?;
        tracing::debug!(
            width = config.width,
            height = config.height,
            total_energy = lattice.total_energy(),
            move_kind = ?config.move_kind,
            "simulation initialized"
        );
        Ok(Self {
            lattice,
            rng,
            config,
            counters: StepCounters::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Direct access for callers applying their own exchanges between moves.
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    pub fn counters(&self) -> StepCounters {
        self.counters
    }

    pub fn into_lattice(self) -> Lattice {
        self.lattice
    }

    /// Performs one move of the configured kind.
    pub fn step(&mut self) -> Result<MoveOutcome, LatticeError> {
        let outcome = match self.config.move_kind {
            MoveKind::Global => self.lattice.exchange_rand(&mut self.rng)?,
            MoveKind::NearestNeighbor { policy } => {
                self.lattice.exchange_rand_nn(&mut self.rng, policy)?
            }
        };
        self.counters.record(&outcome);
        Ok(outcome)
    }

    /// Performs `steps` moves, handing the lattice to `observer` after each one.
    /// The step index passed to the observer starts at 1.
    pub fn run<F>(&mut self, steps: usize, mut observer: F) -> Result<StepCounters, LatticeError>
    where
        F: FnMut(usize, &Lattice, &MoveOutcome),
    {
        tracing::debug!(steps, "run started");
        let before = self.counters;
        for step in 1..=steps {
            let outcome = self.step()?;
            observer(step, &self.lattice, &outcome);
        }
        let run = StepCounters {
            steps: self.counters.steps - before.steps,
            exchanges: self.counters.exchanges - before.exchanges,
            skipped: self.counters.skipped - before.skipped,
        };
        tracing::debug!(exchanges = run.exchanges, skipped = run.skipped, "run finished");
        Ok(run)
    }

    /// Runs `config.steps` moves without observation.
    pub fn run_configured(&mut self) -> Result<StepCounters, LatticeError> {
        self.run(self.config.steps, |_, _, _| {})
    }
}
