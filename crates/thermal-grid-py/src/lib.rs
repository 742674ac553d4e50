use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use thermal_grid_core::{
    BoundaryPolicy, GridConfigError, InitialState, Lattice, LatticeError, MoveOutcome, SimConfig,
    Site,
};

fn config_err(e: GridConfigError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn lattice_err(e: LatticeError) -> PyErr {
    match e {
        LatticeError::Config(e) => config_err(e),
        LatticeError::SiteOutOfBounds { .. } => PyIndexError::new_err(e.to_string()),
        LatticeError::EmptyGrid | LatticeError::SingleSite => PyRuntimeError::new_err(e.to_string()),
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha12Rng {
    match seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_rng(&mut rand::rng()),
    }
}

type PySite = (usize, usize);

fn outcome_sites(outcome: MoveOutcome) -> Option<(PySite, PySite)> {
    match outcome {
        MoveOutcome::Exchanged { from, to } => Some(((from.row, from.col), (to.row, to.col))),
        MoveOutcome::Skipped { .. } => None,
    }
}

/// 2D grid of integer energy units with random exchange moves.
///
/// Move methods return the `(source, target)` sites of the unit that moved, or
/// `None` when a nearest-neighbour move was discarded at the boundary.
#[pyclass(module = "thermal_grid._core")]
pub struct ThermalGrid {
    lattice: Lattice,
    rng: ChaCha12Rng,
}

impl ThermalGrid {
    fn build(lattice: Lattice, seed: Option<u64>) -> Self {
        Self {
            lattice,
            rng: seeded_rng(seed),
        }
    }
}

#[pymethods]
impl ThermalGrid {
    /// Wrap an explicit starting state, `initial_state[row][col]`.
    #[new]
    #[pyo3(signature = (initial_state, seed = None))]
    fn new(initial_state: Vec<Vec<u32>>, seed: Option<u64>) -> PyResult<Self> {
        let lattice = Lattice::try_from_rows(&initial_state).map_err(config_err)?;
        Ok(Self::build(lattice, seed))
    }

    #[staticmethod]
    #[pyo3(signature = (x, y, energy_per_site, seed = None))]
    fn uniform(x: usize, y: usize, energy_per_site: u32, seed: Option<u64>) -> PyResult<Self> {
        let lattice = thermal_grid_core::uniform(x, y, energy_per_site).map_err(config_err)?;
        Ok(Self::build(lattice, seed))
    }

    #[staticmethod]
    #[pyo3(signature = (x, y, x_sub, y_sub, energy_per_site, seed = None))]
    fn uniform_subgrid(
        x: usize,
        y: usize,
        x_sub: usize,
        y_sub: usize,
        energy_per_site: u32,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let lattice = thermal_grid_core::uniform_subgrid(x, y, x_sub, y_sub, energy_per_site)
            .map_err(config_err)?;
        Ok(Self::build(lattice, seed))
    }

    #[staticmethod]
    #[pyo3(signature = (x, y, site, energy, seed = None))]
    fn allinone(x: usize, y: usize, site: PySite, energy: u32, seed: Option<u64>) -> PyResult<Self> {
        let lattice = thermal_grid_core::allinone(x, y, site, energy).map_err(config_err)?;
        Ok(Self::build(lattice, seed))
    }

    /// Build from a JSON `SimConfig`; the config's seed drives the moves.
    #[staticmethod]
    fn from_config_json(json: &str) -> PyResult<Self> {
        let config = SimConfig::from_json_str(json).map_err(config_err)?;
        let lattice = Lattice::from_initial_state(config.width, config.height, &config.initial_state)
            .map_err(config_err)?;
        Ok(Self::build(lattice, Some(config.seed)))
    }

    /// Default configuration as JSON, a starting point for `from_config_json`.
    #[staticmethod]
    fn default_config_json() -> PyResult<String> {
        serde_json::to_string_pretty(&SimConfig::default())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    #[getter]
    fn x(&self) -> usize {
        self.lattice.width()
    }

    #[getter]
    fn y(&self) -> usize {
        self.lattice.height()
    }

    /// Copy of the grid as nested lists, `state()[row][col]`.
    fn state(&self) -> Vec<Vec<u32>> {
        self.lattice.rows()
    }

    fn total_energy(&self) -> u64 {
        self.lattice.total_energy()
    }

    fn rand_site(&mut self) -> PySite {
        let site = self.lattice.rand_site(&mut self.rng);
        (site.row, site.col)
    }

    /// Move one unit from `site1` to `site2`; a no-op when `site1` is empty.
    fn exchange(&mut self, site1: PySite, site2: PySite) -> PyResult<bool> {
        self.lattice
            .try_exchange(Site::from(site1), Site::from(site2))
            .map_err(lattice_err)
    }

    fn exchange_rand(&mut self) -> PyResult<Option<(PySite, PySite)>> {
        let outcome = self.lattice.exchange_rand(&mut self.rng).map_err(lattice_err)?;
        Ok(outcome_sites(outcome))
    }

    #[pyo3(signature = (skip_invalid_exchanges = false))]
    fn exchange_rand_nn(
        &mut self,
        skip_invalid_exchanges: bool,
    ) -> PyResult<Option<(PySite, PySite)>> {
        let policy = BoundaryPolicy::from_skip_invalid(skip_invalid_exchanges);
        let outcome = self
            .lattice
            .exchange_rand_nn(&mut self.rng, policy)
            .map_err(lattice_err)?;
        Ok(outcome_sites(outcome))
    }

    fn __repr__(&self) -> String {
        format!(
            "ThermalGrid(x={}, y={}, total_energy={})",
            self.lattice.width(),
            self.lattice.height(),
            self.lattice.total_energy()
        )
    }
}

/// Build an initial grid without wrapping it, mainly for quick inspection.
#[pyfunction]
#[pyo3(signature = (x, y, kind, energy, x_sub = 0, y_sub = 0, site = (0, 0)))]
fn initial_state(
    x: usize,
    y: usize,
    kind: &str,
    energy: u32,
    x_sub: usize,
    y_sub: usize,
    site: PySite,
) -> PyResult<Vec<Vec<u32>>> {
    let initial = match kind {
        "uniform" => InitialState::Uniform {
            energy_per_site: energy,
        },
        "uniform_subgrid" => InitialState::UniformSubgrid {
            x_sub,
            y_sub,
            energy_per_site: energy,
        },
        "allinone" => InitialState::SingleSite {
            site: Site::from(site),
            energy,
        },
        other => {
            return Err(PyValueError::new_err(format!(
                "unknown initial state kind: {other}"
            )))
        }
    };
    let lattice = Lattice::from_initial_state(x, y, &initial).map_err(config_err)?;
    Ok(lattice.rows())
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ThermalGrid>()?;
    m.add_function(wrap_pyfunction!(initial_state, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
