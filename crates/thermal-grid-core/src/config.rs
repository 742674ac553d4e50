use crate::init::InitialState;
use crate::lattice::{check_dimensions, check_total_energy};
use crate::moves::BoundaryPolicy;
use crate::site::Site;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Which move generator a [`crate::Simulation`] step uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveKind {
    /// Unrestricted random-pair exchange.
    Global,
    /// 4-connected neighbour exchange with the given boundary policy.
    NearestNeighbor {
        #[serde(default)]
        policy: BoundaryPolicy,
    },
}

impl Default for MoveKind {
    fn default() -> Self {
        MoveKind::NearestNeighbor {
            policy: BoundaryPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of rows.
    pub width: usize,
    /// Number of columns.
    pub height: usize,
    pub initial_state: InitialState,
    pub move_kind: MoveKind,
    pub seed: u64,
    /// Moves performed by a full run.
    pub steps: usize,
    /// Progress reporting interval, in moves.
    pub sample_every: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            initial_state: InitialState::Uniform { energy_per_site: 1 },
            move_kind: MoveKind::default(),
            seed: 42,
            steps: 10_000,
            sample_every: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridConfigError {
    ZeroDimension {
        width: usize,
        height: usize,
    },
    TooManyCells {
        max: usize,
        width: usize,
        height: usize,
    },
    SubgridTooLarge {
        x_sub: usize,
        y_sub: usize,
        width: usize,
        height: usize,
    },
    SiteOutOfBounds {
        site: Site,
        width: usize,
        height: usize,
    },
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    EnergyOverflow {
        total: u64,
    },
    InvalidSampleEvery,
    Parse(String),
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridConfigError::ZeroDimension { width, height } => {
                write!(f, "lattice dimensions must be positive, got {width}x{height}")
            }
            GridConfigError::TooManyCells { max, width, height } => write!(
                f,
                "{width}x{height} lattice exceeds supported maximum of {max} cells"
            ),
            GridConfigError::SubgridTooLarge {
                x_sub,
                y_sub,
                width,
                height,
            } => write!(
                f,
                "subgrid {x_sub}x{y_sub} does not fit inside {width}x{height} lattice"
            ),
            GridConfigError::SiteOutOfBounds {
                site,
                width,
                height,
            } => write!(f, "site {site} outside {width}x{height} lattice"),
            GridConfigError::RaggedRows {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row {row} has {actual} cells, expected {expected} like the first row"
            ),
            GridConfigError::EnergyOverflow { total } => write!(
                f,
                "total energy ({total}) exceeds per-site capacity ({})",
                u32::MAX
            ),
            GridConfigError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            GridConfigError::Parse(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for GridConfigError {}

impl From<serde_json::Error> for GridConfigError {
    fn from(err: serde_json::Error) -> Self {
        GridConfigError::Parse(err.to_string())
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, GridConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, GridConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.sample_every == 0 {
            return Err(GridConfigError::InvalidSampleEvery);
        }
        let cells = check_dimensions(self.width, self.height)?;
        let total = self
            .initial_state
            .total_energy(self.width, self.height, cells)?;
        check_total_energy(total)
    }
}
