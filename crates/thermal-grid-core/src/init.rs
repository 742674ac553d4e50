use crate::config::GridConfigError;
use crate::lattice::{check_dimensions, check_total_energy, Lattice};
use crate::site::Site;
use serde::{Deserialize, Serialize};

/// Starting energy distribution for a new lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialState {
    /// Every site holds `energy_per_site`.
    Uniform { energy_per_site: u32 },
    /// The top-left `x_sub` rows by `y_sub` columns hold `energy_per_site`, the rest zero.
    UniformSubgrid {
        x_sub: usize,
        y_sub: usize,
        energy_per_site: u32,
    },
    /// All energy concentrated on one site.
    SingleSite { site: Site, energy: u32 },
}

impl InitialState {
    /// Checks the parameters against the lattice shape and returns the total energy.
    pub(crate) fn total_energy(
        &self,
        width: usize,
        height: usize,
        cells: usize,
    ) -> Result<u64, GridConfigError> {
        match *self {
            InitialState::Uniform { energy_per_site } => {
                Ok(cells as u64 * u64::from(energy_per_site))
            }
            InitialState::UniformSubgrid {
                x_sub,
                y_sub,
                energy_per_site,
            } => {
                if x_sub > width || y_sub > height {
                    return Err(GridConfigError::SubgridTooLarge {
                        x_sub,
                        y_sub,
                        width,
                        height,
                    });
                }
                Ok((x_sub * y_sub) as u64 * u64::from(energy_per_site))
            }
            InitialState::SingleSite { site, energy } => {
                if site.row >= width || site.col >= height {
                    return Err(GridConfigError::SiteOutOfBounds {
                        site,
                        width,
                        height,
                    });
                }
                Ok(u64::from(energy))
            }
        }
    }

    fn fill(&self, width: usize, height: usize, cells: usize) -> Vec<u32> {
        match *self {
            InitialState::Uniform { energy_per_site } => vec![energy_per_site; cells],
            InitialState::UniformSubgrid {
                x_sub,
                y_sub,
                energy_per_site,
            } => {
                let mut data = vec![0; cells];
                for row in data.chunks_mut(height).take(x_sub) {
                    row[..y_sub].fill(energy_per_site);
                }
                data
            }
            InitialState::SingleSite { site, energy } => {
                let mut data = vec![0; cells];
                debug_assert!(site.row < width);
                data[site.row * height + site.col] = energy;
                data
            }
        }
    }
}

impl Lattice {
    /// Build a `width x height` lattice holding the given starting distribution.
    pub fn from_initial_state(
        width: usize,
        height: usize,
        initial: &InitialState,
    ) -> Result<Self, GridConfigError> {
        let cells = check_dimensions(width, height)?;
        check_total_energy(initial.total_energy(width, height, cells)?)?;
        Lattice::from_cells(width, height, initial.fill(width, height, cells))
    }
}

pub fn uniform(width: usize, height: usize, energy_per_site: u32) -> Result<Lattice, GridConfigError> {
    Lattice::from_initial_state(width, height, &InitialState::Uniform { energy_per_site })
}

pub fn uniform_subgrid(
    width: usize,
    height: usize,
    x_sub: usize,
    y_sub: usize,
    energy_per_site: u32,
) -> Result<Lattice, GridConfigError> {
    Lattice::from_initial_state(
        width,
        height,
        &InitialState::UniformSubgrid {
            x_sub,
            y_sub,
            energy_per_site,
        },
    )
}

pub fn allinone(
    width: usize,
    height: usize,
    site: impl Into<Site>,
    energy: u32,
) -> Result<Lattice, GridConfigError> {
    Lattice::from_initial_state(
        width,
        height,
        &InitialState::SingleSite {
            site: site.into(),
            energy,
        },
    )
}
