use crate::config::GridConfigError;
use crate::site::Site;
use std::{error::Error, fmt};

/// 2D grid of non-negative integer energy units.
///
/// Cells are stored row-major: `cells[row * height + col]`. Dimensions are fixed
/// at construction and the total energy never changes afterwards, since the only
/// mutation is [`Lattice::exchange`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    width: usize,
    height: usize,
    cells: Vec<u32>,
    total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    Config(GridConfigError),
    /// Every site holds zero energy, so no source site can be drawn.
    EmptyGrid,
    /// A single-site lattice has no distinct partner for a random-pair move.
    SingleSite,
    SiteOutOfBounds {
        site: Site,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatticeError::Config(e) => write!(f, "{}", e),
            LatticeError::EmptyGrid => {
                write!(f, "lattice holds no energy; a random move needs a non-empty source site")
            }
            LatticeError::SingleSite => {
                write!(f, "random-pair move needs at least two sites")
            }
            LatticeError::SiteOutOfBounds {
                site,
                width,
                height,
            } => write!(f, "site {site} outside {width}x{height} lattice"),
        }
    }
}

impl From<GridConfigError> for LatticeError {
    fn from(err: GridConfigError) -> Self {
        LatticeError::Config(err)
    }
}

impl Error for LatticeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LatticeError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl Lattice {
    pub const MAX_CELLS: usize = 1 << 26;

    /// Build a lattice from explicit row-major cells, validating shape and energy.
    pub(crate) fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<u32>,
    ) -> Result<Self, GridConfigError> {
        let expected = check_dimensions(width, height)?;
        debug_assert_eq!(cells.len(), expected, "cell buffer must match dimensions");
        let total = cells.iter().map(|&c| u64::from(c)).sum::<u64>();
        check_total_energy(total)?;
        Ok(Self {
            width,
            height,
            cells,
            total,
        })
    }

    /// Build a lattice from an arbitrary rectangular starting state.
    /// `rows[row][col]` becomes the energy at `(row, col)`.
    pub fn try_from_rows(rows: &[Vec<u32>]) -> Result<Self, GridConfigError> {
        let width = rows.len();
        let height = rows.first().map_or(0, Vec::len);
        check_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != height {
                return Err(GridConfigError::RaggedRows {
                    row,
                    expected: height,
                    actual: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }
        Self::from_cells(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn site_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, site: Site) -> bool {
        site.row < self.width && site.col < self.height
    }

    fn index_of(&self, site: Site) -> usize {
        assert!(
            self.contains(site),
            "site {site} outside {}x{} lattice",
            self.width,
            self.height
        );
        site.row * self.height + site.col
    }

    fn checked_index(&self, site: Site) -> Result<usize, LatticeError> {
        if self.contains(site) {
            Ok(site.row * self.height + site.col)
        } else {
            Err(LatticeError::SiteOutOfBounds {
                site,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Energy at `site`. Panics if the site is outside the lattice.
    pub fn get(&self, site: Site) -> u32 {
        self.cells[self.index_of(site)]
    }

    pub fn try_get(&self, site: Site) -> Option<u32> {
        self.checked_index(site).ok().map(|i| self.cells[i])
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Owned snapshot, `rows()[row][col]`.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.height).map(<[u32]>::to_vec).collect()
    }

    /// Sum of all cells. Constant for the lifetime of the lattice.
    pub fn total_energy(&self) -> u64 {
        self.total
    }

    /// Number of sites holding at least one unit.
    pub fn occupied_sites(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Move one unit from `from` to `to`.
    ///
    /// A source with zero energy is a silent no-op. Returns whether a unit moved.
    /// Panics if either site lies outside the lattice.
    pub fn exchange(&mut self, from: Site, to: Site) -> bool {
        let src = self.index_of(from);
        let dst = self.index_of(to);
        self.transfer(src, dst)
    }

    /// Like [`Lattice::exchange`], but reports out-of-range sites as an error.
    pub fn try_exchange(&mut self, from: Site, to: Site) -> Result<bool, LatticeError> {
        let src = self.checked_index(from)?;
        let dst = self.checked_index(to)?;
        Ok(self.transfer(src, dst))
    }

    fn transfer(&mut self, src: usize, dst: usize) -> bool {
        if self.cells[src] == 0 {
            return false;
        }
        self.cells[src] -= 1;
        // Total energy is capped at u32::MAX on construction, so no cell can overflow.
        self.cells[dst] += 1;
        true
    }
}

/// Validates dimensions and returns the cell count.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<usize, GridConfigError> {
    if width == 0 || height == 0 {
        return Err(GridConfigError::ZeroDimension { width, height });
    }
    let cells = width
        .checked_mul(height)
        .filter(|&n| n <= Lattice::MAX_CELLS)
        .ok_or(GridConfigError::TooManyCells {
            max: Lattice::MAX_CELLS,
            width,
            height,
        })?;
    Ok(cells)
}

pub(crate) fn check_total_energy(total: u64) -> Result<(), GridConfigError> {
    if total > u64::from(u32::MAX) {
        return Err(GridConfigError::EnergyOverflow { total });
    }
    Ok(())
}
