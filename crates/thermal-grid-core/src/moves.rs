use crate::lattice::{Lattice, LatticeError};
use crate::site::{Axis, Direction, Site};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Random source for move selection.
///
/// Implemented for every [`rand::Rng`]; tests substitute scripted samplers to
/// force particular sites, axes and directions.
pub trait SiteSampler {
    /// Uniform site in `[0, width) x [0, height)`.
    fn sample_site(&mut self, width: usize, height: usize) -> Site;
    fn sample_axis(&mut self) -> Axis;
    fn sample_direction(&mut self) -> Direction;
}

impl<R: Rng + ?Sized> SiteSampler for R {
    fn sample_site(&mut self, width: usize, height: usize) -> Site {
        Site::new(self.random_range(0..width), self.random_range(0..height))
    }

    fn sample_axis(&mut self) -> Axis {
        if self.random::<bool>() {
            Axis::Row
        } else {
            Axis::Col
        }
    }

    fn sample_direction(&mut self) -> Direction {
        if self.random::<bool>() {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// What a nearest-neighbour move does when the drawn step leaves the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Redirect the step inward along the same axis.
    #[default]
    Clamp,
    /// Discard the move; the lattice is left unchanged.
    Reject,
}

impl BoundaryPolicy {
    pub fn from_skip_invalid(skip_invalid_exchanges: bool) -> Self {
        if skip_invalid_exchanges {
            BoundaryPolicy::Reject
        } else {
            BoundaryPolicy::Clamp
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// One unit moved from `from` to `to`.
    Exchanged { from: Site, to: Site },
    /// The drawn step from `site` left the lattice and no exchange happened.
    Skipped {
        site: Site,
        axis: Axis,
        direction: Direction,
    },
}

impl MoveOutcome {
    pub fn is_exchange(&self) -> bool {
        matches!(self, MoveOutcome::Exchanged { .. })
    }
}

impl Lattice {
    /// Uniformly random site.
    pub fn rand_site<S: SiteSampler + ?Sized>(&self, sampler: &mut S) -> Site {
        sampler.sample_site(self.width(), self.height())
    }

    /// Rejection-samples a site holding at least one unit.
    fn rand_source_site<S: SiteSampler + ?Sized>(
        &self,
        sampler: &mut S,
    ) -> Result<Site, LatticeError> {
        if self.total_energy() == 0 {
            return Err(LatticeError::EmptyGrid);
        }
        let mut site = self.rand_site(sampler);
        while self.get(site) == 0 {
            site = self.rand_site(sampler);
        }
        Ok(site)
    }

    /// Move one unit from a random non-empty site to a different random site.
    pub fn exchange_rand<S: SiteSampler + ?Sized>(
        &mut self,
        sampler: &mut S,
    ) -> Result<MoveOutcome, LatticeError> {
        if self.site_count() < 2 {
            return Err(LatticeError::SingleSite);
        }
        let from = self.rand_source_site(sampler)?;
        let mut to = self.rand_site(sampler);
        while to == from {
            to = self.rand_site(sampler);
        }
        self.exchange(from, to);
        Ok(MoveOutcome::Exchanged { from, to })
    }

    /// Move one unit from a random non-empty site to one of its 4-connected neighbours.
    pub fn exchange_rand_nn<S: SiteSampler + ?Sized>(
        &mut self,
        sampler: &mut S,
        policy: BoundaryPolicy,
    ) -> Result<MoveOutcome, LatticeError> {
        let from = self.rand_source_site(sampler)?;
        let axis = sampler.sample_axis();
        let direction = sampler.sample_direction();

        match self.neighbor(from, axis, direction, policy) {
            Some(to) => {
                self.exchange(from, to);
                Ok(MoveOutcome::Exchanged { from, to })
            }
            None => {
                tracing::trace!(%from, ?axis, ?direction, ?policy, "boundary move skipped");
                Ok(MoveOutcome::Skipped {
                    site: from,
                    axis,
                    direction,
                })
            }
        }
    }

    /// Neighbour of `site` one step along `axis`, after applying the boundary policy.
    ///
    /// Under `Clamp` an outward step at the edge is reversed; an axis of length 1
    /// has no inward neighbour either way.
    pub fn neighbor(
        &self,
        site: Site,
        axis: Axis,
        direction: Direction,
        policy: BoundaryPolicy,
    ) -> Option<Site> {
        let len = match axis {
            Axis::Row => self.width(),
            Axis::Col => self.height(),
        };
        let coord = site.coord(axis);
        let stepped = match (direction.step(coord, len), policy) {
            (Some(c), _) => Some(c),
            (None, BoundaryPolicy::Clamp) => direction.reversed().step(coord, len),
            (None, BoundaryPolicy::Reject) => None,
        };
        stepped.map(|c| site.with_coord(axis, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{allinone, uniform};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::VecDeque;

    /// Replays fixed draws; panics when a draw is requested that was not scripted.
    #[derive(Default)]
    struct Scripted {
        sites: VecDeque<Site>,
        axes: VecDeque<Axis>,
        directions: VecDeque<Direction>,
    }

    impl Scripted {
        fn new(sites: &[(usize, usize)], axes: &[Axis], directions: &[Direction]) -> Self {
            Self {
                sites: sites.iter().map(|&s| Site::from(s)).collect(),
                axes: axes.iter().copied().collect(),
                directions: directions.iter().copied().collect(),
            }
        }
    }

    impl SiteSampler for Scripted {
        fn sample_site(&mut self, _width: usize, _height: usize) -> Site {
            self.sites.pop_front().expect("unscripted site draw")
        }

        fn sample_axis(&mut self) -> Axis {
            self.axes.pop_front().expect("unscripted axis draw")
        }

        fn sample_direction(&mut self) -> Direction {
            self.directions.pop_front().expect("unscripted direction draw")
        }
    }

    #[test]
    fn rand_site_stays_in_bounds_on_non_square_lattice() {
        let g = uniform(3, 7, 1).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut seen_last_row = false;
        let mut seen_last_col = false;
        for _ in 0..2_000 {
            let s = g.rand_site(&mut rng);
            assert!(g.contains(s), "{s} out of bounds");
            seen_last_row |= s.row == 2;
            seen_last_col |= s.col == 6;
        }
        assert!(seen_last_row && seen_last_col, "upper bounds must be reachable");
    }

    #[test]
    fn exchange_rand_resamples_empty_source_and_self_partner() {
        let mut g = allinone(3, 3, (1, 1), 4).unwrap();
        let mut sampler = Scripted::new(&[(0, 0), (2, 2), (1, 1), (1, 1), (1, 1), (0, 2)], &[], &[]);
        let outcome = g.exchange_rand(&mut sampler).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Exchanged {
                from: Site::new(1, 1),
                to: Site::new(0, 2)
            }
        );
        assert!(sampler.sites.is_empty(), "all scripted draws consumed");
        assert_eq!(g.get(Site::new(1, 1)), 3);
        assert_eq!(g.get(Site::new(0, 2)), 1);
    }

    #[test]
    fn exchange_rand_never_self_exchanges() {
        let mut g = uniform(2, 2, 3).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        for _ in 0..1_000 {
            match g.exchange_rand(&mut rng).unwrap() {
                MoveOutcome::Exchanged { from, to } => assert_ne!(from, to),
                other => panic!("random-pair move must always exchange, got {other:?}"),
            }
        }
        assert_eq!(g.total_energy(), 12);
    }

    #[test]
    fn empty_lattice_is_an_error_not_a_hang() {
        let mut g = uniform(3, 3, 0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert_eq!(g.exchange_rand(&mut rng), Err(LatticeError::EmptyGrid));
        assert_eq!(
            g.exchange_rand_nn(&mut rng, BoundaryPolicy::Clamp),
            Err(LatticeError::EmptyGrid)
        );
    }

    #[test]
    fn single_site_lattice_rejects_random_pair_move() {
        let mut g = uniform(1, 1, 3).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert_eq!(g.exchange_rand(&mut rng), Err(LatticeError::SingleSite));
    }

    #[test]
    fn clamp_redirects_outward_step_inward() {
        let mut g = allinone(3, 3, (0, 0), 5).unwrap();
        let mut sampler = Scripted::new(&[(0, 0)], &[Axis::Row], &[Direction::Backward]);
        let outcome = g.exchange_rand_nn(&mut sampler, BoundaryPolicy::Clamp).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Exchanged {
                from: Site::new(0, 0),
                to: Site::new(1, 0)
            }
        );
        assert_eq!(g.get(Site::new(0, 0)), 4);
        assert_eq!(g.get(Site::new(1, 0)), 1);
    }

    #[test]
    fn reject_skips_outward_step() {
        let mut g = allinone(3, 3, (0, 0), 5).unwrap();
        let before = g.clone();
        let mut sampler = Scripted::new(&[(0, 0)], &[Axis::Row], &[Direction::Backward]);
        let outcome = g.exchange_rand_nn(&mut sampler, BoundaryPolicy::Reject).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Skipped {
                site: Site::new(0, 0),
                axis: Axis::Row,
                direction: Direction::Backward
            }
        );
        assert_eq!(g, before);
    }

    #[test]
    fn clamp_applies_only_on_the_chosen_axis() {
        // Corner site: column is at its upper edge but the row step is interior.
        let mut g = allinone(3, 3, (1, 2), 1).unwrap();
        let mut sampler = Scripted::new(&[(1, 2)], &[Axis::Row], &[Direction::Forward]);
        let outcome = g.exchange_rand_nn(&mut sampler, BoundaryPolicy::Clamp).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Exchanged {
                from: Site::new(1, 2),
                to: Site::new(2, 2)
            }
        );
    }

    #[test]
    fn neighbor_at_far_edges() {
        let g = uniform(3, 4, 1).unwrap();
        let corner = Site::new(2, 3);
        assert_eq!(
            g.neighbor(corner, Axis::Col, Direction::Forward, BoundaryPolicy::Clamp),
            Some(Site::new(2, 2))
        );
        assert_eq!(
            g.neighbor(corner, Axis::Row, Direction::Forward, BoundaryPolicy::Reject),
            None
        );
        assert_eq!(
            g.neighbor(corner, Axis::Row, Direction::Backward, BoundaryPolicy::Reject),
            Some(Site::new(1, 3))
        );
    }

    #[test]
    fn unit_length_axis_has_no_neighbor_even_when_clamping() {
        let g = uniform(1, 4, 1).unwrap();
        let s = Site::new(0, 1);
        for direction in [Direction::Forward, Direction::Backward] {
            assert_eq!(g.neighbor(s, Axis::Row, direction, BoundaryPolicy::Clamp), None);
        }
        assert_eq!(
            g.neighbor(s, Axis::Col, Direction::Backward, BoundaryPolicy::Clamp),
            Some(Site::new(0, 0))
        );
    }

    #[test]
    fn nearest_neighbor_moves_are_adjacent() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        for policy in [BoundaryPolicy::Clamp, BoundaryPolicy::Reject] {
            let mut g = allinone(4, 5, (0, 4), 50).unwrap();
            let mut skipped = 0;
            for _ in 0..2_000 {
                match g.exchange_rand_nn(&mut rng, policy).unwrap() {
                    MoveOutcome::Exchanged { from, to } => {
                        assert!(from.is_adjacent(to), "{from} -> {to} not adjacent")
                    }
                    MoveOutcome::Skipped { .. } => skipped += 1,
                }
            }
            assert_eq!(g.total_energy(), 50);
            if policy == BoundaryPolicy::Clamp {
                assert_eq!(skipped, 0, "clamping never skips on a 4x5 lattice");
            }
        }
    }

    #[test]
    fn skip_invalid_flag_maps_to_policy() {
        assert_eq!(BoundaryPolicy::from_skip_invalid(false), BoundaryPolicy::Clamp);
        assert_eq!(BoundaryPolicy::from_skip_invalid(true), BoundaryPolicy::Reject);
        assert_eq!(BoundaryPolicy::default(), BoundaryPolicy::Clamp);
    }
}
