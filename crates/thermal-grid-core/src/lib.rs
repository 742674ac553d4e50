//! Energy transport on a discrete 2D lattice via stochastic single-unit exchanges.
//!
//! A [`Lattice`] holds non-negative integer energy counts. Units move one at a
//! time through [`Lattice::exchange`], either between two random sites
//! ([`Lattice::exchange_rand`]) or between nearest neighbours
//! ([`Lattice::exchange_rand_nn`]). [`Simulation`] pairs a lattice with a seeded
//! random source for callers that drive a run step by step.

pub mod config;
pub mod init;
pub mod lattice;
pub mod moves;
pub mod simulation;
pub mod site;

pub use config::{GridConfigError, MoveKind, SimConfig};
pub use init::{allinone, uniform, uniform_subgrid, InitialState};
pub use lattice::{Lattice, LatticeError};
pub use moves::{BoundaryPolicy, MoveOutcome, SiteSampler};
pub use simulation::{Simulation, StepCounters};
pub use site::{Axis, Direction, Site};
