//! Paths module - imaginary-time ring configurations and their action.

mod beads;
mod state;
pub mod action;
mod observables;

pub use beads::BeadArray;
pub use state::{PathConfig, PathState, rescale_masses, rescale_eps, K_B, HBAR};
pub use action::{potential, kinetic};
