//! Sampling module - Monte Carlo moves over imaginary-time paths.

mod traits;
mod random;
mod pimc;
mod bisection;
mod run;

pub use traits::RandomSource;
pub use random::ChainRng;
pub use pimc::{MoveKind, MoveStats, MoveWeights, PimcSimulation};
pub use bisection::BisectionReport;
pub use run::{run_pimc, autocorrelation_time, blocking_error, PimcResults, RunConfig};
