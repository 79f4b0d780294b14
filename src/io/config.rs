//! YAML run configuration.
//!
//! ```yaml
//! system:
//!   temperature: 1.0
//!   n_slice: 64
//!   masses: [2.0, 2.0]
//!   sigma: [2.0, 2.0]
//!   eps: [10.0, 10.0]
//!   positions:
//!     - [1.0, 1.0]
//!     - [-1.0, -1.0]
//! run:
//!   moves: { bisection: 0.7, center_of_mass: 0.15, single_slice: 0.15 }
//!   seed: 42
//!   n_thermalize: 10000
//!   n_production: 80000
//!   output: PIMC.dat
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::paths::{PathConfig, PathState};
use crate::sampling::{ChainRng, PimcSimulation, RunConfig};

/// Complete description of one simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub system: PathConfig,
    pub run: RunConfig,
}

impl SimulationConfig {
    /// Validate the whole record and build a ready-to-run chain.
    pub fn build(&self) -> Result<PimcSimulation<ChainRng>> {
        let state = PathState::new(&self.system)?;
        let rng = match self.run.seed {
            Some(seed) => ChainRng::seeded(seed),
            None => ChainRng::from_entropy(),
        };
        info!(
            "{} particles in {}D, {} slices, T = {}, l_max = {}",
            state.n_part(),
            state.dim(),
            state.n_slice(),
            state.temperature(),
            state.l_max()
        );
        PimcSimulation::new(state, rng, self.run.moves)?.with_bisection_batch(self.run.bisection_batch)
    }
}

/// Parse a YAML config file.
pub fn read_config<P: AsRef<Path>>(filename: P) -> Result<SimulationConfig> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    let config: SimulationConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
}

/// Parse a YAML config from a string.
pub fn parse_config(text: &str) -> Result<SimulationConfig> {
    Ok(serde_yaml::from_str(text)?)
}
