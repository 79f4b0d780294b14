//! IO module - configuration files and path dumps.

mod config;
mod dump;

pub use config::{read_config, parse_config, SimulationConfig};
pub use dump::{write_paths, append_paths};
