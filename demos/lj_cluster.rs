//! Four Lennard-Jones particles on a square
//!
//! Run with: cargo run --release --example lj_cluster
//!
//! Samples the imaginary-time rings of four heavy particles at T = 1 with
//! 64 slices and appends the final configuration to `PIMC.dat`.

use rust_pimc::{append_paths, run_pimc, MoveWeights, PathConfig, Result, RunConfig, SimulationConfig};

fn main() -> Result<()> {
    env_logger::init();

    let system = PathConfig {
        temperature: 1.0,
        n_slice: 64,
        masses: vec![2.0; 4],
        sigma: vec![2.0; 4],
        eps: vec![10.0; 4],
        positions: vec![
            vec![1.0, 1.0],
            vec![1.0, -1.0],
            vec![-1.0, 1.0],
            vec![-1.0, -1.0],
        ],
    };
    let run = RunConfig {
        moves: MoveWeights { bisection: 0.7, center_of_mass: 0.15, single_slice: 0.15 },
        bisection_batch: 1,
        seed: Some(2018),
        n_thermalize: 10_000,
        n_production: 80_000,
        sample_interval: 100,
        output: Some("PIMC.dat".into()),
    };

    let config = SimulationConfig { system, run };
    let mut sim = config.build()?;
    let run = config.run;
    let results = run_pimc(&mut sim, &run);

    println!("=== Results ===");
    println!("<spread> = {:.6} ± {:.6}", results.mean_spread, results.spread_error);
    for p in 0..sim.state().n_part() {
        let c = sim.state().centroid(p);
        println!("particle {}: centroid = ({:.4}, {:.4}), spread = {:.6}", p, c[0], c[1], sim.state().spread(p));
    }

    if let Some(path) = &run.output {
        append_paths(sim.state(), path)?;
        println!("\nConfiguration appended to {}", path.display());
    }
    Ok(())
}
