use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use rust_pimc::{append_paths, read_config, run_pimc, Result};

#[derive(Parser, Debug)]
#[command(version, about = "Path Integral Monte Carlo with multilevel bisection", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Override the seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the dump file from the config file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let mut config = read_config(&args.config)?;
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
    if args.output.is_some() {
        config.run.output = args.output;
    }

    let mut sim = config.build()?;
    let results = run_pimc(&mut sim, &config.run);

    println!("PIMC Simulation Results");
    println!("----------------------------------------");
    println!("Particles: {}, slices: {}", sim.state().n_part(), sim.state().n_slice());
    println!("Production updates: {}", config.run.n_production);
    println!("Mean ring spread: {:.6} ± {:.6}", results.mean_spread, results.spread_error);
    println!("Autocorrelation time: {:.2} samples", results.autocorrelation_time);
    println!("Acceptance rate: {:.2}%", 100.0 * results.stats.overall_rate());

    if let Some(path) = &config.run.output {
        append_paths(sim.state(), path)?;
        info!("configuration appended to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
