//! Thermalize-then-measure driver for a single chain.

use log::{debug, info};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::pimc::{MoveKind, MoveStats, MoveWeights, PimcSimulation};
use super::traits::RandomSource;
use std::path::PathBuf;

fn default_batch() -> usize {
    1
}

fn default_interval() -> usize {
    100
}

/// Run-time settings of one chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// Move mix; there is no default, it has to be stated
    pub moves: MoveWeights,
    /// Particles moved together in one bisection
    #[serde(default = "default_batch")]
    pub bisection_batch: usize,
    /// Seed of the chain's random stream; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Updates discarded before measuring
    pub n_thermalize: usize,
    /// Updates measured
    pub n_production: usize,
    /// Updates between two samples of the observables
    #[serde(default = "default_interval")]
    pub sample_interval: usize,
    /// File the final configuration is appended to
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Results of a production run.
#[derive(Clone, Debug)]
pub struct PimcResults {
    /// Mean squared ring radius, averaged over particles and samples
    pub mean_spread: f64,
    pub spread_error: f64,
    pub autocorrelation_time: f64,
    /// Time series of the particle-averaged spread
    pub spreads: Vec<f64>,
    /// Move statistics of the production phase
    pub stats: MoveStats,
}

/// Thermalize, then sample the ring spread every `sample_interval` updates.
pub fn run_pimc<R: RandomSource>(sim: &mut PimcSimulation<R>, config: &RunConfig) -> PimcResults {
    let interval = config.sample_interval.max(1);
    let report_every = |n: usize| (n / 10).max(1);

    info!("thermalizing ({} updates)", config.n_thermalize);
    for step in 0..config.n_thermalize {
        sim.update();
        if step % report_every(config.n_thermalize) == 0 {
            debug!(
                "  step {:8}: spread = {:10.6}, acceptance = {:.2}%",
                step,
                sim.state().mean_spread(),
                100.0 * sim.stats().overall_rate()
            );
        }
    }
    if config.n_thermalize > 0 {
        info!("thermalization acceptance: {:.2}%", 100.0 * sim.stats().overall_rate());
    }
    sim.reset_stats();

    info!("production ({} updates)", config.n_production);
    let mut spreads = Vec::with_capacity(config.n_production / interval);
    for step in 0..config.n_production {
        sim.update();
        if (step + 1) % interval == 0 {
            spreads.push(sim.state().mean_spread());
        }
        if step % report_every(config.n_production) == 0 {
            debug!(
                "  step {:8}: spread = {:10.6}, acceptance = {:.2}%",
                step,
                sim.state().mean_spread(),
                100.0 * sim.stats().overall_rate()
            );
        }
    }

    let results = summarize(spreads, *sim.stats());
    info!(
        "<spread> = {:.6} ± {:.6} (tau = {:.2} samples)",
        results.mean_spread, results.spread_error, results.autocorrelation_time
    );
    for kind in MoveKind::ALL {
        info!(
            "{:?}: {} attempted, acceptance {:.2}%",
            kind,
            results.stats.attempted(kind),
            100.0 * results.stats.acceptance_rate(kind)
        );
    }
    results
}

fn summarize(spreads: Vec<f64>, stats: MoveStats) -> PimcResults {
    if spreads.is_empty() {
        return PimcResults {
            mean_spread: 0.0,
            spread_error: 0.0,
            autocorrelation_time: 0.0,
            spreads,
            stats,
        };
    }
    let mean_spread = spreads.iter().sum::<f64>() / spreads.len() as f64;
    let autocorrelation_time = autocorrelation_time(&spreads);
    let spread_error = blocking_error(&spreads, autocorrelation_time);
    PimcResults {
        mean_spread,
        spread_error,
        autocorrelation_time,
        spreads,
        stats,
    }
}

/// Integrated autocorrelation time `1 + 2 sum_t c(t)`, where `c(t)` is the
/// normalised autocovariance at lag `t`. The sum stops at the first
/// negative lag or at half the series length.
pub fn autocorrelation_time(series: &[f64]) -> f64 {
    let n = series.len();
    if n == 0 {
        return 1.0;
    }
    let deviations = DVector::from_column_slice(series).add_scalar(-series.iter().sum::<f64>() / n as f64);
    let variance = deviations.norm_squared() / n as f64;
    if variance == 0.0 {
        return 1.0;
    }

    let correlated: f64 = (1..n / 2)
        .map(|lag| {
            let len = n - lag;
            deviations.rows(0, len).dot(&deviations.rows(lag, len)) / (len as f64 * variance)
        })
        .take_while(|&c| c >= 0.0)
        .sum();
    1.0 + 2.0 * correlated
}

/// Standard error of the mean, estimated from the scatter of block averages
/// over blocks `ceil(2 tau)` samples long. Zero when fewer than two blocks
/// fit.
pub fn blocking_error(series: &[f64], autocorrelation_time: f64) -> f64 {
    let block_size = ((2.0 * autocorrelation_time).ceil() as usize).max(1);
    let block_means = DVector::from_iterator(
        series.len() / block_size,
        series
            .chunks_exact(block_size)
            .map(|block| block.iter().sum::<f64>() / block_size as f64),
    );
    let n_blocks = block_means.len();
    if n_blocks < 2 {
        return 0.0;
    }
    // population variance over n - 1 is the sample variance over n
    (block_means.variance() / (n_blocks - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{PathConfig, PathState};
    use crate::sampling::ChainRng;
    use approx::assert_relative_eq;

    fn run_config(n_thermalize: usize, n_production: usize) -> RunConfig {
        RunConfig {
            moves: MoveWeights { bisection: 0.6, center_of_mass: 0.2, single_slice: 0.2 },
            bisection_batch: 1,
            seed: Some(1),
            n_thermalize,
            n_production,
            sample_interval: 10,
            output: None,
        }
    }

    #[test]
    fn test_constant_series() {
        let series = vec![2.5; 50];
        assert_eq!(autocorrelation_time(&series), 1.0);
        assert_eq!(blocking_error(&series, 1.0), 0.0);
    }

    #[test]
    fn test_duplicated_samples_double_the_correlation_time() {
        // every draw appears twice in a row, so c(1) = 1/2 and tau = 2
        let mut rng = ChainRng::seeded(3);
        let series: Vec<f64> = (0..10_000)
            .flat_map(|_| {
                let x = rng.standard_normal();
                [x, x]
            })
            .collect();
        assert_relative_eq!(autocorrelation_time(&series), 2.0, epsilon = 0.3);

        let white: Vec<f64> = (0..20_000).map(|_| rng.standard_normal()).collect();
        assert_relative_eq!(autocorrelation_time(&white), 1.0, epsilon = 0.3);
    }

    #[test]
    fn test_blocking_error_of_alternating_series() {
        // blocks of two average to exactly the mean
        let series: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { 3.0 }).collect();
        assert_relative_eq!(blocking_error(&series, 1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_particle_spread() {
        // a free ring in thermal equilibrium has <spread> = dim * ħ²β / (12 m)
        let config = PathConfig {
            temperature: 1.0,
            n_slice: 16,
            masses: vec![1.0],
            sigma: vec![1.0],
            eps: vec![0.0],
            positions: vec![vec![0.0, 0.0, 0.0]],
        };
        let state = PathState::new(&config).unwrap();
        let run = run_config(20_000, 200_000);
        let mut sim = PimcSimulation::new(state, ChainRng::seeded(12), run.moves).unwrap();
        let results = run_pimc(&mut sim, &run);

        assert_eq!(results.spreads.len(), 20_000);
        assert_eq!(results.stats.attempted(MoveKind::Bisection)
            + results.stats.attempted(MoveKind::CenterOfMass)
            + results.stats.attempted(MoveKind::SingleSlice), 200_000);
        // discretised value: dim * (M^2 - 1) / (12 M^2) * β/m with M = 16
        let m = 16.0;
        let expected = 3.0 * (m * m - 1.0) / (12.0 * m * m);
        assert_relative_eq!(results.mean_spread, expected, epsilon = 0.05);
        assert!(sim.state().all_idle());
    }

    #[test]
    fn test_empty_production() {
        let config = PathConfig {
            temperature: 1.0,
            n_slice: 4,
            masses: vec![1.0],
            sigma: vec![1.0],
            eps: vec![0.0],
            positions: vec![vec![0.0]],
        };
        let state = PathState::new(&config).unwrap();
        let run = run_config(10, 0);
        let mut sim = PimcSimulation::new(state, ChainRng::seeded(3), run.moves).unwrap();
        let results = run_pimc(&mut sim, &run);
        assert!(results.spreads.is_empty());
        assert_eq!(results.mean_spread, 0.0);
    }
}
