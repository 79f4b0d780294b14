//! Rust PIMC - Path Integral Monte Carlo for distinguishable quantum particles.
//!
//! Each particle is a closed ring of beads in imaginary time. The rings are
//! sampled with multilevel bisection, rigid center-of-mass shifts and
//! single-bead moves under the primitive action with a cut-off
//! Lennard-Jones pair potential.

pub mod error;
pub mod paths;
pub mod sampling;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{PimcError, Result};
pub use paths::{BeadArray, PathConfig, PathState};
pub use sampling::{ChainRng, RandomSource, MoveKind, MoveStats, MoveWeights, PimcSimulation, BisectionReport, RunConfig, PimcResults, run_pimc};
pub use io::{read_config, parse_config, SimulationConfig, write_paths, append_paths};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{ChainRng, MoveKind, MoveWeights, PathConfig, PathState, PimcSimulation, RandomSource};

    fn lj_square(n_slice: usize, eps: f64) -> PathConfig {
        PathConfig {
            temperature: 1.0,
            n_slice,
            masses: vec![2.0; 4],
            sigma: vec![2.0; 4],
            eps: vec![eps; 4],
            positions: vec![
                vec![1.0, 1.0],
                vec![1.0, -1.0],
                vec![-1.0, 1.0],
                vec![-1.0, -1.0],
            ],
        }
    }

    fn mixed() -> MoveWeights {
        MoveWeights { bisection: 0.6, center_of_mass: 0.2, single_slice: 0.2 }
    }

    #[test]
    fn test_chain_stays_consistent() {
        let state = PathState::new(&lj_square(64, 10.0)).unwrap();
        let mut sim = PimcSimulation::new(state, ChainRng::seeded(2018), mixed())
            .unwrap()
            .with_bisection_batch(2)
            .unwrap();
        for _ in 0..5000 {
            sim.update();
            assert!(sim.state().all_idle());
        }
        let state = sim.state();
        for p in 0..state.n_part() {
            assert!(state.centroid(p).iter().all(|x| x.is_finite()));
            assert!(state.spread(p).is_finite());
        }
        assert!(state.total_action().is_finite());
        assert!(sim.stats().accepted(MoveKind::Bisection) > 0);
    }

    #[test]
    fn test_independent_chains_do_not_interfere() {
        let run = |seed: u64, steps: usize| {
            let state = PathState::new(&lj_square(16, 10.0)).unwrap();
            let mut sim = PimcSimulation::new(state, ChainRng::seeded(seed), mixed()).unwrap();
            for _ in 0..steps {
                sim.update();
            }
            sim.state().beads().clone()
        };
        let alone = run(5, 1000);
        // interleave a second chain with a different seed
        let state = PathState::new(&lj_square(16, 10.0)).unwrap();
        let mut first = PimcSimulation::new(state.clone(), ChainRng::seeded(5), mixed()).unwrap();
        let mut second = PimcSimulation::new(state, ChainRng::seeded(6), mixed()).unwrap();
        for _ in 0..1000 {
            first.update();
            second.update();
        }
        assert_eq!(first.state().beads(), &alone);
        assert_ne!(second.state().beads(), &alone);
    }

    #[test]
    fn test_incremental_actions_track_totals() {
        // beads close enough to interact, with a soft enough core that the
        // totals stay well conditioned
        let config = PathConfig {
            temperature: 1.0,
            n_slice: 8,
            masses: vec![2.0; 4],
            sigma: vec![0.2; 4],
            eps: vec![10.0; 4],
            positions: vec![
                vec![0.0, 0.0],
                vec![0.3, 0.0],
                vec![0.0, 0.3],
                vec![0.3, 0.3],
            ],
        };
        let mut state = PathState::new(&config).unwrap();
        let mut rng = ChainRng::seeded(77);
        let mut saw_potential = false;
        for _ in 0..200 {
            let p = rng.uniform_int(state.n_part());
            let t = rng.uniform_int(state.n_slice());
            let r = state.bead(p, t);
            let moved = &r + rng.uniform_vector(2) * 0.05;
            let d_pot = state.potential_change(p, t, &r, &moved);
            let predicted = state.kinetic_change(p, t, &r, &moved) + d_pot;
            saw_potential |= d_pot != 0.0;
            let before = state.total_action();
            state.set_bead(p, t, &moved);
            assert_relative_eq!(state.total_action() - before, predicted, epsilon = 1e-9, max_relative = 1e-9);
        }
        assert!(saw_potential);
    }

    #[test]
    fn test_zero_interaction_center_of_mass_always_accepts() {
        let weights = MoveWeights { bisection: 0.0, center_of_mass: 1.0, single_slice: 0.0 };
        let state = PathState::new(&lj_square(32, 0.0)).unwrap();
        let mut sim = PimcSimulation::new(state, ChainRng::seeded(1), weights).unwrap();
        let start = sim.state().centroid(0);
        for _ in 0..1000 {
            assert!(sim.update());
        }
        assert_eq!(sim.stats().accepted(MoveKind::CenterOfMass), 1000);
        assert!((sim.state().centroid(0) - start).norm() > 0.0);
        assert_relative_eq!(sim.state().spread(0), 0.0, epsilon = 1e-20);
    }
}
