//! Path Integral Monte Carlo move engine.
//!
//! Each particle is a closed ring of beads in imaginary time. A call to
//! [`PimcSimulation::update`] picks one of three kernels (multilevel
//! bisection, rigid center-of-mass shift, single-bead displacement) and runs
//! it to completion: propose, evaluate the action change, Metropolis test,
//! then commit or restore.
//!
//! Reference: Ceperley, D.M. (1995) "Path integrals in the theory of condensed helium"
//! Rev. Mod. Phys. 67, 279

use log::trace;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::traits::RandomSource;
use crate::error::{PimcError, Result};
use crate::paths::PathState;

/// Relative frequencies of the move kernels. Normalised on use.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveWeights {
    pub bisection: f64,
    pub center_of_mass: f64,
    pub single_slice: f64,
}

impl MoveWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [self.bisection, self.center_of_mass, self.single_slice];
        if weights.iter().any(|w| !(*w >= 0.0 && w.is_finite())) {
            return Err(PimcError::invalid("moves", format!("weights must be non-negative, got {:?}", self)));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(PimcError::invalid("moves", "at least one weight must be positive"));
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.bisection + self.center_of_mass + self.single_slice
    }

    /// Map a uniform deviate `u` in [0, 1) onto a kernel.
    pub fn pick(&self, u: f64) -> MoveKind {
        let x = u * self.total();
        if x < self.bisection {
            MoveKind::Bisection
        } else if x < self.bisection + self.center_of_mass {
            MoveKind::CenterOfMass
        } else if self.single_slice > 0.0 {
            MoveKind::SingleSlice
        } else if self.center_of_mass > 0.0 {
            // rounding pushed x past the last non-empty bucket
            MoveKind::CenterOfMass
        } else {
            MoveKind::Bisection
        }
    }
}

/// The three move kernels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Bisection,
    CenterOfMass,
    SingleSlice,
}

impl MoveKind {
    pub const ALL: [MoveKind; 3] = [MoveKind::Bisection, MoveKind::CenterOfMass, MoveKind::SingleSlice];

    fn index(self) -> usize {
        match self {
            MoveKind::Bisection => 0,
            MoveKind::CenterOfMass => 1,
            MoveKind::SingleSlice => 2,
        }
    }
}

/// Acceptance bookkeeping per kernel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MoveStats {
    attempted: [usize; 3],
    accepted: [usize; 3],
}

impl MoveStats {
    pub fn record(&mut self, kind: MoveKind, accepted: bool) {
        self.attempted[kind.index()] += 1;
        if accepted {
            self.accepted[kind.index()] += 1;
        }
    }

    pub fn attempted(&self, kind: MoveKind) -> usize {
        self.attempted[kind.index()]
    }

    pub fn accepted(&self, kind: MoveKind) -> usize {
        self.accepted[kind.index()]
    }

    pub fn acceptance_rate(&self, kind: MoveKind) -> f64 {
        let n = self.attempted(kind);
        if n == 0 {
            0.0
        } else {
            self.accepted(kind) as f64 / n as f64
        }
    }

    /// Acceptance over all kernels.
    pub fn overall_rate(&self) -> f64 {
        let n: usize = self.attempted.iter().sum();
        if n == 0 {
            0.0
        } else {
            self.accepted.iter().sum::<usize>() as f64 / n as f64
        }
    }
}

/// One Markov chain: the path state, its random stream and the move mix.
pub struct PimcSimulation<R: RandomSource> {
    pub(super) state: PathState,
    pub(super) rng: R,
    weights: MoveWeights,
    bisection_batch: usize,
    stats: MoveStats,
}

impl<R: RandomSource> PimcSimulation<R> {
    pub fn new(state: PathState, rng: R, weights: MoveWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            state,
            rng,
            weights,
            bisection_batch: 1,
            stats: MoveStats::default(),
        })
    }

    /// Move `batch` distinct particles together in each bisection.
    pub fn with_bisection_batch(mut self, batch: usize) -> Result<Self> {
        if batch == 0 || batch > self.state.n_part() {
            return Err(PimcError::invalid(
                "bisection_batch",
                format!("must be in 1..={}, got {}", self.state.n_part(), batch),
            ));
        }
        self.bisection_batch = batch;
        Ok(self)
    }

    pub fn state(&self) -> &PathState {
        &self.state
    }

    pub fn stats(&self) -> &MoveStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = MoveStats::default();
    }

    pub fn weights(&self) -> &MoveWeights {
        &self.weights
    }

    /// Run one move chosen according to the configured weights. Returns
    /// whether it was accepted.
    pub fn update(&mut self) -> bool {
        let kind = self.weights.pick(self.rng.uniform());
        let accepted = match kind {
            MoveKind::Bisection => self.bisection(),
            MoveKind::CenterOfMass => self.center_of_mass(),
            MoveKind::SingleSlice => self.single_slice(),
        };
        self.stats.record(kind, accepted);
        debug_assert!(self.state.all_idle());
        accepted
    }

    /// Rigid shift of one whole ring, tested on the potential action alone.
    pub fn center_of_mass(&mut self) -> bool {
        let p = self.rng.uniform_int(self.state.n_part());
        let dim = self.state.dim();
        let dr = self.rng.uniform_vector(dim) * (0.5 / self.state.mass(p).sqrt());

        self.state.start_move(&[p]);
        let ds = self.particle_move_action(p, &dr);
        let accepted = self.rng.accept(-ds);
        if accepted {
            self.state.move_particle(p, &dr);
        }
        self.state.end_move(&[p]);

        trace!("center-of-mass p={} dS={:.6} accepted={}", p, ds, accepted);
        accepted
    }

    /// Potential action change of translating every bead of `p` by `dr`.
    fn particle_move_action(&self, p: usize, dr: &DVector<f64>) -> f64 {
        (0..self.state.n_slice())
            .map(|t| {
                let r = self.state.bead(p, t);
                let moved = &r + dr;
                self.state.potential_change(p, t, &r, &moved)
            })
            .sum()
    }

    /// Displace one bead away from slice 0, tested on kinetic plus potential
    /// action.
    pub fn single_slice(&mut self) -> bool {
        let p = self.rng.uniform_int(self.state.n_part());
        let t = self.rng.uniform_int_range(1, self.state.n_slice());
        let dim = self.state.dim();
        let dr = self.rng.uniform_vector(dim) * (0.5 / self.state.mass(p).sqrt());

        self.state.start_move(&[p]);
        let r = self.state.bead(p, t);
        let moved = &r + &dr;
        let ds = self.state.potential_change(p, t, &r, &moved) + self.state.kinetic_change(p, t, &r, &moved);
        let accepted = self.rng.accept(-ds);
        if accepted {
            self.state.move_bead(p, t, &dr);
        }
        self.state.end_move(&[p]);

        trace!("single-slice p={} t={} dS={:.6} accepted={}", p, t, ds, accepted);
        accepted
    }

    /// Draw `k` distinct particle indices.
    pub(super) fn pick_particles(&mut self, k: usize) -> Vec<usize> {
        let n = self.state.n_part();
        let mut picked: Vec<usize> = Vec::with_capacity(k);
        while picked.len() < k {
            let p = self.rng.uniform_int(n);
            if !picked.contains(&p) {
                picked.push(p);
            }
        }
        picked
    }

    pub(super) fn bisection_batch(&self) -> usize {
        self.bisection_batch
    }
}
