//! Multilevel bisection move.
//!
//! A bisection rebuilds the beads strictly between slices `t0` and
//! `t0 + 2^l_max` for a batch of particles. Level 1 places the centre bead,
//! every further level halves the spacing. Each new bead is the average of
//! its two neighbours at the current spacing `s` plus Gaussian noise of
//! variance `s / (4 mass)`, which samples the free-particle kinetic action
//! exactly, so only the potential action enters the acceptance test.
//!
//! Levels are accepted one at a time with weight `exp(-dS_l * s)`. A rejected
//! level restores every bead changed since the call began, so a failed
//! bisection leaves the configuration exactly as it found it.

use log::trace;

use super::pimc::PimcSimulation;
use super::traits::RandomSource;

/// Outcome of one bisection call.
#[derive(Clone, Debug, PartialEq)]
pub struct BisectionReport {
    pub accepted: bool,
    /// Potential action change of every level that was attempted, coarsest first
    pub level_actions: Vec<f64>,
}

impl BisectionReport {
    pub fn levels_attempted(&self) -> usize {
        self.level_actions.len()
    }
}

impl<R: RandomSource> PimcSimulation<R> {
    /// Bisection of randomly chosen particles at a random origin.
    pub fn bisection(&mut self) -> bool {
        let particles = self.pick_particles(self.bisection_batch());
        let t0 = self.rng.uniform_int(self.state.t0_max() + 1);
        let l_max = self.state.l_max();

        self.state.start_move(&particles);
        let report = self.bisect(&particles, t0, l_max);
        self.state.end_move(&particles);

        trace!(
            "bisection particles={:?} t0={} levels={} accepted={}",
            particles,
            t0,
            report.levels_attempted(),
            report.accepted
        );
        report.accepted
    }

    /// Rebuild slices `t0 + 1 .. t0 + 2^l_max` of every particle in
    /// `particles`, level by level.
    ///
    /// Each level is tested on its own potential change, not on a running
    /// total over the levels before it.
    ///
    /// Panics if the span runs past the last slice.
    pub fn bisect(&mut self, particles: &[usize], t0: usize, l_max: usize) -> BisectionReport {
        assert!(
            t0 + (1usize << l_max) < self.state.n_slice(),
            "bisection span {}..={} exceeds {} slices",
            t0,
            t0 + (1usize << l_max),
            self.state.n_slice()
        );

        self.state.begin_rollback(particles.len() * ((1usize << l_max) - 1));
        let mut level_actions = Vec::with_capacity(l_max);

        for l in 1..=l_max {
            let s = 1usize << (l_max - l);
            let n = 1usize << (l - 1);
            let mut ds = 0.0;
            for m in 0..n {
                let t = t0 + (2 * m + 1) * s;
                ds += self.midpoint(particles, t, s);
            }
            level_actions.push(ds);

            if !self.rng.accept(-ds * s as f64) {
                self.state.rollback();
                return BisectionReport { accepted: false, level_actions };
            }
        }

        self.state.discard_rollback();
        BisectionReport { accepted: true, level_actions }
    }

    /// Resample slice `t` of each particle from its neighbours at distance
    /// `s`, committing immediately. Returns the summed potential change.
    fn midpoint(&mut self, particles: &[usize], t: usize, s: usize) -> f64 {
        let dim = self.state.dim();
        let mut ds = 0.0;
        for &p in particles {
            self.state.snapshot_bead(p, t);
            let width = (s as f64 / 4.0 / self.state.mass(p)).sqrt();
            let noise = self.rng.gaussian_vector(dim) * width;
            let old = self.state.bead(p, t);
            let new = (self.state.bead(p, t + s) + self.state.bead(p, t - s)) * 0.5 + noise;
            ds += self.state.potential_change(p, t, &old, &new);
            self.state.set_bead(p, t, &new);
        }
        ds
    }
}
