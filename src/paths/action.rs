//! Primitive-approximation action: spring (kinetic) terms between adjacent
//! slices of one ring, and a pair potential between beads of different
//! particles at the same slice.
//!
//! The incremental evaluators are what the move kernels use; the totals at
//! the bottom are diagnostics. A pair `(p, i)` with `p < i` is charged with
//! the parameters of `p` in the total but with those of the moving particle
//! in `potential_change`, so the two agree only when both particles share
//! mass, sigma and eps.

use nalgebra::DVector;

use super::state::PathState;

/// Pair interaction between two beads, in units of the moving particle's
/// `eps`.
///
/// Inside the quantum length `mass^-1/2` this is the Lennard-Jones form
/// `A(A - 1)` with `A = (sigma / r)^6`; outside it is exactly zero.
#[inline]
pub fn potential(mass: f64, sigma: f64, r0: &DVector<f64>, r1: &DVector<f64>) -> f64 {
    pair_potential(mass, sigma, (r1 - r0).norm())
}

#[inline]
fn pair_potential(mass: f64, sigma: f64, r: f64) -> f64 {
    if r < mass.powf(-0.5) {
        let a = (sigma / r).powi(6);
        a * (a - 1.0)
    } else {
        0.0
    }
}

/// Squared bead separation, the unscaled spring term.
#[inline]
pub fn kinetic(r0: &DVector<f64>, r1: &DVector<f64>) -> f64 {
    (r1 - r0).norm_squared()
}

impl PathState {
    /// Slice before `t` on the periodic ring.
    #[inline]
    pub fn prev_slice(&self, t: usize) -> usize {
        (t + self.n_slice() - 1) % self.n_slice()
    }

    /// Slice after `t` on the periodic ring.
    #[inline]
    pub fn next_slice(&self, t: usize) -> usize {
        (t + 1) % self.n_slice()
    }

    /// Change in potential action when bead `(p, t)` goes from `r_old` to
    /// `r_new`.
    ///
    /// Busy particles with a lower index than `p` are skipped: within a batch
    /// each pair is charged to the lower-indexed particle only.
    ///
    /// With `eps(p) == 0` the change is exactly zero, even for coincident
    /// beads where the pair term itself is infinite.
    pub fn potential_change(&self, p: usize, t: usize, r_old: &DVector<f64>, r_new: &DVector<f64>) -> f64 {
        if self.eps(p) == 0.0 {
            return 0.0;
        }
        let mass = self.mass(p);
        let sigma = self.sigma(p);
        let mut ds = 0.0;
        for i in 0..self.n_part() {
            if i == p || (self.is_busy(i) && i < p) {
                continue;
            }
            ds -= pair_potential(mass, sigma, self.beads.distance_to(i, t, r_old));
            ds += pair_potential(mass, sigma, self.beads.distance_to(i, t, r_new));
        }
        ds * self.eps(p)
    }

    /// Change in spring action when bead `(p, t)` goes from `r_old` to
    /// `r_new`, against its two periodic neighbours.
    pub fn kinetic_change(&self, p: usize, t: usize, r_old: &DVector<f64>, r_new: &DVector<f64>) -> f64 {
        let next = self.bead(p, self.next_slice(t));
        let prev = self.bead(p, self.prev_slice(t));
        let mut ds = 0.0;
        ds -= kinetic(r_old, &next);
        ds -= kinetic(r_old, &prev);
        ds += kinetic(r_new, &next);
        ds += kinetic(r_new, &prev);
        ds * self.mass(p)
    }

    /// Total spring action of every ring.
    pub fn kinetic_action(&self) -> f64 {
        let mut action = 0.0;
        for p in 0..self.n_part() {
            let mut springs = 0.0;
            for t in 0..self.n_slice() {
                springs += kinetic(&self.bead(p, t), &self.bead(p, self.next_slice(t)));
            }
            action += self.mass(p) * springs;
        }
        action
    }

    /// Total potential action, each pair `(p, i)` with `p < i` charged with
    /// the parameters of `p`.
    pub fn potential_action(&self) -> f64 {
        let mut action = 0.0;
        for t in 0..self.n_slice() {
            for p in 0..self.n_part() {
                if self.eps(p) == 0.0 {
                    continue;
                }
                let r = self.bead(p, t);
                let mut pair_sum = 0.0;
                for i in (p + 1)..self.n_part() {
                    pair_sum += pair_potential(self.mass(p), self.sigma(p), self.beads.distance_to(i, t, &r));
                }
                action += self.eps(p) * pair_sum;
            }
        }
        action
    }

    pub fn total_action(&self) -> f64 {
        self.kinetic_action() + self.potential_action()
    }
}
