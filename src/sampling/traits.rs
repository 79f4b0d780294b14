//! Traits for Monte Carlo sampling.

use nalgebra::DVector;

/// Source of random deviates for one Markov chain.
///
/// Every chain owns its own source. Implementations only have to supply the
/// primitive draws; the Metropolis test is provided on top of `uniform`.
pub trait RandomSource {
    /// Uniform deviate in [0, 1).
    fn uniform(&mut self) -> f64;

    /// Uniform integer in [0, n).
    fn uniform_int(&mut self, n: usize) -> usize;

    /// Uniform integer in [lo, hi).
    fn uniform_int_range(&mut self, lo: usize, hi: usize) -> usize {
        lo + self.uniform_int(hi - lo)
    }

    /// Standard normal deviate.
    fn standard_normal(&mut self) -> f64;

    /// Vector of independent standard normal components.
    fn gaussian_vector(&mut self, dim: usize) -> DVector<f64> {
        DVector::from_fn(dim, |_, _| self.standard_normal())
    }

    /// Vector of independent components uniform in [-1, 1).
    fn uniform_vector(&mut self, dim: usize) -> DVector<f64> {
        DVector::from_fn(dim, |_, _| 2.0 * self.uniform() - 1.0)
    }

    /// Coin flip that comes up true with probability `p`.
    fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Metropolis test on a log-weight change `delta`: true with probability
    /// min(1, exp(delta)). Callers pass minus the action change.
    fn accept(&mut self, delta: f64) -> bool {
        if delta >= 0.0 {
            return true;
        }
        self.uniform() < delta.exp()
    }
}
