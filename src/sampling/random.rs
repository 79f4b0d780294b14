//! Seedable random source backed by `rand`'s standard generator.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal, Uniform};

use super::traits::RandomSource;

/// Random stream owned by a single chain.
#[derive(Clone, Debug)]
pub struct ChainRng {
    rng: StdRng,
    symmetric: Uniform<f64>,
}

impl ChainRng {
    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Stream seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            symmetric: Uniform::new(-1.0, 1.0),
        }
    }
}

impl RandomSource for ChainRng {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn uniform_int(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    fn uniform_int_range(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.gen_range(lo..hi)
    }

    fn standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }

    fn gaussian_vector(&mut self, dim: usize) -> DVector<f64> {
        DVector::from_distribution(dim, &StandardNormal, &mut self.rng)
    }

    fn uniform_vector(&mut self, dim: usize) -> DVector<f64> {
        DVector::from_distribution(dim, &self.symmetric, &mut self.rng)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ChainRng::seeded(42);
        let mut b = ChainRng::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.uniform(), b.uniform());
            assert_eq!(a.gaussian_vector(3), b.gaussian_vector(3));
        }
    }

    #[test]
    fn test_ranges() {
        let mut rng = ChainRng::seeded(7);
        for _ in 0..1000 {
            assert!(rng.uniform_int(5) < 5);
            let t = rng.uniform_int_range(1, 4);
            assert!((1..4).contains(&t));
            let v = rng.uniform_vector(2);
            assert!(v.iter().all(|x| (-1.0..1.0).contains(x)));
        }
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = ChainRng::seeded(3);
        let n = 200_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.standard_normal()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 0.02);
        assert_relative_eq!(var, 1.0, epsilon = 0.02);
    }

    #[test]
    fn test_accept_frequency_follows_exp() {
        let mut rng = ChainRng::seeded(11);
        let trials = 200_000;
        for &delta in &[-2.0, -0.5, -0.1] {
            let hits = (0..trials).filter(|_| rng.accept(delta)).count();
            let freq = hits as f64 / trials as f64;
            let expected: f64 = f64::exp(delta);
            assert_relative_eq!(freq, expected, epsilon = 0.01);
        }
        assert!((0..1000).all(|_| rng.accept(0.0)));
        assert!((0..1000).all(|_| rng.accept(3.0)));
    }

    #[test]
    fn test_bernoulli_frequency() {
        let mut rng = ChainRng::seeded(5);
        let trials = 100_000;
        let hits = (0..trials).filter(|_| rng.bernoulli(0.3)).count();
        assert_relative_eq!(hits as f64 / trials as f64, 0.3, epsilon = 0.01);
    }
}
