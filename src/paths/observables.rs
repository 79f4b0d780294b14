//! Read-only ring diagnostics. Nothing here feeds back into sampling.

use nalgebra::DVector;

use super::state::PathState;

impl PathState {
    /// Imaginary-time centroid of ring `p`.
    pub fn centroid(&self, p: usize) -> DVector<f64> {
        self.beads.ring(p).column_mean()
    }

    /// Mean squared distance of the beads of ring `p` from its centroid.
    pub fn spread(&self, p: usize) -> f64 {
        let mean = self.centroid(p);
        let ring = self.beads.ring(p);
        ring.column_iter()
            .map(|bead| (bead - &mean).norm_squared())
            .sum::<f64>()
            / self.n_slice() as f64
    }

    /// Spread averaged over all particles.
    pub fn mean_spread(&self) -> f64 {
        (0..self.n_part()).map(|p| self.spread(p)).sum::<f64>() / self.n_part() as f64
    }
}

#[cfg(test)]
mod tests {
    use crate::paths::{PathConfig, PathState};
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn one_ring() -> PathState {
        let config = PathConfig {
            temperature: 2.0,
            n_slice: 4,
            masses: vec![1.0],
            sigma: vec![1.0],
            eps: vec![0.0],
            positions: vec![vec![1.0, -1.0, 0.0]],
        };
        PathState::new(&config).unwrap()
    }

    #[test]
    fn test_point_ring_has_zero_spread() {
        let state = one_ring();
        assert_eq!(state.centroid(0), DVector::from_vec(vec![1.0, -1.0, 0.0]));
        assert_eq!(state.spread(0), 0.0);
    }

    #[test]
    fn test_centroid_and_spread() {
        let mut state = one_ring();
        state.set_bead(0, 0, &DVector::from_vec(vec![0.0, 0.0, 0.0]));
        state.set_bead(0, 1, &DVector::from_vec(vec![2.0, 0.0, 0.0]));
        state.set_bead(0, 2, &DVector::from_vec(vec![0.0, 2.0, 0.0]));
        state.set_bead(0, 3, &DVector::from_vec(vec![2.0, 2.0, 0.0]));
        let c = state.centroid(0);
        assert_relative_eq!(c[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(c[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(c[2], 0.0, epsilon = 1e-12);
        // every corner sits at squared distance 2 from the centre
        assert_relative_eq!(state.spread(0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(state.mean_spread(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rigid_move_shifts_centroid_only() {
        let mut state = one_ring();
        state.set_bead(0, 2, &DVector::from_vec(vec![3.0, 1.0, -2.0]));
        let spread = state.spread(0);
        let centroid = state.centroid(0);
        let dr = DVector::from_vec(vec![0.5, 0.25, -1.0]);
        state.move_particle(0, &dr);
        assert_relative_eq!(state.spread(0), spread, epsilon = 1e-12);
        assert_relative_eq!((state.centroid(0) - centroid - dr).norm(), 0.0, epsilon = 1e-12);
    }
}
