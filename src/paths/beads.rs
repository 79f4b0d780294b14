//! Storage for imaginary-time worldlines.

use nalgebra::{DMatrix, DVector};

/// Bead coordinates for every particle: `n_part` rings of `n_slice` beads,
/// each bead a `dim`-dimensional position.
///
/// Ring `p` is a `dim × n_slice` matrix whose column `t` is the bead at slice
/// `t`. All accessors index through nalgebra, so an out-of-range particle,
/// slice or dimension panics instead of touching the wrong bead.
#[derive(Clone, Debug, PartialEq)]
pub struct BeadArray {
    rings: Vec<DMatrix<f64>>,
    n_slice: usize,
    dim: usize,
}

impl BeadArray {
    /// Build rings that each collapse to a single point: every slice of
    /// particle `p` sits at `positions[p]`.
    pub fn from_points(positions: &[DVector<f64>], n_slice: usize) -> Self {
        let dim = positions.first().map_or(0, |r| r.len());
        let rings = positions
            .iter()
            .map(|r| {
                assert_eq!(r.len(), dim, "all initial positions must share one dimension");
                DMatrix::from_fn(dim, n_slice, |d, _| r[d])
            })
            .collect();
        Self { rings, n_slice, dim }
    }

    pub fn n_part(&self) -> usize {
        self.rings.len()
    }

    pub fn n_slice(&self) -> usize {
        self.n_slice
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Copy of the bead of particle `p` at slice `t`.
    pub fn bead(&self, p: usize, t: usize) -> DVector<f64> {
        self.rings[p].column(t).clone_owned()
    }

    /// Single coordinate of a bead.
    pub fn coord(&self, p: usize, t: usize, d: usize) -> f64 {
        self.rings[p][(d, t)]
    }

    /// Euclidean distance between bead `(p, t)` and the point `r`.
    pub fn distance_to(&self, p: usize, t: usize, r: &DVector<f64>) -> f64 {
        assert_eq!(r.len(), self.dim);
        self.rings[p]
            .column(t)
            .iter()
            .zip(r.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    pub fn set(&mut self, p: usize, t: usize, r: &DVector<f64>) {
        self.rings[p].set_column(t, r);
    }

    pub fn add(&mut self, p: usize, t: usize, dr: &DVector<f64>) {
        let mut bead = self.rings[p].column_mut(t);
        bead += dr;
    }

    /// Add `dr` to every bead of ring `p`.
    pub fn add_to_ring(&mut self, p: usize, dr: &DVector<f64>) {
        for mut bead in self.rings[p].column_iter_mut() {
            bead += dr;
        }
    }

    /// Read-only view of one ring (columns are slices).
    pub fn ring(&self, p: usize) -> &DMatrix<f64> {
        &self.rings[p]
    }
}
