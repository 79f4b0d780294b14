//! The path configuration: bead rings plus the per-particle constants and
//! move bookkeeping the Monte Carlo kernels need.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::beads::BeadArray;
use crate::error::{PimcError, Result};

/// Boltzmann constant in natural units.
pub const K_B: f64 = 1.0;
/// Reduced Planck constant in natural units.
pub const HBAR: f64 = 1.0;

/// Physical description of the system, as read from the config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathConfig {
    /// Temperature T (k_B = 1)
    pub temperature: f64,
    /// Number of imaginary-time slices per ring
    pub n_slice: usize,
    /// Particle masses
    pub masses: Vec<f64>,
    /// Interaction length scale of each particle
    pub sigma: Vec<f64>,
    /// Interaction energy scale of each particle
    pub eps: Vec<f64>,
    /// Initial position of each particle; every bead of its ring starts here
    pub positions: Vec<Vec<f64>>,
}

impl PathConfig {
    /// Check the record before any state is built.
    pub fn validate(&self) -> Result<()> {
        if !(self.temperature > 0.0 && self.temperature.is_finite()) {
            return Err(PimcError::invalid(
                "temperature",
                format!("must be positive and finite, got {}", self.temperature),
            ));
        }
        if self.n_slice < 2 {
            return Err(PimcError::invalid(
                "n_slice",
                format!("need at least 2 slices, got {}", self.n_slice),
            ));
        }

        let n_part = self.positions.len();
        if n_part == 0 {
            return Err(PimcError::invalid("positions", "no particles given"));
        }
        for (name, found) in [
            ("masses", self.masses.len()),
            ("sigma", self.sigma.len()),
            ("eps", self.eps.len()),
        ] {
            if found != n_part {
                return Err(PimcError::LengthMismatch { name, expected: n_part, found });
            }
        }

        let dim = self.positions[0].len();
        if dim == 0 {
            return Err(PimcError::invalid("positions", "zero spatial dimensions"));
        }
        if let Some(bad) = self.positions.iter().find(|r| r.len() != dim) {
            return Err(PimcError::LengthMismatch {
                name: "positions",
                expected: dim,
                found: bad.len(),
            });
        }

        if let Some(m) = self.masses.iter().find(|&&m| !(m > 0.0 && m.is_finite())) {
            return Err(PimcError::invalid("masses", format!("must be positive, got {}", m)));
        }
        if let Some(s) = self.sigma.iter().find(|&&s| !(s > 0.0 && s.is_finite())) {
            return Err(PimcError::invalid("sigma", format!("must be positive, got {}", s)));
        }
        // eps = 0 switches the interaction off, which is allowed
        if let Some(e) = self.eps.iter().find(|&&e| !(e >= 0.0 && e.is_finite())) {
            return Err(PimcError::invalid("eps", format!("must be non-negative, got {}", e)));
        }
        Ok(())
    }
}

/// Rescale physical masses into the kinetic-action weight m k_B T M / (2ħ²).
pub fn rescale_masses(temperature: f64, n_slice: usize, masses: &[f64]) -> Vec<f64> {
    let alpha = HBAR * HBAR;
    masses
        .iter()
        .map(|m| m * K_B * temperature * n_slice as f64 / (2.0 * alpha))
        .collect()
}

/// Rescale interaction strengths into per-slice action units E / (k_B T M).
pub fn rescale_eps(temperature: f64, n_slice: usize, eps: &[f64]) -> Vec<f64> {
    eps.iter()
        .map(|e| e / (K_B * temperature * n_slice as f64))
        .collect()
}

/// One pre-move bead value held for rollback.
#[derive(Clone, Debug)]
struct Snapshot {
    particle: usize,
    slice: usize,
    bead: DVector<f64>,
}

/// Mutable state of one Markov chain.
///
/// Owns the bead rings exclusively. Callers get copies of beads and go
/// through the mutators below; the raw storage is never exposed mutably.
#[derive(Clone, Debug)]
pub struct PathState {
    pub(super) beads: BeadArray,
    temperature: f64,
    masses: Vec<f64>,
    sigma: Vec<f64>,
    eps: Vec<f64>,
    busy: Vec<bool>,
    rollback: Vec<Snapshot>,
    l_max: usize,
    clip_size: usize,
    t0_max: usize,
}

impl PathState {
    /// Validate `config` and build the initial, point-like rings.
    pub fn new(config: &PathConfig) -> Result<Self> {
        config.validate()?;

        let n_slice = config.n_slice;
        let points: Vec<DVector<f64>> = config
            .positions
            .iter()
            .map(|r| DVector::from_column_slice(r))
            .collect();
        let beads = BeadArray::from_points(&points, n_slice);

        let l_max = (n_slice - 1).ilog2() as usize;
        let clip_size = (1usize << l_max) + 1;
        debug_assert!(clip_size <= n_slice);

        Ok(Self {
            temperature: config.temperature,
            masses: rescale_masses(config.temperature, n_slice, &config.masses),
            sigma: config.sigma.clone(),
            eps: rescale_eps(config.temperature, n_slice, &config.eps),
            busy: vec![false; beads.n_part()],
            rollback: Vec::new(),
            l_max,
            clip_size,
            t0_max: n_slice - clip_size,
            beads,
        })
    }

    pub fn n_part(&self) -> usize {
        self.beads.n_part()
    }

    pub fn n_slice(&self) -> usize {
        self.beads.n_slice()
    }

    pub fn dim(&self) -> usize {
        self.beads.dim()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Rescaled mass of particle `p`.
    pub fn mass(&self, p: usize) -> f64 {
        self.masses[p]
    }

    pub fn sigma(&self, p: usize) -> f64 {
        self.sigma[p]
    }

    /// Rescaled interaction strength of particle `p`.
    pub fn eps(&self, p: usize) -> f64 {
        self.eps[p]
    }

    /// Deepest bisection level, floor(log2(n_slice - 1)).
    pub fn l_max(&self) -> usize {
        self.l_max
    }

    /// Slices spanned by one bisection, 2^l_max + 1.
    pub fn clip_size(&self) -> usize {
        self.clip_size
    }

    /// Largest valid bisection origin.
    pub fn t0_max(&self) -> usize {
        self.t0_max
    }

    pub fn beads(&self) -> &BeadArray {
        &self.beads
    }

    pub fn bead(&self, p: usize, t: usize) -> DVector<f64> {
        self.beads.bead(p, t)
    }

    pub fn set_bead(&mut self, p: usize, t: usize, r: &DVector<f64>) {
        self.beads.set(p, t, r);
    }

    pub fn move_bead(&mut self, p: usize, t: usize, dr: &DVector<f64>) {
        self.beads.add(p, t, dr);
    }

    /// Rigid translation of the whole ring.
    pub fn move_particle(&mut self, p: usize, dr: &DVector<f64>) {
        self.beads.add_to_ring(p, dr);
    }

    /// Mark a batch of particles as being moved.
    pub fn start_move(&mut self, particles: &[usize]) {
        for &p in particles {
            self.busy[p] = true;
        }
    }

    /// Clear the busy flags set by the matching `start_move`.
    pub fn end_move(&mut self, particles: &[usize]) {
        for &p in particles {
            self.busy[p] = false;
        }
    }

    pub fn is_busy(&self, p: usize) -> bool {
        self.busy[p]
    }

    /// True when no move is in flight.
    pub fn all_idle(&self) -> bool {
        self.busy.iter().all(|&b| !b)
    }

    /// Drop any stale snapshots and make room for `capacity` new ones.
    pub(crate) fn begin_rollback(&mut self, capacity: usize) {
        self.rollback.clear();
        self.rollback.reserve(capacity);
    }

    /// Remember the current value of bead `(p, t)`.
    pub(crate) fn snapshot_bead(&mut self, p: usize, t: usize) {
        let bead = self.beads.bead(p, t);
        self.rollback.push(Snapshot { particle: p, slice: t, bead });
    }

    /// Put back every bead snapshotted since `begin_rollback`, newest first.
    pub(crate) fn rollback(&mut self) {
        while let Some(snap) = self.rollback.pop() {
            self.beads.set(snap.particle, snap.slice, &snap.bead);
        }
    }

    /// Forget the snapshots after a committed move.
    pub(crate) fn discard_rollback(&mut self) {
        self.rollback.clear();
    }

    #[cfg(test)]
    pub(crate) fn rollback_len(&self) -> usize {
        self.rollback.len()
    }
}
