// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Force computation
//!
//! A [`ForceField`] computes the net force on one particle from a read-only
//! snapshot of every particle. The full force pass for a tick is
//! [`ForceField::compute_forces`], which returns one [`Force`] per particle in
//! snapshot order. With the `parallel` feature the pass is split across the
//! Rayon pool; workers only read the snapshot and each writes a single output
//! slot, so the result is identical to the sequential pass.

use crate::domain::Domain;
use crate::particle::Particle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod gravity;

pub use gravity::GravityField;

/// Snapshots smaller than this are always computed sequentially
pub const PARALLEL_THRESHOLD: usize = 64;

/// 2D force vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Force {
    /// X component
    pub fx: f64,
    /// Y component
    pub fy: f64,
}

impl Force {
    /// Create a new force vector
    pub fn new(fx: f64, fy: f64) -> Self {
        Force { fx, fy }
    }

    /// Create a zero force
    pub fn zero() -> Self {
        Force::new(0.0, 0.0)
    }

    /// Check if the force is valid (all components finite)
    pub fn is_valid(&self) -> bool {
        self.fx.is_finite() && self.fy.is_finite()
    }

    /// Add another force to this one
    pub fn add(&mut self, other: &Force) {
        self.fx += other.fx;
        self.fy += other.fy;
    }

    /// Get the magnitude of the force
    pub fn magnitude(&self) -> f64 {
        (self.fx * self.fx + self.fy * self.fy).sqrt()
    }
}

/// Source of per-particle forces
pub trait ForceField: Send + Sync {
    /// Descriptive name, used in log output
    fn name(&self) -> &str;

    /// Net force on `target` from every other particle in `particles`
    ///
    /// `target` is excluded by identity, so it may or may not be an element
    /// of `particles`.
    fn force_on(&self, target: &Particle, particles: &[Particle], domain: &Domain) -> Force;

    /// Run the force pass over a whole snapshot
    fn compute_forces(&self, particles: &[Particle], domain: &Domain) -> Vec<Force> {
        #[cfg(feature = "parallel")]
        {
            if particles.len() >= PARALLEL_THRESHOLD {
                return particles
                    .par_iter()
                    .map(|p| self.force_on(p, particles, domain))
                    .collect();
            }
        }

        self.compute_forces_sequential(particles, domain)
    }

    /// Single-threaded force pass in snapshot order
    fn compute_forces_sequential(&self, particles: &[Particle], domain: &Domain) -> Vec<Force> {
        particles
            .iter()
            .map(|p| self.force_on(p, particles, domain))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_accumulation() {
        let mut total = Force::zero();
        total.add(&Force::new(3.0, 1.0));
        total.add(&Force::new(0.0, 3.0));
        assert_eq!(total, Force::new(3.0, 4.0));
        assert_eq!(total.magnitude(), 5.0);
        assert!(total.is_valid());
        assert!(!Force::new(f64::NAN, 0.0).is_valid());
    }
}
