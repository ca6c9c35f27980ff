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
//! Numerical integration and boundary handling
//!
//! An [`Integrator`] takes one particle and the force computed for it during
//! the force pass, updates the particle's velocity in place and proposes its
//! next position. The proposal is then run through the domain's boundary
//! policy. The integrator never writes the particle's position: the
//! [`World`](crate::world::World) commits positions only once every force of
//! the tick has been computed from the prior snapshot.
//!
//! # Timestep Guidelines
//!
//! The default configuration uses a very large timestep (40000) together with
//! the real gravitational constant and pixel-scale distances. Timesteps only
//! have to be positive and finite; `validate_timestep` reports values that
//! are likely to lose precision.

use crate::domain::Domain;
use crate::error::{Result, SimError};
use crate::forces::Force;
use crate::particle::{Particle, Position};

mod half_step;

pub use half_step::HalfStepEuler;

/// Outcome of advancing one particle by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// The proposed position is inside the domain
    Moved(Position),
    /// The proposed position crossed an edge and was snapped to the opposite one
    Wrapped(Position),
    /// The velocity was reflected; the position is committed unchanged even
    /// though it lies outside the domain
    Bounced(Position),
    /// The particle left the domain and must be dropped
    Removed,
}

impl Advance {
    /// Position to commit, if the particle survives
    pub fn position(&self) -> Option<Position> {
        match *self {
            Advance::Moved(p) | Advance::Wrapped(p) | Advance::Bounced(p) => Some(p),
            Advance::Removed => None,
        }
    }
}

/// Trait for numerical integration methods
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator
    fn timestep(&self) -> f64;

    /// Set the timestep for this integrator
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    fn set_timestep(&mut self, dt: f64);

    /// Check the timestep for likely numerical trouble
    ///
    /// Returns `SimError::InvalidConfig` describing the problem. Extremely
    /// small timesteps are flagged for precision loss.
    fn validate_timestep(&self) -> Result<()> {
        let dt = self.timestep();

        if dt <= 0.0 || !dt.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "invalid timestep {dt}: must be positive and finite"
            )));
        }

        if dt < 1e-9 {
            return Err(SimError::InvalidConfig(format!(
                "timestep {dt} is extremely small and may cause precision loss with f64"
            )));
        }

        Ok(())
    }

    /// Update the particle's velocity from `force` and propose its next position
    fn advance(&self, particle: &mut Particle, force: Force, domain: &Domain) -> Advance;
}

/// Panic unless `dt` is usable as a timestep
pub(crate) fn assert_timestep(dt: f64) {
    assert!(dt > 0.0 && dt.is_finite(), "Timestep must be positive and finite");
}
