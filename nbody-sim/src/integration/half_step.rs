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
//! Half-step semi-implicit Euler
//!
//! ```text
//! v(t + dt) = v(t) + (dt / 2) * F(t) / m
//! x(t + dt) = x(t) + v(t + dt) * dt
//! ```
//!
//! Only half of the acceleration is applied each tick and no second half-step
//! follows, so this is a damped Euler step rather than leapfrog.

use super::{assert_timestep, Advance, Integrator};
use crate::domain::{BoundaryMode, Domain, Edge};
use crate::error::{Result, SimError};
use crate::forces::Force;
use crate::particle::{Particle, Position};

/// Half-step semi-implicit Euler integrator
///
/// # Example
///
/// ```
/// use nbody_sim::integration::{HalfStepEuler, Integrator};
///
/// let integrator = HalfStepEuler::new(40_000.0);
/// assert_eq!(integrator.timestep(), 40_000.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HalfStepEuler {
    timestep: f64,
}

impl HalfStepEuler {
    /// Create a new integrator with the given timestep
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    pub fn new(timestep: f64) -> Self {
        assert_timestep(timestep);
        HalfStepEuler { timestep }
    }

    /// Fallible counterpart of [`HalfStepEuler::new`]
    pub fn try_new(timestep: f64) -> Result<Self> {
        if timestep > 0.0 && timestep.is_finite() {
            Ok(HalfStepEuler { timestep })
        } else {
            Err(SimError::InvalidConfig(format!(
                "timestep must be positive and finite, got {timestep}"
            )))
        }
    }
}

impl Integrator for HalfStepEuler {
    fn name(&self) -> &str {
        "Half-step Euler"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) {
        assert_timestep(dt);
        self.timestep = dt;
    }

    fn advance(&self, particle: &mut Particle, force: Force, domain: &Domain) -> Advance {
        let dt = self.timestep;
        let mass = particle.mass().value();
        let pos = particle.position();

        let vel = particle.velocity_mut();
        vel.set_dx(vel.dx() + (dt / 2.0) * (force.fx / mass));
        vel.set_dy(vel.dy() + (dt / 2.0) * (force.fy / mass));

        let proposed = Position::new(pos.x() + vel.dx() * dt, pos.y() + vel.dy() * dt);

        let edge = match domain.crossed_edge(proposed) {
            Some(edge) => edge,
            None => return Advance::Moved(proposed),
        };

        match domain.boundary() {
            BoundaryMode::Wrap => Advance::Wrapped(domain.wrap(proposed, edge)),
            BoundaryMode::Bounce { softness } => {
                match edge {
                    Edge::Left | Edge::Right => vel.set_dx(vel.dx() * (-1.0 / softness)),
                    Edge::Top | Edge::Bottom => vel.set_dy(vel.dy() * (-1.0 / softness)),
                }
                Advance::Bounced(proposed)
            }
            BoundaryMode::Delete => Advance::Removed,
        }
    }
}
