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
//! Particle state
//!
//! A particle is a point mass carrying its own position, velocity, mass and
//! display color. Each particle has a stable [`ParticleId`] handed out by the
//! [`World`](crate::world::World); identity, not coordinates, is what the
//! force pass uses to exclude self-interaction, so two distinct particles may
//! share a position without being confused for one another.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

impl ParticleId {
    /// Create a new ParticleId from a raw u64 value
    pub fn new(id: u64) -> Self {
        ParticleId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Particle({})", self.0)
    }
}

/// 2D position with double-precision coordinates
///
/// # Examples
///
/// ```
/// use nbody_sim::particle::Position;
///
/// let pos = Position::new(1.0, 2.0);
/// assert_eq!(pos.x(), 1.0);
/// assert!(pos.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Create a new position with the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Get the x coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get the y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Check if both coordinates are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 2D velocity in domain units per time unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    dx: f64,
    dy: f64,
}

impl Velocity {
    /// Create a new velocity with the given components
    pub fn new(dx: f64, dy: f64) -> Self {
        Velocity { dx, dy }
    }

    /// Create a zero velocity (at rest)
    pub fn zero() -> Self {
        Velocity::new(0.0, 0.0)
    }

    /// Decompose a speed and heading (radians) into components
    ///
    /// ```
    /// use nbody_sim::particle::Velocity;
    ///
    /// let vel = Velocity::from_polar(2.0, 0.0);
    /// assert_eq!(vel.dx(), 2.0);
    /// assert_eq!(vel.dy(), 0.0);
    /// ```
    pub fn from_polar(speed: f64, angle: f64) -> Self {
        Velocity::new(speed * angle.cos(), speed * angle.sin())
    }

    /// Get the x component
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Get the y component
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Set the x component
    pub fn set_dx(&mut self, dx: f64) {
        self.dx = dx;
    }

    /// Set the y component
    pub fn set_dy(&mut self, dy: f64) {
        self.dy = dy;
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }

    /// Calculate the magnitude (speed) of the velocity vector
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// Strictly positive particle mass
///
/// Mass determines both gravitational weight and the particle radius
/// (`size = sqrt(mass)`). Zero mass would make integration divide by zero,
/// so it cannot be constructed.
///
/// ```
/// use nbody_sim::particle::Mass;
///
/// let mass = Mass::try_new(9.0).unwrap();
/// assert_eq!(mass.size(), 3.0);
/// assert!(Mass::try_new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    value: f64,
}

impl Mass {
    /// Create a mass, panicking on non-positive or non-finite values
    ///
    /// # Panics
    ///
    /// Panics if the mass is not strictly positive and finite. Use `try_new`
    /// for fallible construction.
    pub fn new(value: f64) -> Self {
        assert!(value > 0.0 && value.is_finite(), "Mass must be positive and finite");
        Mass { value }
    }

    /// Try to create a mass
    ///
    /// Returns `SimError::InvalidParticle` if the value is not strictly
    /// positive and finite.
    pub fn try_new(value: f64) -> Result<Self> {
        if value > 0.0 && value.is_finite() {
            Ok(Mass { value })
        } else {
            Err(SimError::invalid_particle(format!(
                "mass must be positive and finite, got {value}"
            )))
        }
    }

    /// Get the mass value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Radius used for overlap checks and drawing
    pub fn size(&self) -> f64 {
        self.value.sqrt()
    }
}

/// RGB display color; has no effect on physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Off-white used by the default palette
    pub const WHITE: Color = Color(225, 225, 225);
    /// Pure green
    pub const GREEN: Color = Color(0, 255, 0);
    /// Pure red
    pub const RED: Color = Color(255, 0, 0);
    /// Yellow, the default fixed particle color
    pub const YELLOW: Color = Color(255, 255, 0);
    /// Pure blue
    pub const BLUE: Color = Color(0, 0, 255);
}

/// A point mass in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: ParticleId,
    position: Position,
    velocity: Velocity,
    mass: Mass,
    color: Color,
}

impl Particle {
    /// Create a particle, rejecting non-finite position or velocity
    pub fn new(
        id: ParticleId,
        position: Position,
        velocity: Velocity,
        mass: Mass,
        color: Color,
    ) -> Result<Self> {
        if !position.is_valid() {
            return Err(SimError::invalid_particle(format!(
                "position must be finite, got {position:?}"
            )));
        }
        if !velocity.is_valid() {
            return Err(SimError::invalid_particle(format!(
                "velocity must be finite, got {velocity:?}"
            )));
        }
        Ok(Particle {
            id,
            position,
            velocity,
            mass,
            color,
        })
    }

    /// Stable identifier
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Current (committed) position
    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Current velocity
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Mutable access to the velocity, used by integrators
    pub fn velocity_mut(&mut self) -> &mut Velocity {
        &mut self.velocity
    }

    /// Particle mass
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// Radius, `sqrt(mass)`
    pub fn size(&self) -> f64 {
        self.mass.size()
    }

    /// Display color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Kinetic energy, `0.5 * m * v²`
    pub fn kinetic_energy(&self) -> f64 {
        let v = self.velocity.magnitude();
        0.5 * self.mass.value() * v * v
    }

    /// Whether position and velocity are both finite
    pub fn is_finite(&self) -> bool {
        self.position.is_valid() && self.velocity.is_valid()
    }

    /// Read-only drawing snapshot
    pub fn view(&self) -> ParticleView {
        ParticleView {
            position: self.position,
            size: self.size(),
            color: self.color,
        }
    }
}

/// What a renderer is allowed to see of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// Center of the particle
    pub position: Position,
    /// Radius / draw size
    pub size: f64,
    /// Draw color
    pub color: Color,
}
