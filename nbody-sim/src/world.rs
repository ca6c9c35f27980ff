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
//! World management
//!
//! The World owns the particle collection and runs the simulation tick:
//!
//! 1. **Force pass**: the force field computes one force per particle from the
//!    unmodified prior-tick snapshot
//! 2. **Integration pass**: each particle's velocity is updated and a new
//!    position proposed, subject to the boundary policy
//! 3. **Commit pass**: survivors are moved into a fresh collection with their
//!    new positions
//!
//! Removing particles never disturbs iteration because survivors are
//! collected into a new vector rather than removed in place.

use crate::config::SimulationConfig;
use crate::domain::{BoundaryMode, Domain};
use crate::error::{Result, SimError};
use crate::forces::{ForceField, GravityField};
use crate::integration::{Advance, HalfStepEuler, Integrator};
use crate::particle::{Color, Mass, Particle, ParticleId, ParticleView, Position, Velocity};
use log::{debug, error, info, warn};

/// Per-tick summary returned by [`World::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Particles that stayed inside the domain
    pub moved: usize,
    /// Particles snapped to the opposite edge
    pub wrapped: usize,
    /// Particles whose velocity was reflected
    pub bounced: usize,
    /// Particles deleted for leaving the domain
    pub removed: usize,
}

impl StepReport {
    /// Number of particles still in the world after the step
    pub fn survivors(&self) -> usize {
        self.moved + self.wrapped + self.bounced
    }
}

/// The particle container and tick driver
///
/// # Example
///
/// ```
/// use nbody_sim::domain::{BoundaryMode, Domain};
/// use nbody_sim::forces::GravityField;
/// use nbody_sim::integration::HalfStepEuler;
/// use nbody_sim::particle::{Color, Position};
/// use nbody_sim::World;
///
/// let domain = Domain::new(900.0, 900.0, BoundaryMode::Wrap);
/// let mut world = World::with_parts(domain, GravityField::new(1.0), HalfStepEuler::new(1.0));
/// world.spawn(Position::new(450.0, 450.0), 0.0, 0.0, 9.0, Color::YELLOW).unwrap();
///
/// let report = world.step();
/// assert_eq!(report.survivors(), 1);
/// ```
pub struct World<F = GravityField, I = HalfStepEuler> {
    domain: Domain,
    field: F,
    integrator: I,
    particles: Vec<Particle>,
    next_particle_id: u64,
}

impl World {
    /// Build a world with gravity and the half-step integrator from a configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let integrator = HalfStepEuler::try_new(config.time_step)?;
        if let Err(e) = integrator.validate_timestep() {
            warn!("Suspicious configuration: {}", e);
        }
        Ok(World::with_parts(
            config.domain()?,
            GravityField::try_new(config.gravitational_constant)?,
            integrator,
        ))
    }
}

impl<F: ForceField, I: Integrator> World<F, I> {
    /// Create an empty world from its parts
    pub fn with_parts(domain: Domain, field: F, integrator: I) -> Self {
        World {
            domain,
            field,
            integrator,
            particles: Vec::new(),
            next_particle_id: 0,
        }
    }

    /// Spawn a particle moving at `speed` along `angle` (radians)
    ///
    /// Fails only if the particle data itself is invalid: non-positive or
    /// non-finite mass, or a non-finite position or velocity.
    pub fn spawn(
        &mut self,
        position: Position,
        speed: f64,
        angle: f64,
        mass: f64,
        color: Color,
    ) -> Result<ParticleId> {
        self.insert(position, Velocity::from_polar(speed, angle), mass, color)
    }

    /// Spawn a particle with a Cartesian velocity
    pub fn insert(
        &mut self,
        position: Position,
        velocity: Velocity,
        mass: f64,
        color: Color,
    ) -> Result<ParticleId> {
        let mass = Mass::try_new(mass)?;
        let id = ParticleId::new(self.next_particle_id);
        let particle = Particle::new(id, position, velocity, mass, color)?;

        self.next_particle_id += 1;
        self.particles.push(particle);
        Ok(id)
    }

    /// Remove every particle
    pub fn clear(&mut self) {
        if !self.particles.is_empty() {
            info!("Clearing {} particles", self.particles.len());
        }
        self.particles.clear();
        self.next_particle_id = 0;
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> StepReport {
        let forces = self.field.compute_forces(&self.particles, &self.domain);
        debug_assert_eq!(forces.len(), self.particles.len());
        let snapshot = std::mem::take(&mut self.particles);

        let mut report = StepReport::default();
        let mut survivors = Vec::with_capacity(snapshot.len());

        // `forces` was computed before any position changed
        for (mut particle, force) in snapshot.into_iter().zip(forces) {
            let outcome = self.integrator.advance(&mut particle, force, &self.domain);
            match outcome {
                Advance::Moved(_) => report.moved += 1,
                Advance::Wrapped(_) => report.wrapped += 1,
                Advance::Bounced(_) => report.bounced += 1,
                Advance::Removed => report.removed += 1,
            }
            if let Some(position) = outcome.position() {
                particle.set_position(position);
                survivors.push(particle);
            }
        }

        self.particles = survivors;

        if report.removed > 0 {
            debug!(
                "{} particles left the domain, {} remain",
                report.removed,
                self.particles.len()
            );
        }
        if let Err(e) = self.check_invariants() {
            error!("Invariant violated after {} step: {}", self.integrator.name(), e);
        }

        report
    }

    /// All particles in spawn order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Look up a particle by identity
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id() == id)
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the world has no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only drawing snapshot of every particle
    pub fn views(&self) -> Vec<ParticleView> {
        self.particles.iter().map(Particle::view).collect()
    }

    /// Current domain
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Change the domain extent; particles are left where they are
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.domain.resize(width, height)?;
        info!("Domain resized to {}x{}", width, height);
        Ok(())
    }

    /// Replace the boundary policy
    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) -> Result<()> {
        self.domain.set_boundary(mode)
    }

    /// The force field in use
    pub fn field(&self) -> &F {
        &self.field
    }

    /// The integrator in use
    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Mutable access to the integrator, e.g. to change the timestep
    pub fn integrator_mut(&mut self) -> &mut I {
        &mut self.integrator
    }

    /// Sum of `0.5 * m * v²` over all particles
    pub fn total_kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Fail on the first particle with a NaN or infinite position or velocity
    pub fn check_invariants(&self) -> Result<()> {
        match self.particles.iter().find(|p| !p.is_finite()) {
            Some(p) => Err(SimError::NonFiniteState { id: p.id() }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::Force;

    struct ConstantForce(Force);

    impl ForceField for ConstantForce {
        fn name(&self) -> &str {
            "constant"
        }

        fn force_on(&self, _target: &Particle, _particles: &[Particle], _domain: &Domain) -> Force {
            self.0
        }
    }

    fn world(mode: BoundaryMode) -> World {
        World::with_parts(
            Domain::new(100.0, 100.0, mode),
            GravityField::new(1.0),
            HalfStepEuler::new(1.0),
        )
    }

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let mut world = world(BoundaryMode::Delete);
        let a = world.spawn(Position::new(1.0, 1.0), 0.0, 0.0, 1.0, Color::RED).unwrap();
        let b = world.spawn(Position::new(2.0, 2.0), 0.0, 0.0, 1.0, Color::RED).unwrap();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(world.len(), 2);
        assert_eq!(world.get(b).unwrap().position(), Position::new(2.0, 2.0));
    }

    #[test]
    fn test_spawn_decomposes_velocity() {
        let mut world = world(BoundaryMode::Delete);
        let id = world
            .spawn(Position::new(1.0, 1.0), 2.0, std::f64::consts::PI, 1.0, Color::RED)
            .unwrap();
        let vel = world.get(id).unwrap().velocity();
        assert!((vel.dx() + 2.0).abs() < 1e-12);
        assert!(vel.dy().abs() < 1e-12);
    }

    #[test]
    fn test_spawn_rejects_invalid_mass() {
        let mut world = world(BoundaryMode::Delete);
        let result = world.spawn(Position::new(1.0, 1.0), 0.0, 0.0, 0.0, Color::RED);
        assert!(matches!(result, Err(SimError::InvalidParticle { .. })));
        let result = world.insert(Position::new(1.0, 1.0), Velocity::zero(), -4.0, Color::RED);
        assert!(matches!(result, Err(SimError::InvalidParticle { .. })));
        assert!(world.is_empty());

        // a rejected spawn does not burn an id
        let id = world.spawn(Position::new(1.0, 1.0), 0.0, 0.0, 1.0, Color::RED).unwrap();
        assert_eq!(id.raw(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut world = world(BoundaryMode::Wrap);
        world.clear();
        assert!(world.is_empty());

        world.spawn(Position::new(1.0, 1.0), 0.0, 0.0, 1.0, Color::RED).unwrap();
        world.clear();
        world.clear();
        assert_eq!(world.len(), 0);
        assert_eq!(world.step(), StepReport::default());
    }

    #[test]
    fn test_step_with_custom_field() {
        let mut world = World::with_parts(
            Domain::new(100.0, 100.0, BoundaryMode::Delete),
            ConstantForce(Force::new(2.0, 0.0)),
            HalfStepEuler::new(1.0),
        );
        let id = world.insert(Position::new(10.0, 10.0), Velocity::zero(), 1.0, Color::RED).unwrap();

        let report = world.step();
        assert_eq!(report.moved, 1);
        let p = world.get(id).unwrap();
        assert_eq!(p.velocity(), Velocity::new(1.0, 0.0));
        assert_eq!(p.position(), Position::new(11.0, 10.0));
    }

    #[test]
    fn test_step_report_counts() {
        let mut world = World::with_parts(
            Domain::new(100.0, 100.0, BoundaryMode::Delete),
            ConstantForce(Force::zero()),
            HalfStepEuler::new(1.0),
        );
        world.insert(Position::new(50.0, 50.0), Velocity::zero(), 1.0, Color::RED).unwrap();
        world.insert(Position::new(99.0, 50.0), Velocity::new(5.0, 0.0), 1.0, Color::RED).unwrap();

        let report = world.step();
        assert_eq!(report, StepReport { moved: 1, wrapped: 0, bounced: 0, removed: 1 });
        assert_eq!(report.survivors(), world.len());
    }

    #[test]
    fn test_views_expose_draw_state() {
        let mut world = world(BoundaryMode::Wrap);
        world.spawn(Position::new(3.0, 4.0), 0.0, 0.0, 25.0, Color::GREEN).unwrap();
        let views = world.views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].position, Position::new(3.0, 4.0));
        assert_eq!(views[0].size, 5.0);
        assert_eq!(views[0].color, Color::GREEN);
    }

    #[test]
    fn test_resize_and_boundary_mode() {
        let mut world = world(BoundaryMode::Wrap);
        world.resize(640.0, 480.0).unwrap();
        assert_eq!(world.domain().width(), 640.0);
        assert!(world.resize(0.0, 480.0).is_err());

        world.set_boundary_mode(BoundaryMode::Bounce { softness: 2.0 }).unwrap();
        assert_eq!(world.domain().boundary(), BoundaryMode::Bounce { softness: 2.0 });
        assert!(world.set_boundary_mode(BoundaryMode::Bounce { softness: -1.0 }).is_err());
    }

    #[test]
    fn test_check_invariants() {
        let mut world = world(BoundaryMode::Delete);
        world.spawn(Position::new(3.0, 4.0), 1.0, 0.0, 1.0, Color::GREEN).unwrap();
        assert!(world.check_invariants().is_ok());
        assert!((world.total_kinetic_energy() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_timestep_still_builds() {
        let config = SimulationConfig {
            time_step: 1e-12,
            populate_at_start: false,
            ..SimulationConfig::default()
        };
        let world = World::from_config(&config).unwrap();
        assert_eq!(world.integrator().timestep(), 1e-12);
        assert!(world.integrator().validate_timestep().is_err());
    }

    struct ShortField;

    impl ForceField for ShortField {
        fn name(&self) -> &str {
            "short"
        }

        fn force_on(&self, _target: &Particle, _particles: &[Particle], _domain: &Domain) -> Force {
            Force::zero()
        }

        fn compute_forces(&self, _particles: &[Particle], _domain: &Domain) -> Vec<Force> {
            Vec::new()
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_step_rejects_short_force_pass() {
        let mut world = World::with_parts(
            Domain::new(100.0, 100.0, BoundaryMode::Delete),
            ShortField,
            HalfStepEuler::new(1.0),
        );
        world.spawn(Position::new(3.0, 4.0), 0.0, 0.0, 1.0, Color::GREEN).unwrap();
        world.step();
    }
}
