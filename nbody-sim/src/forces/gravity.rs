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
//! Pairwise Newtonian gravity with overlap dampening and torus mirroring
//!
//! # Force law
//!
//! For a target particle `i` and every other particle `j`:
//!
//! ```text
//! F = G * (m_j * m_i / r²)        θ = atan2(dy, dx)
//! ```
//!
//! with `(dx, dy)` the separation from `i` to `j`. The contribution is
//! accumulated as `(F cos θ, F sin θ)`. No softening is applied; instead:
//!
//! - coincident pairs (`dx == 0 && dy == 0`) contribute nothing at all
//! - a zero `dx` is replaced by [`SEPARATION_NUDGE`]
//!
//! # Overlap dampening
//!
//! When the separation is smaller than the sum of the two radii the pair is
//! considered overlapping and the attraction is turned into a weak repulsion:
//! a force above the rule's threshold is first divided by the rule's divisor,
//! then negated and divided by 8. The direct image uses [`DIRECT_OVERLAP`]
//! (threshold 10, divisor 10000) while every mirror image uses
//! [`MIRROR_OVERLAP`] (threshold 2, divisor 10).
//!
//! # Wrap-around
//!
//! In [`BoundaryMode::Wrap`](crate::domain::BoundaryMode::Wrap) each pair also
//! interacts through three mirror images, in this order: mirrored on both
//! axes, on the x axis only, on the y axis only. The mirrored separation on an
//! axis is `extent - |d|`, negated when `d > 0`.

use super::{Force, ForceField};
use crate::domain::Domain;
use crate::error::{Result, SimError};
use crate::particle::Particle;

/// Gravitational constant in SI units (m³/(kg⋅s²)), CODATA 2014
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67408e-11;

/// Substitute for an exactly-zero x separation
pub const SEPARATION_NUDGE: f64 = 1e-7;

/// Final divisor applied to an overlapping pair's (negated) force
pub const OVERLAP_REPULSION_DIVISOR: f64 = 8.0;

/// Overlap rule for the direct image of a pair
pub const DIRECT_OVERLAP: OverlapRule = OverlapRule {
    threshold: 10.0,
    divisor: 10_000.0,
};

/// Overlap rule for the wrap-around mirror images of a pair
pub const MIRROR_OVERLAP: OverlapRule = OverlapRule {
    threshold: 2.0,
    divisor: 10.0,
};

/// How an overlapping pair's force is reduced before it is inverted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapRule {
    /// Forces strictly above this are divided by `divisor`
    pub threshold: f64,
    /// Divisor for forces above `threshold`
    pub divisor: f64,
}

impl OverlapRule {
    /// Turn an attractive magnitude into the dampened repulsive one
    pub fn dampen(&self, magnitude: f64) -> f64 {
        let reduced = if magnitude > self.threshold {
            magnitude / self.divisor
        } else {
            magnitude
        };
        -reduced / OVERLAP_REPULSION_DIVISOR
    }
}

/// Brute-force O(n²) gravity
///
/// # Example
///
/// ```
/// use nbody_sim::forces::{ForceField, GravityField};
/// use nbody_sim::domain::{BoundaryMode, Domain};
/// use nbody_sim::particle::{Color, Mass, Particle, ParticleId, Position, Velocity};
///
/// let field = GravityField::new(1.0);
/// let domain = Domain::new(100.0, 100.0, BoundaryMode::Delete);
/// let a = Particle::new(ParticleId::new(0), Position::new(10.0, 10.0), Velocity::zero(), Mass::new(1.0), Color::RED).unwrap();
/// let b = Particle::new(ParticleId::new(1), Position::new(20.0, 10.0), Velocity::zero(), Mass::new(1.0), Color::RED).unwrap();
///
/// let force = field.force_on(&a, &[a.clone(), b], &domain);
/// assert!(force.fx > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GravityField {
    g_constant: f64,
}

impl GravityField {
    /// Create a gravity field with the given gravitational constant
    ///
    /// # Panics
    ///
    /// Panics if `g_constant` is negative or not finite.
    pub fn new(g_constant: f64) -> Self {
        assert!(
            g_constant >= 0.0 && g_constant.is_finite(),
            "Gravitational constant must be non-negative and finite"
        );
        GravityField { g_constant }
    }

    /// Fallible counterpart of [`GravityField::new`]
    pub fn try_new(g_constant: f64) -> Result<Self> {
        if g_constant >= 0.0 && g_constant.is_finite() {
            Ok(GravityField { g_constant })
        } else {
            Err(SimError::InvalidConfig(format!(
                "gravitational constant must be non-negative and finite, got {g_constant}"
            )))
        }
    }

    /// Gravity with the real-world constant
    pub fn default_settings() -> Self {
        Self::new(GRAVITATIONAL_CONSTANT)
    }

    /// Gravitational constant in use
    pub fn g_constant(&self) -> f64 {
        self.g_constant
    }

    /// Force contributed by one image of a pair at separation `(dx, dy)`
    fn image_force(
        &self,
        dx: f64,
        dy: f64,
        mass_product: f64,
        reach: f64,
        rule: &OverlapRule,
    ) -> Force {
        let r_squared = dy * dy + dx * dx;
        let theta = dy.atan2(dx);
        let mut magnitude = self.g_constant * (mass_product / r_squared);

        if r_squared.sqrt() < reach {
            magnitude = rule.dampen(magnitude);
        }

        Force::new(magnitude * theta.cos(), magnitude * theta.sin())
    }

    /// Force on `target` from `other`, including mirror images when wrapping
    fn pair_force(&self, target: &Particle, other: &Particle, domain: &Domain) -> Force {
        let mut dx = other.position().x() - target.position().x();
        let dy = other.position().y() - target.position().y();

        if dx == 0.0 && dy == 0.0 {
            return Force::zero();
        }
        if dx == 0.0 {
            dx = SEPARATION_NUDGE;
        }

        let mass_product = other.mass().value() * target.mass().value();
        let reach = target.size() + other.size();

        let mut total = self.image_force(dx, dy, mass_product, reach, &DIRECT_OVERLAP);

        if domain.boundary().wraps() {
            let mut mirror_dx = domain.width() - dx.abs();
            let mut mirror_dy = domain.height() - dy.abs();
            if dx > 0.0 {
                mirror_dx = -mirror_dx;
            }
            if dy > 0.0 {
                mirror_dy = -mirror_dy;
            }
            if mirror_dx == 0.0 {
                mirror_dx = SEPARATION_NUDGE;
            }

            for (mx, my) in [(mirror_dx, mirror_dy), (mirror_dx, dy), (dx, mirror_dy)] {
                total.add(&self.image_force(mx, my, mass_product, reach, &MIRROR_OVERLAP));
            }
        }

        total
    }
}

impl Default for GravityField {
    fn default() -> Self {
        Self::default_settings()
    }
}

impl ForceField for GravityField {
    fn name(&self) -> &str {
        "gravity"
    }

    fn force_on(&self, target: &Particle, particles: &[Particle], domain: &Domain) -> Force {
        let mut total = Force::zero();
        for other in particles {
            if other.id() == target.id() {
                continue;
            }
            total.add(&self.pair_force(target, other, domain));
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundaryMode;
    use crate::particle::{Color, Mass, ParticleId, Position, Velocity};

    fn particle(id: u64, x: f64, y: f64, mass: f64) -> Particle {
        Particle::new(
            ParticleId::new(id),
            Position::new(x, y),
            Velocity::zero(),
            Mass::new(mass),
            Color::WHITE,
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual} (tolerance {tol})"
        );
    }

    #[test]
    fn test_gravitational_constant() {
        assert!(GRAVITATIONAL_CONSTANT > 6.6e-11);
        assert!(GRAVITATIONAL_CONSTANT < 6.7e-11);
        assert_eq!(GravityField::default().g_constant(), GRAVITATIONAL_CONSTANT);
    }

    #[test]
    #[should_panic(expected = "Gravitational constant must be non-negative and finite")]
    fn test_negative_g_panics() {
        GravityField::new(-1.0);
    }

    #[test]
    fn test_try_new_rejects_non_finite() {
        assert!(matches!(
            GravityField::try_new(f64::NAN),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(GravityField::try_new(0.0).is_ok());
    }

    #[test]
    fn test_pairwise_attraction() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(1000.0, 1000.0, BoundaryMode::Delete);
        let a = particle(0, 100.0, 100.0, 4.0);
        let b = particle(1, 200.0, 100.0, 9.0);

        let f = field.force_on(&a, &[a.clone(), b], &domain);
        // 1 * 36 / 100²
        assert_close(f.fx, 0.0036, 1e-15);
        assert_close(f.fy, 0.0, 1e-18);
    }

    #[test]
    fn test_empty_and_single_particle() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        let a = particle(0, 10.0, 10.0, 1.0);

        assert_eq!(field.force_on(&a, &[], &domain), Force::zero());
        assert_eq!(field.force_on(&a, &[a.clone()], &domain), Force::zero());
    }

    #[test]
    fn test_coincident_distinct_particles_skipped() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        let a = particle(0, 40.0, 40.0, 1.0);
        let b = particle(1, 40.0, 40.0, 1.0);

        let f = field.force_on(&a, &[a.clone(), b], &domain);
        assert_eq!(f, Force::zero());
    }

    #[test]
    fn test_self_excluded_by_identity() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Delete);
        let a = particle(0, 40.0, 40.0, 1.0);
        // Same id at a different position is still "self"
        let stale_copy = particle(0, 60.0, 40.0, 1.0);

        assert_eq!(field.force_on(&a, &[stale_copy], &domain), Force::zero());
    }

    #[test]
    fn test_zero_dx_is_nudged() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(1000.0, 1000.0, BoundaryMode::Delete);
        let a = particle(0, 100.0, 100.0, 1.0);
        let b = particle(1, 100.0, 200.0, 1.0);

        let f = field.force_on(&a, &[b], &domain);
        assert!(f.is_valid());
        assert_close(f.fy, 1e-4, 1e-15);
        // atan2(100, 1e-7) leaves a tiny positive x component
        assert!(f.fx > 0.0);
        assert!(f.fx < 1e-12);
    }

    #[test]
    fn test_direct_overlap_above_threshold() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Delete);
        // radii 10 + 10, separation 5: F = 10000 / 25 = 400
        let a = particle(0, 50.0, 50.0, 100.0);
        let b = particle(1, 55.0, 50.0, 100.0);

        let f = field.force_on(&a, &[b], &domain);
        // 400 / 10000 / 8, pointing away from b
        assert_close(f.fx, -0.005, 1e-15);
    }

    #[test]
    fn test_direct_overlap_below_threshold() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Delete);
        // radii 1 + 1, separation 1: F = 1, not above 10
        let a = particle(0, 50.0, 50.0, 1.0);
        let b = particle(1, 51.0, 50.0, 1.0);

        let f = field.force_on(&a, &[b], &domain);
        assert_close(f.fx, -0.125, 1e-15);
    }

    #[test]
    fn test_overlap_rule_dampen() {
        assert_eq!(DIRECT_OVERLAP.dampen(400.0), -0.005);
        assert_eq!(DIRECT_OVERLAP.dampen(10.0), -1.25);
        assert_eq!(MIRROR_OVERLAP.dampen(2500.0), -31.25);
        assert_eq!(MIRROR_OVERLAP.dampen(2.0), -0.25);
    }

    #[test]
    fn test_wrap_adds_three_mirror_images() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        let a = particle(0, 10.0, 50.0, 1.0);
        let b = particle(1, 90.0, 50.0, 1.0);

        let f = field.force_on(&a, &[b], &domain);

        // direct (80, 0); both (-20, 100); x-only (-20, 0); y-only (80, 100)
        let image = |dx: f64, dy: f64| {
            let r_sq: f64 = dx * dx + dy * dy;
            let r = r_sq.sqrt();
            (dx / r / r_sq, dy / r / r_sq)
        };
        let images = [image(80.0, 0.0), image(-20.0, 100.0), image(-20.0, 0.0), image(80.0, 100.0)];
        let fx: f64 = images.iter().map(|i| i.0).sum();
        let fy: f64 = images.iter().map(|i| i.1).sum();

        assert_close(f.fx, fx, 1e-15);
        assert_close(f.fy, fy, 1e-15);
        // The short way round through the left edge dominates
        assert!(f.fx < 0.0);
    }

    #[test]
    fn test_mirror_images_use_mirror_overlap_rule() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        // radii 10 + 10; 98 apart directly, 2 apart across the edge
        let a = particle(0, 1.0, 50.0, 100.0);
        let b = particle(1, 99.0, 50.0, 100.0);

        let f = field.force_on(&a, &[b], &domain);

        let direct = 10000.0 / 9604.0;
        let both_r_sq: f64 = 4.0 + 10000.0;
        let both = 10000.0 / both_r_sq;
        // x-only: 10000 / 4 = 2500 > 2 -> 250 -> -31.25 at theta = pi
        let x_only = 31.25;
        let y_only_r_sq: f64 = 98.0 * 98.0 + 10000.0;
        let y_only = 10000.0 / y_only_r_sq;

        let fx = direct + both * (-2.0 / both_r_sq.sqrt()) + x_only + y_only * (98.0 / y_only_r_sq.sqrt());
        let fy = both * (100.0 / both_r_sq.sqrt()) + y_only * (100.0 / y_only_r_sq.sqrt());

        assert_close(f.fx, fx, 1e-9);
        assert_close(f.fy, fy, 1e-9);
    }

    #[test]
    fn test_zero_mirrored_separation() {
        let field = GravityField::new(1.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        // y-only image at (100, 100) and the both-axes image straight along y
        let expected_fy = 1e-4 + 5e-5 * std::f64::consts::FRAC_1_SQRT_2;

        // |dx| == width: the x-only image collapses to the nudge, 1e14 -> 1e13 -> -1.25e12
        let a = particle(0, 0.0, 50.0, 1.0);
        let b = particle(1, 100.0, 50.0, 1.0);
        let f = field.force_on(&a, &[b], &domain);
        assert!(f.is_valid());
        assert_close(f.fx, -1.25e12, 1e-3);
        assert_close(f.fy, expected_fy, 1e-12);

        // |dy| == height: the y-only image pairs the nudged dx with a zero mirrored dy
        let a = particle(0, 50.0, 0.0, 1.0);
        let b = particle(1, 50.0, 100.0, 1.0);
        let f = field.force_on(&a, &[b], &domain);
        assert!(f.is_valid());
        assert_close(f.fx, -1.25e12, 1e-3);
        assert_close(f.fy, expected_fy, 1e-12);
    }

    #[test]
    fn test_no_mirrors_without_wrap() {
        let field = GravityField::new(1.0);
        let wrap = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        let bounce = Domain::new(100.0, 100.0, BoundaryMode::Bounce { softness: 5.0 });
        let a = particle(0, 10.0, 50.0, 1.0);
        let b = particle(1, 90.0, 50.0, 1.0);

        let direct = field.force_on(&a, &[b.clone()], &bounce);
        assert_close(direct.fx, 1.0 / 6400.0, 1e-18);
        assert_ne!(direct, field.force_on(&a, &[b], &wrap));
    }

    #[test]
    fn test_third_law_with_wrap() {
        let field = GravityField::new(2.0);
        let domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        let a = particle(0, 30.0, 40.0, 5.0);
        let b = particle(1, 70.0, 60.0, 5.0);
        let snapshot = [a.clone(), b.clone()];

        let fa = field.force_on(&a, &snapshot, &domain);
        let fb = field.force_on(&b, &snapshot, &domain);
        assert_close(fa.fx, -fb.fx, 1e-15);
        assert_close(fa.fy, -fb.fy, 1e-15);
    }
}
