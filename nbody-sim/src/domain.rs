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
//! Simulation domain and boundary policy
//!
//! The domain is the rectangle `[0, width] x [0, height]`. What happens when a
//! particle's proposed position leaves it is decided by the [`BoundaryMode`].
//! Only one edge is ever reported per tick: edges are tested in the fixed
//! order left, right, top, bottom and the first match wins.

use crate::error::{Result, SimError};
use crate::particle::Position;

/// How particles crossing a domain edge are handled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundaryMode {
    /// Toroidal universe: the crossing coordinate snaps to the opposite edge
    /// and the force pass adds mirrored contributions
    Wrap,
    /// The velocity on the crossing axis is reversed and divided by `softness`
    Bounce {
        /// Damping divisor; 1 keeps the full speed
        softness: f64,
    },
    /// The particle is removed from the world
    #[default]
    Delete,
}

impl BoundaryMode {
    /// Whether the force pass should include wrap-around mirror images
    pub fn wraps(&self) -> bool {
        matches!(self, BoundaryMode::Wrap)
    }
}

/// A domain edge, in the order edges are tested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `x < 0`
    Left,
    /// `x > width`
    Right,
    /// `y < 0`
    Top,
    /// `y > height`
    Bottom,
}

/// Rectangular simulation domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    width: f64,
    height: f64,
    boundary: BoundaryMode,
}

impl Domain {
    /// Create a domain
    ///
    /// # Panics
    ///
    /// Panics if either dimension is non-positive or not finite, or if a
    /// bounce softness is non-positive. Use `try_new` for fallible construction.
    pub fn new(width: f64, height: f64, boundary: BoundaryMode) -> Self {
        match Self::try_new(width, height, boundary) {
            Ok(domain) => domain,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create a domain
    pub fn try_new(width: f64, height: f64, boundary: BoundaryMode) -> Result<Self> {
        validate_extent(width, height)?;
        if let BoundaryMode::Bounce { softness } = boundary {
            if !(softness > 0.0 && softness.is_finite()) {
                return Err(SimError::InvalidConfig(format!(
                    "bounce softness must be positive and finite, got {softness}"
                )));
            }
        }
        Ok(Domain {
            width,
            height,
            boundary,
        })
    }

    /// Domain width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Domain height
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Active boundary policy
    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Change the domain extent, e.g. after a window resize
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        validate_extent(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Replace the boundary policy
    pub fn set_boundary(&mut self, boundary: BoundaryMode) -> Result<()> {
        *self = Self::try_new(self.width, self.height, boundary)?;
        Ok(())
    }

    /// First edge crossed by `pos`, if any
    ///
    /// Edges are tested left, right, top, bottom. Points lying exactly on an
    /// edge are inside.
    pub fn crossed_edge(&self, pos: Position) -> Option<Edge> {
        if pos.x() < 0.0 {
            Some(Edge::Left)
        } else if pos.x() > self.width {
            Some(Edge::Right)
        } else if pos.y() < 0.0 {
            Some(Edge::Top)
        } else if pos.y() > self.height {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    /// Snap the coordinate on the crossed axis to the opposite edge
    ///
    /// This is an absolute reset (`x < 0` becomes exactly `width`), not a
    /// modular wrap; the other coordinate is left untouched.
    pub fn wrap(&self, pos: Position, edge: Edge) -> Position {
        match edge {
            Edge::Left => Position::new(self.width, pos.y()),
            Edge::Right => Position::new(0.0, pos.y()),
            Edge::Top => Position::new(pos.x(), self.height),
            Edge::Bottom => Position::new(pos.x(), 0.0),
        }
    }
}

fn validate_extent(width: f64, height: f64) -> Result<()> {
    if width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "domain must have positive finite extent, got {width}x{height}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_priority() {
        let domain = Domain::new(100.0, 50.0, BoundaryMode::Delete);
        assert_eq!(domain.crossed_edge(Position::new(50.0, 25.0)), None);
        assert_eq!(domain.crossed_edge(Position::new(-1.0, 25.0)), Some(Edge::Left));
        assert_eq!(domain.crossed_edge(Position::new(101.0, 25.0)), Some(Edge::Right));
        assert_eq!(domain.crossed_edge(Position::new(50.0, -1.0)), Some(Edge::Top));
        assert_eq!(domain.crossed_edge(Position::new(50.0, 51.0)), Some(Edge::Bottom));

        // Out on both axes: horizontal edges win
        assert_eq!(domain.crossed_edge(Position::new(-1.0, -1.0)), Some(Edge::Left));
        assert_eq!(domain.crossed_edge(Position::new(101.0, 51.0)), Some(Edge::Right));
    }

    #[test]
    fn test_points_on_edge_are_inside() {
        let domain = Domain::new(100.0, 50.0, BoundaryMode::Delete);
        assert_eq!(domain.crossed_edge(Position::new(0.0, 0.0)), None);
        assert_eq!(domain.crossed_edge(Position::new(100.0, 50.0)), None);
    }

    #[test]
    fn test_wrap_is_absolute_snap() {
        let domain = Domain::new(100.0, 50.0, BoundaryMode::Wrap);
        assert_eq!(domain.wrap(Position::new(-3.0, 7.0), Edge::Left), Position::new(100.0, 7.0));
        assert_eq!(domain.wrap(Position::new(104.0, 7.0), Edge::Right), Position::new(0.0, 7.0));
        assert_eq!(domain.wrap(Position::new(7.0, -2.0), Edge::Top), Position::new(7.0, 50.0));
        assert_eq!(domain.wrap(Position::new(7.0, 60.0), Edge::Bottom), Position::new(7.0, 0.0));
    }

    #[test]
    fn test_invalid_domains_rejected() {
        assert!(Domain::try_new(0.0, 10.0, BoundaryMode::Delete).is_err());
        assert!(Domain::try_new(10.0, f64::NAN, BoundaryMode::Delete).is_err());
        assert!(Domain::try_new(10.0, 10.0, BoundaryMode::Bounce { softness: 0.0 }).is_err());
        assert!(Domain::try_new(10.0, 10.0, BoundaryMode::Bounce { softness: 5.0 }).is_ok());
    }

    #[test]
    fn test_resize() {
        let mut domain = Domain::new(100.0, 100.0, BoundaryMode::Wrap);
        domain.resize(640.0, 480.0).unwrap();
        assert_eq!(domain.width(), 640.0);
        assert_eq!(domain.height(), 480.0);
        assert!(domain.resize(-1.0, 480.0).is_err());
        assert_eq!(domain.width(), 640.0);
    }

    #[test]
    fn test_only_wrap_mirrors_forces() {
        assert!(BoundaryMode::Wrap.wraps());
        assert!(!BoundaryMode::Delete.wraps());
        assert!(!BoundaryMode::Bounce { softness: 1.0 }.wraps());
    }
}
