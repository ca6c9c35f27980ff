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
//! Run configuration
//!
//! [`SimulationConfig`] collects the settings the surrounding application
//! provides: domain size, physical constants, boundary behavior, initial
//! population and coloring. Every field has a default, so a YAML document
//! only needs to list what it changes:
//!
//! ```yaml
//! width: 1280
//! height: 720
//! wrap_around: false
//! boundaries: true      # bounce off the edges
//! softness: 2
//! initial_particle_count: 200
//! random_colors: false
//! particle_color: [255, 255, 0]
//! limit_fps: true
//! fps_limit: 60
//! seed: 42
//! ```

use crate::domain::{BoundaryMode, Domain};
use crate::error::{Result, SimError};
use crate::forces::gravity::GRAVITATIONAL_CONSTANT;
use crate::particle::Color;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How spawned particles are colored
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMode {
    /// Pick uniformly from a palette
    Random(Vec<Color>),
    /// Always use one color
    Fixed(Color),
}

/// Settings for one simulation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Domain width
    pub width: f64,
    /// Domain height
    pub height: f64,
    /// Gravitational constant
    pub gravitational_constant: f64,
    /// Integration timestep
    pub time_step: f64,
    /// Mass of every spawned particle; its square root is the draw size
    pub particle_mass: f64,
    /// Speed of every spawned particle; the heading is random
    pub initial_speed: f64,
    /// Toroidal universe; takes precedence over `boundaries`
    pub wrap_around: bool,
    /// Bounce off the edges instead of deleting particles
    pub boundaries: bool,
    /// Bounce damping divisor
    pub softness: f64,
    /// Populate the world when the simulation starts
    pub populate_at_start: bool,
    /// Number of particles for the initial population
    pub initial_particle_count: usize,
    /// Pick colors from `palette` instead of using `particle_color`
    pub random_colors: bool,
    /// Fixed particle color
    pub particle_color: Color,
    /// Palette for random colors
    pub palette: Vec<Color>,
    /// Cap the frame rate of [`Simulation::run`](crate::simulation::Simulation::run)
    pub limit_fps: bool,
    /// Frames per second when `limit_fps` is set
    pub fps_limit: u32,
    /// Seed for positions, headings and colors; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            width: 900.0,
            height: 900.0,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            time_step: 40_000.0,
            particle_mass: 9.0,
            initial_speed: 1e-7,
            wrap_around: true,
            boundaries: false,
            softness: 5.0,
            populate_at_start: true,
            initial_particle_count: 50,
            random_colors: true,
            particle_color: Color::YELLOW,
            palette: vec![Color::WHITE, Color::GREEN, Color::RED, Color::YELLOW, Color::BLUE],
            limit_fps: false,
            fps_limit: 30,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SimulationConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        self.domain()?;

        if !(self.gravitational_constant >= 0.0 && self.gravitational_constant.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "gravitational_constant must be non-negative and finite, got {}",
                self.gravitational_constant
            )));
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "time_step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if !(self.particle_mass > 0.0 && self.particle_mass.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "particle_mass must be positive and finite, got {}",
                self.particle_mass
            )));
        }
        if !self.initial_speed.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "initial_speed must be finite, got {}",
                self.initial_speed
            )));
        }
        if self.random_colors && self.palette.is_empty() {
            return Err(SimError::InvalidConfig(
                "palette must not be empty when random_colors is set".to_string(),
            ));
        }
        if self.limit_fps && self.fps_limit == 0 {
            return Err(SimError::InvalidConfig(
                "fps_limit must be at least 1 when limit_fps is set".to_string(),
            ));
        }
        if self.wrap_around && self.boundaries {
            warn!("Both wrap_around and boundaries are set; wrap-around takes precedence");
        }

        Ok(())
    }

    /// Boundary policy implied by the `wrap_around` and `boundaries` flags
    pub fn boundary_mode(&self) -> BoundaryMode {
        if self.wrap_around {
            BoundaryMode::Wrap
        } else if self.boundaries {
            BoundaryMode::Bounce {
                softness: self.softness,
            }
        } else {
            BoundaryMode::Delete
        }
    }

    /// Domain implied by the extent and boundary flags
    pub fn domain(&self) -> Result<Domain> {
        Domain::try_new(self.width, self.height, self.boundary_mode())
    }

    /// Coloring implied by `random_colors`
    pub fn color_mode(&self) -> ColorMode {
        if self.random_colors {
            ColorMode::Random(self.palette.clone())
        } else {
            ColorMode::Fixed(self.particle_color)
        }
    }
}
