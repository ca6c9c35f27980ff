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
//! # N-Body Sim
//!
//! A brute-force 2D N-body gravity sandbox. Particles are spawned
//! interactively, attract each other pairwise every frame, repel weakly when
//! they overlap, and are wrapped, bounced or deleted at the domain edges.
//!
//! ## Features
//!
//! - **Pairwise gravity**: O(n²) Newtonian force pass with overlap dampening
//! - **Toroidal universe**: optional wrap-around with mirrored forces
//! - **Two-phase ticks**: forces always see the previous tick's positions
//! - **Parallelization**: optional Rayon force pass (`parallel` feature)
//! - **Frame loop**: pause-aware driver behind renderer and input traits
//!
//! ## Example
//!
//! ```rust
//! use nbody_sim::domain::{BoundaryMode, Domain};
//! use nbody_sim::forces::GravityField;
//! use nbody_sim::integration::HalfStepEuler;
//! use nbody_sim::particle::{Color, Position, Velocity};
//! use nbody_sim::World;
//!
//! let domain = Domain::new(900.0, 900.0, BoundaryMode::Wrap);
//! let mut world = World::with_parts(domain, GravityField::new(1.0), HalfStepEuler::new(1.0));
//!
//! world.insert(Position::new(400.0, 450.0), Velocity::zero(), 9.0, Color::WHITE).unwrap();
//! world.insert(Position::new(500.0, 450.0), Velocity::zero(), 9.0, Color::WHITE).unwrap();
//!
//! world.step();
//! assert!(world.particles()[0].velocity().dx() > 0.0);
//! ```

#![warn(missing_docs)]

/// Configuration loading and validation
pub mod config;

/// Domain extent and boundary policy
pub mod domain;

/// Error types
pub mod error;

/// Force computation
pub mod forces;

/// Numerical integration
pub mod integration;

/// Particle state
pub mod particle;

/// Interactive frame loop
pub mod simulation;

/// Particle container and tick driver
pub mod world;

pub use config::SimulationConfig;
pub use error::{Result, SimError};
pub use simulation::{FrameLimiter, InputEvent, RunState, Simulation};
pub use world::{StepReport, World};
