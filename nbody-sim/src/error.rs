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
//! Error types shared across the simulator

use crate::particle::ParticleId;
use thiserror::Error;

/// Convenience alias for results produced by this crate
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised by the simulation core and its configuration layer
#[derive(Debug, Error)]
pub enum SimError {
    /// A particle was constructed with data that would break integration
    #[error("invalid particle: {reason}")]
    InvalidParticle {
        /// What was wrong with the particle data
        reason: String,
    },

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A particle ended a step with a NaN or infinite position or velocity
    #[error("non-finite state on {id} after step")]
    NonFiniteState {
        /// Offending particle
        id: ParticleId,
    },

    /// Reading a configuration file failed
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    pub(crate) fn invalid_particle(reason: impl Into<String>) -> Self {
        SimError::InvalidParticle {
            reason: reason.into(),
        }
    }
}
