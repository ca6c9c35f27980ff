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
//! Frame loop
//!
//! [`Simulation`] drives a [`World`] from platform input. Each frame the
//! platform layer hands over the input events it collected; the simulation
//! applies them, draws, and advances physics by one tick unless paused.
//!
//! The loop is a two-state machine:
//!
//! - [`RunState::Running`]: apply events, draw the pre-step snapshot, step
//! - [`RunState::Paused`]: apply events, redraw only when a spawn or clear
//!   changed the world; physics does not advance
//!
//! Window management, event polling and drawing live behind [`EventSource`]
//! and [`Renderer`]. [`Simulation::run`] can cap the frame rate with a
//! [`FrameLimiter`].

use crate::config::{ColorMode, SimulationConfig};
use crate::error::Result;
use crate::particle::{Color, ParticleId, ParticleView, Position};
use crate::world::{StepReport, World};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

/// Input understood by the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Spawn a particle at the pointer
    PrimaryClick {
        /// Pointer x
        x: f64,
        /// Pointer y
        y: f64,
    },
    /// Remove every particle
    SecondaryClick,
    /// Switch between running and paused
    TogglePause,
    /// The drawable area changed size
    Resize {
        /// New width
        width: f64,
        /// New height
        height: f64,
    },
    /// Leave the loop
    Quit,
}

/// Whether physics advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Physics advances every frame
    #[default]
    Running,
    /// Input is still processed but physics is frozen
    Paused,
}

impl RunState {
    fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }
}

/// Drawing backend; receives read-only snapshots
pub trait Renderer {
    /// Present one frame
    fn draw(&mut self, particles: &[ParticleView]);
}

/// Platform input; returns the events collected since the last call
pub trait EventSource {
    /// Drain pending events
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Holds a loop to a maximum frame rate
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FrameLimiter {
    /// Limit to `fps` frames per second
    ///
    /// # Panics
    ///
    /// Panics if `fps` is zero
    pub fn new(fps: u32) -> Self {
        assert!(fps > 0, "Frame rate limit must be at least 1");
        FrameLimiter {
            interval: Duration::from_secs(1) / fps,
            last_tick: None,
        }
    }

    /// Minimum time between two ticks
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep until one interval has passed since the previous tick
    ///
    /// The first tick returns immediately.
    pub fn tick(&mut self) {
        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last_tick = Some(Instant::now());
    }
}

/// Interactive simulation driver
pub struct Simulation {
    world: World,
    state: RunState,
    rng: StdRng,
    color_mode: ColorMode,
    particle_mass: f64,
    initial_speed: f64,
    limiter: Option<FrameLimiter>,
    frames: u64,
}

impl Simulation {
    /// Build a simulation and, if configured, populate it
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let world = World::from_config(config)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Simulation {
            world,
            state: RunState::Running,
            rng,
            color_mode: config.color_mode(),
            particle_mass: config.particle_mass,
            initial_speed: config.initial_speed,
            limiter: config.limit_fps.then(|| FrameLimiter::new(config.fps_limit)),
            frames: 0,
        };

        if config.populate_at_start {
            sim.populate(config.initial_particle_count)?;
        }

        Ok(sim)
    }

    /// Spawn `count` particles at random integer coordinates in the domain
    pub fn populate(&mut self, count: usize) -> Result<()> {
        let width = self.world.domain().width().floor() as i64;
        let height = self.world.domain().height().floor() as i64;

        for _ in 0..count {
            let x = self.rng.gen_range(0..=width) as f64;
            let y = self.rng.gen_range(0..=height) as f64;
            self.spawn_at(Position::new(x, y))?;
        }

        info!("Populated world with {} particles", count);
        Ok(())
    }

    /// Spawn one particle with the configured mass and speed, a random
    /// heading and the next color
    pub fn spawn_at(&mut self, position: Position) -> Result<ParticleId> {
        let angle = self.rng.gen::<f64>() * TAU;
        let color = self.next_color();
        self.world
            .spawn(position, self.initial_speed, angle, self.particle_mass, color)
    }

    fn next_color(&mut self) -> Color {
        match &self.color_mode {
            ColorMode::Random(palette) => palette
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(Color::YELLOW),
            ColorMode::Fixed(color) => *color,
        }
    }

    /// Apply one input event
    ///
    /// Returns `true` when the world changed in a way a paused frame has to
    /// redraw. Invalid clicks and sizes are logged and ignored. Quit is
    /// handled by [`Simulation::frame`].
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PrimaryClick { x, y } => match self.spawn_at(Position::new(x, y)) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Ignoring click at ({}, {}): {}", x, y, e);
                    false
                }
            },
            InputEvent::SecondaryClick => {
                self.world.clear();
                true
            }
            InputEvent::TogglePause => {
                self.state = self.state.toggled();
                info!("Simulation {:?}", self.state);
                false
            }
            InputEvent::Resize { width, height } => {
                if let Err(e) = self.world.resize(width, height) {
                    warn!("Ignoring resize: {}", e);
                }
                false
            }
            InputEvent::Quit => false,
        }
    }

    /// Run one iteration of the loop
    ///
    /// Returns `ControlFlow::Break` once a quit event is seen; events after it
    /// are dropped. The step report is `None` while paused.
    pub fn frame(
        &mut self,
        events: impl IntoIterator<Item = InputEvent>,
        renderer: &mut impl Renderer,
    ) -> ControlFlow<(), Option<StepReport>> {
        for event in events {
            if event == InputEvent::Quit {
                info!("Quit after {} frames", self.frames);
                return ControlFlow::Break(());
            }
            let dirty = self.handle_event(event);
            if dirty && self.state == RunState::Paused {
                renderer.draw(&self.world.views());
            }
        }

        self.frames += 1;
        match self.state {
            RunState::Running => {
                renderer.draw(&self.world.views());
                ControlFlow::Continue(Some(self.world.step()))
            }
            RunState::Paused => ControlFlow::Continue(None),
        }
    }

    /// Loop until the event source reports quit; returns the frame count
    ///
    /// With `limit_fps` set, every iteration first waits out the frame
    /// interval.
    pub fn run(&mut self, source: &mut impl EventSource, renderer: &mut impl Renderer) -> u64 {
        loop {
            if let Some(limiter) = &mut self.limiter {
                limiter.tick();
            }
            if self.frame(source.poll(), renderer).is_break() {
                return self.frames;
            }
        }
    }

    /// The simulated world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Frames processed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
