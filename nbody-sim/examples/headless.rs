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
//! Headless run of the interactive loop
//!
//! Loads a scenario, replays a scripted stream of clicks, pauses and clears
//! in place of a window, and prints a coarse ASCII view of the final frame.
//!
//! ```text
//! cargo run --example headless -- --scenario scenarios/bounce_box.yaml --frames 300
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use nbody_sim::particle::ParticleView;
use nbody_sim::simulation::{EventSource, InputEvent, Renderer};
use nbody_sim::{Simulation, SimulationConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Run the N-body sandbox without a window")]
struct Args {
    /// Scenario YAML; built-in defaults when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Frames to run before quitting
    #[arg(short, long, default_value_t = 500)]
    frames: u64,

    /// Spawn a particle at a scripted position every N frames (0 disables)
    #[arg(long, default_value_t = 25)]
    click_every: u64,

    /// Log a summary every N frames
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Stands in for the window's event queue
struct ScriptedInput {
    frame: u64,
    frames: u64,
    click_every: u64,
    width: f64,
    height: f64,
}

impl EventSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.frame += 1;
        let mut events = Vec::new();

        if self.frame > self.frames {
            events.push(InputEvent::Quit);
            return events;
        }

        if self.click_every > 0 && self.frame % self.click_every == 0 {
            // walk the clicks along a diagonal
            let t = (self.frame / self.click_every) as f64 * 0.137 % 1.0;
            events.push(InputEvent::PrimaryClick {
                x: t * self.width,
                y: (1.0 - t) * self.height,
            });
        }

        // pause for a stretch in the middle of the run, clear once at 3/4
        if self.frame == self.frames / 2 || self.frame == self.frames / 2 + 10 {
            events.push(InputEvent::TogglePause);
        }
        if self.frame == self.frames * 3 / 4 {
            events.push(InputEvent::SecondaryClick);
        }

        events
    }
}

/// Keeps the last frame and logs particle counts
struct SummaryRenderer {
    drawn: u64,
    report_every: u64,
    last: Vec<ParticleView>,
}

impl Renderer for SummaryRenderer {
    fn draw(&mut self, particles: &[ParticleView]) {
        self.drawn += 1;
        if self.report_every > 0 && self.drawn % self.report_every == 0 {
            info!("frame {}: {} particles", self.drawn, particles.len());
        }
        self.last.clear();
        self.last.extend_from_slice(particles);
    }
}

fn ascii_frame(particles: &[ParticleView], width: f64, height: f64) -> String {
    const COLS: usize = 60;
    const ROWS: usize = 24;
    let mut grid = vec![vec!['.'; COLS]; ROWS];

    for p in particles {
        let col = (p.position.x() / width * COLS as f64).floor();
        let row = (p.position.y() / height * ROWS as f64).floor();
        if (0.0..COLS as f64).contains(&col) && (0.0..ROWS as f64).contains(&row) {
            grid[row as usize][col as usize] = if p.size >= 4.0 { 'O' } else { 'o' };
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.scenario {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    println!("N-Body Sim - Headless Run");
    println!("=========================\n");
    println!("Domain: {}x{}", config.width, config.height);
    println!("Boundary: {:?}", config.boundary_mode());
    println!("Particles at start: {}\n", if config.populate_at_start { config.initial_particle_count } else { 0 });

    let mut sim = Simulation::new(&config)?;
    let mut input = ScriptedInput {
        frame: 0,
        frames: args.frames,
        click_every: args.click_every,
        width: config.width,
        height: config.height,
    };
    let mut renderer = SummaryRenderer {
        drawn: 0,
        report_every: args.report_every,
        last: Vec::new(),
    };

    let frames = sim.run(&mut input, &mut renderer);
    sim.world().check_invariants()?;

    let domain = sim.world().domain();
    println!("{}\n", ascii_frame(&renderer.last, domain.width(), domain.height()));
    println!("Frames: {frames} ({} drawn)", renderer.drawn);
    println!("Particles remaining: {}", sim.world().len());
    println!("Kinetic energy: {:.6e}", sim.world().total_kinetic_energy());

    Ok(())
}
