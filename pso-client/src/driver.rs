use anyhow::Result;
use pso_core::config::{GOAL_COLOR, HIGHLIGHT_COLOR};
use pso_core::{Goal, StandardSwarm, Swarm, Vector2D};
use pso_shared::{FrameSnapshot, ParticleSnapshot, Position, SwarmSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Write;

use crate::script::GoalScript;
use crate::settings;

const LEADER_RADIUS: f64 = 8.0;
const PARTICLE_RADIUS: f64 = 2.0;
const PROGRESS_INTERVAL: u64 = 100;

fn to_position(v: Vector2D) -> Position {
    Position::new(v.x, v.y)
}

fn to_vector(p: Position) -> Vector2D {
    Vector2D::new(p.x, p.y)
}

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub relocations: u64,
    pub global_best: Option<f64>,
    pub leader: Option<Position>,
}

/// Frame loop around the swarm: owns the goal, the RNG and the frame count.
#[derive(Debug)]
pub struct Driver {
    swarm: StandardSwarm,
    goal: Goal,
    rng: StdRng,
    frame: u64,
    relocations: u64,
}

impl Driver {
    pub fn new(settings: &SwarmSettings, seed: u64) -> Self {
        let bounds = settings::bounds(settings);
        let mut rng = StdRng::seed_from_u64(seed);
        let swarm = Swarm::random(&mut rng, bounds, settings::swarm_config(settings));

        let mut goal = Goal::at_default_location(bounds);
        goal.radius = settings.goal_radius;

        log::info!(
            "Swarm of {} particles in {}x{}, goal at ({:.1}, {:.1})",
            swarm.particles.len(),
            bounds.width,
            bounds.height,
            goal.position.x,
            goal.position.y
        );

        Self {
            swarm,
            goal,
            rng,
            frame: 0,
            relocations: 0,
        }
    }

    pub fn swarm(&self) -> &StandardSwarm {
        &self.swarm
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Number of completed steps
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Moves the goal and forgets every best, so the swarm re-converges.
    pub fn relocate_goal(&mut self, position: Position) {
        self.goal.move_to(to_vector(position));
        self.swarm.reset_bests();
        self.relocations += 1;
        log::debug!(
            "Goal relocated to ({:.1}, {:.1}) at frame {}",
            position.x,
            position.y,
            self.frame
        );
    }

    pub fn tick(&mut self) {
        self.swarm.step(&self.goal, &mut self.rng);
        self.frame += 1;
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let particles = self
            .swarm
            .particles
            .iter()
            .map(|p| ParticleSnapshot {
                position: to_position(p.position),
                is_global_best: p.is_global_best,
                color: if p.is_global_best { HIGHLIGHT_COLOR } else { p.color },
                radius: if p.is_global_best {
                    LEADER_RADIUS
                } else {
                    PARTICLE_RADIUS
                },
            })
            .collect();

        let best = self.swarm.global_best();
        FrameSnapshot {
            frame: self.frame,
            goal: to_position(self.goal.position),
            goal_radius: self.goal.radius,
            goal_color: GOAL_COLOR,
            global_best: best.is_set().then_some(best.value),
            particles,
        }
    }

    /// Steps `frames` times, applying scripted relocations as they fall due.
    ///
    /// Every `snapshot_every` frames a snapshot is written to `sink` as one
    /// JSON line; `0` disables output.
    pub fn run<W: Write>(
        &mut self,
        frames: u64,
        script: &mut GoalScript,
        snapshot_every: u64,
        sink: &mut W,
    ) -> Result<RunSummary> {
        for _ in 0..frames {
            for update in script.due(self.frame) {
                self.relocate_goal(update.position);
            }

            self.tick();

            if snapshot_every > 0 && self.frame % snapshot_every == 0 {
                serde_json::to_writer(&mut *sink, &self.snapshot())?;
                writeln!(sink)?;
            }

            if self.frame % PROGRESS_INTERVAL == 0 {
                log::info!(
                    "Frame {}: global best {:.3}",
                    self.frame,
                    self.swarm.global_best().value
                );
            }
        }
        sink.flush()?;

        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        let best = self.swarm.global_best();
        RunSummary {
            frames: self.frame,
            relocations: self.relocations,
            global_best: best.is_set().then_some(best.value),
            leader: self
                .swarm
                .global_best_particle()
                .map(|p| to_position(p.position)),
        }
    }
}
