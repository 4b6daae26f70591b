#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Represents a 2D position in screen coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrt(dx * dx + dy * dy)
    }
}

/// Swarm simulation configuration
///
/// Missing fields fall back to their defaults, so a document only needs to
/// name the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmSettings {
    pub width: f64,
    pub height: f64,
    pub speed_limit: f64,
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
    pub jitter: f64,
    pub min_separation: f64,
    pub restitution: f64,
    pub goal_radius: f64,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 800.0,
            speed_limit: 8.0,
            inertia: 3.0,
            cognitive: 0.8,
            social: 0.1,
            jitter: 0.1,
            min_separation: 20.0,
            restitution: 0.8,
            goal_radius: 20.0,
        }
    }
}

/// Goal relocation, as produced by a pointer drag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GoalUpdate {
    /// Frame before which the goal moves
    pub frame: u64,
    pub position: Position,
}

/// One particle as the renderer sees it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Position,
    pub is_global_best: bool,
    /// `0xAARRGGBB`
    pub color: u32,
    pub radius: f64,
}

/// Render state after a simulation step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub goal: Position,
    pub goal_radius: f64,
    pub goal_color: u32,
    /// `None` right after a reset, before any particle was evaluated
    pub global_best: Option<f64>,
    pub particles: Vec<ParticleSnapshot>,
}

impl FrameSnapshot {
    pub fn leader(&self) -> Option<&ParticleSnapshot> {
        self.particles.iter().find(|p| p.is_global_best)
    }
}
