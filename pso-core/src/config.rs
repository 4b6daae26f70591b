//! Build-time constants and tunables for the swarm.

/// Number of particles in a standard swarm
pub const PARTICLE_COUNT: usize = 100;

pub const SCREEN_WIDTH: f64 = 1400.0;
pub const SCREEN_HEIGHT: f64 = 800.0;

/// Visual radius of the goal marker
pub const GOAL_RADIUS: f64 = 20.0;

/// Particle tints, `0xAARRGGBB`
pub const PALETTE: [u32; 8] = [
    0xffff3c3c, // red
    0xffffe100, // yellow
    0xffff00ff, // magenta
    0xff00ffff, // cyan
    0xffffa500, // orange
    0xff800080, // purple
    0xff32cd32, // lime
    0xffff69b4, // pink
];

/// Tint of the global-best particle
pub const HIGHLIGHT_COLOR: u32 = 0x004d91ff;

pub const GOAL_COLOR: u32 = 0x003ca123;

/// Playing field, `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

/// Coefficients of the velocity and position update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmConfig {
    /// Maximum speed in units per frame
    pub speed_limit: f64,
    /// Multiplier on the previous velocity
    pub inertia: f64,
    /// Pull toward the particle's own best position
    pub cognitive: f64,
    /// Pull toward the swarm's best position
    pub social: f64,
    pub jitter: f64,
    pub min_separation: f64,
    /// Fraction of speed kept on a wall bounce
    pub restitution: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            speed_limit: 8.0,
            inertia: 3.0,
            cognitive: 0.8,
            social: 0.1,
            jitter: 0.1,
            min_separation: 20.0,
            restitution: 0.8,
        }
    }
}
