use anyhow::{ensure, Context, Result};
use pso_core::{Bounds, SwarmConfig};
use pso_shared::SwarmSettings;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads and validates a JSON settings document.
pub fn load(path: &Path) -> Result<SwarmSettings> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open settings file {}", path.display()))?;
    let settings: SwarmSettings = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    validate(&settings)?;
    Ok(settings)
}

pub fn validate(settings: &SwarmSettings) -> Result<()> {
    let values = [
        ("width", settings.width),
        ("height", settings.height),
        ("speed_limit", settings.speed_limit),
        ("inertia", settings.inertia),
        ("cognitive", settings.cognitive),
        ("social", settings.social),
        ("jitter", settings.jitter),
        ("min_separation", settings.min_separation),
        ("restitution", settings.restitution),
        ("goal_radius", settings.goal_radius),
    ];
    for (name, value) in values {
        ensure!(value.is_finite(), "{} must be finite, got {}", name, value);
    }

    ensure!(
        settings.width > 0.0 && settings.height > 0.0,
        "Screen bounds must be positive, got {}x{}",
        settings.width,
        settings.height
    );
    ensure!(
        settings.speed_limit > 0.0,
        "speed_limit must be positive, got {}",
        settings.speed_limit
    );
    ensure!(
        settings.min_separation >= 0.0,
        "min_separation must not be negative, got {}",
        settings.min_separation
    );
    ensure!(
        (0.0..=1.0).contains(&settings.restitution),
        "restitution must lie in [0, 1], got {}",
        settings.restitution
    );
    Ok(())
}

pub fn bounds(settings: &SwarmSettings) -> Bounds {
    Bounds::new(settings.width, settings.height)
}

pub fn swarm_config(settings: &SwarmSettings) -> SwarmConfig {
    SwarmConfig {
        speed_limit: settings.speed_limit,
        inertia: settings.inertia,
        cognitive: settings.cognitive,
        social: settings.social,
        jitter: settings.jitter,
        min_separation: settings.min_separation,
        restitution: settings.restitution,
    }
}
