use anyhow::{Context, Result};
use pso_shared::GoalUpdate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Scripted goal relocations, one JSON `GoalUpdate` per line
///
/// Stands in for pointer-drag input when the simulation runs headless.
#[derive(Debug, Clone, Default)]
pub struct GoalScript {
    updates: Vec<GoalUpdate>,
    cursor: usize,
}

impl GoalScript {
    pub fn new(mut updates: Vec<GoalUpdate>) -> Self {
        // stable, so same-frame updates keep file order
        updates.sort_by_key(|u| u.frame);
        Self { updates, cursor: 0 }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open goal script {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses JSON lines, skipping blank lines and `#` comments.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut updates = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let update: GoalUpdate = serde_json::from_str(trimmed)
                .with_context(|| format!("Invalid goal update on line {}", number + 1))?;
            updates.push(update);
        }

        Ok(Self::new(updates))
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Returns the updates scheduled at or before `frame` not yet handed out.
    pub fn due(&mut self, frame: u64) -> &[GoalUpdate] {
        let start = self.cursor;
        while self.cursor < self.updates.len() && self.updates[self.cursor].frame <= frame {
            self.cursor += 1;
        }
        &self.updates[start..self.cursor]
    }
}
