//! Levels
//!
//! A level supplies the spawn point and the score that wins it. [`LevelSet`]
//! is the ordered list the host steps through; advancing past the last level
//! wraps back to the first.

use serde::{Deserialize, Serialize};

use crate::core::math::Vec3;
use crate::game::terrain::TerrainQuery;

/// Per-level settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level number (1-based)
    pub id: u32,
    /// Score at which the run is won
    pub win_score: u32,
    /// Spawn position; y is used only when the terrain has no data there
    pub spawn: Vec3,
    /// Height above the sampled ground to drop the rider from
    pub spawn_height_offset: f32,
}

impl LevelConfig {
    /// Where the rider appears on `terrain`.
    ///
    /// Drops onto the ground under the spawn xz when the terrain is ready and
    /// has data there; otherwise uses the raw spawn position.
    pub fn spawn_point<T: TerrainQuery + ?Sized>(&self, terrain: &T) -> Vec3 {
        if !terrain.is_ready() {
            return self.spawn;
        }

        match terrain.sample_ground(self.spawn.x, self.spawn.z) {
            Some(ground) => Vec3::new(
                self.spawn.x,
                ground.elevation + self.spawn_height_offset,
                self.spawn.z,
            ),
            None => self.spawn,
        }
    }
}

/// Level lookup errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    /// A level set needs at least one level.
    #[error("level set is empty")]
    Empty,

    /// No level with that id.
    #[error("unknown level {0}")]
    UnknownLevel(u32),

    /// Two levels share an id.
    #[error("duplicate level id {0}")]
    DuplicateId(u32),

    /// Malformed JSON.
    #[error("level parse error: {0}")]
    Parse(String),
}

/// Ordered levels plus the one being played.
///
/// Never empty; build custom sets with [`LevelSet::new`].
#[derive(Clone, Debug)]
pub struct LevelSet {
    levels: Vec<LevelConfig>,
    current: usize,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelSet {
    /// The two shipped levels.
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    id: 1,
                    win_score: 6000,
                    spawn: Vec3::new(0.0, 50.0, 40.0),
                    spawn_height_offset: 2.0,
                },
                LevelConfig {
                    id: 2,
                    win_score: 8000,
                    spawn: Vec3::new(0.0, 300.0, 200.0),
                    spawn_height_offset: 5.0,
                },
            ],
            current: 0,
        }
    }

    /// Custom level list, played in the given order.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }

        for (i, level) in levels.iter().enumerate() {
            if levels[..i].iter().any(|l| l.id == level.id) {
                return Err(LevelError::DuplicateId(level.id));
            }
        }

        Ok(Self { levels, current: 0 })
    }

    /// Parse a JSON array of levels.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelConfig> =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        Self::new(levels)
    }

    /// Level being played.
    pub fn current(&self) -> &LevelConfig {
        &self.levels[self.current]
    }

    /// Advance to the next level, wrapping after the last.
    pub fn next_level(&mut self) -> &LevelConfig {
        self.current = (self.current + 1) % self.levels.len();
        self.current()
    }

    /// Back to the first level.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Look up a level by id.
    pub fn get(&self, id: u32) -> Result<&LevelConfig, LevelError> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or(LevelError::UnknownLevel(id))
    }

    /// Jump straight to a level by id.
    pub fn select(&mut self, id: u32) -> Result<&LevelConfig, LevelError> {
        let index = self
            .levels
            .iter()
            .position(|level| level.id == id)
            .ok_or(LevelError::UnknownLevel(id))?;
        self.current = index;
        Ok(self.current())
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
