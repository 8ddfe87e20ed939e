//! Rider State Definitions
//!
//! Everything the frame update owns and mutates. Hosts read it through
//! [`RiderState::snapshot`] after the update returns; nothing else writes it.

use serde::{Deserialize, Serialize};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::math::{forward_of, up_of, Quat, Vec3};
use crate::game::config::PhysicsConfig;
use crate::game::events::GameEvent;
use crate::game::level::LevelConfig;
use crate::game::meters::{JumpCharge, Stamina};
use crate::game::terrain::TerrainQuery;
use crate::game::trick::{TrickAccumulator, TrickResult};

// =============================================================================
// LOCOMOTION MODE
// =============================================================================

/// What the rider is doing. Exactly one is active.
///
/// `Dead` and `Won` are absorbing: only a reset leaves them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LocomotionMode {
    /// On the snow, surface-relative physics
    Grounded,
    /// Free flight under gravity and player torque
    Airborne {
        /// Seconds since leaving the ground
        air_time: f32,
    },
    /// Lying on the side after a failed landing
    Crashed {
        /// Seconds until the rider gets back up
        recovery_timer: f32,
    },
    /// Out of lives
    Dead,
    /// Win score reached
    Won,
}

impl Default for LocomotionMode {
    fn default() -> Self {
        LocomotionMode::Airborne { air_time: 0.0 }
    }
}

impl LocomotionMode {
    /// Fresh airborne mode.
    pub const fn airborne() -> Self {
        LocomotionMode::Airborne { air_time: 0.0 }
    }

    /// On the ground?
    #[inline]
    pub fn is_grounded(&self) -> bool {
        matches!(self, LocomotionMode::Grounded)
    }

    /// In the air?
    #[inline]
    pub fn is_airborne(&self) -> bool {
        matches!(self, LocomotionMode::Airborne { .. })
    }

    /// Crashed and recovering?
    #[inline]
    pub fn is_crashed(&self) -> bool {
        matches!(self, LocomotionMode::Crashed { .. })
    }

    /// Out of lives?
    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self, LocomotionMode::Dead)
    }

    /// Level won?
    #[inline]
    pub fn is_won(&self) -> bool {
        matches!(self, LocomotionMode::Won)
    }

    /// Dead or Won.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_dead() || self.is_won()
    }

    /// Stable discriminant for hashing.
    pub fn tag(&self) -> u8 {
        match self {
            LocomotionMode::Grounded => 0,
            LocomotionMode::Airborne { .. } => 1,
            LocomotionMode::Crashed { .. } => 2,
            LocomotionMode::Dead => 3,
            LocomotionMode::Won => 4,
        }
    }
}

// =============================================================================
// BODY & PROGRESSION
// =============================================================================

/// Kinematic state of the rider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// World position (m)
    pub position: Vec3,
    /// World velocity (m/s)
    pub velocity: Vec3,
    /// Body orientation, kept unit length
    pub orientation: Quat,
    /// World angular velocity (rad/s)
    pub angular_velocity: Vec3,
}

impl BodyState {
    /// At rest at `position`, facing -Z.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            orientation: Quat::identity(),
            angular_velocity: Vec3::zeros(),
        }
    }

    /// Speed (m/s).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Body forward in world space.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_of(&self.orientation)
    }

    /// Body up in world space.
    #[inline]
    pub fn up(&self) -> Vec3 {
        up_of(&self.orientation)
    }
}

/// Score and lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Accumulated trick points
    pub score: u32,
    /// Lives left
    pub lives: u32,
    /// Score that wins the level
    pub win_score: u32,
}

impl Progression {
    /// Fresh progression.
    pub fn new(lives: u32, win_score: u32) -> Self {
        Self {
            score: 0,
            lives,
            win_score,
        }
    }

    /// Add points, returning the new total.
    pub fn add_score(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Lose a life, returning how many are left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Win threshold reached?
    #[inline]
    pub fn has_won(&self) -> bool {
        self.score >= self.win_score
    }
}

// =============================================================================
// RIDER STATE
// =============================================================================

/// Complete simulation state for one rider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiderState {
    /// Frames simulated since spawn (skipped and terminal frames excluded)
    pub frame: u64,

    /// Kinematics
    pub body: BodyState,

    /// Current mode
    pub mode: LocomotionMode,

    /// Rotation bookkeeping for the current jump
    pub trick: TrickAccumulator,

    /// Jump charge meter
    pub jump: JumpCharge,

    /// Boost fuel
    pub stamina: Stamina,

    /// Score, lives and win threshold
    pub progression: Progression,

    /// Most recent scored trick, for transient display
    pub last_trick: Option<TrickResult>,

    /// Events generated this frame (drained by the update)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl RiderState {
    /// Spawn at `position`, dropping onto the terrain.
    pub fn new(position: Vec3, win_score: u32, config: &PhysicsConfig) -> Self {
        Self {
            frame: 0,
            body: BodyState::at(position),
            mode: LocomotionMode::airborne(),
            trick: TrickAccumulator::new(),
            jump: JumpCharge::new(),
            stamina: Stamina::from_config(config),
            progression: Progression::new(config.starting_lives, win_score),
            last_trick: None,
            pending_events: Vec::new(),
        }
    }

    /// Spawn at a level's spawn point on `terrain`.
    pub fn for_level<T: TerrainQuery + ?Sized>(
        level: &LevelConfig,
        terrain: &T,
        config: &PhysicsConfig,
    ) -> Self {
        Self::new(level.spawn_point(terrain), level.win_score, config)
    }

    /// Reinitialize everything at a new spawn (level change, retry).
    pub fn reset(&mut self, position: Vec3, win_score: u32, config: &PhysicsConfig) {
        *self = Self::new(position, win_score, config);
    }

    /// Add trick points, returning the new total.
    pub fn add_score(&mut self, points: u32) -> u32 {
        self.progression.add_score(points)
    }

    /// Read-only view for camera, HUD and trail collaborators.
    pub fn snapshot(&self) -> RiderSnapshot {
        RiderSnapshot {
            frame: self.frame,
            position: self.body.position,
            orientation: self.body.orientation,
            velocity: self.body.velocity,
            score: self.progression.score,
            lives: self.progression.lives,
            stamina: self.stamina.normalized(),
            jump_charge: self.jump.value(),
            grounded: self.mode.is_grounded(),
            crashed: self.mode.is_crashed(),
            dead: self.mode.is_dead(),
            won: self.mode.is_won(),
            last_trick: self.last_trick.clone(),
        }
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.frame, |hasher| {
            let body = &self.body;
            hasher.update_vec3(&body.position);
            hasher.update_vec3(&body.velocity);
            hasher.update_quat(&body.orientation);
            hasher.update_vec3(&body.angular_velocity);

            hasher.update_u8(self.mode.tag());
            match self.mode {
                LocomotionMode::Airborne { air_time } => hasher.update_f32(air_time),
                LocomotionMode::Crashed { recovery_timer } => hasher.update_f32(recovery_timer),
                _ => {}
            }

            let rotation = self.trick.rotation();
            hasher.update_bool(self.trick.is_active());
            hasher.update_f32(rotation.pitch_deg);
            hasher.update_f32(rotation.yaw_deg);
            hasher.update_f32(rotation.roll_deg);

            hasher.update_f32(self.jump.value());
            hasher.update_f32(self.stamina.value());

            hasher.update_u32(self.progression.score);
            hasher.update_u32(self.progression.lives);

            hasher.update_bool(self.last_trick.is_some());
            if let Some(trick) = &self.last_trick {
                hasher.update_str(&trick.name);
                hasher.update_u32(trick.points);
            }
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

/// Post-update view of the rider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiderSnapshot {
    /// Frame counter
    pub frame: u64,
    /// World position
    pub position: Vec3,
    /// Body orientation
    pub orientation: Quat,
    /// World velocity
    pub velocity: Vec3,
    /// Score
    pub score: u32,
    /// Lives left
    pub lives: u32,
    /// Stamina fraction, [0, 1]
    pub stamina: f32,
    /// Jump charge, [0, 1]
    pub jump_charge: f32,
    /// On the ground
    pub grounded: bool,
    /// Crashed and recovering
    pub crashed: bool,
    /// Out of lives
    pub dead: bool,
    /// Level won
    pub won: bool,
    /// Most recent scored trick
    pub last_trick: Option<TrickResult>,
}

// =============================================================================
// TESTS
// =============================================================================
