//! Game Logic Module
//!
//! The rider simulation. Single-threaded and frame-stepped: one [`tick`]
//! per rendered frame, nothing runs concurrently with it.
//!
//! ## Module Structure
//!
//! - `config`: Tuning parameters and validation
//! - `input`: Per-frame action flags, recording and replay
//! - `terrain`: Ground query trait and reference terrains
//! - `contact`: Five-point ground sensing
//! - `meters`: Jump charge and stamina
//! - `trick`: Rotation accumulation and trick scoring
//! - `state`: Locomotion mode, body, progression, snapshot
//! - `physics`: Grounded and airborne physics steps
//! - `tick`: The per-frame update and replay
//! - `level`: Level configs and progression
//! - `events`: Game events for notification and replay
//!
//! [`tick`]: tick::tick

pub mod config;
pub mod contact;
pub mod events;
pub mod input;
pub mod level;
pub mod meters;
pub mod physics;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod trick;

// Re-export key types
pub use config::{ConfigError, PhysicsConfig};
pub use events::{GameEvent, GameEventData};
pub use input::{InputFrame, InputRecording};
pub use level::{LevelConfig, LevelError, LevelSet};
pub use state::{LocomotionMode, RiderSnapshot, RiderState};
pub use terrain::{GroundSample, TerrainQuery};
pub use tick::{SkipReason, TickResult};
pub use trick::TrickResult;
