//! # Slopestyle
//!
//! Locomotion and trick-scoring simulation for an arcade snowboarding game.
//! Each frame advances the rider's position, velocity and orientation,
//! resolves terrain contact, integrates free-flight rotation from player
//! torque, and turns the rotation accumulated in the air into a named trick
//! and a score on landing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SLOPESTYLE CORE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Primitives                              │
//! │  ├── math.rs      - nalgebra aliases, axes, euler, slerp    │
//! │  └── hash.rs      - State hashing for replay checks         │
//! │                                                             │
//! │  game/            - Rider simulation                        │
//! │  ├── config.rs    - Tuning parameters                       │
//! │  ├── input.rs     - Action flags, recording, replay         │
//! │  ├── terrain.rs   - Ground query + reference terrains       │
//! │  ├── contact.rs   - Five-point ground sensing               │
//! │  ├── meters.rs    - Jump charge, stamina, boost             │
//! │  ├── trick.rs     - Trick accumulation and scoring          │
//! │  ├── state.rs     - Modes, body, progression, snapshot      │
//! │  ├── physics.rs   - Grounded / airborne steps               │
//! │  ├── tick.rs      - Per-frame state machine                 │
//! │  ├── level.rs     - Levels and win thresholds               │
//! │  └── events.rs    - Events for HUD and replay               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Host contract
//!
//! The host owns the render loop. Once per frame it calls
//! [`game::tick::tick`] with the elapsed time, the held actions and a
//! [`game::terrain::TerrainQuery`], then reads
//! [`game::state::RiderState::snapshot`] for camera, HUD and trails.
//! Camera, HUD, meshes and device capture stay outside this crate.
//!
//! ## Determinism
//!
//! The update uses no clocks, randomness or hash maps. The same initial
//! state, inputs, elapsed times and terrain produce the same
//! [`game::state::RiderState::compute_hash`] on the same platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::math::{Quat, Vec3};
pub use game::config::PhysicsConfig;
pub use game::input::{InputDelta, InputFrame, InputRecording};
pub use game::level::{LevelConfig, LevelSet};
pub use game::state::{LocomotionMode, RiderSnapshot, RiderState};
pub use game::terrain::TerrainQuery;
pub use game::tick::{tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reference frame rate for the headless driver and tests (Hz)
pub const DEFAULT_FRAME_RATE: u32 = 60;
