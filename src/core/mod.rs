//! Core primitives.
//!
//! Math helpers and state hashing shared by the simulation. Nothing here
//! knows about riders, terrain, or scoring.

pub mod math;
pub mod hash;

// Re-export core types
pub use math::{Quat, Vec3};
pub use hash::{compute_state_hash, StateHash, StateHasher};
