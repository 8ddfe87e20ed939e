//! State Hashing for Verification
//!
//! Provides deterministic hashing of rider state for:
//! - Replay validation (record a run, replay it, compare digests)
//! - Regression checks on tuning changes
//!
//! Floats are hashed by their IEEE-754 bit patterns, so two runs only hash
//! equal when every intermediate value matched exactly.

use sha2::{Digest, Sha256};

use super::math::{Quat, Vec3};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for simulation state.
///
/// Wraps SHA-256 with helpers for the math types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for rider state.
    pub fn for_rider_state() -> Self {
        Self::new(b"SLOPESTYLE_RIDER_V1")
    }

    /// Create hasher for input recordings.
    pub fn for_input_recording() -> Self {
        Self::new(b"SLOPESTYLE_INPUTS_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f32 (bit pattern, little-endian).
    #[inline]
    pub fn update_f32(&mut self, value: f32) {
        self.update_u32(value.to_bits());
    }

    /// Update with a vector.
    #[inline]
    pub fn update_vec3(&mut self, value: &Vec3) {
        self.update_f32(value.x);
        self.update_f32(value.y);
        self.update_f32(value.z);
    }

    /// Update with an orientation (i, j, k, w).
    #[inline]
    pub fn update_quat(&mut self, value: &Quat) {
        let q = value.quaternion();
        self.update_f32(q.i);
        self.update_f32(q.j);
        self.update_f32(q.k);
        self.update_f32(q.w);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a UTF-8 string, length-prefixed.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// This function is called by `RiderState::compute_hash()`.
/// The closure adds state-specific data after the frame counter.
pub fn compute_state_hash<F>(frame: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_rider_state();

    // Always hash the frame counter first
    hasher.update_u64(frame);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
