//! Input Actions and Recording
//!
//! The host samples its devices once per frame and hands the simulation an
//! [`InputFrame`]: a packed set of held actions. Raw key/touch capture lives
//! outside this crate.
//!
//! [`InputRecording`] stores a run (elapsed time + actions per frame) with the
//! action flags delta-compressed, for replay and determinism checks.

use serde::{Deserialize, Serialize};

use crate::core::hash::{StateHash, StateHasher};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Actions held during a single frame.
///
/// Flags (packed bits):
/// - Bit 0: Move forward (push / nose-down pitch in air)
/// - Bit 1: Move backward (brake / tail-down pitch in air)
/// - Bit 2: Turn left
/// - Bit 3: Turn right
/// - Bit 4: Jump held
/// - Bit 5: Boost held
/// - Bit 6: Spin left (roll in air)
/// - Bit 7: Spin right (roll in air)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    /// Action flags
    pub flags: u8,
}

impl InputFrame {
    /// Move-forward flag bit
    pub const FORWARD: u8 = 0x01;
    /// Move-backward flag bit
    pub const BACKWARD: u8 = 0x02;
    /// Turn-left flag bit
    pub const LEFT: u8 = 0x04;
    /// Turn-right flag bit
    pub const RIGHT: u8 = 0x08;
    /// Jump-held flag bit
    pub const JUMP: u8 = 0x10;
    /// Boost-held flag bit
    pub const BOOST: u8 = 0x20;
    /// Spin-left flag bit
    pub const SPIN_LEFT: u8 = 0x40;
    /// Spin-right flag bit
    pub const SPIN_RIGHT: u8 = 0x80;

    /// Create an idle frame (nothing held).
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame from raw flags.
    pub const fn from_flags(flags: u8) -> Self {
        Self { flags }
    }

    /// Return a copy with `flag` held.
    #[inline]
    pub const fn with(self, flag: u8) -> Self {
        Self {
            flags: self.flags | flag,
        }
    }

    /// Check a flag.
    #[inline]
    pub fn held(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Set or clear a flag.
    #[inline]
    pub fn set(&mut self, flag: u8, pressed: bool) {
        if pressed {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Check if move-forward is held.
    #[inline]
    pub fn forward(&self) -> bool {
        self.held(Self::FORWARD)
    }

    /// Check if move-backward is held.
    #[inline]
    pub fn backward(&self) -> bool {
        self.held(Self::BACKWARD)
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump(&self) -> bool {
        self.held(Self::JUMP)
    }

    /// Check if boost is held.
    #[inline]
    pub fn boost(&self) -> bool {
        self.held(Self::BOOST)
    }

    /// Turn axis: +1 left, -1 right, 0 for none or both.
    #[inline]
    pub fn turn_axis(&self) -> f32 {
        axis(self.held(Self::LEFT), self.held(Self::RIGHT))
    }

    /// Pitch axis: +1 backward (tail down), -1 forward (nose down).
    #[inline]
    pub fn pitch_axis(&self) -> f32 {
        axis(self.held(Self::BACKWARD), self.held(Self::FORWARD))
    }

    /// Roll axis: +1 spin left, -1 spin right.
    #[inline]
    pub fn spin_axis(&self) -> f32 {
        axis(self.held(Self::SPIN_LEFT), self.held(Self::SPIN_RIGHT))
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

#[inline]
fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Action change at a given frame.
///
/// Only stored when input CHANGES (not every frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Frame when this input state began
    pub frame: u32,
    /// The new input state
    pub input: InputFrame,
}

/// Complete input recording for one run.
///
/// Elapsed time is stored per frame (hosts run at variable frame rates);
/// action flags are stored only when they change.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Elapsed seconds per frame
    dts: Vec<f32>,

    /// Delta-compressed action flags
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_input: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame.
    pub fn record(&mut self, dt: f32, input: InputFrame) {
        let frame = self.dts.len() as u32;
        self.dts.push(dt);

        // First frame always stored so replay never guesses
        if frame == 0 || input != self.last_input {
            self.deltas.push(InputDelta { frame, input });
            self.last_input = input;
        }
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.dts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.dts.is_empty()
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Get input at a specific frame.
    ///
    /// Uses binary search over the deltas.
    pub fn input_at(&self, frame: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.frame <= frame);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].input
        }
    }

    /// Elapsed time of a specific frame.
    pub fn dt_at(&self, frame: u32) -> Option<f32> {
        self.dts.get(frame as usize).copied()
    }

    /// Total recorded time in seconds.
    pub fn duration(&self) -> f32 {
        self.dts.iter().sum()
    }

    /// Digest of the recording contents.
    pub fn digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u64(self.dts.len() as u64);
        for dt in &self.dts {
            hasher.update_f32(*dt);
        }
        for delta in &self.deltas {
            hasher.update_u32(delta.frame);
            hasher.update_u8(delta.input.flags);
        }
        hasher.finalize()
    }

    /// Iterate `(dt, input)` per frame for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            frame: 0,
            delta_idx: 0,
            current: InputFrame::new(),
        }
    }
}

/// Iterator for replaying a recording frame-by-frame.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    frame: u32,
    delta_idx: usize,
    current: InputFrame,
}

impl Iterator for ReplayIterator<'_> {
    type Item = (f32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        let dt = self.recording.dt_at(self.frame)?;

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.frame > self.frame {
                break;
            }
            self.current = delta.input;
            self.delta_idx += 1;
        }

        self.frame += 1;
        Some((dt, self.current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.recording.len().saturating_sub(self.frame as usize);
        (remaining, Some(remaining))
    }
}

// =============================================================================
// TESTS
// =============================================================================
