//! Trick Scoring
//!
//! While the rider is airborne, every orientation sample is compared with the
//! previous one and the increment is split into spin (yaw), flip (pitch) and
//! roll. Each axis accumulates the *absolute* angle, so rocking back and forth
//! still counts. On landing the totals are snapped to whole rotations and
//! turned into a trick name and score.
//!
//! ## Scoring
//!
//! ```text
//! flips = round(pitch / 360)          1 → "Backflip"         500 × flips
//!                                     2 → "Double Backflip"
//!                                    3+ → "Triple Backflip"
//! spin  = round(yaw / 180) * 180      name "<spin>"          + spin
//!
//! roll > 90 and spin > 0 and flips > 0 → name "Cork <spin>", score × 1.5
//! otherwise roll > 360                 → append "Barrel Roll", + 500
//! ```
//!
//! `round` is round-half-to-even: exactly 90° of yaw is 0.5 half-turns and
//! snaps to no spin; 180° of pitch snaps to no flip.

use serde::{Deserialize, Serialize};

use crate::core::math::{euler_yxz, Quat};

/// Points per completed flip.
pub const POINTS_PER_FLIP: f32 = 500.0;

/// Bonus for a barrel roll.
pub const BARREL_ROLL_POINTS: f32 = 500.0;

/// Cork score multiplier.
pub const CORK_MULTIPLIER: f32 = 1.5;

/// Roll (degrees) above which a flipping spin is a cork.
pub const CORK_ROLL_DEG: f32 = 90.0;

/// Roll (degrees) above which a barrel roll is awarded.
pub const BARREL_ROLL_DEG: f32 = 360.0;

/// Accumulated absolute rotation per axis, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRotation {
    /// About world X
    pub pitch_deg: f32,
    /// About world Y
    pub yaw_deg: f32,
    /// About world Z
    pub roll_deg: f32,
}

impl AxisRotation {
    /// Rotation totals from degrees.
    pub fn new(pitch_deg: f32, yaw_deg: f32, roll_deg: f32) -> Self {
        Self {
            pitch_deg,
            yaw_deg,
            roll_deg,
        }
    }
}

/// Named, scored trick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickResult {
    /// Display name; empty when nothing was landed
    pub name: String,
    /// Points awarded
    pub points: u32,
}

impl TrickResult {
    /// No trick.
    pub fn none() -> Self {
        Self::default()
    }

    /// True when nothing scored.
    pub fn is_empty(&self) -> bool {
        self.points == 0
    }
}

/// Per-jump rotation bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrickAccumulator {
    rotation: AxisRotation,
    last: Quat,
    active: bool,
}

impl Default for TrickAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl TrickAccumulator {
    /// Create an inactive accumulator.
    pub fn new() -> Self {
        Self {
            rotation: AxisRotation::default(),
            last: Quat::identity(),
            active: false,
        }
    }

    /// Begin a jump from `orientation`.
    pub fn start(&mut self, orientation: &Quat) {
        self.rotation = AxisRotation::default();
        self.last = *orientation;
        self.active = true;
    }

    /// Feed the orientation after this frame's integration.
    ///
    /// The increment is the world-frame rotation `current · last⁻¹`, split
    /// about the world axes.
    pub fn update(&mut self, orientation: &Quat) {
        if !self.active {
            return;
        }

        let delta = orientation * self.last.inverse();
        let euler = euler_yxz(&delta);

        self.rotation.yaw_deg += euler.yaw.abs().to_degrees();
        self.rotation.pitch_deg += euler.pitch.abs().to_degrees();
        self.rotation.roll_deg += euler.roll.abs().to_degrees();

        self.last = *orientation;
    }

    /// Finish the jump and score it.
    ///
    /// Returns an empty result when no jump is in progress, so a second call
    /// without a new `start` scores nothing.
    pub fn land(&mut self) -> TrickResult {
        if !self.active {
            return TrickResult::none();
        }
        self.active = false;

        let result = evaluate(&self.rotation);
        self.rotation = AxisRotation::default();
        result
    }

    /// Abandon the jump without scoring (crash).
    pub fn cancel(&mut self) {
        self.active = false;
        self.rotation = AxisRotation::default();
    }

    /// Whether a jump is being tracked.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rotation accumulated so far.
    pub fn rotation(&self) -> AxisRotation {
        self.rotation
    }
}

/// Name and score a rotation history.
pub fn evaluate(rotation: &AxisRotation) -> TrickResult {
    let flips = snap(rotation.pitch_deg, 360.0) as u32;
    let spin = (snap(rotation.yaw_deg, 180.0) * 180.0) as u32;

    let mut parts: Vec<String> = Vec::new();
    let mut score = 0.0f32;

    if flips > 0 {
        parts.push(flip_name(flips).to_string());
        score += POINTS_PER_FLIP * flips as f32;
    }

    if spin > 0 {
        parts.push(spin.to_string());
        score += spin as f32;
    }

    let name = if rotation.roll_deg > CORK_ROLL_DEG && spin > 0 && flips > 0 {
        score *= CORK_MULTIPLIER;
        format!("Cork {spin}")
    } else {
        if rotation.roll_deg > BARREL_ROLL_DEG {
            parts.push("Barrel Roll".to_string());
            score += BARREL_ROLL_POINTS;
        }
        parts.join(" ")
    };

    if score <= 0.0 {
        return TrickResult::none();
    }

    TrickResult {
        name,
        points: score.floor() as u32,
    }
}

/// Whole multiples of `unit` in `degrees`, ties to even.
#[inline]
fn snap(degrees: f32, unit: f32) -> f32 {
    (degrees.max(0.0) / unit).round_ties_even()
}

fn flip_name(flips: u32) -> &'static str {
    match flips {
        1 => "Backflip",
        2 => "Double Backflip",
        _ => "Triple Backflip",
    }
}

// =============================================================================
// TESTS
// =============================================================================
