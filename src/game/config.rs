//! Simulation Tuning
//!
//! Every constant the rider simulation uses lives in [`PhysicsConfig`].
//! Defaults are the tuned arcade values; hosts may load overrides from JSON
//! (missing fields keep their defaults) and must call
//! [`PhysicsConfig::validate`] before simulating.
//!
//! Units: meters, seconds, radians.

use serde::{Deserialize, Serialize};

/// Tuning parameters for locomotion, meters and scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // =========================================================================
    // Gravity & contact
    // =========================================================================
    /// Gravity magnitude (m/s², positive)
    pub gravity: f32,

    /// Vertical distance within which the rider counts as touching ground
    pub snap_distance: f32,

    /// Largest upward velocity that still allows a landing (m/s)
    pub landing_upward_tolerance: f32,

    /// Landings with dot(body up, ground normal) below this crash
    pub crash_alignment: f32,

    /// Half-extents (x, z) of the board footprint used for ground sensing
    pub footprint_half_width: f32,
    /// See `footprint_half_width`
    pub footprint_half_length: f32,

    // =========================================================================
    // Grounded handling
    // =========================================================================
    /// Yaw steering rate (rad/s)
    pub turn_speed: f32,

    /// Velocity decay rate while carving (1/s)
    pub friction: f32,

    /// Velocity decay rate while braking (1/s)
    pub brake_friction: f32,

    /// Speed ceiling (m/s); also the boost taper reference
    pub max_speed: f32,

    /// Fraction-per-second rate of the orientation slerp toward the surface
    pub align_rate: f32,

    /// Below this speed orientation is not re-aligned to velocity (m/s)
    pub min_align_speed: f32,

    /// Forward push acceleration when slow (m/s²)
    pub push_acceleration: f32,

    /// Push only applies below this speed (m/s)
    pub push_max_speed: f32,

    // =========================================================================
    // Jump charge
    // =========================================================================
    /// Base launch impulse (m/s)
    pub jump_force: f32,

    /// Charge gained per second of holding jump
    pub jump_charge_rate: f32,

    /// Charge is discarded once airborne longer than this (s)
    pub jump_charge_air_reset: f32,

    // =========================================================================
    // Stamina & boost
    // =========================================================================
    /// Stamina capacity
    pub stamina_max: f32,

    /// Stamina drained per second while boosting
    pub stamina_drain_rate: f32,

    /// Idle time before stamina starts regenerating (s)
    pub stamina_regen_delay: f32,

    /// Stamina regenerated per second once idle
    pub stamina_regen_rate: f32,

    /// Boost needs at least this much stamina
    pub stamina_min_to_boost: f32,

    /// Constant part of boost acceleration (m/s²)
    pub boost_base_accel: f32,

    /// Speed-proportional part of boost acceleration (1/s)
    pub boost_speed_fraction: f32,

    /// Boost effectiveness at `max_speed`, [0, 1]
    pub boost_taper_floor: f32,

    // =========================================================================
    // Airborne rotation
    // =========================================================================
    /// Angular acceleration from pitch input (rad/s²)
    pub pitch_torque: f32,

    /// Angular acceleration from turn input (rad/s²)
    pub yaw_torque: f32,

    /// Angular acceleration from spin input (rad/s²)
    pub roll_torque: f32,

    /// Angular velocity decay rate (1/s)
    pub angular_damping: f32,

    // =========================================================================
    // Crash recovery & progression
    // =========================================================================
    /// Time spent crashed before getting back up (s)
    pub recovery_time: f32,

    /// Upward nudge applied on recovery (m)
    pub recovery_nudge: f32,

    /// Forward speed given on recovery (m/s)
    pub recovery_kick: f32,

    /// Lives at spawn
    pub starting_lives: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            snap_distance: 1.0,
            landing_upward_tolerance: 0.1,
            crash_alignment: 0.2,
            footprint_half_width: 0.3,
            footprint_half_length: 0.7,

            turn_speed: 3.0,
            friction: 0.2,
            brake_friction: 5.0,
            max_speed: 60.0,
            align_rate: 10.0,
            min_align_speed: 0.1,
            push_acceleration: 4.0,
            push_max_speed: 5.0,

            jump_force: 12.0,
            jump_charge_rate: 1.5,
            jump_charge_air_reset: 0.25,

            stamina_max: 100.0,
            stamina_drain_rate: 25.0,
            stamina_regen_delay: 1.0,
            stamina_regen_rate: 20.0,
            stamina_min_to_boost: 0.01,
            boost_base_accel: 20.0,
            boost_speed_fraction: 0.5,
            boost_taper_floor: 0.3,

            pitch_torque: 12.0,
            yaw_torque: 14.0,
            roll_torque: 10.0,
            angular_damping: 3.0,

            recovery_time: 2.0,
            recovery_nudge: 1.0,
            recovery_kick: 5.0,
            starting_lives: 3,
        }
    }
}

impl PhysicsConfig {
    /// Parse a (possibly partial) config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("snap_distance", self.snap_distance),
            ("turn_speed", self.turn_speed),
            ("max_speed", self.max_speed),
            ("align_rate", self.align_rate),
            ("jump_force", self.jump_force),
            ("jump_charge_rate", self.jump_charge_rate),
            ("stamina_max", self.stamina_max),
            ("recovery_time", self.recovery_time),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("landing_upward_tolerance", self.landing_upward_tolerance),
            ("footprint_half_width", self.footprint_half_width),
            ("footprint_half_length", self.footprint_half_length),
            ("friction", self.friction),
            ("brake_friction", self.brake_friction),
            ("min_align_speed", self.min_align_speed),
            ("push_acceleration", self.push_acceleration),
            ("push_max_speed", self.push_max_speed),
            ("jump_charge_air_reset", self.jump_charge_air_reset),
            ("stamina_drain_rate", self.stamina_drain_rate),
            ("stamina_regen_delay", self.stamina_regen_delay),
            ("stamina_regen_rate", self.stamina_regen_rate),
            ("stamina_min_to_boost", self.stamina_min_to_boost),
            ("boost_base_accel", self.boost_base_accel),
            ("boost_speed_fraction", self.boost_speed_fraction),
            ("pitch_torque", self.pitch_torque),
            ("yaw_torque", self.yaw_torque),
            ("roll_torque", self.roll_torque),
            ("angular_damping", self.angular_damping),
            ("recovery_nudge", self.recovery_nudge),
            ("recovery_kick", self.recovery_kick),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if !(-1.0..=1.0).contains(&self.crash_alignment) {
            return Err(ConfigError::OutOfRange {
                name: "crash_alignment",
                value: self.crash_alignment,
                min: -1.0,
                max: 1.0,
            });
        }

        if !(0.0..=1.0).contains(&self.boost_taper_floor) {
            return Err(ConfigError::OutOfRange {
                name: "boost_taper_floor",
                value: self.boost_taper_floor,
                min: 0.0,
                max: 1.0,
            });
        }

        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Field must be finite and > 0.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Field must be finite and >= 0.
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Field outside its allowed interval.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// Rider must spawn with at least one life.
    #[error("starting_lives must be at least 1")]
    NoLives,

    /// Malformed JSON.
    #[error("config parse error: {0}")]
    Parse(String),
}
