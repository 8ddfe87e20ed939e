//! Resource Meters
//!
//! Two scalars that persist across jumps and reset on spawn:
//! - [`JumpCharge`] in [0, 1], filled by holding jump on the ground
//! - [`Stamina`] in [0, max], drained by boosting, regenerated after idling

use serde::{Deserialize, Serialize};

use crate::game::config::PhysicsConfig;

// =============================================================================
// JUMP CHARGE
// =============================================================================

/// Launch strength meter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpCharge {
    value: f32,
}

impl JumpCharge {
    /// Empty meter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow linearly at `rate` per second, clamped to 1.
    pub fn charge(&mut self, dt: f32, rate: f32) {
        self.value = (self.value + rate * dt).clamp(0.0, 1.0);
    }

    /// Take the stored charge, leaving the meter empty.
    ///
    /// Returns `None` when there was nothing to release.
    pub fn release(&mut self) -> Option<f32> {
        let charge = std::mem::take(&mut self.value);
        (charge > 0.0).then_some(charge)
    }

    /// Discard any stored charge.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Current charge in [0, 1].
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Vertical launch speed for a released charge.
///
/// The rider keeps any upward velocity it already had.
#[inline]
pub fn launch_velocity(current_vy: f32, charge: f32, jump_force: f32) -> f32 {
    current_vy.max(0.0) + jump_force * (0.8 + charge * 1.5)
}

// =============================================================================
// STAMINA
// =============================================================================

/// Boost fuel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stamina {
    value: f32,
    max: f32,
    /// Seconds since boost was last applied
    idle_time: f32,
}

impl Stamina {
    /// Full meter.
    pub fn new(max: f32) -> Self {
        Self {
            value: max,
            max,
            idle_time: 0.0,
        }
    }

    /// Full meter sized from config.
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.stamina_max)
    }

    /// Advance one frame. Returns true if boost is applied this frame.
    ///
    /// `wants_boost` is the caller's gate (boost held, grounded, moving);
    /// the meter adds its own minimum-fuel check.
    pub fn update(&mut self, dt: f32, wants_boost: bool, config: &PhysicsConfig) -> bool {
        let boosting = wants_boost && self.value > config.stamina_min_to_boost;

        if boosting {
            self.value -= config.stamina_drain_rate * dt;
            self.idle_time = 0.0;
        } else {
            self.idle_time += dt;
            if self.idle_time > config.stamina_regen_delay {
                self.value += config.stamina_regen_rate * dt;
            }
        }

        self.value = self.value.clamp(0.0, self.max);
        boosting
    }

    /// Refill and clear the idle timer.
    pub fn reset(&mut self) {
        self.value = self.max;
        self.idle_time = 0.0;
    }

    /// Raw stamina in [0, max].
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Capacity.
    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Stamina as a fraction of capacity.
    #[inline]
    pub fn normalized(&self) -> f32 {
        if self.max > 0.0 {
            self.value / self.max
        } else {
            0.0
        }
    }
}

/// Forward acceleration while boosting at `speed`.
///
/// `base + fraction * speed`, tapered linearly from full strength at rest to
/// `boost_taper_floor` of it at `max_speed` and above.
pub fn boost_acceleration(speed: f32, config: &PhysicsConfig) -> f32 {
    let raw = config.boost_base_accel + config.boost_speed_fraction * speed.max(0.0);
    let t = (speed / config.max_speed).clamp(0.0, 1.0);
    let taper = 1.0 - (1.0 - config.boost_taper_floor) * t;
    raw * taper
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_jump_charge_clamps() {
        let config = PhysicsConfig::default();
        let mut jump = JumpCharge::new();

        // 0.67 s at 1.5/s would be 1.005
        jump.charge(0.67, config.jump_charge_rate);
        assert_eq!(jump.value(), 1.0);

        let released = jump.release().expect("charged");
        assert_eq!(released, 1.0);
        assert_eq!(jump.value(), 0.0);
        let vy = launch_velocity(0.0, released, config.jump_force);
        assert!((vy - config.jump_force * 2.3).abs() < 1.0e-4);
    }

    #[test]
    fn test_release_empty() {
        let mut jump = JumpCharge::new();
        assert_eq!(jump.release(), None);
    }

    #[test]
    fn test_launch_keeps_upward_velocity_only() {
        assert_eq!(launch_velocity(-5.0, 0.0, 10.0), 8.0);
        assert_eq!(launch_velocity(2.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_stamina_drains_while_boosting() {
        let config = PhysicsConfig::default();
        let mut stamina = Stamina::from_config(&config);

        assert!(stamina.update(1.0, true, &config));
        assert!((stamina.value() - 75.0).abs() < 1.0e-4);
        assert!((stamina.normalized() - 0.75).abs() < 1.0e-6);
    }

    #[test]
    fn test_stamina_empties_and_stops_boost() {
        let config = PhysicsConfig::default();
        let mut stamina = Stamina::from_config(&config);

        for _ in 0..(6 * 60) {
            stamina.update(DT, true, &config);
        }
        assert_eq!(stamina.value(), 0.0);
        assert!(!stamina.update(DT, true, &config));
    }

    #[test]
    fn test_stamina_regen_waits_for_delay() {
        let config = PhysicsConfig::default();
        let mut stamina = Stamina::from_config(&config);
        stamina.update(2.0, true, &config);
        let drained = stamina.value();

        // Within the delay: no regen
        stamina.update(0.5, false, &config);
        assert_eq!(stamina.value(), drained);

        // Past it: regenerates
        stamina.update(0.6, false, &config);
        assert!(stamina.value() > drained);

        // Long idle: full, never above max
        stamina.update(100.0, false, &config);
        assert_eq!(stamina.value(), config.stamina_max);
    }

    #[test]
    fn test_boost_taper() {
        let config = PhysicsConfig::default();

        assert_eq!(boost_acceleration(0.0, &config), config.boost_base_accel);

        let at_max = boost_acceleration(config.max_speed, &config);
        let raw = config.boost_base_accel + config.boost_speed_fraction * config.max_speed;
        assert!((at_max - raw * config.boost_taper_floor).abs() < 1.0e-4);

        // Beyond the ceiling the taper stays at the floor
        let beyond = boost_acceleration(config.max_speed * 2.0, &config);
        let raw_beyond =
            config.boost_base_accel + config.boost_speed_fraction * config.max_speed * 2.0;
        assert!((beyond - raw_beyond * config.boost_taper_floor).abs() < 1.0e-3);
    }
}
