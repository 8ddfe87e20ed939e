//! Grounded and Airborne Physics
//!
//! Per-mode physics steps run by the frame update after the mode has been
//! resolved. Mode changes themselves (takeoff, landing, crash) belong to
//! [`crate::game::tick`]; the only exception is a jump release, which is
//! reported back as a [`Launch`] for the caller to act on.
//!
//! ## Grounded step order
//!
//! ```text
//! steer → jump charge/release → friction → push → boost
//!       → slope gravity → speed cap → surface contact → align
//! ```

use crate::core::math::{
    forward_of, integrate_orientation, look_rotation, project_on_plane, rotate_about_up, Quat,
    Vec3, VEC_EPS,
};
use crate::game::config::PhysicsConfig;
use crate::game::input::InputFrame;
use crate::game::meters::{boost_acceleration, launch_velocity};
use crate::game::state::{LocomotionMode, RiderState};

/// Ground under the rider for a grounded frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ground {
    /// Mean sampled elevation
    pub elevation: f32,
    /// Mean unit normal
    pub normal: Vec3,
}

/// A released jump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    /// Charge at release
    pub charge: f32,
    /// Vertical velocity after the impulse
    pub velocity: f32,
}

// =============================================================================
// GROUNDED
// =============================================================================

/// One grounded frame.
///
/// Returns `Some` when a charged jump was released; the body already carries
/// the launch velocity and the remaining grounded steps were skipped.
pub fn grounded_step(
    state: &mut RiderState,
    input: InputFrame,
    dt: f32,
    ground: &Ground,
    config: &PhysicsConfig,
) -> Option<Launch> {
    let normal = ground.normal;

    steer(state, input, dt, config);

    if input.jump() {
        state.jump.charge(dt, config.jump_charge_rate);
    } else if let Some(charge) = state.jump.release() {
        let vy = launch_velocity(state.body.velocity.y, charge, config.jump_force);
        state.body.velocity.y = vy;
        return Some(Launch {
            charge,
            velocity: vy,
        });
    }

    let body = &mut state.body;

    // Friction
    let rate = if input.backward() {
        config.brake_friction
    } else {
        config.friction
    };
    body.velocity *= friction_factor(rate, dt);

    // Push off when slow
    if input.forward() && body.speed() < config.push_max_speed {
        let along_ground = project_on_plane(&forward_of(&body.orientation), &normal);
        if let Some(dir) = along_ground.try_normalize(VEC_EPS) {
            body.velocity += dir * config.push_acceleration * dt;
        }
    }

    // Boost
    let speed = body.speed();
    let wants_boost = input.boost() && speed > config.min_align_speed;
    if state.stamina.update(dt, wants_boost, config) {
        if let Some(dir) = body.velocity.try_normalize(VEC_EPS) {
            body.velocity += dir * boost_acceleration(speed, config) * dt;
        }
    }

    // Slope gravity
    let downhill = project_on_plane(&Vec3::new(0.0, -1.0, 0.0), &normal);
    body.velocity += downhill * config.gravity * dt;

    // Speed cap
    let speed = body.speed();
    if speed > config.max_speed {
        body.velocity *= config.max_speed / speed;
    }

    // Stay on the surface
    body.position.y = ground.elevation;
    let into_surface = body.velocity.dot(&normal);
    if into_surface < 0.0 {
        body.velocity -= normal * into_surface;
    }

    // Lean into the direction of travel
    if body.speed() > config.min_align_speed {
        let fraction = (config.align_rate * dt).min(1.0);
        body.orientation = align_to_surface(&body.orientation, &body.velocity, &normal, fraction);
    }

    None
}

/// Turn input: rotate velocity about world up, or the board itself when
/// nearly stationary.
fn steer(state: &mut RiderState, input: InputFrame, dt: f32, config: &PhysicsConfig) {
    let turn = input.turn_axis();
    if turn == 0.0 {
        return;
    }

    let angle = turn * config.turn_speed * dt;
    let body = &mut state.body;
    if body.speed() > config.min_align_speed {
        body.velocity = rotate_about_up(&body.velocity, angle);
    } else {
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), angle);
        body.orientation = yaw * body.orientation;
        body.orientation.renormalize();
    }
}

/// Per-frame velocity multiplier for a decay `rate`.
#[inline]
pub fn friction_factor(rate: f32, dt: f32) -> f32 {
    (1.0 - rate * dt).max(0.0)
}

/// Slerp `orientation` a `fraction` of the way toward facing `velocity`
/// with up along `normal`.
///
/// Keeps the current orientation when no target can be built.
pub fn align_to_surface(orientation: &Quat, velocity: &Vec3, normal: &Vec3, fraction: f32) -> Quat {
    let Some(target) = look_rotation(velocity, normal) else {
        return *orientation;
    };

    let mut next = orientation
        .try_slerp(&target, fraction, VEC_EPS)
        .unwrap_or(target);
    next.renormalize();
    next
}

// =============================================================================
// AIRBORNE
// =============================================================================

/// One airborne frame.
pub fn airborne_step(state: &mut RiderState, input: InputFrame, dt: f32, config: &PhysicsConfig) {
    let body = &mut state.body;

    body.angular_velocity += air_torque(input, &body.orientation, config) * dt;
    body.angular_velocity *= friction_factor(config.angular_damping, dt);
    body.orientation = integrate_orientation(&body.orientation, &body.angular_velocity, dt);

    state.trick.update(&body.orientation);
    state.stamina.update(dt, false, config);

    if let LocomotionMode::Airborne { air_time } = &mut state.mode {
        *air_time += dt;
        if *air_time > config.jump_charge_air_reset {
            state.jump.reset();
        }
    }
}

/// World-space angular acceleration from rotation input.
///
/// Input axes (pitch, turn, spin) form a body-local direction that is
/// normalized, scaled per axis and rotated into world space.
pub fn air_torque(input: InputFrame, orientation: &Quat, config: &PhysicsConfig) -> Vec3 {
    let local = Vec3::new(input.pitch_axis(), input.turn_axis(), input.spin_axis());
    let Some(dir) = local.try_normalize(VEC_EPS) else {
        return Vec3::zeros();
    };

    let scaled = dir.component_mul(&Vec3::new(
        config.pitch_torque,
        config.yaw_torque,
        config.roll_torque,
    ));
    orientation * scaled
}

// =============================================================================
// TESTS
// =============================================================================
