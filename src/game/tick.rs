//! Frame Update
//!
//! The per-frame state machine. The host calls [`tick`] exactly once per
//! rendered frame with the elapsed time and the held actions, then reads the
//! rider through [`RiderState::snapshot`].
//!
//! ## Frame order
//!
//! ```text
//! guard (dt, terrain ready, terminal) → win check → crash recovery
//!   → ground sensing → integrate velocity/position → resolve mode
//!   → grounded or airborne physics → drain events
//! ```
//!
//! ## Mode transitions
//!
//! ```text
//!            jump release / ground lost
//!  Grounded ─────────────────────────────▶ Airborne
//!     ▲  ◀───────────────────────────────   │
//!     │        touchdown, aligned            │ touchdown, misaligned
//!     │                                      ▼
//!     └──────── recovery timer ──────── Crashed ──(last life)──▶ Dead
//!
//!  any live mode ──(score ≥ win score)──▶ Won
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::math::{forward_of, lying_on_side, up_of, upright, Vec3};
use crate::game::config::PhysicsConfig;
use crate::game::contact::{sense_ground, ContactSample};
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::physics::{airborne_step, grounded_step, Ground, Launch};
use crate::game::state::{LocomotionMode, RiderState};
use crate::game::terrain::TerrainQuery;
use crate::game::trick::TrickResult;

/// Timer slack so whole frames add up to the recovery time despite f32 drift.
const RECOVERY_EPS: f32 = 1.0e-4;

/// Why a frame was not simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Terrain data still loading
    TerrainNotReady,
    /// Elapsed time was NaN or infinite
    InvalidDt,
}

/// Result of a frame update.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this frame
    pub events: Vec<GameEvent>,
    /// Set when the frame was not simulated
    pub skipped: Option<SkipReason>,
    /// Trick scored this frame, if any
    pub trick: Option<TrickResult>,
    /// Rider is Dead or Won after this frame
    pub terminal: bool,
}

/// Run one frame.
///
/// # Arguments
///
/// * `state` - The rider (mutated in place)
/// * `input` - Actions held this frame
/// * `dt` - Elapsed seconds; negative values are treated as zero
/// * `terrain` - Ground query
/// * `config` - Tuning
///
/// Never fails: skipped frames are reported in [`TickResult::skipped`] and
/// leave the state untouched, Dead/Won frames are no-ops.
pub fn tick<T: TerrainQuery + ?Sized>(
    state: &mut RiderState,
    input: InputFrame,
    dt: f32,
    terrain: &T,
    config: &PhysicsConfig,
) -> TickResult {
    let mut result = TickResult::default();

    if !dt.is_finite() {
        trace!("Skipping frame {}: invalid dt {}", state.frame, dt);
        result.skipped = Some(SkipReason::InvalidDt);
        return result;
    }
    let dt = dt.max(0.0);

    if !terrain.is_ready() {
        trace!("Skipping frame {}: terrain not ready", state.frame);
        result.skipped = Some(SkipReason::TerrainNotReady);
        return result;
    }

    if state.mode.is_terminal() {
        result.terminal = true;
        return result;
    }

    // 0. Advance frame counter
    state.frame += 1;

    // 1. Win check, before any physics
    if state.progression.has_won() {
        enter_won(state);
        return finish(state, result);
    }

    // 2. Lying in the snow: only the recovery timer and stamina regen run
    if state.mode.is_crashed() {
        state.stamina.update(dt, false, config);
        update_recovery(state, dt, config);
        return finish(state, result);
    }

    // 3. Sense ground at the pre-integration pose
    let contact = sense_ground(terrain, &state.body.position, &state.body.orientation, config);

    // 4. Semi-implicit Euler
    state.body.velocity.y -= config.gravity * dt;
    let velocity = state.body.velocity;
    state.body.position += velocity * dt;

    // 5. Takeoff / landing / crash
    resolve_mode(state, &contact, config, &mut result);

    // 6. Mode physics
    match state.mode {
        LocomotionMode::Grounded => {
            if let Some(elevation) = contact.elevation {
                let ground = Ground {
                    elevation,
                    normal: contact.normal,
                };
                if let Some(launch) = grounded_step(state, input, dt, &ground, config) {
                    take_off_jump(state, launch);
                }
            }
        }
        LocomotionMode::Airborne { .. } => airborne_step(state, input, dt, config),
        _ => {}
    }

    finish(state, result)
}

fn finish(state: &mut RiderState, mut result: TickResult) -> TickResult {
    result.events = state.take_events();
    result.terminal = state.mode.is_terminal();
    result
}

/// Apply the Grounded/Airborne transition rules for this frame's contact.
fn resolve_mode(
    state: &mut RiderState,
    contact: &ContactSample,
    config: &PhysicsConfig,
    result: &mut TickResult,
) {
    let distance = contact.distance_below(state.body.position.y);

    match state.mode {
        LocomotionMode::Grounded => {
            let lost_ground = distance.map_or(true, |d| d > config.snap_distance);
            if lost_ground {
                state.mode = LocomotionMode::airborne();
                state.trick.start(&state.body.orientation);
                debug!("Frame {}: took off", state.frame);
                state.push_event(GameEvent::took_off(state.frame));
            }
        }
        LocomotionMode::Airborne { air_time } => {
            let (Some(d), Some(elevation)) = (distance, contact.elevation) else {
                return;
            };
            let rising = state.body.velocity.y > config.landing_upward_tolerance;
            if d >= config.snap_distance || rising {
                return;
            }

            let alignment = up_of(&state.body.orientation).dot(&contact.normal);
            if alignment < config.crash_alignment {
                crash(state, elevation, alignment, config);
            } else {
                land(state, elevation, alignment, air_time, result);
            }
        }
        _ => {}
    }
}

/// Touchdown with acceptable alignment: score the trick and stick to the snow.
fn land(
    state: &mut RiderState,
    elevation: f32,
    alignment: f32,
    air_time: f32,
    result: &mut TickResult,
) {
    let frame = state.frame;
    let trick = state.trick.land();

    state.mode = LocomotionMode::Grounded;
    state.body.angular_velocity = Vec3::zeros();
    state.body.position.y = elevation;
    state.body.velocity.y = state.body.velocity.y.max(0.0);

    debug!(
        "Frame {}: landed (alignment {:.3}, air time {:.2}s)",
        frame, alignment, air_time
    );
    state.push_event(GameEvent::landed(frame, alignment, air_time));

    if !trick.is_empty() {
        let total = state.add_score(trick.points);
        debug!("Frame {}: {} for {} (total {})", frame, trick.name, trick.points, total);
        state.push_event(GameEvent::trick_landed(frame, trick.name.clone(), trick.points, total));
        state.last_trick = Some(trick.clone());
        result.trick = Some(trick);
    }
}

/// Failed landing: lose a life, then lie down or die.
fn crash(state: &mut RiderState, elevation: f32, alignment: f32, config: &PhysicsConfig) {
    let frame = state.frame;
    let lives = state.progression.lose_life();

    state.trick.cancel();
    state.jump.reset();
    state.body.velocity = Vec3::zeros();
    state.body.angular_velocity = Vec3::zeros();
    state.body.orientation = lying_on_side(&state.body.orientation);
    state.body.position.y = elevation;

    debug!(
        "Frame {}: crashed (alignment {:.3}), {} lives left",
        frame, alignment, lives
    );
    state.push_event(GameEvent::crashed(frame, alignment, lives));

    if lives == 0 {
        state.mode = LocomotionMode::Dead;
        debug!("Frame {}: out of lives", frame);
        state.push_event(GameEvent::died(frame, state.progression.score));
    } else {
        state.mode = LocomotionMode::Crashed {
            recovery_timer: config.recovery_time,
        };
    }
}

/// Count down the crash timer; stand back up when it runs out.
fn update_recovery(state: &mut RiderState, dt: f32, config: &PhysicsConfig) {
    let LocomotionMode::Crashed { recovery_timer } = state.mode else {
        return;
    };

    let remaining = recovery_timer - dt;
    if remaining > RECOVERY_EPS {
        state.mode = LocomotionMode::Crashed {
            recovery_timer: remaining,
        };
        return;
    }

    let orientation = upright(&state.body.orientation);
    state.body.orientation = orientation;
    state.body.position.y += config.recovery_nudge;
    state.body.velocity = forward_of(&orientation) * config.recovery_kick;
    state.body.angular_velocity = Vec3::zeros();
    state.mode = LocomotionMode::Grounded;

    debug!("Frame {}: recovered", state.frame);
    state.push_event(GameEvent::recovered(state.frame));
}

/// Jump released on the ground.
fn take_off_jump(state: &mut RiderState, launch: Launch) {
    state.mode = LocomotionMode::airborne();
    state.trick.start(&state.body.orientation);

    debug!(
        "Frame {}: jumped (charge {:.2}, vy {:.2})",
        state.frame, launch.charge, launch.velocity
    );
    state.push_event(GameEvent::jumped(state.frame, launch.charge, launch.velocity));
}

fn enter_won(state: &mut RiderState) {
    state.mode = LocomotionMode::Won;
    state.trick.cancel();
    debug!(
        "Frame {}: won with {} points",
        state.frame, state.progression.score
    );
    state.push_event(GameEvent::won(state.frame, state.progression.score));
}

/// Replay a recorded run from an initial state.
///
/// Stops early once the rider reaches a terminal mode. Returns the final
/// state and every event generated.
pub fn replay<T: TerrainQuery + ?Sized>(
    initial_state: RiderState,
    recording: &InputRecording,
    terrain: &T,
    config: &PhysicsConfig,
) -> (RiderState, Vec<GameEvent>) {
    let mut state = initial_state;
    let mut all_events = Vec::new();

    for (dt, input) in recording.replay_iter() {
        let result = tick(&mut state, input, dt, terrain, config);
        all_events.extend(result.events);

        if result.terminal {
            break;
        }
    }

    (state, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
