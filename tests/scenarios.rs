//! End-to-end rider scenarios.
//!
//! Each test drives the public frame update the way a host would and checks
//! the observable outcome: modes, score, lives and events.

use nalgebra::Unit;

use slopestyle::game::events::GameEventData;
use slopestyle::game::terrain::{FlatTerrain, GroundSample, SlopeTerrain};
use slopestyle::{
    tick, InputFrame, LocomotionMode, PhysicsConfig, Quat, RiderState, TerrainQuery, TickResult,
    Vec3,
};

const DT: f32 = 1.0 / 60.0;

// =============================================================================
// Helpers
// =============================================================================

/// Rider standing still on flat ground at y = 0.
fn grounded_rider(config: &PhysicsConfig) -> RiderState {
    let mut state = RiderState::new(Vec3::zeros(), 10_000, config);
    state.mode = LocomotionMode::Grounded;
    state
}

/// Rider about to touch down on flat ground, jump already started.
fn descending_rider(config: &PhysicsConfig) -> RiderState {
    let mut state = RiderState::new(Vec3::new(0.0, 0.5, 0.0), 10_000, config);
    state.body.velocity = Vec3::new(0.0, -2.0, -8.0);
    state.trick.start(&state.body.orientation);
    state
}

/// Rotate the rider about one of its own axes, feeding the trick accumulator
/// like the airborne step does.
fn rotate_body(state: &mut RiderState, axis: Unit<Vec3>, degrees: f32, steps: u32) {
    let step = Quat::from_axis_angle(&axis, degrees.to_radians() / steps as f32);
    for _ in 0..steps {
        let next = state.body.orientation * step;
        state.body.orientation = next;
        state.trick.update(&next);
    }
}

/// Tilt the rider so that dot(body up, world up) equals `alignment`.
fn tilt_to_alignment(state: &mut RiderState, alignment: f32) {
    state.body.orientation = Quat::from_axis_angle(&Vec3::x_axis(), alignment.acos());
}

fn has_event(result: &TickResult, pred: impl Fn(&GameEventData) -> bool) -> bool {
    result.events.iter().any(|e| pred(&e.data))
}

/// Put the rider just above flat ground with a bad tilt and step once.
fn crash_once(state: &mut RiderState, config: &PhysicsConfig) -> TickResult {
    state.mode = LocomotionMode::airborne();
    state.body.position = Vec3::new(0.0, 0.5, 0.0);
    state.body.velocity = Vec3::new(0.0, -1.0, 0.0);
    tilt_to_alignment(state, 0.1);
    tick(state, InputFrame::new(), DT, &FlatTerrain::new(0.0), config)
}

// =============================================================================
// Jump charge
// =============================================================================

#[test]
fn test_full_charge_jump() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = grounded_rider(&config);

    // 0.67 s of holding at 1.5/s clamps at 1.0
    let hold = InputFrame::new().with(InputFrame::JUMP);
    let mut held = 0.0;
    while held < 0.67 {
        tick(&mut state, hold, DT, &terrain, &config);
        held += DT;
    }
    assert_eq!(state.snapshot().jump_charge, 1.0);

    let result = tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    let expected = config.jump_force * 2.3;
    assert!((state.body.velocity.y - expected).abs() < 1.0e-3);
    assert!(state.mode.is_airborne());
    assert_eq!(state.snapshot().jump_charge, 0.0);
    assert!(has_event(&result, |e| matches!(e, GameEventData::Jumped { .. })));
}

#[test]
fn test_charge_cleared_after_air_time() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(-100.0);
    let mut state = RiderState::new(Vec3::zeros(), 10_000, &config);
    state.jump.charge(0.3, config.jump_charge_rate);

    for _ in 0..20 {
        tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    }
    assert_eq!(state.jump.value(), 0.0);
}

// =============================================================================
// Trick landings
// =============================================================================

#[test]
fn test_backflip_landing() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = descending_rider(&config);

    // 95 degrees back and 95 forward: 190 degrees of pitch, ends level
    rotate_body(&mut state, Vec3::x_axis(), 95.0, 40);
    rotate_body(&mut state, Vec3::x_axis(), -95.0, 40);

    let result = tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    let trick = result.trick.expect("trick scored");
    assert_eq!(trick.name, "Backflip");
    assert_eq!(trick.points, 500);
    assert_eq!(state.progression.score, 500);
    assert!(state.mode.is_grounded());
    assert_eq!(state.body.angular_velocity, Vec3::zeros());
    assert_eq!(state.body.position.y, 0.0);
}

#[test]
fn test_spin_landing() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = descending_rider(&config);

    rotate_body(&mut state, Vec3::y_axis(), 370.0, 60);

    let result = tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    let trick = result.trick.as_ref().expect("trick scored");
    assert_eq!(trick.name, "360");
    assert_eq!(trick.points, 360);
    assert!(has_event(&result, |e| matches!(
        e,
        GameEventData::TrickLanded { total_score: 360, .. }
    )));
    assert_eq!(
        state.snapshot().last_trick.map(|t| t.name),
        Some("360".to_string())
    );
}

#[test]
fn test_cork_landing() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = descending_rider(&config);

    rotate_body(&mut state, Vec3::y_axis(), 400.0, 80);
    rotate_body(&mut state, Vec3::x_axis(), 380.0, 80);
    rotate_body(&mut state, Vec3::z_axis(), 50.0, 20);
    rotate_body(&mut state, Vec3::z_axis(), -50.0, 20);

    let result = tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    let trick = result.trick.expect("trick scored");
    assert_eq!(trick.name, "Cork 360");
    assert_eq!(trick.points, 1290);
}

#[test]
fn test_quarter_turn_scores_nothing() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = descending_rider(&config);

    // Short of a half-turn: rounds to no spin
    rotate_body(&mut state, Vec3::y_axis(), 85.0, 30);

    let result = tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    assert!(state.mode.is_grounded());
    assert!(result.trick.is_none());
    assert_eq!(state.progression.score, 0);
    assert!(has_event(&result, |e| matches!(e, GameEventData::Landed { .. })));
}

/// Level ground at y = 0 with a fixed, steeply leaning normal.
struct LeaningGround {
    normal: Vec3,
}

impl TerrainQuery for LeaningGround {
    fn sample_ground(&self, _x: f32, _z: f32) -> Option<GroundSample> {
        Some(GroundSample {
            elevation: 0.0,
            normal: self.normal,
        })
    }
}

#[test]
fn test_landing_at_threshold_alignment_succeeds() {
    let config = PhysicsConfig::default();

    // Upright rider against a normal whose y is exactly the threshold
    let terrain = LeaningGround {
        normal: Vec3::new(0.96f32.sqrt(), 0.2, 0.0),
    };
    let mut state = descending_rider(&config);
    assert_eq!(state.body.orientation, Quat::identity());

    tick(&mut state, InputFrame::new(), DT, &terrain, &config);

    assert!(state.mode.is_grounded());
    assert_eq!(state.progression.lives, 3);
}

#[test]
fn test_landing_just_below_threshold_crashes() {
    let config = PhysicsConfig::default();
    let terrain = LeaningGround {
        normal: Vec3::new(0.97f32.sqrt(), 0.17, 0.0).normalize(),
    };
    let mut state = descending_rider(&config);

    tick(&mut state, InputFrame::new(), DT, &terrain, &config);

    assert!(state.mode.is_crashed());
    assert_eq!(state.progression.lives, 2);
}

// =============================================================================
// Crashes
// =============================================================================

#[test]
fn test_crash_and_recover() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = grounded_rider(&config);

    let result = crash_once(&mut state, &config);
    assert_eq!(
        state.mode,
        LocomotionMode::Crashed {
            recovery_timer: 2.0
        }
    );
    assert_eq!(state.progression.lives, 2);
    assert_eq!(state.body.velocity, Vec3::zeros());
    assert!(state.snapshot().crashed);
    assert!(has_event(&result, |e| matches!(
        e,
        GameEventData::Crashed { lives_remaining: 2, .. }
    )));

    // Still down after 1.5 s
    for _ in 0..3 {
        tick(&mut state, InputFrame::new(), 0.5, &terrain, &config);
    }
    assert!(state.mode.is_crashed());

    let result = tick(&mut state, InputFrame::new(), 0.5, &terrain, &config);
    assert!(state.mode.is_grounded());
    assert!(has_event(&result, |e| matches!(e, GameEventData::Recovered)));

    let up = state.body.up();
    assert!((up - Vec3::y()).norm() < 1.0e-4);
    let forward = state.body.forward();
    let kick = state.body.velocity;
    assert!((kick - forward * config.recovery_kick).norm() < 1.0e-4);
    assert!((state.body.position.y - config.recovery_nudge).abs() < 1.0e-4);
}

#[test]
fn test_recovery_takes_whole_frames() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = grounded_rider(&config);
    crash_once(&mut state, &config);

    // 2 s at 60 Hz
    let mut frames = 0;
    while state.mode.is_crashed() && frames < 200 {
        tick(&mut state, InputFrame::new(), DT, &terrain, &config);
        frames += 1;
    }

    assert!(state.mode.is_grounded());
    assert_eq!(frames, 120);
}

#[test]
fn test_stamina_regenerates_while_down() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = grounded_rider(&config);

    state.stamina.update(2.0, true, &config);
    let drained = state.stamina.value();
    assert!(drained < config.stamina_max);

    crash_once(&mut state, &config);
    // 1.5 s down: past the regen delay, before recovery
    for _ in 0..90 {
        tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    }

    assert!(state.mode.is_crashed());
    assert!(state.stamina.value() > drained);
}

#[test]
fn test_crash_cancels_trick() {
    let config = PhysicsConfig::default();
    let mut state = descending_rider(&config);
    rotate_body(&mut state, Vec3::y_axis(), 720.0, 60);

    let result = crash_once(&mut state, &config);
    assert!(result.trick.is_none());
    assert!(!state.trick.is_active());
    assert_eq!(state.progression.score, 0);
}

#[test]
fn test_third_crash_is_fatal() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = grounded_rider(&config);

    for expected_lives in [2, 1] {
        crash_once(&mut state, &config);
        assert_eq!(state.progression.lives, expected_lives);
        assert!(state.mode.is_crashed());
    }

    let result = crash_once(&mut state, &config);
    assert_eq!(state.mode, LocomotionMode::Dead);
    assert_eq!(state.progression.lives, 0);
    assert!(result.terminal);
    assert!(has_event(&result, |e| matches!(e, GameEventData::Died { .. })));

    // Dead is permanent whatever the input
    let hash = state.compute_hash();
    for flags in [0u8, 0x01, 0x10, 0x20, 0xff] {
        for _ in 0..30 {
            let result = tick(&mut state, InputFrame::from_flags(flags), DT, &terrain, &config);
            assert!(result.terminal);
            assert!(result.events.is_empty());
        }
    }
    assert!(state.mode.is_dead());
    assert_eq!(state.compute_hash(), hash);
}

// =============================================================================
// Riding
// =============================================================================

#[test]
fn test_rides_down_a_slope() {
    let config = PhysicsConfig::default();
    let terrain = SlopeTerrain::new(0.0, 0.35);
    let mut state = RiderState::new(Vec3::new(0.0, 1.5, 0.0), 10_000, &config);

    for _ in 0..(3 * 60) {
        tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    }

    assert!(state.mode.is_grounded());
    assert!(state.body.position.z < -5.0);
    assert!(state.body.speed() > 5.0);
    assert!(state.body.speed() <= config.max_speed + 1.0e-3);
    assert!(state.body.up().y > 0.9);
}

#[test]
fn test_won_after_reaching_threshold() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = descending_rider(&config);
    state.progression.win_score = 300;

    rotate_body(&mut state, Vec3::y_axis(), 360.0, 60);
    tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    assert_eq!(state.progression.score, 360);
    assert!(!state.mode.is_won());

    let result = tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    assert!(state.snapshot().won);
    assert!(result.terminal);
    assert!(has_event(&result, |e| matches!(e, GameEventData::Won { score: 360 })));
}

#[test]
fn test_backflip_from_a_jump() {
    let config = PhysicsConfig::default();
    let terrain = FlatTerrain::new(0.0);
    let mut state = grounded_rider(&config);

    let hold = InputFrame::new().with(InputFrame::JUMP);
    for _ in 0..45 {
        tick(&mut state, hold, DT, &terrain, &config);
    }
    tick(&mut state, InputFrame::new(), DT, &terrain, &config);
    assert!(state.mode.is_airborne());

    // Tuck most of the way round, then let damping finish the rotation
    let tuck = InputFrame::new().with(InputFrame::BACKWARD);
    let mut trick = None;
    for frame in 0..600 {
        let input = if frame < 94 { tuck } else { InputFrame::new() };
        let result = tick(&mut state, input, DT, &terrain, &config);
        if !state.mode.is_airborne() {
            trick = result.trick;
            break;
        }
    }

    assert!(state.mode.is_grounded());
    let trick = trick.expect("flip scored");
    assert_eq!(trick.name, "Backflip");
    assert_eq!(trick.points, 500);
}
