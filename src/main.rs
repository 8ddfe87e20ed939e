//! Slopestyle Headless Simulator
//!
//! Drops a rider on the procedural mountain, plays a scripted run, logs what
//! happens, then replays the recorded inputs and checks the final state hash.
//!
//! Usage: `slopestyle-sim [physics-config.json]`

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use slopestyle::{
    game::{
        events::GameEventData,
        terrain::{ProceduralParams, ProceduralTerrain},
        tick::replay,
    },
    tick, InputFrame, InputRecording, LevelSet, PhysicsConfig, RiderState, DEFAULT_FRAME_RATE,
    VERSION,
};

/// Longest scripted run (seconds).
const RUN_SECONDS: u32 = 60;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Slopestyle Simulator v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => PhysicsConfig::default(),
    };
    config.validate().context("invalid physics config")?;

    info!("Frame Rate: {} Hz", DEFAULT_FRAME_RATE);
    info!("Gravity: {} m/s², max speed {} m/s", config.gravity, config.max_speed);

    demo_run(&config);
    Ok(())
}

fn load_config(path: &Path) -> Result<PhysicsConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = PhysicsConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!("Loaded physics config from {}", path.display());
    Ok(config)
}

/// Scripted input: a repeating cycle of carving, charging, flipping and
/// coasting.
fn scripted_input(t: f32) -> InputFrame {
    let phase = t % 6.0;
    let input = InputFrame::new();

    if t < 1.0 {
        input
    } else if phase < 2.0 {
        input.with(InputFrame::FORWARD).with(InputFrame::BOOST)
    } else if phase < 2.7 {
        input.with(InputFrame::JUMP)
    } else if phase < 3.4 {
        input.with(InputFrame::BACKWARD).with(InputFrame::LEFT)
    } else if phase < 4.5 {
        input
    } else {
        input.with(InputFrame::RIGHT)
    }
}

/// Demo function to exercise the simulation.
fn demo_run(config: &PhysicsConfig) {
    info!("=== Starting Demo Run ===");

    let terrain = ProceduralTerrain::new(ProceduralParams::default());
    let levels = LevelSet::builtin();
    let level = levels.current();

    let initial = RiderState::for_level(level, &terrain, config);
    let spawn = initial.body.position;
    info!(
        "Level {}: win at {} points, spawn ({:.1}, {:.1}, {:.1})",
        level.id, level.win_score, spawn.x, spawn.y, spawn.z
    );

    let dt = 1.0 / DEFAULT_FRAME_RATE as f32;
    let frames = RUN_SECONDS * DEFAULT_FRAME_RATE;

    let mut state = initial.clone();
    let mut recording = InputRecording::new();
    let mut total_events = 0;

    info!("Running up to {} frames...", frames);

    for f in 0..frames {
        let input = scripted_input(f as f32 * dt);
        recording.record(dt, input);

        let result = tick(&mut state, input, dt, &terrain, config);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::TrickLanded {
                    name,
                    points,
                    total_score,
                } => {
                    info!("Frame {}: {} (+{}, total {})", event.frame, name, points, total_score);
                }
                GameEventData::Crashed {
                    alignment,
                    lives_remaining,
                } => {
                    info!(
                        "Frame {}: crashed (alignment {:.2}), {} lives left",
                        event.frame, alignment, lives_remaining
                    );
                }
                GameEventData::Died { score } => {
                    info!("Frame {}: game over with {} points", event.frame, score);
                }
                GameEventData::Won { score } => {
                    info!("Frame {}: level won with {} points", event.frame, score);
                }
                _ => {}
            }
        }

        if result.terminal {
            info!("Run ended at frame {}", f);
            break;
        }
    }

    // Print final results
    info!("=== Run Results ===");
    let snapshot = state.snapshot();
    info!(
        "Position ({:.1}, {:.1}, {:.1}), speed {:.1} m/s",
        snapshot.position.x,
        snapshot.position.y,
        snapshot.position.z,
        snapshot.velocity.norm()
    );
    info!(
        "Score {}, lives {}, stamina {:.0}%",
        snapshot.score,
        snapshot.lives,
        snapshot.stamina * 100.0
    );
    if let Some(trick) = &snapshot.last_trick {
        info!("Last trick: {} ({} pts)", trick.name, trick.points);
    }
    info!("Total events: {}", total_events);
    info!(
        "Recording: {} frames, {} input changes, digest {}",
        recording.len(),
        recording.delta_count(),
        hex::encode(&recording.digest()[..8])
    );

    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(initial, &recording, &terrain, config);
    let replay_hash = replayed.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        info!("DETERMINISM FAILURE: Hashes differ!");
    }
}
