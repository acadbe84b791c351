//! Feed the Chick headless runner
//!
//! Plays one session on a phone-sized virtual field with a simple
//! autoplayer: every beat it releases the oldest item, feeding seeds to the
//! chick (missing now and then) and tossing everything else away. Sound
//! cues are logged instead of played.
//!
//! Environment:
//! - `FEED_TUNING_PATH`: JSON tuning file
//! - `FEED_SEED`: RNG seed for both the engine and the autoplayer
//! - `FEED_MISS_RATE`: chance the autoplayer drops a seed (default 0.15)
//! - `FEED_BEAT_MS`: autoplayer reaction time (default 700)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use feed_the_chick::feedback::{Feedback, run_feedback};
use feed_the_chick::session::share_message;
use feed_the_chick::sim::{Bounds, Viewport};
use feed_the_chick::{GameEngine, SessionController, SessionPhase, Tuning};

/// Virtual device: 1080x2340 px at 2.75 px per unit
const FIELD_WIDTH: f32 = 1080.0;
const FIELD_HEIGHT: f32 = 2340.0;
const DENSITY: f32 = 2.75;
/// Give up after this many beats if the autoplayer somehow never loses
const MAX_BEATS: u32 = 5000;
/// Beats at which the host app is backgrounded and brought back
const BACKGROUND_AT_BEAT: u32 = 20;
const FOREGROUND_AT_BEAT: u32 = 23;

#[derive(Debug, Clone)]
struct RunConfig {
    tuning_path: Option<PathBuf>,
    seed: Option<u64>,
    miss_rate: f64,
    beat: Duration,
}

impl RunConfig {
    fn from_env() -> Result<Self> {
        use std::env;

        let tuning_path = env::var("FEED_TUNING_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let seed = match env::var("FEED_SEED") {
            Ok(s) => Some(s.parse().with_context(|| format!("invalid FEED_SEED: {s}"))?),
            Err(_) => None,
        };

        let miss_rate = match env::var("FEED_MISS_RATE") {
            Ok(s) => s
                .parse::<f64>()
                .with_context(|| format!("invalid FEED_MISS_RATE: {s}"))?
                .clamp(0.0, 1.0),
            Err(_) => 0.15,
        };

        let beat_ms = match env::var("FEED_BEAT_MS") {
            Ok(s) => s.parse::<u64>().with_context(|| format!("invalid FEED_BEAT_MS: {s}"))?,
            Err(_) => 700,
        };

        Ok(Self {
            tuning_path,
            seed,
            miss_rate,
            beat: Duration::from_millis(beat_ms.max(1)),
        })
    }
}

/// Where the chick sits: bottom center, 70% of the width, 40 units up
fn chick_bounds() -> Bounds {
    let size = FIELD_WIDTH * 0.7;
    let bottom = FIELD_HEIGHT - 40.0 * DENSITY;
    let left = (FIELD_WIDTH - size) / 2.0;
    Bounds::new(Vec2::new(left, bottom - size), Vec2::new(left + size, bottom))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = RunConfig::from_env()?;
    let mut tuning = Tuning::load_or_default(config.tuning_path.as_deref());
    if config.seed.is_some() {
        tuning.seed = config.seed;
    }

    let engine = Arc::new(GameEngine::new(tuning));
    log::info!("Feed the Chick (headless) starting, seed {}", engine.seed());

    let feedback_task = tokio::spawn(run_feedback(
        engine.subscribe_events(),
        Feedback::new(),
        |cue, event| log::info!("Sound {:?} for {:?}", cue, event),
    ));

    let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<u32>();
    let mut session = SessionController::new(engine.clone(), Handle::current(), move |score| {
        let _ = exit_tx.send(score);
    });

    session.set_viewport(Viewport::new(FIELD_WIDTH, FIELD_HEIGHT, DENSITY));
    session.set_chick_bounds(chick_bounds());
    session.enter();
    session.start();

    let mouth_center = chick_bounds().center();
    let toss_point = Vec2::ZERO;
    let mut player_rng = Pcg32::seed_from_u64(engine.seed() ^ 0x5eed);
    let mut beat = tokio::time::interval(config.beat);
    let mut beats = 0u32;

    let final_score = loop {
        tokio::select! {
            _ = beat.tick() => {
                beats += 1;
                match beats {
                    BACKGROUND_AT_BEAT => session.app_backgrounded(),
                    FOREGROUND_AT_BEAT => session.resume(),
                    MAX_BEATS => {
                        log::warn!("Beat limit reached, leaving the session");
                        session.pause();
                        session.home();
                    }
                    _ => {}
                }

                let state = engine.snapshot();
                match session.phase() {
                    SessionPhase::Won => session.home(),
                    SessionPhase::Playing => {
                        if let Some(item) = state.items.first() {
                            let target = if item.kind.is_correct() && !player_rng.random_bool(config.miss_rate) {
                                mouth_center
                            } else {
                                toss_point
                            };
                            let outcome = session.release_item(item, target);
                            log::debug!("Released {:?} #{} -> {:?}", item.kind, item.id, outcome);
                        }
                    }
                    _ => {}
                }
            }
            Some(score) = exit_rx.recv() => break score,
        }
    };

    session.shutdown();
    feedback_task.abort();

    log::debug!(
        "Final state: {}",
        serde_json::to_string(&engine.snapshot()).context("serializing final state")?
    );
    println!("Final score: {final_score}");
    println!("{}", share_message(final_score));
    Ok(())
}
