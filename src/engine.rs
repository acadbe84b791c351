//! Observable game state store
//!
//! The engine owns the one `GameState` cell. Every operation runs under the
//! cell's write lock, so the spawn loop and UI callbacks serialize on it and
//! observers only ever see complete snapshots, in order. Events are sent
//! while the lock is held, which keeps them ordered with the snapshots.
//!
//! Events go through a small broadcast buffer: a slow observer loses old
//! feedback, never state.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use tokio::sync::{broadcast, watch};

use crate::consts::EVENT_BUFFER;
use crate::sim::rules::{self, SpawnOutcome};
use crate::sim::{GameEvent, GameState, Viewport};
use crate::tuning::Tuning;

/// Single owner of the game state
pub struct GameEngine {
    state_tx: watch::Sender<GameState>,
    events_tx: broadcast::Sender<GameEvent>,
    rng: Mutex<Pcg32>,
    tuning: Tuning,
    seed: u64,
    started: Instant,
}

impl GameEngine {
    /// Create an engine seeded from `tuning` (or the clock)
    pub fn new(tuning: Tuning) -> Self {
        let seed = tuning.resolve_seed();
        Self::with_seed(tuning, seed)
    }

    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        let (state_tx, _) = watch::channel(GameState::default());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        log::info!("Game engine created with seed: {}", seed);
        Self {
            state_tx,
            events_tx,
            rng: Mutex::new(Pcg32::seed_from_u64(seed)),
            tuning,
            seed,
            started: Instant::now(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Continuously updated state snapshots
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state_tx.subscribe()
    }

    /// Transient gameplay events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.events_tx.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> GameState {
        self.state_tx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.state_tx.borrow().running
    }

    pub fn score(&self) -> u32 {
        self.state_tx.borrow().score
    }

    /// Delay before the next spawn, read fresh from the state
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.state_tx.borrow().spawn_interval_ms)
    }

    /// Run `f` against the state under the write lock, publishing only if it
    /// reports a change. Events it pushes are sent before the lock drops.
    fn apply(&self, f: impl FnOnce(&mut GameState, &mut Vec<GameEvent>) -> bool) -> bool {
        self.state_tx.send_if_modified(|state| {
            let mut events = Vec::new();
            let modified = f(state, &mut events);
            for event in events {
                // No subscribers is fine: events are feedback only
                let _ = self.events_tx.send(event);
            }
            modified
        })
    }

    pub fn reset(&self) {
        self.apply(|state, _| {
            rules::reset(state, &self.tuning);
            true
        });
        log::info!("Session started");
    }

    pub fn show_intro_on_enter(&self) {
        self.apply(|state, _| {
            rules::show_intro_on_enter(state);
            true
        });
    }

    pub fn pause_and_open_settings(&self) {
        self.apply(|state, _| {
            rules::pause_and_open_settings(state);
            true
        });
        log::info!("Paused");
    }

    pub fn resume_from_settings(&self) {
        self.apply(|state, _| {
            rules::resume_from_settings(state);
            true
        });
    }

    /// Close settings and hand the score to `exit`
    pub fn close_settings_to_home(&self, exit: impl FnOnce(u32)) {
        let mut score = 0;
        self.apply(|state, _| {
            score = rules::close_settings(state);
            true
        });
        exit(score);
    }

    pub fn register_success(&self) {
        self.apply(|state, events| {
            rules::register_success(state, &self.tuning, events);
            true
        });
    }

    pub fn register_mistake(&self) {
        self.apply(rules::register_mistake);
    }

    pub fn acknowledge_mood_idle(&self) {
        self.apply(|state, _| rules::acknowledge_mood_idle(state));
    }

    pub fn remove_item(&self, id: u32) {
        self.apply(|state, _| rules::remove_item(state, id));
    }

    pub fn spawn_tick(&self, viewport: &Viewport) -> SpawnOutcome {
        let now_ms = self.started.elapsed().as_millis() as u64;
        let mut outcome = SpawnOutcome::Idle;
        self.apply(|state, events| {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            outcome = rules::spawn_tick(state, viewport, &self.tuning, &mut *rng, now_ms, events);
            outcome.modified()
        });
        outcome
    }
}
