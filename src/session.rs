//! Session/overlay state machine
//!
//! Wires the engine to its timers and to the outside world:
//!
//! ```text
//! enter ──> Intro ──start──> Playing ──pause/back/background──> Paused
//!                              │  ^                               │ │
//!                   lives == 0 │  └────────────resume─────────────┘ │
//!                              v                                    │
//!               Won ──retry──> Playing               Paused ──home──┴─> exit(score)
//!                │
//!                └──home──> exit(score)
//! ```
//!
//! Commands that do not apply to the current phase are ignored. The exit
//! callback fires at most once per session.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use tokio::runtime::Handle;

pub use crate::sim::SessionPhase;

use crate::engine::GameEngine;
use crate::input::{ReleaseOutcome, mouth_hit_region, resolve_release};
use crate::scheduler::{MoodTimer, SpawnScheduler};
use crate::sim::{Bounds, SpawnedItem, Viewport};
use crate::units_to_px;

/// Text offered by the win screen's share button
pub fn share_message(score: u32) -> String {
    format!("I fed {} seeds in Egg Magnet!", score)
}

/// Drives one game screen: overlays, timers, releases and the exit hand-off
pub struct SessionController<F: FnMut(u32)> {
    engine: Arc<GameEngine>,
    spawner: SpawnScheduler,
    mood_timer: MoodTimer,
    viewport: Option<Viewport>,
    /// Chick bounds as measured by the UI, before the hit margin
    chick_bounds: Option<Bounds>,
    on_exit: F,
    exited: bool,
}

impl<F: FnMut(u32)> SessionController<F> {
    /// `runtime` hosts the spawn loop and mood timer
    pub fn new(engine: Arc<GameEngine>, runtime: Handle, on_exit: F) -> Self {
        let mut mood_timer = MoodTimer::new(runtime.clone());
        mood_timer.start(
            engine.clone(),
            Duration::from_millis(engine.tuning().mood_reset_ms),
        );
        Self {
            engine,
            spawner: SpawnScheduler::new(runtime),
            mood_timer,
            viewport: None,
            chick_bounds: None,
            on_exit,
            exited: false,
        }
    }

    pub fn engine(&self) -> &Arc<GameEngine> {
        &self.engine
    }

    pub fn phase(&self) -> SessionPhase {
        self.engine.snapshot().phase()
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Game screen became visible: always back to the intro
    pub fn enter(&mut self) {
        self.spawner.cancel();
        self.engine.show_intro_on_enter();
        self.exited = false;
        log::info!("Entered game screen");
    }

    /// Field size changed; a running spawn loop is re-armed with it
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == Some(viewport) {
            return;
        }
        self.viewport = Some(viewport);
        if self.spawner.is_armed() || self.engine.is_running() {
            self.spawner.arm(self.engine.clone(), viewport);
        }
    }

    /// Start the spawn loop for a live session that has none yet
    fn ensure_armed(&mut self) {
        if self.spawner.is_armed() || !self.engine.is_running() {
            return;
        }
        if let Some(viewport) = self.viewport {
            self.spawner.arm(self.engine.clone(), viewport);
        }
    }

    /// Chick layout measured by the UI
    pub fn set_chick_bounds(&mut self, bounds: Bounds) {
        self.chick_bounds = Some(bounds);
    }

    /// Current mouth hit region in pixels
    pub fn mouth_region(&self) -> Option<Bounds> {
        let density = self.viewport.map(|vp| vp.density).unwrap_or(1.0);
        let margin = units_to_px(self.engine.tuning().mouth_hit_margin, density);
        self.chick_bounds.map(|b| mouth_hit_region(b, margin))
    }

    /// Intro -> Playing
    pub fn start(&mut self) {
        if self.phase() != SessionPhase::Intro {
            log::debug!("start ignored in {:?}", self.phase());
            return;
        }
        self.begin();
    }

    /// Won/Paused -> Playing with a fresh session
    pub fn retry(&mut self) {
        match self.phase() {
            SessionPhase::Won | SessionPhase::Paused => self.begin(),
            other => log::debug!("retry ignored in {:?}", other),
        }
    }

    fn begin(&mut self) {
        self.engine.reset();
        self.exited = false;
        match self.viewport {
            Some(viewport) => self.spawner.arm(self.engine.clone(), viewport),
            None => log::warn!("Session started before the viewport was measured"),
        }
    }

    /// Playing -> Paused
    pub fn pause(&mut self) {
        if self.phase() == SessionPhase::Playing {
            self.engine.pause_and_open_settings();
        }
    }

    /// Paused -> Playing (or back to the intro if settings were opened there)
    pub fn resume(&mut self) {
        if self.engine.snapshot().show_settings {
            self.engine.resume_from_settings();
            self.ensure_armed();
        }
    }

    /// System back button
    pub fn back_pressed(&mut self) {
        let state = self.engine.snapshot();
        if state.show_settings {
            self.engine.resume_from_settings();
            self.ensure_armed();
        } else if !state.show_win {
            self.engine.pause_and_open_settings();
        }
    }

    /// Host app went to the background; never keep simulating unseen
    pub fn app_backgrounded(&mut self) {
        let state = self.engine.snapshot();
        if !state.show_win && !state.show_settings {
            self.engine.pause_and_open_settings();
            log::info!("Auto-paused (app backgrounded)");
        }
    }

    /// Paused/Won -> exit, reporting the score
    pub fn home(&mut self) {
        match self.phase() {
            SessionPhase::Paused => {
                self.spawner.cancel();
                let mut final_score = None;
                self.engine.close_settings_to_home(|score| final_score = Some(score));
                if let Some(score) = final_score {
                    self.report_exit(score);
                }
            }
            SessionPhase::Won => {
                self.spawner.cancel();
                let score = self.engine.score();
                self.report_exit(score);
            }
            other => log::debug!("home ignored in {:?}", other),
        }
    }

    fn report_exit(&mut self, score: u32) {
        if self.exited {
            return;
        }
        self.exited = true;
        log::info!("Session exited with score {}", score);
        (self.on_exit)(score);
    }

    /// Item released with its center at `center`
    ///
    /// The item always leaves the field; the outcome only counts while
    /// playing, so a release racing a pause or the final life is harmless.
    pub fn release_item(&mut self, item: &SpawnedItem, center: Vec2) -> ReleaseOutcome {
        let playing = self.engine.is_running();
        self.engine.remove_item(item.id);

        let mouth = self.mouth_region();
        let outcome = resolve_release(item.kind, center, mouth.as_ref());
        if playing {
            match outcome {
                ReleaseOutcome::Success => self.engine.register_success(),
                ReleaseOutcome::Mistake => self.engine.register_mistake(),
                ReleaseOutcome::Discard => {}
            }
        }
        outcome
    }

    /// Stop all timers (screen torn down)
    pub fn shutdown(&mut self) {
        self.spawner.cancel();
        self.mood_timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_message() {
        assert_eq!(share_message(12), "I fed 12 seeds in Egg Magnet!");
    }
}
