//! Audio/FX feedback driven by game events
//!
//! Observers only: nothing here writes back into the engine. Playback is
//! left to the host; this maps events to cues and tracks the short-lived
//! "lost seed" burst markers the overlay draws.

use std::time::Duration;

use glam::Vec2;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::consts::LOST_FX_DURATION_MS;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Seed eaten
    Feed,
    /// Life lost
    Lose,
    /// Out of lives
    Win,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::FeedSuccess => Some(SoundEffect::Feed),
            GameEvent::Mistake => Some(SoundEffect::Lose),
            GameEvent::GameWon => Some(SoundEffect::Win),
            // The life loss that follows plays the sound
            GameEvent::LostSeedOverflow { .. } => None,
        }
    }
}

/// A red egg burst where an evicted seed used to be
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LostFx {
    pub id: u64,
    pub at: Vec2,
    pub age: Duration,
}

impl LostFx {
    /// Animation progress in 0..=1
    pub fn progress(&self) -> f32 {
        (self.age.as_secs_f32() / Duration::from_millis(LOST_FX_DURATION_MS).as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.age >= Duration::from_millis(LOST_FX_DURATION_MS)
    }
}

/// Event observer that produces sound cues and FX markers
#[derive(Debug, Default)]
pub struct Feedback {
    markers: Vec<LostFx>,
    next_fx_id: u64,
    muted: bool,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute sound cues (FX still run)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// React to one event; returns the sound to play, if any
    pub fn observe(&mut self, event: &GameEvent) -> Option<SoundEffect> {
        if let GameEvent::LostSeedOverflow { at } = event {
            self.markers.push(LostFx {
                id: self.next_fx_id,
                at: *at,
                age: Duration::ZERO,
            });
            self.next_fx_id += 1;
        }
        if self.muted {
            None
        } else {
            SoundEffect::for_event(event)
        }
    }

    /// Age markers by `dt` and drop the finished ones
    pub fn advance(&mut self, dt: Duration) {
        for fx in &mut self.markers {
            fx.age += dt;
        }
        self.markers.retain(|fx| !fx.is_finished());
    }

    pub fn markers(&self) -> &[LostFx] {
        &self.markers
    }
}

/// Feed every event from `rx` to `on_cue` until the engine goes away
///
/// A lagging receiver skips what it missed; feedback is not state.
pub async fn run_feedback(
    mut rx: broadcast::Receiver<GameEvent>,
    mut feedback: Feedback,
    mut on_cue: impl FnMut(SoundEffect, &GameEvent),
) -> Feedback {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(cue) = feedback.observe(&event) {
                    on_cue(cue, &event);
                }
            }
            Err(RecvError::Lagged(missed)) => {
                log::debug!("Feedback lagged, skipped {} events", missed);
            }
            Err(RecvError::Closed) => break,
        }
    }
    feedback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues() {
        let mut fb = Feedback::new();
        assert_eq!(fb.observe(&GameEvent::FeedSuccess), Some(SoundEffect::Feed));
        assert_eq!(fb.observe(&GameEvent::Mistake), Some(SoundEffect::Lose));
        assert_eq!(fb.observe(&GameEvent::GameWon), Some(SoundEffect::Win));
        assert_eq!(
            fb.observe(&GameEvent::LostSeedOverflow { at: Vec2::new(1.0, 2.0) }),
            None
        );
    }

    #[test]
    fn test_muted_still_tracks_fx() {
        let mut fb = Feedback::new();
        fb.set_muted(true);
        assert_eq!(fb.observe(&GameEvent::FeedSuccess), None);
        fb.observe(&GameEvent::LostSeedOverflow { at: Vec2::new(5.0, 5.0) });
        assert_eq!(fb.markers().len(), 1);
        assert_eq!(fb.markers()[0].at, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_markers_expire() {
        let mut fb = Feedback::new();
        fb.observe(&GameEvent::LostSeedOverflow { at: Vec2::ZERO });
        fb.advance(Duration::from_millis(300));
        fb.observe(&GameEvent::LostSeedOverflow { at: Vec2::ONE });

        assert_eq!(fb.markers().len(), 2);
        assert!((fb.markers()[0].progress() - 0.5).abs() < 1e-3);
        assert_ne!(fb.markers()[0].id, fb.markers()[1].id);

        fb.advance(Duration::from_millis(300));
        assert_eq!(fb.markers().len(), 1);
        assert_eq!(fb.markers()[0].at, Vec2::ONE);
    }

    #[tokio::test]
    async fn test_run_feedback_until_closed() {
        let (tx, rx) = broadcast::channel(8);
        tx.send(GameEvent::FeedSuccess).unwrap();
        tx.send(GameEvent::LostSeedOverflow { at: Vec2::ZERO }).unwrap();
        tx.send(GameEvent::Mistake).unwrap();
        drop(tx);

        let mut cues = Vec::new();
        let fb = run_feedback(rx, Feedback::new(), |cue, _| cues.push(cue)).await;
        assert_eq!(cues, vec![SoundEffect::Feed, SoundEffect::Lose]);
        assert_eq!(fb.markers().len(), 1);
    }
}
