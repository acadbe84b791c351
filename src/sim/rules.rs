//! Game rules
//!
//! Every operation the engine exposes is a plain function over `GameState`.
//! Events are pushed into a caller-supplied buffer in emission order so the
//! store can publish the new snapshot before anyone hears about it.
//!
//! All functions are total: anything that does not apply to the current
//! state is a no-op, reported through the return value.

use rand::Rng;

use super::placement::{PlacementArea, find_position};
use super::state::{GameEvent, GameState, ItemKind, Mood, SpawnedItem, Viewport};
use crate::tuning::Tuning;
use crate::units_to_px;

/// What a spawn tick did
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnOutcome {
    /// Session not running
    Idle,
    /// Viewport too small for the rolled item
    NoRoom,
    /// Every placement candidate collided; the id was still consumed
    Crowded { id: u32 },
    /// Item added, possibly pushing out the oldest one
    Placed {
        id: u32,
        evicted: Option<SpawnedItem>,
    },
}

impl SpawnOutcome {
    /// Whether the state changed
    pub fn modified(&self) -> bool {
        !matches!(self, SpawnOutcome::Idle | SpawnOutcome::NoRoom)
    }
}

/// Start a fresh session
pub fn reset(state: &mut GameState, tuning: &Tuning) {
    *state = GameState::new_session(tuning.initial_spawn_interval_ms);
}

/// Show the intro whenever the game screen is (re)entered
pub fn show_intro_on_enter(state: &mut GameState) {
    state.running = false;
    state.show_intro = true;
    state.show_settings = false;
    state.show_win = false;
    state.items.clear();
    state.mood = Mood::Idle;
}

/// Freeze the field and open the settings overlay
pub fn pause_and_open_settings(state: &mut GameState) {
    state.running = false;
    state.show_settings = true;
}

/// Close settings; play resumes only when no intro/win overlay is up
pub fn resume_from_settings(state: &mut GameState) {
    if !state.show_intro && !state.show_win {
        state.running = true;
    }
    state.show_settings = false;
}

/// Close settings for a home exit; returns the score to report
pub fn close_settings(state: &mut GameState) -> u32 {
    state.running = false;
    state.show_settings = false;
    state.score
}

/// A seed landed in the mouth
pub fn register_success(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    state.score = state.score.saturating_add(1);
    let decayed = (state.spawn_interval_ms as f32 * tuning.spawn_decay) as u64;
    state.spawn_interval_ms = decayed.max(tuning.min_spawn_interval_ms);
    state.mood = Mood::Happy;
    events.push(GameEvent::FeedSuccess);
}

/// Wrong item fed, or a seed dropped outside the mouth
///
/// Returns false once the session is already lost; the win transition
/// happens exactly once.
pub fn register_mistake(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.is_over() {
        return false;
    }
    state.mood = Mood::Cry;
    lose_life(state, events);
    true
}

/// Drop back to Idle after transient feedback
pub fn acknowledge_mood_idle(state: &mut GameState) -> bool {
    if state.mood == Mood::Idle {
        return false;
    }
    state.mood = Mood::Idle;
    true
}

/// Remove an item by id (released or otherwise gone)
///
/// A release can race an overflow eviction, so a missing id is fine.
pub fn remove_item(state: &mut GameState, id: u32) -> bool {
    let before = state.items.len();
    state.items.retain(|item| item.id != id);
    state.items.len() != before
}

/// Try to add one item to the field
pub fn spawn_tick<R: Rng + ?Sized>(
    state: &mut GameState,
    viewport: &Viewport,
    tuning: &Tuning,
    rng: &mut R,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) -> SpawnOutcome {
    if !state.running {
        return SpawnOutcome::Idle;
    }

    let kind = ItemKind::from_roll(rng.random::<f32>());
    let size = units_to_px(kind.size(), viewport.density);
    let range = viewport.placeable_range(size);
    if range.x <= 0.0 || range.y <= 0.0 {
        // Keep the chick's zone clear rather than squeezing items in
        return SpawnOutcome::NoRoom;
    }

    let area = PlacementArea {
        origin: viewport.origin(),
        range,
        size,
        spacing: units_to_px(tuning.item_spacing, viewport.density),
    };
    let id = state.next_item_id();
    let Some(pos) = find_position(rng, &area, &state.items, tuning.placement_attempts) else {
        log::debug!("Spawn {} skipped: no free spot for {:?}", id, kind);
        return SpawnOutcome::Crowded { id };
    };

    state.items.push(SpawnedItem {
        id,
        kind,
        size,
        pos,
        spawned_at_ms: now_ms,
    });
    log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);

    let mut evicted = None;
    if state.items.len() > tuning.max_items {
        let oldest = state.items.remove(0);
        log::debug!("Overflow evicted {:?} #{}", oldest.kind, oldest.id);
        if oldest.kind.is_correct() {
            events.push(GameEvent::LostSeedOverflow { at: oldest.center() });
            lose_life(state, events);
        }
        evicted = Some(oldest);
    }

    SpawnOutcome::Placed { id, evicted }
}

/// Take a life; on the last one, end the session
fn lose_life(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::Mistake);

    if state.lives == 0 {
        state.items.clear();
        state.running = false;
        state.show_settings = false;
        state.show_win = true;
        state.mood = Mood::Cry;
        log::info!("Out of lives - final score {}", state.score);
        events.push(GameEvent::GameWon);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone)]
    enum Op {
        Success,
        Mistake,
        Spawn,
        Remove(u32),
        Pause,
        Resume,
        MoodIdle,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            2 => Just(Op::Success),
            1 => Just(Op::Mistake),
            6 => Just(Op::Spawn),
            2 => (0u32..64).prop_map(Op::Remove),
            1 => Just(Op::Pause),
            1 => Just(Op::Resume),
            1 => Just(Op::MoodIdle),
        ]
    }

    fn assert_invariants(state: &GameState, tuning: &Tuning) {
        assert!(state.lives <= 3);
        if state.lives == 0 {
            assert!(!state.running);
            assert!(state.show_win);
        }
        assert!(state.items.len() <= tuning.max_items);
        assert!(state.spawn_interval_ms >= tuning.min_spawn_interval_ms);
        assert!(!(state.show_intro && state.show_win));
        if state.show_settings {
            assert!(!state.running);
        }
        for (i, a) in state.items.iter().enumerate() {
            for b in &state.items[i + 1..] {
                assert_ne!(a.id, b.id);
                assert!(!a.bounds(tuning.item_spacing).overlaps(&b.bounds(tuning.item_spacing)));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..200)) {
            let tuning = Tuning::default();
            let vp = Viewport::new(420.0, 900.0, 1.0);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::default();
            reset(&mut state, &tuning);
            let mut wins = 0;

            for (t, op) in ops.iter().enumerate() {
                let mut events = Vec::new();
                let lives_before = state.lives;
                let interval_before = state.spawn_interval_ms;
                match op {
                    Op::Success => register_success(&mut state, &tuning, &mut events),
                    Op::Mistake => { register_mistake(&mut state, &mut events); }
                    Op::Spawn => { spawn_tick(&mut state, &vp, &tuning, &mut rng, t as u64, &mut events); }
                    Op::Remove(id) => { remove_item(&mut state, *id); }
                    Op::Pause => pause_and_open_settings(&mut state),
                    Op::Resume => resume_from_settings(&mut state),
                    Op::MoodIdle => { acknowledge_mood_idle(&mut state); }
                }
                prop_assert!(state.lives <= lives_before);
                prop_assert!(state.spawn_interval_ms <= interval_before);
                wins += events.iter().filter(|e| **e == GameEvent::GameWon).count();
                assert_invariants(&state, &tuning);
            }
            prop_assert!(wins <= 1);
            prop_assert_eq!(wins == 1, state.lives == 0);
        }

        #[test]
        fn prop_mistakes_clamp(count in 0usize..10) {
            let mut state = GameState::default();
            reset(&mut state, &Tuning::default());
            let mut events = Vec::new();
            for _ in 0..count {
                register_mistake(&mut state, &mut events);
            }
            prop_assert_eq!(state.lives as usize, 3usize.saturating_sub(count));
            let wins = events.iter().filter(|e| **e == GameEvent::GameWon).count();
            prop_assert_eq!(wins, usize::from(count >= 3));
        }

        #[test]
        fn prop_success_never_raises_interval(start in 520u64..5000) {
            let tuning = Tuning::default();
            let mut state = GameState::new_session(start);
            let mut events = Vec::new();
            register_success(&mut state, &tuning, &mut events);
            prop_assert!(state.spawn_interval_ms >= 520);
            if start > 520 {
                prop_assert!(state.spawn_interval_ms < start);
            } else {
                prop_assert_eq!(state.spawn_interval_ms, 520);
            }
        }
    }
}
