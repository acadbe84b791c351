//! Feed the Chick - drag-and-drop arcade mini-game engine
//!
//! Core modules:
//! - `sim`: Simulation rules (game state, placement, spawn/score/lives logic)
//! - `engine`: Observable state store that serializes every mutation
//! - `scheduler`: Cancellable spawn loop and transient mood timer
//! - `session`: Intro/Playing/Paused/Won overlay state machine
//! - `feedback`: Sound cue and FX marker observers for game events
//! - `input`: Drag-release resolution against the chick's mouth
//! - `tuning`: Data-driven game balance

pub mod engine;
pub mod feedback;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod tuning;

pub use engine::GameEngine;
pub use session::{SessionController, SessionPhase};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Lives at the start of a session
    pub const START_LIVES: u8 = 3;

    /// Spawn interval when a session starts (ms)
    pub const INITIAL_SPAWN_INTERVAL_MS: u64 = 1600;
    /// Spawn interval floor (ms) - the game never gets faster than this
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 520;
    /// Multiplier applied to the spawn interval on every successful feed
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.92;

    /// Maximum number of items on screen; the oldest is evicted beyond this
    pub const MAX_ITEMS: usize = 8;
    /// Random candidates tried per spawn before giving up
    pub const PLACEMENT_ATTEMPTS: u32 = 24;
    /// Gap kept around every item during placement (density units)
    pub const ITEM_SPACING: f32 = 12.0;

    /// Viewport defaults used by the presentation layer (density units)
    pub const FIELD_PADDING: f32 = 24.0;
    /// Fraction of the field height items may occupy (the rest is the chick's zone)
    pub const VERTICAL_LIMIT_RATIO: f32 = 0.7;

    /// Extra margin around the chick's measured bounds that still counts as the mouth
    pub const MOUTH_HIT_MARGIN: f32 = 16.0;

    /// How long Happy/Cry moods stay up before returning to Idle (ms)
    pub const MOOD_RESET_MS: u64 = 1000;
    /// Lifetime of a lost-seed burst marker (ms)
    pub const LOST_FX_DURATION_MS: u64 = 600;

    /// Event channel buffer; older events are dropped for slow observers
    pub const EVENT_BUFFER: usize = 4;
}

/// Center of a square of side `size` whose top-left corner is `top_left`
#[inline]
pub fn square_center(top_left: Vec2, size: f32) -> Vec2 {
    top_left + Vec2::splat(size / 2.0)
}

/// Convert density-independent units to pixels
#[inline]
pub fn units_to_px(units: f32, density: f32) -> f32 {
    units * density
}
