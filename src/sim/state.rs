//! Game state and core simulation types
//!
//! Everything the engine owns lives here. Presentation code only ever reads
//! a `GameState`; mutations go through the functions in `rules`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use crate::consts::*;
use crate::{square_center, units_to_px};

/// Which overlay/phase the session is in, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Intro overlay, nothing spawns
    Intro,
    /// Active gameplay
    Playing,
    /// Settings overlay open over a frozen field
    Paused,
    /// Lives ran out
    Won,
}

/// Presentation-only feedback on the chick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Idle,
    Happy,
    Cry,
}

/// Item types that can fall onto the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Golden corn - the only thing the chick should eat
    Seed,
    Rock,
    Frog,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Seed, ItemKind::Rock, ItemKind::Frog];

    /// On-screen size in density units
    pub fn size(&self) -> f32 {
        match self {
            ItemKind::Seed => 72.0,
            ItemKind::Rock => 72.0,
            ItemKind::Frog => 86.0,
        }
    }

    /// Relative spawn weight (sums to 1.0 across kinds)
    pub fn weight(&self) -> f32 {
        match self {
            ItemKind::Seed => 0.6,
            ItemKind::Rock => 0.2,
            ItemKind::Frog => 0.2,
        }
    }

    /// Map a uniform roll in [0, 1) onto cumulative weight ranges
    pub fn from_roll(roll: f32) -> Self {
        // Thresholds written out: summing f32 weights drifts past 0.8
        if roll < 0.6 {
            ItemKind::Seed
        } else if roll < 0.8 {
            ItemKind::Rock
        } else {
            ItemKind::Frog
        }
    }

    /// Seeds are correct, everything else is a mistake to feed
    pub fn is_correct(&self) -> bool {
        matches!(self, ItemKind::Seed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Seed => "Golden corn",
            ItemKind::Rock => "Stone",
            ItemKind::Frog => "Frog",
        }
    }
}

/// Field dimensions supplied by the presentation layer for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub horizontal_padding: f32,
    pub vertical_padding: f32,
    /// Fraction of the height items may occupy
    pub vertical_limit_ratio: f32,
    /// Pixels per density unit
    pub density: f32,
}

impl Viewport {
    /// Viewport with the default paddings and limit ratio, in pixels
    pub fn new(width: f32, height: f32, density: f32) -> Self {
        Self {
            width,
            height,
            horizontal_padding: units_to_px(FIELD_PADDING, density),
            vertical_padding: units_to_px(FIELD_PADDING, density),
            vertical_limit_ratio: VERTICAL_LIMIT_RATIO,
            density,
        }
    }

    /// Placeable span for the top-left corner of an item of `size_px`
    ///
    /// Either component is zero when the item cannot fit on that axis.
    pub fn placeable_range(&self, size_px: f32) -> Vec2 {
        let x_range = (self.width - self.horizontal_padding * 2.0 - size_px).max(0.0);
        let vertical_limit = self.height * self.vertical_limit_ratio;
        let y_range = (vertical_limit - self.vertical_padding - size_px).max(0.0);
        Vec2::new(x_range, y_range)
    }

    /// Top-left corner of the placeable area
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.horizontal_padding, self.vertical_padding)
    }
}

/// An item on the field
///
/// Position is authoritative only at spawn; dragging is tracked by the UI
/// until the item is released.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnedItem {
    pub id: u32,
    pub kind: ItemKind,
    /// Side length in pixels
    pub size: f32,
    /// Top-left spawn position in pixels
    pub pos: Vec2,
    /// Milliseconds since the engine started
    pub spawned_at_ms: u64,
}

impl SpawnedItem {
    /// Bounding box grown by `extra` on every side
    pub fn bounds(&self, extra: f32) -> Bounds {
        Bounds::square(self.pos, self.size).inflate(extra)
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }
}

/// Discrete, fire-and-forget notifications for audio/FX observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FeedSuccess,
    Mistake,
    GameWon,
    /// A seed was pushed off the field by overflow; `at` is its center
    LostSeedOverflow { at: Vec2 },
}

/// Complete game state (single source of truth)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    /// 0..=START_LIVES
    pub lives: u8,
    pub running: bool,
    pub show_intro: bool,
    pub show_settings: bool,
    pub show_win: bool,
    /// Delay before the next spawn (ms)
    pub spawn_interval_ms: u64,
    /// Active items, oldest first
    pub items: Vec<SpawnedItem>,
    pub mood: Mood,
    /// Next item ID
    pub(crate) next_item_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            running: false,
            show_intro: true,
            show_settings: false,
            show_win: false,
            spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            items: Vec::new(),
            mood: Mood::Idle,
            next_item_id: 0,
        }
    }
}

impl GameState {
    /// State for a session that has just been started
    pub fn new_session(initial_interval_ms: u64) -> Self {
        Self {
            running: true,
            show_intro: false,
            spawn_interval_ms: initial_interval_ms,
            ..Self::default()
        }
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_item_id;
        self.next_item_id = self.next_item_id.wrapping_add(1);
        id
    }

    /// ID the next spawn attempt will use
    pub fn peek_item_id(&self) -> u32 {
        self.next_item_id
    }

    pub fn item(&self, id: u32) -> Option<&SpawnedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Overlay phase as seen by the session state machine
    pub fn phase(&self) -> SessionPhase {
        if self.show_win {
            SessionPhase::Won
        } else if self.show_settings {
            SessionPhase::Paused
        } else if self.show_intro {
            SessionPhase::Intro
        } else if self.running {
            SessionPhase::Playing
        } else {
            // Not running with no overlay only happens after a home exit
            SessionPhase::Paused
        }
    }

    pub fn is_over(&self) -> bool {
        self.lives == 0
    }
}
