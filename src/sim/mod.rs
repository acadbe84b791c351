//! Simulation module
//!
//! All gameplay rules live here. This module must stay pure:
//! - No timers, channels or threads
//! - RNG and clock are passed in by the caller
//! - Insertion order of items is the eviction order

pub mod bounds;
pub mod placement;
pub mod rules;
pub mod state;

pub use bounds::Bounds;
pub use placement::{PlacementArea, find_position};
pub use rules::SpawnOutcome;
pub use state::{GameEvent, GameState, ItemKind, Mood, SessionPhase, SpawnedItem, Viewport};
