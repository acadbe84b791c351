//! Data-driven game balance
//!
//! Defaults reproduce the shipped game exactly. A JSON file can override any
//! subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance knobs read by the rules, scheduler and session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spawn interval at session start (ms)
    pub initial_spawn_interval_ms: u64,
    /// Spawn interval floor (ms)
    pub min_spawn_interval_ms: u64,
    /// Interval multiplier per successful feed, in (0, 1]
    pub spawn_decay: f32,
    /// Item capacity before overflow eviction
    pub max_items: usize,
    /// Placement candidates per spawn
    pub placement_attempts: u32,
    /// Gap kept around items (density units)
    pub item_spacing: f32,
    /// Extra margin around the chick that still counts as a hit (density units)
    pub mouth_hit_margin: f32,
    /// Delay before Happy/Cry returns to Idle (ms)
    pub mood_reset_ms: u64,
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_decay: SPAWN_INTERVAL_DECAY,
            max_items: MAX_ITEMS,
            placement_attempts: PLACEMENT_ATTEMPTS,
            item_spacing: ITEM_SPACING,
            mouth_hit_margin: MOUTH_HIT_MARGIN,
            mood_reset_ms: MOOD_RESET_MS,
            seed: None,
        }
    }
}

impl Tuning {
    /// Parse from JSON and clamp into a playable range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Read a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(std::io::Error::from)
    }

    /// Load from `path` if given, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Failed to load tuning from {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break the engine invariants
    pub fn sanitized(mut self) -> Self {
        if self.min_spawn_interval_ms == 0 {
            log::warn!("min_spawn_interval_ms must be positive, using {}", MIN_SPAWN_INTERVAL_MS);
            self.min_spawn_interval_ms = MIN_SPAWN_INTERVAL_MS;
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            log::warn!(
                "initial_spawn_interval_ms {} is below the floor, raising to {}",
                self.initial_spawn_interval_ms,
                self.min_spawn_interval_ms
            );
            self.initial_spawn_interval_ms = self.min_spawn_interval_ms;
        }
        if !(self.spawn_decay > 0.0 && self.spawn_decay <= 1.0) {
            log::warn!("spawn_decay {} out of (0, 1], using {}", self.spawn_decay, SPAWN_INTERVAL_DECAY);
            self.spawn_decay = SPAWN_INTERVAL_DECAY;
        }
        if self.max_items == 0 {
            log::warn!("max_items must be at least 1, using {}", MAX_ITEMS);
            self.max_items = MAX_ITEMS;
        }
        if !(self.item_spacing >= 0.0) {
            self.item_spacing = ITEM_SPACING;
        }
        if !(self.mouth_hit_margin >= 0.0) {
            self.mouth_hit_margin = MOUTH_HIT_MARGIN;
        }
        self
    }

    /// Seed to use for this run
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        })
    }
}
