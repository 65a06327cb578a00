//! Best scores
//!
//! Endless keeps a single best, stored as a plain integer string. Trails keep
//! one best per trail id in a JSON object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KvStore};
use crate::sim::trails::GameMode;

/// Storage key for the endless best score
pub const ENDLESS_KEY: &str = "skiRunHigh";
/// Storage key for the per-trail best map
pub const TRAILS_KEY: &str = "skiRunTrailBests";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestScores {
    pub endless: u64,
    /// Trail id -> best score
    pub trails: BTreeMap<String, u64>,
}

impl BestScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load both records; anything missing or unreadable starts at zero
    pub fn load(store: &dyn KvStore) -> Self {
        let endless = match store.get(ENDLESS_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt {}: {:?}", ENDLESS_KEY, raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read {}: {}", ENDLESS_KEY, e);
                0
            }
        };
        let trails = persistence::load_json(store, TRAILS_KEY).unwrap_or_default();

        let scores = Self { endless, trails };
        log::info!(
            "Loaded best scores: endless {}, {} trails",
            scores.endless,
            scores.trails.len()
        );
        scores
    }

    /// Write both records; failures are logged and ignored
    pub fn save(&self, store: &mut dyn KvStore) {
        if let Err(e) = store.set(ENDLESS_KEY, &self.endless.to_string()) {
            log::warn!("Failed to save {}: {}", ENDLESS_KEY, e);
        }
        persistence::save_json_or_warn(store, TRAILS_KEY, &self.trails);
    }

    /// Best score for a mode (0 if never played)
    pub fn best_for(&self, mode: &GameMode) -> u64 {
        match mode {
            GameMode::Endless => self.endless,
            GameMode::Trail(trail) => self.trails.get(trail.id).copied().unwrap_or(0),
        }
    }

    /// Record a finished run's score. Returns true on a new best.
    pub fn record(&mut self, mode: &GameMode, score: u64) -> bool {
        let slot = match mode {
            GameMode::Endless => &mut self.endless,
            GameMode::Trail(trail) => self.trails.entry(trail.id.to_string()).or_insert(0),
        };
        if score > *slot {
            log::info!("New best for {}: {} (was {})", mode.key(), score, *slot);
            *slot = score;
            true
        } else {
            false
        }
    }
}
