//! Game settings and preferences
//!
//! Persisted separately from best scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KvStore};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset, wrapping High back to Low
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 120,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1000,
        }
    }

    /// Ambient snowflakes on screen
    pub fn snowflake_count(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 80,
            QualityPreset::High => 140,
        }
    }

    /// Horizontal strips the slope is drawn with
    pub fn road_strips(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 120,
            QualityPreset::High => 180,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Snow spray and crash bursts
    pub particles: bool,
    /// Ambient falling snow
    pub snowfall: bool,

    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no turn-side glow)
    pub reduced_motion: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            snowfall: true,
            sound: true,
            master_volume: 0.8,
            reduced_motion: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "skiRunSettings";

    /// Step to the next quality preset
    pub fn cycle_quality(&mut self) {
        self.quality = self.quality.next();
        log::info!("Quality: {}", self.quality.as_str());
    }

    pub fn toggle_sound(&mut self) {
        self.sound = !self.sound;
        log::info!("Sound: {}", if self.sound { "on" } else { "off" });
    }

    pub fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective snowflake count
    pub fn snowflake_count(&self) -> usize {
        if !self.snowfall {
            0
        } else {
            self.quality.snowflake_count()
        }
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KvStore) -> Self {
        match persistence::load_json(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) {
        persistence::save_json_or_warn(store, Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_scales_budgets() {
        let low = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        let high = Settings {
            quality: QualityPreset::High,
            ..Settings::default()
        };
        assert!(low.max_particles() < high.max_particles());
        assert!(low.snowflake_count() < high.snowflake_count());
        assert!(QualityPreset::Low.road_strips() < QualityPreset::High.road_strips());
    }

    #[test]
    fn test_toggles_zero_budgets() {
        let settings = Settings {
            particles: false,
            snowfall: false,
            sound: false,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.snowflake_count(), 0);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_cycle_quality_wraps() {
        let mut settings = Settings::default();
        settings.cycle_quality();
        assert_eq!(settings.quality, QualityPreset::High);
        settings.cycle_quality();
        assert_eq!(settings.quality, QualityPreset::Low);
        settings.cycle_quality();
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_toggles_survive_reload() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.toggle_sound();
        settings.toggle_fps();
        settings.cycle_quality();
        settings.save(&mut store);

        let loaded = Settings::load(&store);
        assert!(!loaded.sound);
        assert!(loaded.show_fps);
        assert_eq!(loaded.quality, QualityPreset::High);
        assert_eq!(loaded.effective_volume(), 0.0);
    }

    #[test]
    fn test_persist_and_partial_json() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            quality: QualityPreset::High,
            show_fps: true,
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);

        // Older saves missing fields still load
        store
            .set(Settings::STORAGE_KEY, r#"{"quality":"Low"}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded.quality, QualityPreset::Low);
        assert!(loaded.snowfall);
    }
}
