//! Engine tuning knobs.
//!
//! Loaded confy-style from the platform config directory, or deserialized
//! from the host plugin's own config section. Every field has a
//! game-sensible default so a missing or partial file is never fatal.

use lure_types::BoostKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks between reminder notifications for an active boost
    /// (200 ticks = 10 s at 20 tps).
    pub reminder_cadence_ticks: u32,

    /// Remaining-ticks threshold at which the one-shot "about to expire"
    /// warning fires.
    pub near_expiry_ticks: u32,

    /// Minimum seconds between forced-spawn requests per actor, shared by
    /// the scheduler's affinity nudges and the gate's replacement requests.
    pub forced_spawn_cooldown_secs: u64,

    /// Seconds between periodic persistence flushes of all boosted actors.
    pub flush_interval_secs: u64,

    /// Blocks searched around a spawn candidate for boosted actors.
    pub affinity_radius: f64,

    /// Capacity of the recent-candidate dedup cache.
    pub dedup_capacity: usize,

    /// Host base chance (percent) for legendary spawn attempts when no boost
    /// is active. Mirrors the host's own configured rate.
    pub base_legendary_percent: f32,

    /// Host base chance (percent) for shiny spawns when no boost is active
    /// (the stock 1-in-4096 rate).
    pub base_shiny_percent: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_cadence_ticks: 200,
            near_expiry_ticks: 200,
            forced_spawn_cooldown_secs: 30,
            flush_interval_secs: 60,
            affinity_radius: 64.0,
            dedup_capacity: 1024,
            base_legendary_percent: 0.25,
            base_shiny_percent: 0.0244,
        }
    }
}

impl EngineConfig {
    /// Load from the platform config dir, falling back to defaults on any
    /// problem (a broken config file must never keep the plugin from
    /// starting).
    pub fn load() -> Self {
        confy::load("lure", None).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load engine config, using defaults");
            Self::default()
        })
    }

    /// The host's unboosted chance (percent) for a rate kind. `TypeAffinity`
    /// has no chance semantics and reports zero.
    pub fn base_percent(&self, kind: BoostKind) -> f32 {
        match kind {
            BoostKind::LegendaryRate => self.base_legendary_percent,
            BoostKind::ShinyRate => self.base_shiny_percent,
            BoostKind::TypeAffinity => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml = r#"
reminder_cadence_ticks = 100
affinity_radius = 32.0
"#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.reminder_cadence_ticks, 100);
        assert_eq!(config.affinity_radius, 32.0);
        // Untouched fields keep their defaults
        assert_eq!(config.forced_spawn_cooldown_secs, 30);
        assert_eq!(config.base_shiny_percent, 0.0244);
    }

    #[test]
    fn test_base_percent_by_kind() {
        let config = EngineConfig::default();
        assert_eq!(
            config.base_percent(BoostKind::LegendaryRate),
            config.base_legendary_percent
        );
        assert_eq!(config.base_percent(BoostKind::TypeAffinity), 0.0);
    }
}
