use std::collections::HashMap;

use lure_types::BoostKind;
use serde::{Deserialize, Serialize};

use crate::boosts::{BoostError, validate_params};

fn default_enabled() -> bool {
    true
}

/// One consumable boost item, as defined in TOML:
///
/// ```toml
/// [[item]]
/// id = "blazing_lure"
/// name = "Blazing Lure"
/// kind = "type_affinity"
/// duration_ticks = 2400
/// strength = 5.0
/// type_name = "fire"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    /// Display name shown to players.
    pub name: String,
    pub kind: BoostKind,
    pub duration_ticks: u32,
    pub strength: f32,
    /// Affinity type granted by the item; required for `type_affinity`.
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ItemDefinition {
    /// Check that using this item would produce a valid boost.
    pub fn validate(&self) -> Result<(), BoostError> {
        if self.id.is_empty() {
            return Err(BoostError::InvalidParameters(
                "item id must not be empty".to_string(),
            ));
        }
        validate_params(
            self.kind,
            self.duration_ticks,
            self.strength,
            self.type_name.as_deref(),
        )
    }
}

/// TOML file shape: a list of `[[item]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionConfig {
    #[serde(default, rename = "item")]
    pub items: Vec<ItemDefinition>,
}

/// All loaded item definitions, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    items: HashMap<String, ItemDefinition>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add definitions from a config. Later adds override earlier ones with
    /// the same ID (custom-over-builtin); returns the overridden IDs.
    pub fn add_config(&mut self, config: DefinitionConfig) -> Vec<String> {
        let mut overridden = Vec::new();
        for item in config.items {
            if self.items.contains_key(&item.id) {
                overridden.push(item.id.clone());
            }
            self.items.insert(item.id.clone(), item);
        }
        overridden
    }

    /// Get an item definition by ID.
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// All enabled item definitions.
    pub fn enabled(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values().filter(|item| item.enabled)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
