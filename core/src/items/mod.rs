//! Consumable boost item definitions.
//!
//! The in-game items themselves (registration, models, tooltips) live in the
//! host plugin; this module owns the data they bind to. Definitions are
//! loaded from TOML in two locations:
//! - **Builtin**: shipped alongside the plugin (read-only)
//! - **Custom**: server-operator definitions (editable, override builtins)

mod config;
mod definitions;

pub use config::{
    DefinitionError, default_builtin_dir, default_custom_dir, load_definitions, load_file,
};
pub use definitions::{DefinitionConfig, DefinitionSet, ItemDefinition};
