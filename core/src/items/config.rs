//! Item definition loading.
//!
//! Each directory may hold any number of `.toml` files. A file that fails to
//! parse is reported and skipped; a definition that fails validation is
//! reported and skipped; neither aborts loading the rest.

use std::fs;
use std::path::{Path, PathBuf};

use super::definitions::{DefinitionConfig, DefinitionSet};

/// Errors that can occur while loading definition files.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load definitions from the builtin and custom directories.
///
/// Builtin definitions load first; custom definitions with the same ID
/// override them. A missing directory is simply skipped.
pub fn load_definitions(
    builtin_dir: Option<&Path>,
    custom_dir: Option<&Path>,
) -> Result<DefinitionSet, DefinitionError> {
    let mut set = DefinitionSet::new();

    if let Some(dir) = builtin_dir
        && dir.exists()
    {
        load_directory(&mut set, dir, "builtin")?;
    }
    if let Some(dir) = custom_dir
        && dir.exists()
    {
        load_directory(&mut set, dir, "custom")?;
    }

    Ok(set)
}

fn load_directory(
    set: &mut DefinitionSet,
    dir: &Path,
    source: &str,
) -> Result<(), DefinitionError> {
    let entries = fs::read_dir(dir).map_err(|e| DefinitionError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "toml") {
            continue;
        }
        match load_file(&path) {
            Ok(mut config) => {
                // Drop invalid definitions, keep the rest of the file
                config.items.retain(|item| match item.validate() {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            source,
                            file = ?path.file_name(),
                            id = %item.id,
                            error = %e,
                            "skipping invalid item definition"
                        );
                        false
                    }
                });
                let overridden = set.add_config(config);
                if !overridden.is_empty() {
                    tracing::info!(source, file = ?path.file_name(), ids = ?overridden,
                        "definitions overridden");
                }
            }
            Err(e) => {
                tracing::warn!(source, file = ?path.file_name(), error = %e,
                    "failed to load definition file");
            }
        }
    }

    Ok(())
}

/// Load a single TOML definition file.
pub fn load_file(path: &Path) -> Result<DefinitionConfig, DefinitionError> {
    let contents = fs::read_to_string(path).map_err(|e| DefinitionError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| DefinitionError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Default builtin definitions directory, relative to the executable.
pub fn default_builtin_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("definitions").join("builtin")))
}

/// Default custom definitions directory under the platform config dir.
pub fn default_custom_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lure").join("definitions"))
}
