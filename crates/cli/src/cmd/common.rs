//! Helpers shared by commands that need a loaded configuration.

use std::path::Path;
use std::sync::Arc;

use formist_core::config::loader::ConfigLoader;
use formist_core::config::types::ResolvedConfig;
use formist_core::definitions::DefinitionRepository;
use formist_core::storage::SqliteRouteStore;
use formist_core::{Admin, AdminSettings, FormRegistry};

use crate::OutputFormat;

/// Load the configuration and install logging, exiting on failure.
pub fn load_config(config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };
    crate::logging::init(&rc);
    rc
}

pub fn load_repository(rc: &ResolvedConfig) -> DefinitionRepository {
    match DefinitionRepository::new(&rc.forms_dir) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("Error reading definitions: {e}");
            std::process::exit(1);
        }
    }
}

pub fn load_registry(rc: &ResolvedConfig) -> FormRegistry {
    let repo = load_repository(rc);
    match FormRegistry::from_repository(&repo) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error loading definitions: {e}");
            std::process::exit(1);
        }
    }
}

/// Build the admin facade over the configured definitions, attaching the
/// route store when `storage` is configured.
pub fn load_admin(rc: &ResolvedConfig) -> Admin {
    let admin = Admin::new(AdminSettings::from(rc)).with_registry(load_registry(rc));

    let Some(path) = rc.storage.as_deref() else {
        return admin;
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating {}: {e}", parent.display());
            std::process::exit(1);
        }
    }

    match SqliteRouteStore::open(path) {
        Ok(store) => admin.with_store(Arc::new(store)),
        Err(e) => {
            eprintln!("Error opening route store {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

pub fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(OutputFormat::Table, true, true), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Table, false, true), OutputFormat::Quiet);
        assert_eq!(resolve_format(OutputFormat::Json, false, false), OutputFormat::Json);
    }
}
