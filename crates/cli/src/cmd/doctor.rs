use formist_core::config::loader::{default_config_path, ConfigLoader};
use formist_core::definitions::DefinitionRepository;
use formist_core::FormRegistry;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            println!("FAIL formist doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    if !rc.forms_dir.is_dir() {
        println!("FAIL formist doctor");
        println!("forms_dir does not exist: {}", rc.forms_dir.display());
        std::process::exit(1);
    }

    let registry = DefinitionRepository::new(&rc.forms_dir)
        .and_then(|repo| FormRegistry::from_repository(&repo));
    let registry = match registry {
        Ok(registry) => registry,
        Err(e) => {
            println!("FAIL formist doctor");
            println!("{e}");
            std::process::exit(1);
        }
    };

    println!("OK   formist doctor");
    println!("path: {}", rc.config_path.display());
    println!("profile: {}", rc.active_profile);
    println!("forms_dir: {}", rc.forms_dir.display());
    println!(
        "storage: {}",
        rc.storage.as_ref().map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    );
    println!("admin.title: {}", rc.admin.title);
    println!("admin.base_path: {}", rc.admin.base_path);
    println!("admin.auth_enabled: {}", rc.admin.auth_enabled);
    println!("cors.enabled: {}", rc.cors.enabled);
    println!("forms: {}", registry.form_count());
    println!("pages: {}", registry.page_count());
}
