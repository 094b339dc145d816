//! Validate command implementation.

use std::io::Read;
use std::path::Path;

use formist_core::definitions::{load_definition_from_file, Definition, DefinitionRepository};
use formist_core::schema::project;
use formist_core::validation::validate_form_report;
use formist_core::value::payload_from_json;
use tracing::debug;

use super::common::{load_config, load_registry, load_repository};
use crate::ValidateArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ValidateArgs) {
    let rc = load_config(config, profile);

    if args.all {
        let repo = load_repository(&rc);
        check_definitions(&repo);
        return;
    }

    // clap enforces a name unless --all is given
    let Some(name) = args.name else {
        eprintln!("Error: a form name is required");
        std::process::exit(2);
    };

    let registry = load_registry(&rc);
    let form = match registry.get_form(&name) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let raw = match read_payload(args.data.as_deref()) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error reading payload: {e}");
            std::process::exit(1);
        }
    };
    let json: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error parsing payload: {e}");
            std::process::exit(1);
        }
    };
    if !json.is_object() {
        eprintln!("Error parsing payload: expected a JSON object");
        std::process::exit(1);
    }

    let report = validate_form_report(&form, &payload_from_json(json));
    debug!(form = %name, errors = report.errors.len(), "validated payload");

    if report.valid {
        println!("OK   formist validate");
        println!("form: {name}");
    } else {
        println!("FAIL formist validate");
        println!("form: {name}");
        for error in &report.errors {
            println!("  - {}: {}", error.field, error.message());
        }
        std::process::exit(1);
    }
}

fn read_payload(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Load every definition file and project each form, reporting per file.
fn check_definitions(repo: &DefinitionRepository) {
    let mut failures = 0usize;

    for info in repo.list_all() {
        let outcome = load_definition_from_file(info)
            .map_err(|e| e.to_string())
            .and_then(|definition| match definition {
                Definition::Form(form) => project(&form).map(|_| ()).map_err(|e| e.to_string()),
                Definition::Page(_) => Ok(()),
            });

        match outcome {
            Ok(()) => println!("  ok   {}", info.name),
            Err(e) => {
                failures += 1;
                println!("  fail {}: {e}", info.name);
            }
        }
    }

    let total = repo.list_all().len();
    if failures == 0 {
        println!("OK   formist validate");
        println!("definitions: {total}");
    } else {
        println!("FAIL formist validate");
        println!("definitions: {total}, failed: {failures}");
        std::process::exit(1);
    }
}
