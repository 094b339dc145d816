use std::path::Path;

use formist_core::schema::project;

use super::common::{load_config, load_registry, print_json};
use crate::SchemaArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: SchemaArgs) {
    let rc = load_config(config, profile);
    let registry = load_registry(&rc);

    let form = match registry.get_form(&args.name) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let projection = match project(&form) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if args.ui {
        print_json(&projection.ui_schema);
    } else if args.presentation {
        print_json(&projection.schema);
    } else {
        print_json(&projection);
    }
}
