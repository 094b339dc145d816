//! List command implementation.

use std::path::Path;

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::common::{load_config, load_registry, resolve_format, print_json};
use crate::{ListArgs, OutputFormat};

/// Row for the definitions table.
#[derive(Debug, Tabled, Serialize)]
struct DefinitionRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Fields")]
    fields: usize,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ListArgs) {
    let rc = load_config(config, profile);
    let registry = load_registry(&rc);

    let mut rows: Vec<DefinitionRow> = registry
        .list_forms()
        .iter()
        .map(|form| DefinitionRow {
            kind: "form",
            name: form.name.clone(),
            title: form.title.clone(),
            fields: form.fields.len(),
        })
        .collect();
    rows.extend(registry.list_pages().iter().map(|page| DefinitionRow {
        kind: "page",
        name: page.name.clone(),
        title: page.title.clone(),
        fields: 0,
    }));

    match resolve_format(args.output, args.json, args.quiet) {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No definitions found in {}", rc.forms_dir.display());
                return;
            }
            let mut table = Table::new(&rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Quiet => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }
}
