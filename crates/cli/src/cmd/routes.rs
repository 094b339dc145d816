//! Navigation route commands.

use std::path::Path;

use formist_core::storage::{Route, StorageError};
use tabled::{settings::Style, Table, Tabled};

use super::common::{load_admin, load_config, print_json};
use crate::RoutesCommand;

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Route> for RouteRow {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            kind: route.kind.to_string(),
            name: route.name.clone(),
            path: route.path.clone(),
            title: route.title.clone(),
            updated: route
                .updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, command: RoutesCommand) {
    let rc = load_config(config, profile);
    let admin = load_admin(&rc);

    if !admin.has_store() {
        eprintln!("Error: {}", StorageError::NotConfigured);
        eprintln!("Set `storage` in profile '{}'.", rc.active_profile);
        std::process::exit(1);
    }

    match command {
        RoutesCommand::List { json } => {
            let routes = admin.routes().unwrap_or_else(fail);
            if json {
                print_json(&routes);
            } else if routes.is_empty() {
                println!("No routes stored.");
                println!("Store them with: formist routes sync");
            } else {
                let rows: Vec<RouteRow> = routes.iter().map(RouteRow::from).collect();
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                println!("{table}");
            }
        }
        RoutesCommand::Sync => {
            let count = admin.sync_routes().unwrap_or_else(fail);
            println!("OK   formist routes sync");
            println!("routes: {count}");
        }
        RoutesCommand::Delete { id } => {
            admin.delete_route(&id).unwrap_or_else(fail);
            println!("OK   formist routes delete");
            println!("deleted: {id}");
        }
    }
}

fn fail<T>(e: StorageError) -> T {
    eprintln!("Error: {e}");
    std::process::exit(1);
}
