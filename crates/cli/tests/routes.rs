use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn setup(with_storage: bool) -> (TempDir, PathBuf) {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let mut toml = String::from(
        "version = 1\n[admin]\nbase_path = \"/backoffice/\"\n[profiles.default]\nforms_dir = \"{{config_dir}}/forms\"\n",
    );
    if with_storage {
        toml.push_str("storage = \"{{config_dir}}/data/routes.db\"\n");
    }
    write_file(&cfg, &toml);
    write_file(&tmp.path().join("forms/users.toml"), "kind = \"form\"\ntitle = \"Users\"\n");
    write_file(&tmp.path().join("forms/help.toml"), "kind = \"page\"\ntitle = \"Help\"\n");
    (tmp, cfg)
}

fn formist(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("formist"));
    cmd.args(["--config", cfg.to_str().unwrap()]);
    cmd
}

fn stored_routes(cfg: &Path) -> serde_json::Value {
    let out = formist(cfg).args(["routes", "list", "--json"]).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn routes_require_storage() {
    let (_tmp, cfg) = setup(false);
    formist(&cfg)
        .args(["routes", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Set `storage` in profile 'default'"));
}

#[test]
fn routes_sync_list_delete() {
    let (tmp, cfg) = setup(true);

    formist(&cfg)
        .args(["routes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No routes stored."));

    formist(&cfg)
        .args(["routes", "sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("routes: 2"));
    assert!(tmp.path().join("data/routes.db").exists());

    let routes = stored_routes(&cfg);
    assert_eq!(routes.as_array().unwrap().len(), 2);
    assert_eq!(routes[0]["name"], "help");
    assert_eq!(routes[0]["kind"], "page");
    assert_eq!(routes[0]["path"], "/backoffice/pages/help");
    assert_eq!(routes[1]["path"], "/backoffice/forms/users");

    // Syncing again keeps one route per name
    formist(&cfg).args(["routes", "sync"]).assert().success();
    let again = stored_routes(&cfg);
    assert_eq!(again.as_array().unwrap().len(), 2);
    assert_eq!(again[1]["id"], routes[1]["id"]);

    formist(&cfg)
        .args(["routes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/backoffice/forms/users"));

    let id = routes[1]["id"].as_str().unwrap().to_string();
    formist(&cfg)
        .args(["routes", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("deleted: {id}")));
    assert_eq!(stored_routes(&cfg).as_array().unwrap().len(), 1);

    formist(&cfg).args(["routes", "delete", &id]).assert().failure();
}
