use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    /// Directory of form and page definition files.
    pub forms_dir: String,
    /// SQLite database for navigation routes. Routes are not persisted when
    /// unset.
    pub storage: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Prefix of every route path.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub auth_enabled: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { title: default_title(), base_path: default_base_path(), auth_enabled: false }
    }
}

fn default_title() -> String {
    "Admin Panel".to_string()
}

fn default_base_path() -> String {
    "/admin".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { enabled: false, origins: default_origins() }
    }
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    /// Path of the file this configuration was read from.
    pub config_path: PathBuf,
    pub forms_dir: PathBuf,
    pub storage: Option<PathBuf>,
    pub admin: AdminConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}
