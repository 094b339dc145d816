//! Definition file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use super::errors::DefinitionError;
use crate::form::{Form, Page, finalize_form};

/// Serialization format of a definition file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Toml,
    Yaml,
    Json,
}

impl DefinitionFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A discovered definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
    /// File stem, used as the lookup name.
    pub name: String,
    pub path: PathBuf,
    pub format: DefinitionFormat,
}

/// Contents of a definition file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    Form(Form),
    Page(Page),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Self::Form(form) => &form.name,
            Self::Page(page) => &page.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Form(form) => &form.title,
            Self::Page(page) => &page.title,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Form(_) => "form",
            Self::Page(_) => "page",
        }
    }
}

/// Discover definition files in a directory.
///
/// Finds `.toml`, `.yaml`, `.yml` and `.json` files (non-recursive), sorted
/// by name. Returns an empty list if the directory doesn't exist.
pub fn discover_definitions(root: &Path) -> Result<Vec<DefinitionInfo>, DefinitionError> {
    if !root.exists() {
        return Ok(vec![]);
    }

    let root = root
        .canonicalize()
        .map_err(|_| DefinitionError::MissingDir(root.display().to_string()))?;

    let mut out = Vec::new();

    for entry in WalkDir::new(&root).max_depth(1) {
        let entry = entry.map_err(|e| DefinitionError::WalkError(root.display().to_string(), e))?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(format) = DefinitionFormat::from_path(path) else {
            continue;
        };

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
        if !name.is_empty() {
            out.push(DefinitionInfo { name, path: path.to_path_buf(), format });
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    debug!(dir = %root.display(), count = out.len(), "discovered definition files");
    Ok(out)
}

/// Repository for discovering and loading definition files.
pub struct DefinitionRepository {
    /// Root directory for definitions.
    pub root: PathBuf,
    /// Discovered definition files.
    pub definitions: Vec<DefinitionInfo>,
}

impl DefinitionRepository {
    /// Create a new repository from a directory.
    ///
    /// Returns an empty repository if the directory doesn't exist.
    pub fn new(root: &Path) -> Result<Self, DefinitionError> {
        let definitions = discover_definitions(root)?;
        Ok(Self { root: root.to_path_buf(), definitions })
    }

    /// List all discovered definition files.
    pub fn list_all(&self) -> &[DefinitionInfo] {
        &self.definitions
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    /// Load a definition by file name.
    pub fn load(&self, name: &str) -> Result<Definition, DefinitionError> {
        let info = self
            .definitions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| DefinitionError::NotFound(name.to_string()))?;

        load_definition_from_file(info)
    }

    /// Load all definitions, in discovery order.
    pub fn load_all(&self) -> Result<Vec<Definition>, DefinitionError> {
        self.definitions.iter().map(load_definition_from_file).collect()
    }
}

/// Load and parse a definition file.
///
/// A form or page without a `name` takes the file stem. Forms are checked
/// and normalised like builder output.
pub fn load_definition_from_file(info: &DefinitionInfo) -> Result<Definition, DefinitionError> {
    let path = &info.path;
    let source = fs::read_to_string(path)
        .map_err(|e| DefinitionError::Io { path: path.clone(), source: e })?;

    let definition = parse_definition(&source, info.format, path)?;

    match definition {
        Definition::Form(mut form) => {
            if form.name.is_empty() {
                form.name = info.name.clone();
            }
            let form = finalize_form(form)
                .map_err(|e| DefinitionError::Invalid { path: path.clone(), source: e })?;
            Ok(Definition::Form(form))
        }
        Definition::Page(mut page) => {
            if page.name.is_empty() {
                page.name = info.name.clone();
            }
            Ok(Definition::Page(page))
        }
    }
}

fn parse_definition(
    source: &str,
    format: DefinitionFormat,
    path: &Path,
) -> Result<Definition, DefinitionError> {
    match format {
        DefinitionFormat::Toml => toml::from_str(source)
            .map_err(|e| DefinitionError::Toml { path: path.to_path_buf(), source: e }),
        DefinitionFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| DefinitionError::Yaml { path: path.to_path_buf(), source: e }),
        DefinitionFormat::Json => serde_json::from_str(source)
            .map_err(|e| DefinitionError::Json { path: path.to_path_buf(), source: e }),
    }
}
