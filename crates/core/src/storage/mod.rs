//! Navigation metadata: persisted routes for forms and pages.
//!
//! The admin writes a [`Route`] for every registered form and page so that
//! external navigation UIs can list them. Stores implement [`RouteStore`];
//! an in-memory and a SQLite implementation are provided.

pub mod memory;
pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryRouteStore;
pub use sqlite::SqliteRouteStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema version {found} is newer than supported {supported}")]
    VersionTooNew { found: i32, supported: i32 },

    #[error("Route not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("no navigation store is configured")]
    NotConfigured,

    #[error("route store lock poisoned")]
    Poisoned,
}

/// Whether a route points at a form or a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Form,
    Page,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Page => "page",
        }
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RouteKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "form" => Ok(Self::Form),
            "page" => Ok(Self::Page),
            other => Err(StorageError::InvalidData(format!("unknown route kind: {other}"))),
        }
    }
}

/// Navigation record for one form or page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Assigned on first save when empty.
    #[serde(default)]
    pub id: String,
    /// Unique across the store.
    pub name: String,
    pub path: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub kind: RouteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Route {
    /// A route that has not been saved yet.
    pub fn new(
        kind: RouteKind,
        name: impl Into<String>,
        path: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            path: path.into(),
            title: title.into(),
            description: None,
            icon: None,
            kind,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Fill in the id and timestamps for a save at `now`.
    ///
    /// `existing` is the stored route with the same name, if any; its id and
    /// creation time are kept.
    pub(crate) fn stamp(&mut self, existing: Option<&Route>, now: DateTime<Utc>) {
        match existing {
            Some(stored) => {
                self.id = stored.id.clone();
                self.created_at = stored.created_at.or(Some(now));
            }
            None => {
                if self.id.is_empty() {
                    self.id = format!("{}_{}_{}", self.kind, self.name, now.timestamp());
                }
                self.created_at.get_or_insert(now);
            }
        }
        self.updated_at = Some(now);
    }
}

/// Persistence for navigation routes.
///
/// Implementations must be shareable across request handlers.
pub trait RouteStore: Send + Sync {
    /// Insert or update a route, matched by name. On return `route` carries
    /// the stored id and timestamps.
    fn save_route(&self, route: &mut Route) -> Result<(), StorageError>;

    /// All routes, ordered by name.
    fn list_routes(&self) -> Result<Vec<Route>, StorageError>;

    fn get_route(&self, id: &str) -> Result<Route, StorageError>;

    fn delete_route(&self, id: &str) -> Result<(), StorageError>;
}
