//! SQLite-backed route store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::{Route, RouteKind, RouteStore, StorageError};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

const ROUTE_COLUMNS: &str =
    "id, name, path, title, description, icon, kind, created_at, updated_at";

/// Route store persisted in a SQLite database.
pub struct SqliteRouteStore {
    conn: Mutex<Connection>,
}

impl SqliteRouteStore {
    /// Open or create a route database at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Route>, StorageError> {
        let route = conn
            .query_row(
                &format!("SELECT {ROUTE_COLUMNS} FROM formist_routes WHERE name = ?1"),
                [name],
                Self::row_to_route,
            )
            .optional()?;
        Ok(route)
    }

    fn row_to_route(row: &rusqlite::Row) -> Result<Route, rusqlite::Error> {
        let kind_str: String = row.get(6)?;
        let created_str: String = row.get(7)?;
        let updated_str: String = row.get(8)?;

        Ok(Route {
            id: row.get(0)?,
            name: row.get(1)?,
            path: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            icon: row.get(5)?,
            kind: kind_str.parse().map_err(|e: StorageError| {
                rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, e.into())
            })?,
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|d| d.with_timezone(&Utc))
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.unwrap_or_else(Utc::now).to_rfc3339()
}

impl RouteStore for SqliteRouteStore {
    fn save_route(&self, route: &mut Route) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing = Self::find_by_name(&tx, &route.name)?;
        route.stamp(existing.as_ref(), Utc::now());

        tx.execute(
            "INSERT INTO formist_routes
                (id, name, path, title, description, icon, kind, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(name) DO UPDATE SET
                path = excluded.path,
                title = excluded.title,
                description = excluded.description,
                icon = excluded.icon,
                kind = excluded.kind,
                updated_at = excluded.updated_at",
            params![
                route.id,
                route.name,
                route.path,
                route.title,
                route.description,
                route.icon,
                route.kind.as_str(),
                format_timestamp(route.created_at),
                format_timestamp(route.updated_at),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list_routes(&self) -> Result<Vec<Route>, StorageError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {ROUTE_COLUMNS} FROM formist_routes ORDER BY name"))?;
        let routes = stmt
            .query_map([], Self::row_to_route)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(routes)
    }

    fn get_route(&self, id: &str) -> Result<Route, StorageError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {ROUTE_COLUMNS} FROM formist_routes WHERE id = ?1"),
            [id],
            Self::row_to_route,
        )
        .optional()?
        .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete_route(&self, id: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM formist_routes WHERE id = ?1", [id])?;
        if rows == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Initialize the database schema.
fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if version > SCHEMA_VERSION {
        return Err(StorageError::VersionTooNew { found: version, supported: SCHEMA_VERSION });
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, StorageError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?1)",
        [version],
    )?;
    Ok(())
}

fn create_schema_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        CREATE TABLE schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        CREATE TABLE formist_routes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            path TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            icon TEXT,
            kind TEXT NOT NULL CHECK (kind IN ('form', 'page')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX idx_routes_kind ON formist_routes(kind);
        "#,
    )?;
    Ok(())
}
