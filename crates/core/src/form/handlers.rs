//! Application-owned behaviour attached to forms, tables and pages.
//!
//! Handlers are kept out of the serializable [`Form`](super::Form) and
//! [`Page`](super::Page) values. The registry stores them next to the data,
//! keyed by form name (and by field name for table sources), so the model
//! stays plain data and handlers can be swapped in tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::field::TableColumn;
use crate::value::ValueMap;

/// Opaque error returned by application handlers. The core propagates it
/// without inspecting it.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult<T> = Result<T, HandlerError>;

/// Receives a validated submission.
pub trait SubmitHandler: Send + Sync {
    fn submit(&self, payload: &ValueMap) -> HandlerResult<serde_json::Value>;
}

impl<F> SubmitHandler for F
where
    F: Fn(&ValueMap) -> HandlerResult<serde_json::Value> + Send + Sync,
{
    fn submit(&self, payload: &ValueMap) -> HandlerResult<serde_json::Value> {
        self(payload)
    }
}

/// Supplies prefill data when a form's schema is served.
pub trait LoadHandler: Send + Sync {
    fn load(&self) -> HandlerResult<serde_json::Value>;
}

impl<F> LoadHandler for F
where
    F: Fn() -> HandlerResult<serde_json::Value> + Send + Sync,
{
    fn load(&self) -> HandlerResult<serde_json::Value> {
        self()
    }
}

/// Paging and filter parameters for a table data request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub filters: ValueMap,
}

impl TableQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit, filters: ValueMap::new() }
    }
}

/// One page of table rows plus the total row count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<ValueMap>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Produces rows for a table field.
pub trait TableDataSource: Send + Sync {
    fn fetch(&self, query: &TableQuery) -> HandlerResult<TableData>;
}

impl<F> TableDataSource for F
where
    F: Fn(&TableQuery) -> HandlerResult<TableData> + Send + Sync,
{
    fn fetch(&self, query: &TableQuery) -> HandlerResult<TableData> {
        self(query)
    }
}

/// Request passed to a page handler by the dispatch layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageRequest {
    pub path: String,
    pub query: ValueMap,
}

/// Response produced for a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl PageResponse {
    pub fn json(body: &serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json".to_string(),
            body: body.to_string(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8".to_string(), body: body.into() }
    }
}

/// Full override of page request handling.
pub trait PageHandler: Send + Sync {
    fn handle(&self, request: &PageRequest) -> HandlerResult<PageResponse>;
}

impl<F> PageHandler for F
where
    F: Fn(&PageRequest) -> HandlerResult<PageResponse> + Send + Sync,
{
    fn handle(&self, request: &PageRequest) -> HandlerResult<PageResponse> {
        self(request)
    }
}

/// Handlers registered for one form.
#[derive(Clone, Default)]
pub struct FormHandlers {
    pub on_submit: Option<Arc<dyn SubmitHandler>>,
    pub on_load: Option<Arc<dyn LoadHandler>>,
    /// Row sources keyed by table field name.
    pub table_sources: HashMap<String, Arc<dyn TableDataSource>>,
}

impl FormHandlers {
    pub fn is_empty(&self) -> bool {
        self.on_submit.is_none() && self.on_load.is_none() && self.table_sources.is_empty()
    }

    pub fn table_source(&self, field: &str) -> Option<&Arc<dyn TableDataSource>> {
        self.table_sources.get(field)
    }
}

impl fmt::Debug for FormHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tables: Vec<&str> = self.table_sources.keys().map(String::as_str).collect();
        tables.sort_unstable();
        f.debug_struct("FormHandlers")
            .field("on_submit", &self.on_submit.is_some())
            .field("on_load", &self.on_load.is_some())
            .field("table_sources", &tables)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_closures_are_handlers() {
        let submit: Arc<dyn SubmitHandler> =
            Arc::new(|payload: &ValueMap| -> HandlerResult<serde_json::Value> {
                Ok(json!({ "received": payload.len() }))
            });
        let mut payload = ValueMap::new();
        payload.insert("a".into(), Value::from(1));
        assert_eq!(submit.submit(&payload).unwrap(), json!({"received": 1}));

        let load: Arc<dyn LoadHandler> =
            Arc::new(|| -> HandlerResult<serde_json::Value> { Ok(json!({"name": "x"})) });
        assert_eq!(load.load().unwrap()["name"], "x");
    }

    #[test]
    fn test_handler_errors_propagate() {
        let source: Arc<dyn TableDataSource> =
            Arc::new(|_: &TableQuery| -> HandlerResult<TableData> { Err("db down".into()) });
        let err = source.fetch(&TableQuery::new(1, 10)).unwrap_err();
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn test_debug_lists_tables() {
        let mut handlers = FormHandlers::default();
        assert!(handlers.is_empty());
        handlers.table_sources.insert(
            "users".into(),
            Arc::new(|q: &TableQuery| -> HandlerResult<TableData> {
                Ok(TableData { page: q.page, limit: q.limit, ..Default::default() })
            }),
        );
        assert!(!handlers.is_empty());
        assert!(format!("{handlers:?}").contains("users"));
    }
}
