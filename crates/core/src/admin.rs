//! Admin facade: the operations a dispatch layer performs on registered
//! forms and pages.
//!
//! [`Admin`] owns the [`FormRegistry`] and, optionally, a [`RouteStore`] for
//! navigation metadata. Route persistence is best-effort: a failing store is
//! logged and never fails a registration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value as Json, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ResolvedConfig;
use crate::form::{
    FieldType, Form, FormEntry, HandlerError, Page, PageEntry, PageRequest, PageResponse,
    TableData, TableQuery,
};
use crate::registry::{FormRegistry, RegistryError};
use crate::schema::{PresentationSchema, SchemaError, UiSchema, project};
use crate::storage::{Route, RouteKind, RouteStore, StorageError};
use crate::validation::{FieldError, validate_form};
use crate::value::ValueMap;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    NotFound(#[from] RegistryError),

    /// The form has no submit handler.
    #[error("form '{0}' does not accept submissions")]
    SubmitNotSupported(String),

    #[error("validation failed: {0}")]
    Invalid(#[from] FieldError),

    #[error("failed to build schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("form '{form}' has no field '{field}'")]
    UnknownField { form: String, field: String },

    #[error("field '{field}' of form '{form}' is not a table")]
    NotATable { form: String, field: String },

    #[error("table '{field}' of form '{form}' has no data source")]
    NoDataSource { form: String, field: String },

    /// An application handler failed.
    #[error("handler for '{name}' failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: HandlerError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Admin-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSettings {
    pub title: String,
    /// Prefix of route paths, e.g. `/admin`.
    pub base_path: String,
    pub auth_enabled: bool,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            title: "Admin Panel".to_string(),
            base_path: "/admin".to_string(),
            auth_enabled: false,
            cors_enabled: false,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl From<&ResolvedConfig> for AdminSettings {
    fn from(cfg: &ResolvedConfig) -> Self {
        Self {
            title: cfg.admin.title.clone(),
            base_path: cfg.admin.base_path.clone(),
            auth_enabled: cfg.admin.auth_enabled,
            cors_enabled: cfg.cors.enabled,
            cors_origins: cfg.cors.origins.clone(),
        }
    }
}

/// Summary of the admin for navigation UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub title: String,
    pub auth_enabled: bool,
    /// Form name to title.
    pub forms: BTreeMap<String, String>,
    /// Page name to title.
    pub pages: BTreeMap<String, String>,
}

/// Everything a renderer needs to display a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub schema: PresentationSchema,
    pub ui_schema: UiSchema,
    /// Prefill data from the form's load handler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Json>,
}

pub struct Admin {
    settings: AdminSettings,
    registry: FormRegistry,
    store: Option<Arc<dyn RouteStore>>,
}

impl Admin {
    pub fn new(settings: AdminSettings) -> Self {
        Self { settings, registry: FormRegistry::new(), store: None }
    }

    /// Attach a navigation store. Forms and pages registered afterwards get
    /// a route.
    pub fn with_store(mut self, store: Arc<dyn RouteStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the registry, e.g. with one loaded from definition files.
    /// Routes are not written; use [`Admin::sync_routes`] for that.
    pub fn with_registry(mut self, registry: FormRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &AdminSettings {
        &self.settings
    }

    pub fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Register a form and record its route.
    pub fn register_form(&mut self, entry: FormEntry) -> &mut Self {
        let mut route = self.form_route(&entry.form);
        self.registry.register_form(entry);
        self.save_best_effort(&mut route);
        self
    }

    /// Register a page and record its route.
    pub fn register_page(&mut self, entry: impl Into<PageEntry>) -> &mut Self {
        let entry = entry.into();
        let mut route = self.page_route(&entry.page);
        self.registry.register_page(entry);
        self.save_best_effort(&mut route);
        self
    }

    /// Write routes for every registered form and page, stopping at the first
    /// store error. Returns the number of routes written.
    pub fn sync_routes(&self) -> Result<usize, StorageError> {
        let store = self.store.as_ref().ok_or(StorageError::NotConfigured)?;

        let forms = self.registry.list_forms();
        let pages = self.registry.list_pages();
        let routes = forms
            .iter()
            .map(|f| self.form_route(f))
            .chain(pages.iter().map(|p| self.page_route(p)));

        let mut written = 0;
        for mut route in routes {
            store.save_route(&mut route)?;
            written += 1;
        }
        debug!(count = written, "synchronized routes");
        Ok(written)
    }

    pub fn overview(&self) -> AdminOverview {
        AdminOverview {
            title: self.settings.title.clone(),
            auth_enabled: self.settings.auth_enabled,
            forms: self
                .registry
                .list_forms()
                .iter()
                .map(|f| (f.name.clone(), f.title.clone()))
                .collect(),
            pages: self
                .registry
                .list_pages()
                .iter()
                .map(|p| (p.name.clone(), p.title.clone()))
                .collect(),
        }
    }

    /// Schemas of a form plus prefill data from its load handler.
    pub fn describe_form(&self, name: &str) -> Result<FormResponse, AdminError> {
        let entry = self.registry.form_entry(name)?;
        let projection = project(&entry.form)?;

        let data = match &entry.handlers.on_load {
            Some(handler) => Some(
                handler
                    .load()
                    .map_err(|source| AdminError::Handler { name: name.to_string(), source })?,
            ),
            None => None,
        };

        Ok(FormResponse { schema: projection.schema, ui_schema: projection.ui_schema, data })
    }

    /// Validate a submission and pass it to the form's submit handler.
    pub fn submit_form(&self, name: &str, payload: &ValueMap) -> Result<Json, AdminError> {
        let entry = self.registry.form_entry(name)?;
        let handler = entry
            .handlers
            .on_submit
            .as_ref()
            .ok_or_else(|| AdminError::SubmitNotSupported(name.to_string()))?;

        validate_form(&entry.form, payload)?;

        handler
            .submit(payload)
            .map_err(|source| AdminError::Handler { name: name.to_string(), source })
    }

    /// Fetch rows for a table field.
    ///
    /// Page 0 is read as page 1 and a zero limit as the table's page size.
    /// When the source returns no columns, the configured ones are filled in.
    pub fn table_data(
        &self,
        form: &str,
        field: &str,
        mut query: TableQuery,
    ) -> Result<TableData, AdminError> {
        let entry = self.registry.form_entry(form)?;
        let table = entry.form.field(field).ok_or_else(|| AdminError::UnknownField {
            form: form.to_string(),
            field: field.to_string(),
        })?;
        let config = match (&table.field_type, &table.table_config) {
            (FieldType::Table, Some(config)) => config,
            _ => {
                return Err(AdminError::NotATable {
                    form: form.to_string(),
                    field: field.to_string(),
                });
            }
        };
        let source = entry.handlers.table_source(field).ok_or_else(|| AdminError::NoDataSource {
            form: form.to_string(),
            field: field.to_string(),
        })?;

        query.page = query.page.max(1);
        if query.limit == 0 {
            query.limit = config.page_size;
        }

        let mut data = source.fetch(&query).map_err(|source| AdminError::Handler {
            name: format!("{form}.{field}"),
            source,
        })?;
        if data.columns.is_empty() {
            data.columns = config.columns.clone();
        }
        Ok(data)
    }

    /// Serve a page through its handler, or as a JSON document with its
    /// title and content.
    pub fn render_page(
        &self,
        name: &str,
        request: &PageRequest,
    ) -> Result<PageResponse, AdminError> {
        let entry = self.registry.page_entry(name)?;
        match &entry.handler {
            Some(handler) => handler
                .handle(request)
                .map_err(|source| AdminError::Handler { name: name.to_string(), source }),
            None => Ok(PageResponse::json(&json!({
                "title": entry.page.title,
                "content": entry.page.content,
            }))),
        }
    }

    pub fn routes(&self) -> Result<Vec<Route>, StorageError> {
        self.store()?.list_routes()
    }

    pub fn route(&self, id: &str) -> Result<Route, StorageError> {
        self.store()?.get_route(id)
    }

    pub fn delete_route(&self, id: &str) -> Result<(), StorageError> {
        self.store()?.delete_route(id)
    }

    /// Route path of a form, e.g. `/admin/forms/users`.
    pub fn form_path(&self, name: &str) -> String {
        format!("{}/forms/{}", self.base_path(), name)
    }

    /// Route path of a page, e.g. `/admin/pages/about`.
    pub fn page_path(&self, name: &str) -> String {
        format!("{}/pages/{}", self.base_path(), name)
    }

    fn base_path(&self) -> &str {
        self.settings.base_path.trim_end_matches('/')
    }

    fn form_route(&self, form: &Form) -> Route {
        let route = Route::new(RouteKind::Form, &form.name, self.form_path(&form.name), &form.title);
        match form.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => route.with_description(description),
            None => route,
        }
    }

    fn page_route(&self, page: &Page) -> Route {
        Route::new(RouteKind::Page, &page.name, self.page_path(&page.name), &page.title)
    }

    fn store(&self) -> Result<&Arc<dyn RouteStore>, StorageError> {
        self.store.as_ref().ok_or(StorageError::NotConfigured)
    }

    fn save_best_effort(&self, route: &mut Route) {
        let Some(store) = &self.store else {
            return;
        };
        match store.save_route(route) {
            Ok(()) => debug!(route = %route.name, path = %route.path, "saved route"),
            Err(e) => warn!(route = %route.name, error = %e, "failed to save route"),
        }
    }
}

impl Default for Admin {
    fn default() -> Self {
        Self::new(AdminSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Field, FormBuilder, HandlerResult, PageBuilder, ValidationRule};
    use crate::storage::MemoryRouteStore;
    use crate::value::Value;

    struct FailingStore;

    impl RouteStore for FailingStore {
        fn save_route(&self, _route: &mut Route) -> Result<(), StorageError> {
            Err(StorageError::InvalidData("disk full".into()))
        }
        fn list_routes(&self) -> Result<Vec<Route>, StorageError> {
            Ok(vec![])
        }
        fn get_route(&self, id: &str) -> Result<Route, StorageError> {
            Err(StorageError::NotFound(id.to_string()))
        }
        fn delete_route(&self, id: &str) -> Result<(), StorageError> {
            Err(StorageError::NotFound(id.to_string()))
        }
    }

    fn users_form() -> FormEntry {
        FormBuilder::new("users", "Users")
            .description("Manage users")
            .field(Field::text("name", "Name").required())
            .field(Field::number("age", "Age").rule(ValidationRule::max(120)))
            .on_submit(|payload: &ValueMap| -> HandlerResult<Json> {
                Ok(json!({ "saved": payload.len() }))
            })
            .on_load(|| -> HandlerResult<Json> { Ok(json!({ "name": "Ada" })) })
            .table("members", "Members", |t| {
                t.text_column("login", "Login");
                t.page_size(5);
                t.data_source(|q: &TableQuery| -> HandlerResult<TableData> {
                    Ok(TableData { total: 42, page: q.page, limit: q.limit, ..TableData::default() })
                });
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_saves_routes() {
        let store = Arc::new(MemoryRouteStore::new());
        let mut admin = Admin::default().with_store(store.clone());
        admin.register_form(users_form());
        admin.register_page(Page::new("about", "About"));

        let routes = store.list_routes().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/admin/pages/about");
        assert_eq!(routes[1].path, "/admin/forms/users");
        assert_eq!(routes[1].description.as_deref(), Some("Manage users"));
        assert_eq!(routes[1].kind, RouteKind::Form);
    }

    #[test]
    fn test_store_failure_does_not_block_registration() {
        let mut admin = Admin::default().with_store(Arc::new(FailingStore));
        admin.register_form(users_form());
        assert!(admin.registry().get_form("users").is_ok());
        assert!(admin.sync_routes().is_err());
    }

    #[test]
    fn test_routes_without_store() {
        let admin = Admin::default();
        assert!(matches!(admin.routes(), Err(StorageError::NotConfigured)));
        assert!(matches!(admin.delete_route("x"), Err(StorageError::NotConfigured)));
    }

    #[test]
    fn test_custom_base_path() {
        let settings = AdminSettings { base_path: "/backoffice/".into(), ..AdminSettings::default() };
        let admin = Admin::new(settings);
        assert_eq!(admin.form_path("users"), "/backoffice/forms/users");
        assert_eq!(admin.page_path("about"), "/backoffice/pages/about");
    }

    #[test]
    fn test_overview() {
        let mut admin = Admin::default();
        admin.register_form(users_form());
        admin.register_page(Page::new("about", "About"));
        let json = serde_json::to_value(admin.overview()).unwrap();
        assert_eq!(
            json,
            json!({
                "title": "Admin Panel",
                "authEnabled": false,
                "forms": { "users": "Users" },
                "pages": { "about": "About" }
            })
        );
    }

    #[test]
    fn test_describe_form_includes_load_data() {
        let mut admin = Admin::default();
        admin.register_form(users_form());
        let response = admin.describe_form("users").unwrap();
        assert_eq!(response.data, Some(json!({ "name": "Ada" })));
        assert_eq!(response.ui_schema.order, vec!["name", "age", "members"]);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("uiSchema").is_some());
    }

    #[test]
    fn test_describe_unknown_form() {
        let admin = Admin::default();
        let err = admin.describe_form("nope").unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
        assert_eq!(err.to_string(), "form not found: nope");
    }

    #[test]
    fn test_submit_validates_first() {
        let mut admin = Admin::default();
        admin.register_form(users_form());

        let invalid = ValueMap::from([("age".to_string(), Value::from("150"))]);
        let err = admin.submit_form("users", &invalid).unwrap_err();
        let AdminError::Invalid(field_error) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(field_error.field, "name");

        let valid = ValueMap::from([
            ("name".to_string(), Value::from("Ada")),
            ("age".to_string(), Value::Integer(36)),
        ]);
        assert_eq!(admin.submit_form("users", &valid).unwrap(), json!({ "saved": 2 }));
    }

    #[test]
    fn test_submit_without_handler() {
        let mut admin = Admin::default();
        admin.register_form(FormBuilder::new("readonly", "Read only").build().unwrap());
        let err = admin.submit_form("readonly", &ValueMap::new()).unwrap_err();
        assert!(matches!(err, AdminError::SubmitNotSupported(ref name) if name == "readonly"));
    }

    #[test]
    fn test_submit_handler_error_propagates() {
        let mut admin = Admin::default();
        admin.register_form(
            FormBuilder::new("broken", "Broken")
                .on_submit(|_: &ValueMap| -> HandlerResult<Json> { Err("database down".into()) })
                .build()
                .unwrap(),
        );
        let err = admin.submit_form("broken", &ValueMap::new()).unwrap_err();
        assert!(matches!(err, AdminError::Handler { .. }));
        assert_eq!(err.to_string(), "handler for 'broken' failed: database down");
    }

    #[test]
    fn test_table_data_defaults() {
        let mut admin = Admin::default();
        admin.register_form(users_form());

        let data = admin.table_data("users", "members", TableQuery::new(0, 0)).unwrap();
        assert_eq!(data.page, 1);
        assert_eq!(data.limit, 5);
        assert_eq!(data.total, 42);
        assert_eq!(data.columns.len(), 1);
        assert_eq!(data.columns[0].key, "login");
    }

    #[test]
    fn test_table_data_errors() {
        let mut admin = Admin::default();
        admin.register_form(users_form());
        admin.register_form(
            FormBuilder::new("plain", "Plain").table("rows", "Rows", |_| {}).build().unwrap(),
        );

        assert!(matches!(
            admin.table_data("users", "missing", TableQuery::default()),
            Err(AdminError::UnknownField { .. })
        ));
        assert!(matches!(
            admin.table_data("users", "name", TableQuery::default()),
            Err(AdminError::NotATable { .. })
        ));
        assert!(matches!(
            admin.table_data("plain", "rows", TableQuery::default()),
            Err(AdminError::NoDataSource { .. })
        ));
    }

    #[test]
    fn test_render_page() {
        let mut admin = Admin::default();
        admin.register_page(PageBuilder::new("about", "About").content("<p>Hi</p>").build());
        admin.register_page(
            PageBuilder::new("custom", "Custom")
                .handler(|req: &PageRequest| -> HandlerResult<PageResponse> {
                    Ok(PageResponse::html(format!("<h1>{}</h1>", req.path)))
                })
                .build(),
        );

        let plain = admin.render_page("about", &PageRequest::default()).unwrap();
        assert_eq!(plain.content_type, "application/json");
        let body: Json = serde_json::from_str(&plain.body).unwrap();
        assert_eq!(body, json!({ "title": "About", "content": "<p>Hi</p>" }));

        let request = PageRequest { path: "/admin/pages/custom".into(), ..PageRequest::default() };
        let custom = admin.render_page("custom", &request).unwrap();
        assert_eq!(custom.body, "<h1>/admin/pages/custom</h1>");
    }
}
