//! UI schema: rendering hints kept apart from the data shape.

use serde::Serialize;
use serde_json::{Map, Value as Json, json};

use crate::form::{Field, FieldGroup, FieldType, Form, SelectOption, TableConfig};

/// Rows shown by default for textarea widgets.
const TEXTAREA_ROWS: u32 = 4;

/// Rendering hints for a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSchema {
    /// Visible field names, in field order.
    #[serde(rename = "ui:order")]
    pub order: Vec<String>,
    /// Per-field hint objects keyed by field name. Fields without any hint
    /// have no entry.
    #[serde(flatten)]
    pub fields: Map<String, Json>,
    #[serde(rename = "ui:groups", skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<UiGroup>,
}

impl UiSchema {
    pub fn to_json(&self) -> Json {
        serde_json::to_value(self).unwrap_or(Json::Null)
    }

    /// Hints for one field.
    pub fn field(&self, name: &str) -> Option<&Json> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiGroup {
    #[serde(rename = "ui:title")]
    pub title: String,
    #[serde(rename = "ui:description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ui:fields")]
    pub fields: Vec<String>,
}

impl From<&FieldGroup> for UiGroup {
    fn from(group: &FieldGroup) -> Self {
        Self {
            title: group.title.clone(),
            description: group.description.clone().filter(|d| !d.is_empty()),
            fields: group.fields.clone(),
        }
    }
}

/// Project a form into its UI schema.
pub fn ui_schema(form: &Form) -> UiSchema {
    let order = form.visible_fields().map(|f| f.name.clone()).collect();

    let mut fields = Map::new();
    for field in &form.fields {
        let hints = field_hints(field);
        if !hints.is_empty() {
            fields.insert(field.name.clone(), Json::Object(hints));
        }
    }

    UiSchema { order, fields, groups: form.groups.iter().map(UiGroup::from).collect() }
}

fn field_hints(field: &Field) -> Map<String, Json> {
    let mut hints = Map::new();
    let mut options = Map::new();

    if let Some(widget) = widget(field) {
        hints.insert("ui:widget".into(), json!(widget));
    }

    match field.field_type {
        FieldType::Textarea => {
            options.insert("rows".into(), json!(TEXTAREA_ROWS));
        }
        FieldType::Select | FieldType::Radio if !field.options.is_empty() => {
            options.insert("enumOptions".into(), enum_options(&field.options));
        }
        FieldType::Table => {
            if let Some(config) = &field.table_config {
                options.extend(table_options(config));
            }
        }
        _ => {}
    }

    if let Some(placeholder) = field.placeholder.as_deref().filter(|p| !p.is_empty()) {
        hints.insert("ui:placeholder".into(), json!(placeholder));
    }
    if field.disabled {
        hints.insert("ui:disabled".into(), json!(true));
    }
    if let Some(group) = field.group.as_deref().filter(|g| !g.is_empty()) {
        hints.insert("ui:group".into(), json!(group));
    }

    // Extra config is added next to the derived options without replacing them.
    for (key, value) in &field.config {
        options.entry(key.clone()).or_insert_with(|| value.to_json());
    }
    if !options.is_empty() {
        hints.insert("ui:options".into(), Json::Object(options));
    }

    hints
}

fn widget(field: &Field) -> Option<&'static str> {
    match field.field_type {
        FieldType::Password => Some("password"),
        FieldType::Textarea => Some("textarea"),
        FieldType::File => Some("file"),
        FieldType::Checkbox => Some("checkbox"),
        FieldType::Radio => Some("radio"),
        FieldType::Select if field.multiple => Some("checkboxes"),
        FieldType::Select => Some("select"),
        FieldType::Table => Some("table"),
        FieldType::Hidden => Some("hidden"),
        _ => None,
    }
}

fn enum_options(options: &[SelectOption]) -> Json {
    Json::Array(
        options
            .iter()
            .map(|o| json!({ "value": o.value, "label": o.label }))
            .collect(),
    )
}

fn table_options(config: &TableConfig) -> Map<String, Json> {
    let mut options = Map::new();
    options.insert("pagination".into(), json!(config.pagination));
    options.insert("pageSize".into(), json!(config.page_size));
    options.insert("sortable".into(), json!(config.sortable));
    options.insert("filterable".into(), json!(config.filterable));
    options.insert("selectable".into(), json!(config.selectable));
    options.insert("editable".into(), json!(config.editable));
    options.insert(
        "columns".into(),
        serde_json::to_value(&config.columns).unwrap_or_else(|_| json!([])),
    );
    options
}
