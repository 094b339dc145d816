//! Fluent builders for forms, table fields and pages.

use std::collections::HashSet;
use std::sync::Arc;

use super::definition::{Form, FormEntry, Page, PageEntry};
use super::errors::FormError;
use super::field::{Field, FieldGroup, FieldType, SelectOption, TableColumn, TableConfig};
use super::handlers::{FormHandlers, LoadHandler, PageHandler, SubmitHandler, TableDataSource};
use crate::value::Value;

/// Prefix of UI schema keywords, which share a document with per-field hints.
const RESERVED_PREFIX: &str = "ui:";

/// Accumulates fields and groups in call order and finalizes into a
/// [`FormEntry`].
pub struct FormBuilder {
    form: Form,
    handlers: FormHandlers,
    misuse: Vec<String>,
}

impl FormBuilder {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self { form: Form::empty(name, title), handlers: FormHandlers::default(), misuse: Vec::new() }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.form.description = Some(description.into());
        self
    }

    /// Append a field. Rules implied by the field type are added after the
    /// field's own rules unless a rule of the same kind is already present.
    pub fn field(mut self, field: Field) -> Self {
        self.form.fields.push(field.with_type_defaults());
        self
    }

    pub fn text(self, name: &str, label: &str) -> Self {
        self.field(Field::text(name, label))
    }

    pub fn email(self, name: &str, label: &str) -> Self {
        self.field(Field::email(name, label))
    }

    pub fn password(self, name: &str, label: &str) -> Self {
        self.field(Field::password(name, label))
    }

    pub fn number(self, name: &str, label: &str) -> Self {
        self.field(Field::number(name, label))
    }

    pub fn select(self, name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        self.field(Field::select(name, label, options))
    }

    pub fn multi_select(self, name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        self.field(Field::multi_select(name, label, options))
    }

    pub fn radio(self, name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        self.field(Field::radio(name, label, options))
    }

    pub fn checkbox(self, name: &str, label: &str) -> Self {
        self.field(Field::checkbox(name, label))
    }

    pub fn textarea(self, name: &str, label: &str) -> Self {
        self.field(Field::textarea(name, label))
    }

    pub fn date(self, name: &str, label: &str) -> Self {
        self.field(Field::date(name, label))
    }

    pub fn time(self, name: &str, label: &str) -> Self {
        self.field(Field::time(name, label))
    }

    pub fn file(self, name: &str, label: &str) -> Self {
        self.field(Field::file(name, label))
    }

    pub fn hidden(self, name: &str, value: impl Into<Value>) -> Self {
        self.field(Field::hidden(name, value))
    }

    /// Append a table field configured by `configure`.
    ///
    /// The table builder only exists inside the closure and is merged into
    /// this form when the closure returns, so a table can never be left
    /// unattached.
    pub fn table<F>(mut self, name: &str, label: &str, configure: F) -> Self
    where
        F: FnOnce(&mut TableBuilder),
    {
        let mut table = TableBuilder::new();
        configure(&mut table);

        let TableBuilder { config, source, misuse } = table;
        self.misuse.extend(misuse.into_iter().map(|m| format!("table '{name}': {m}")));
        if let Some(source) = source {
            self.handlers.table_sources.insert(name.to_string(), source);
        }

        let mut field = Field::new(name, FieldType::Table, label);
        field.table_config = Some(config);
        self.form.fields.push(field);
        self
    }

    pub fn group(mut self, group: FieldGroup) -> Self {
        self.form.groups.push(group);
        self
    }

    pub fn on_submit(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.handlers.on_submit = Some(Arc::new(handler));
        self
    }

    pub fn on_load(mut self, handler: impl LoadHandler + 'static) -> Self {
        self.handlers.on_load = Some(Arc::new(handler));
        self
    }

    /// Finalize into an immutable registry entry.
    pub fn build(self) -> Result<FormEntry, FormError> {
        if let Some(message) = self.misuse.into_iter().next() {
            return Err(FormError::misuse(&self.form.name, message));
        }
        let form = finalize_form(self.form)?;
        Ok(FormEntry::new(form, self.handlers))
    }
}

/// Normalize a form that did not necessarily come through [`FormBuilder`]
/// (e.g. a definition file) and check its structural invariants.
pub fn finalize_form(mut form: Form) -> Result<Form, FormError> {
    if form.name.trim().is_empty() {
        return Err(FormError::misuse(&form.name, "form name is empty"));
    }

    let mut seen = HashSet::new();
    for field in &form.fields {
        if field.name.is_empty() {
            return Err(FormError::misuse(&form.name, "field with empty name"));
        }
        if field.name.starts_with(RESERVED_PREFIX) {
            return Err(FormError::misuse(
                &form.name,
                format!("field name '{}' uses the reserved '{RESERVED_PREFIX}' prefix", field.name),
            ));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(FormError::misuse(
                &form.name,
                format!("duplicate field '{}'", field.name),
            ));
        }
        let is_table = field.field_type == FieldType::Table;
        if is_table != field.table_config.is_some() {
            return Err(FormError::misuse(
                &form.name,
                format!(
                    "field '{}' of type {} {} a table config",
                    field.name,
                    field.field_type,
                    if is_table { "is missing" } else { "must not carry" }
                ),
            ));
        }
    }

    for group in &form.groups {
        if let Some(unknown) = group.fields.iter().find(|f| !seen.contains(f.as_str())) {
            return Err(FormError::misuse(
                &form.name,
                format!("group '{}' names unknown field '{}'", group.name, unknown),
            ));
        }
    }

    form.fields = form.fields.into_iter().map(Field::with_type_defaults).collect();
    Ok(form)
}

/// Accumulates columns and options of a table field.
///
/// Column modifiers (`sortable`, `filterable`, `width`, `align`) apply to the
/// most recently added column.
pub struct TableBuilder {
    config: TableConfig,
    source: Option<Arc<dyn TableDataSource>>,
    misuse: Vec<String>,
}

impl TableBuilder {
    fn new() -> Self {
        Self { config: TableConfig::default(), source: None, misuse: Vec::new() }
    }

    pub fn column(&mut self, column: TableColumn) -> &mut Self {
        self.config.columns.push(column);
        self
    }

    pub fn text_column(&mut self, key: &str, title: &str) -> &mut Self {
        self.column(TableColumn::new(key, title, FieldType::Text))
    }

    pub fn email_column(&mut self, key: &str, title: &str) -> &mut Self {
        self.column(TableColumn::new(key, title, FieldType::Email))
    }

    pub fn number_column(&mut self, key: &str, title: &str) -> &mut Self {
        self.column(TableColumn::new(key, title, FieldType::Number))
    }

    pub fn select_column(&mut self, key: &str, title: &str, options: Vec<SelectOption>) -> &mut Self {
        let mut column = TableColumn::new(key, title, FieldType::Select);
        column.options = options;
        self.column(column)
    }

    pub fn multi_select_column(
        &mut self,
        key: &str,
        title: &str,
        options: Vec<SelectOption>,
    ) -> &mut Self {
        let mut column = TableColumn::new(key, title, FieldType::Select);
        column.options = options;
        column.multiple = true;
        self.column(column)
    }

    pub fn checkbox_column(&mut self, key: &str, title: &str) -> &mut Self {
        self.column(TableColumn::new(key, title, FieldType::Checkbox))
    }

    pub fn date_column(&mut self, key: &str, title: &str) -> &mut Self {
        self.column(TableColumn::new(key, title, FieldType::Date))
    }

    pub fn sortable(&mut self) -> &mut Self {
        self.modify_last("sortable", |c| c.sortable = true)
    }

    pub fn filterable(&mut self) -> &mut Self {
        self.modify_last("filterable", |c| c.filterable = true)
    }

    pub fn width(&mut self, width: &str) -> &mut Self {
        self.modify_last("width", |c| c.width = Some(width.to_string()))
    }

    pub fn align(&mut self, align: &str) -> &mut Self {
        self.modify_last("align", |c| c.align = Some(align.to_string()))
    }

    pub fn pagination(&mut self, enabled: bool) -> &mut Self {
        self.config.pagination = enabled;
        self
    }

    pub fn page_size(&mut self, size: u32) -> &mut Self {
        self.config.page_size = size;
        self
    }

    pub fn sortable_table(&mut self, enabled: bool) -> &mut Self {
        self.config.sortable = enabled;
        self
    }

    pub fn filterable_table(&mut self, enabled: bool) -> &mut Self {
        self.config.filterable = enabled;
        self
    }

    pub fn selectable(&mut self, enabled: bool) -> &mut Self {
        self.config.selectable = enabled;
        self
    }

    pub fn editable(&mut self, enabled: bool) -> &mut Self {
        self.config.editable = enabled;
        self
    }

    pub fn data_source(&mut self, source: impl TableDataSource + 'static) -> &mut Self {
        self.source = Some(Arc::new(source));
        self
    }

    fn modify_last(&mut self, modifier: &str, apply: impl FnOnce(&mut TableColumn)) -> &mut Self {
        match self.config.columns.last_mut() {
            Some(column) => apply(column),
            None => self.misuse.push(format!("`{modifier}` called before any column was added")),
        }
        self
    }
}

/// Builds a [`PageEntry`].
pub struct PageBuilder {
    page: Page,
    handler: Option<Arc<dyn PageHandler>>,
}

impl PageBuilder {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self { page: Page::new(name, title), handler: None }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.page.content = content.into();
        self
    }

    /// Take over request handling for this page entirely.
    pub fn handler(mut self, handler: impl PageHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> PageEntry {
        PageEntry::new(self.page, self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::field::{RuleKind, ValidationRule};
    use crate::form::handlers::{HandlerResult, TableData, TableQuery};
    use crate::value::ValueMap;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_fields_keep_call_order() {
        let entry = FormBuilder::new("signup", "Sign up")
            .text("name", "Name")
            .email("email", "Email")
            .password("password", "Password")
            .checkbox("terms", "Terms")
            .build()
            .unwrap();

        let names: Vec<&str> = entry.form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email", "password", "terms"]);
    }

    #[test]
    fn test_email_rule_appended_once() {
        let entry = FormBuilder::new("f", "F")
            .field(
                Field::new("email", FieldType::Email, "Email")
                    .rule(ValidationRule::email().with_message("custom")),
            )
            .build()
            .unwrap();

        let rules = &entry.form.fields[0].validation;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].custom_message(), Some("custom"));
    }

    #[test]
    fn test_table_builder_merges_into_form() {
        let entry = FormBuilder::new("users", "Users")
            .table("list", "User list", |t| {
                t.text_column("name", "Name")
                    .sortable()
                    .width("200px")
                    .email_column("email", "Email")
                    .filterable()
                    .align("right")
                    .page_size(25)
                    .selectable(true)
                    .data_source(|q: &TableQuery| -> HandlerResult<TableData> {
                        Ok(TableData { page: q.page, limit: q.limit, ..Default::default() })
                    });
            })
            .build()
            .unwrap();

        let field = entry.form.field("list").unwrap();
        assert_eq!(field.field_type, FieldType::Table);
        let config = field.table_config.as_ref().unwrap();
        assert_eq!(config.columns.len(), 2);
        assert!(config.columns[0].sortable);
        assert_eq!(config.columns[0].width.as_deref(), Some("200px"));
        assert!(config.columns[1].filterable);
        assert_eq!(config.columns[1].align.as_deref(), Some("right"));
        assert_eq!(config.page_size, 25);
        assert!(config.pagination);
        assert!(config.selectable);
        assert!(!config.editable);
        assert!(entry.handlers.table_source("list").is_some());
    }

    #[test]
    fn test_modifier_without_column_is_misuse() {
        let err = FormBuilder::new("users", "Users")
            .table("list", "List", |t| {
                t.sortable();
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, FormError::BuilderMisuse { ref form, .. } if form == "users"));
        assert!(err.to_string().contains("sortable"));
    }

    #[test]
    fn test_duplicate_field_is_misuse() {
        let err = FormBuilder::new("f", "F").text("a", "A").number("a", "A").build().unwrap_err();
        assert!(err.to_string().contains("duplicate field 'a'"));
    }

    #[rstest]
    #[case("ui:order")]
    #[case("ui:groups")]
    fn test_reserved_field_name_is_misuse(#[case] name: &str) {
        let err = FormBuilder::new("f", "F").text(name, "Sneaky").build().unwrap_err();
        assert!(err.to_string().contains("reserved 'ui:' prefix"));
    }

    #[test]
    fn test_group_with_unknown_field_is_misuse() {
        let err = FormBuilder::new("f", "F")
            .text("a", "A")
            .group(FieldGroup::new("main", "Main", vec!["a".into(), "b".into()]))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unknown field 'b'"));
    }

    #[test]
    fn test_table_config_on_non_table_is_misuse() {
        let mut field = Field::text("a", "A");
        field.table_config = Some(TableConfig::default());
        let err = FormBuilder::new("f", "F").field(field).build().unwrap_err();
        assert!(err.to_string().contains("must not carry"));
    }

    #[test]
    fn test_finalize_adds_email_rule() {
        let mut form = Form::empty("f", "F");
        form.fields.push(Field::new("mail", FieldType::Email, "Mail"));
        let form = finalize_form(form).unwrap();
        assert!(form.fields[0].has_rule(RuleKind::Email));
    }

    #[test]
    fn test_handlers_attached() {
        let entry = FormBuilder::new("f", "F")
            .text("a", "A")
            .on_submit(|p: &ValueMap| -> HandlerResult<serde_json::Value> {
                Ok(json!(p.len()))
            })
            .on_load(|| -> HandlerResult<serde_json::Value> { Ok(json!({})) })
            .build()
            .unwrap();
        assert!(entry.handlers.on_submit.is_some());
        assert!(entry.handlers.on_load.is_some());
    }

    #[test]
    fn test_page_builder() {
        let entry = PageBuilder::new("about", "About").content("<p>hi</p>").build();
        assert_eq!(entry.page.content, "<p>hi</p>");
        assert!(entry.handler.is_none());
    }
}
