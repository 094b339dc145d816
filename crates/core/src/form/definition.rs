//! Form and page definitions, and the registry entries that pair them with
//! their handlers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::builder::finalize_form;
use super::errors::FormError;
use super::field::{Field, FieldGroup};
use super::handlers::{FormHandlers, PageHandler};

/// A named, ordered collection of fields.
///
/// Field order is significant: it drives property order in the presentation
/// schema and `ui:order` in the UI schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Lookup key and URL segment; unique across the registry.
    #[serde(default)]
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<FieldGroup>,
}

impl Form {
    /// Create an empty form.
    pub fn empty(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of required fields, in field order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str()).collect()
    }

    /// Fields that are part of the presented shape (everything but hidden).
    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_hidden())
    }
}

/// A custom page: opaque content, optionally served by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

impl Page {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self { name: name.into(), title: title.into(), content: String::new() }
    }
}

/// A form together with its application handlers, as held by the registry.
#[derive(Debug, Clone)]
pub struct FormEntry {
    pub form: Arc<Form>,
    pub handlers: FormHandlers,
}

impl FormEntry {
    /// Pair an already finalized form with its handlers.
    pub(crate) fn new(form: Form, handlers: FormHandlers) -> Self {
        Self { form: Arc::new(form), handlers }
    }

    pub fn name(&self) -> &str {
        &self.form.name
    }
}

/// A plain form goes through the same checks as [`FormBuilder::build`].
///
/// [`FormBuilder::build`]: super::builder::FormBuilder::build
impl TryFrom<Form> for FormEntry {
    type Error = FormError;

    fn try_from(form: Form) -> Result<Self, Self::Error> {
        Ok(Self::new(finalize_form(form)?, FormHandlers::default()))
    }
}

/// A page together with its optional request handler.
#[derive(Clone)]
pub struct PageEntry {
    pub page: Arc<Page>,
    pub handler: Option<Arc<dyn PageHandler>>,
}

impl PageEntry {
    pub fn new(page: Page, handler: Option<Arc<dyn PageHandler>>) -> Self {
        Self { page: Arc::new(page), handler }
    }

    pub fn name(&self) -> &str {
        &self.page.name
    }
}

impl From<Page> for PageEntry {
    fn from(page: Page) -> Self {
        Self::new(page, None)
    }
}

impl fmt::Debug for PageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageEntry")
            .field("page", &self.page)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldType, RuleKind};

    fn sample_form() -> Form {
        let mut form = Form::empty("users", "Users");
        form.fields.push(Field::text("name", "Name").required());
        form.fields.push(Field::hidden("token", "abc").required());
        form.fields.push(Field::number("age", "Age"));
        form
    }

    #[test]
    fn test_empty_form() {
        let form = Form::empty("users", "Users");
        assert_eq!(form.name, "users");
        assert!(form.fields.is_empty());
        assert!(form.groups.is_empty());
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(sample_form().required_fields(), vec!["name", "token"]);
    }

    #[test]
    fn test_visible_fields_skip_hidden() {
        let form = sample_form();
        let names: Vec<&str> = form.visible_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_field_lookup() {
        let form = sample_form();
        assert!(form.has_field("age"));
        assert!(form.field("missing").is_none());
    }

    #[test]
    fn test_entry_from_form_has_no_handlers() {
        let entry = FormEntry::try_from(sample_form()).unwrap();
        assert_eq!(entry.name(), "users");
        assert!(entry.handlers.is_empty());
    }

    #[test]
    fn test_entry_from_form_is_finalized() {
        let mut form = Form::empty("contact", "Contact");
        form.fields.push(Field::new("mail", FieldType::Email, "Mail"));
        let entry = FormEntry::try_from(form).unwrap();
        assert!(entry.form.fields[0].has_rule(RuleKind::Email));
    }

    #[test]
    fn test_entry_from_inconsistent_form_is_rejected() {
        let mut form = Form::empty("contact", "Contact");
        form.fields.push(Field::new("mail", FieldType::Email, "Mail"));
        form.fields.push(Field::text("mail", "Mail again"));
        let err = FormEntry::try_from(form).unwrap_err();
        assert!(err.to_string().contains("duplicate field 'mail'"));

        let mut form = Form::empty("contact", "Contact");
        let mut rows = Field::new("rows", FieldType::Table, "Rows");
        rows.table_config = None;
        form.fields.push(rows);
        let err = FormEntry::try_from(form).unwrap_err();
        assert!(err.to_string().contains("is missing a table config"));
    }
}
