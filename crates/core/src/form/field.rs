//! Field types, rules and the field definition itself.

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueMap};

/// Type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Time,
    File,
    Hidden,
    Table,
}

impl FieldType {
    pub const ALL: [FieldType; 13] = [
        Self::Text,
        Self::Email,
        Self::Password,
        Self::Number,
        Self::Textarea,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
        Self::Date,
        Self::Time,
        Self::File,
        Self::Hidden,
        Self::Table,
    ];

    /// Get the wire name for this field type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Time => "time",
            Self::File => "file",
            Self::Hidden => "hidden",
            Self::Table => "table",
        }
    }

    /// Whether `options` carries meaning for this type.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("unknown field type: {s}"))
    }
}

/// One choice of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into(), disabled: false }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Kind of a declarative validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Email,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Pattern => "pattern",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single declarative constraint attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Value>,
    /// Overrides the kind-specific default message. An empty message counts
    /// as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, parameter: Option<Value>) -> Self {
        Self { kind, parameter, message: None }
    }

    pub fn email() -> Self {
        Self::new(RuleKind::Email, None)
    }

    pub fn min(bound: impl Into<Value>) -> Self {
        Self::new(RuleKind::Min, Some(bound.into()))
    }

    pub fn max(bound: impl Into<Value>) -> Self {
        Self::new(RuleKind::Max, Some(bound.into()))
    }

    pub fn min_length(bound: impl Into<Value>) -> Self {
        Self::new(RuleKind::MinLength, Some(bound.into()))
    }

    pub fn max_length(bound: impl Into<Value>) -> Self {
        Self::new(RuleKind::MaxLength, Some(bound.into()))
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::Pattern, Some(Value::String(pattern.into())))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The caller-supplied message, if it is set and non-empty.
    pub fn custom_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// A column of a table field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub key: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub column_type: FieldType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sortable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub filterable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
}

impl TableColumn {
    pub fn new(key: impl Into<String>, title: impl Into<String>, column_type: FieldType) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            column_type,
            sortable: false,
            filterable: false,
            width: None,
            align: None,
            options: Vec::new(),
            multiple: false,
        }
    }
}

/// Table-level options of a table field.
///
/// The row source is not part of this value; it lives in
/// [`FormHandlers`](super::handlers::FormHandlers) keyed by field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default = "default_true")]
    pub pagination: bool,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default)]
    pub selectable: bool,
    #[serde(default)]
    pub editable: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            pagination: default_true(),
            page_size: default_page_size(),
            sortable: default_true(),
            filterable: default_true(),
            selectable: false,
            editable: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> u32 {
    10
}

/// One input definition within a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
    /// Rules are applied in this order; the first failure is reported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Open renderer options, merged into the field's UI hints.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub config: ValueMap,
    /// Present iff `field_type` is [`FieldType::Table`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_config: Option<TableConfig>,
}

impl Field {
    /// Create a field with no constraints. Table fields get a default
    /// [`TableConfig`].
    pub fn new(name: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: label.into(),
            required: false,
            placeholder: None,
            default_value: None,
            options: Vec::new(),
            multiple: false,
            validation: Vec::new(),
            group: None,
            description: None,
            disabled: false,
            config: ValueMap::new(),
            table_config: (field_type == FieldType::Table).then(TableConfig::default),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text, label)
    }

    /// Email field with a default `email` rule.
    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Email, label).with_type_defaults()
    }

    pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Password, label)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number, label)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Textarea, label)
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, FieldType::Select, label).options(options)
    }

    pub fn multi_select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::select(name, label, options).multiple()
    }

    pub fn radio(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, FieldType::Radio, label).options(options)
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Checkbox, label)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date, label)
    }

    pub fn time(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::Time, label)
    }

    pub fn file(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldType::File, label)
    }

    /// Hidden field carrying a fixed value. Hidden fields have no label.
    pub fn hidden(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, FieldType::Hidden, "").default_value(value)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Append the rules implied by the field type, skipping any kind the
    /// field already carries. Explicit rules keep their position ahead of
    /// the implied ones.
    pub fn with_type_defaults(mut self) -> Self {
        if self.field_type == FieldType::Email && !self.has_rule(RuleKind::Email) {
            self.validation
                .push(ValidationRule::email().with_message(DEFAULT_EMAIL_MESSAGE));
        }
        self
    }

    pub fn has_rule(&self, kind: RuleKind) -> bool {
        self.validation.iter().any(|r| r.kind == kind)
    }

    pub fn is_hidden(&self) -> bool {
        self.field_type == FieldType::Hidden
    }

    /// Look up an option by value; the first match wins.
    pub fn option(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// Message attached to implied `email` rules.
pub const DEFAULT_EMAIL_MESSAGE: &str = "Enter a valid email";

/// Presentation-only grouping of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl FieldGroup {
    pub fn new(name: impl Into<String>, title: impl Into<String>, fields: Vec<String>) -> Self {
        Self { name: name.into(), title: title.into(), description: None, fields }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
