//! Presentation schema: the data shape of a form as a JSON Schema document.

use serde::Serialize;
use serde_json::{Map, Value as Json, json};

use super::errors::SchemaError;
use crate::form::{Field, FieldType, Form, RuleKind, SelectOption, ValidationRule};
use crate::validation::{ValidationError, engine::compile_pattern, to_f64, to_usize};

/// Dialect advertised in `$schema`.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Name of the shared table column definition under `definitions`.
pub const TABLE_COLUMN_DEFINITION: &str = "tableColumn";

/// JSON Schema document describing the fields of a form.
///
/// Hidden fields are not part of the presented shape: they appear neither in
/// `properties` nor in `required`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationSchema {
    #[serde(rename = "$schema")]
    pub dialect: String,
    #[serde(rename = "type")]
    pub schema_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One entry per visible field, in field order.
    pub properties: Map<String, Json>,
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub definitions: Map<String, Json>,
}

impl PresentationSchema {
    pub fn to_json(&self) -> Json {
        // A struct of strings and JSON maps always serializes.
        serde_json::to_value(self).unwrap_or(Json::Null)
    }
}

/// Project a form into its presentation schema.
pub fn presentation_schema(form: &Form) -> Result<PresentationSchema, SchemaError> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut has_table = false;

    for field in form.visible_fields() {
        properties.insert(field.name.clone(), field_schema(field)?);
        if field.required {
            required.push(field.name.clone());
        }
        has_table |= field.field_type == FieldType::Table;
    }

    let mut definitions = Map::new();
    if has_table {
        definitions.insert(TABLE_COLUMN_DEFINITION.to_string(), table_column_schema());
    }

    Ok(PresentationSchema {
        dialect: SCHEMA_DIALECT.to_string(),
        schema_type: "object".to_string(),
        title: form.title.clone(),
        description: form.description.clone().filter(|d| !d.is_empty()),
        properties,
        required,
        definitions,
    })
}

fn field_schema(field: &Field) -> Result<Json, SchemaError> {
    let mut schema = Map::new();

    match field.field_type {
        FieldType::Table => {
            // The data shape of a table, independent of its columns.
            schema.extend(table_schema());
        }
        FieldType::Select | FieldType::Radio if field.multiple => {
            let mut items = Map::new();
            items.insert("type".into(), json!("string"));
            if !field.options.is_empty() {
                items.insert("enum".into(), option_values(&field.options));
            }
            schema.insert("type".into(), json!("array"));
            schema.insert("items".into(), Json::Object(items));
            schema.insert("uniqueItems".into(), json!(true));
        }
        FieldType::Select | FieldType::Radio => {
            schema.insert("type".into(), json!("string"));
            if !field.options.is_empty() {
                schema.insert("enum".into(), option_values(&field.options));
            }
        }
        other => {
            let (primitive, format) = primitive_shape(other);
            schema.insert("type".into(), json!(primitive));
            if let Some(format) = format {
                schema.insert("format".into(), json!(format));
            }
        }
    }

    schema.insert("title".into(), json!(field.label));
    if let Some(description) = field.description.as_deref().filter(|d| !d.is_empty()) {
        schema.insert("description".into(), json!(description));
    }
    if field.field_type == FieldType::Text
        && let Some(placeholder) = field.placeholder.as_deref().filter(|p| !p.is_empty())
    {
        schema.insert("examples".into(), json!([placeholder]));
    }
    if let Some(default) = &field.default_value {
        schema.insert("default".into(), default.to_json());
    }

    for rule in &field.validation {
        if let Some((keyword, value)) = rule_constraint(&field.name, rule)? {
            schema.insert(keyword.into(), value);
        }
    }

    Ok(Json::Object(schema))
}

/// JSON type and optional format of the scalar field types.
fn primitive_shape(field_type: FieldType) -> (&'static str, Option<&'static str>) {
    match field_type {
        FieldType::Email => ("string", Some("email")),
        FieldType::Password => ("string", Some("password")),
        FieldType::Number => ("number", None),
        FieldType::Date => ("string", Some("date")),
        FieldType::Time => ("string", Some("time")),
        FieldType::File => ("string", Some("data-url")),
        FieldType::Checkbox => ("boolean", None),
        _ => ("string", None),
    }
}

/// Map a rule onto its schema keyword. Rules without a schema equivalent
/// (`email`) only apply at validation time.
fn rule_constraint(
    field: &str,
    rule: &ValidationRule,
) -> Result<Option<(&'static str, Json)>, SchemaError> {
    let parameter = rule.parameter.as_ref().unwrap_or(&crate::value::Value::Null);
    let invalid = |source: ValidationError| SchemaError::InvalidRule {
        field: field.to_string(),
        rule: rule.kind,
        source,
    };

    let constraint = match rule.kind {
        RuleKind::Email => None,
        RuleKind::Min => Some(("minimum", number(to_f64(field, parameter).map_err(invalid)?))),
        RuleKind::Max => Some(("maximum", number(to_f64(field, parameter).map_err(invalid)?))),
        RuleKind::MinLength => {
            Some(("minLength", json!(to_usize(field, parameter).map_err(invalid)?)))
        }
        RuleKind::MaxLength => {
            Some(("maxLength", json!(to_usize(field, parameter).map_err(invalid)?)))
        }
        RuleKind::Pattern => {
            let re = compile_pattern(field, parameter).map_err(invalid)?;
            Some(("pattern", json!(re.as_str())))
        }
    };
    Ok(constraint)
}

/// Integral bounds are written as integers so `max(120)` reads `120`.
fn number(value: f64) -> Json {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        serde_json::Number::from_f64(value).map_or(Json::Null, Json::Number)
    }
}

fn option_values(options: &[SelectOption]) -> Json {
    Json::Array(options.iter().map(|o| json!(o.value)).collect())
}

fn table_schema() -> Map<String, Json> {
    let schema = json!({
        "type": "object",
        "properties": {
            "columns": {
                "type": "array",
                "items": { "$ref": format!("#/definitions/{TABLE_COLUMN_DEFINITION}") }
            },
            "rows": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true }
            },
            "total": { "type": "integer" },
            "page": { "type": "integer" },
            "limit": { "type": "integer" }
        }
    });
    match schema {
        Json::Object(map) => map,
        _ => Map::new(),
    }
}

fn table_column_schema() -> Json {
    json!({
        "type": "object",
        "properties": {
            "key": { "type": "string" },
            "title": { "type": "string" },
            "type": { "type": "string" },
            "sortable": { "type": "boolean" },
            "filterable": { "type": "boolean" },
            "width": { "type": "string" },
            "align": { "type": "string" }
        },
        "required": ["key", "title"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormBuilder, SelectOption, ValidationRule};
    use std::collections::HashSet;

    fn build(builder: FormBuilder) -> Form {
        Form::clone(&builder.build().unwrap().form)
    }

    #[test]
    fn test_document_header() {
        let form = build(FormBuilder::new("users", "Users").description("Manage users"));
        let schema = presentation_schema(&form).unwrap().to_json();
        assert_eq!(schema["$schema"], SCHEMA_DIALECT);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["title"], "Users");
        assert_eq!(schema["description"], "Manage users");
        assert!(schema.get("definitions").is_none());
    }

    #[test]
    fn test_primitive_mappings() {
        let form = build(
            FormBuilder::new("f", "F")
                .text("name", "Name")
                .email("email", "Email")
                .password("secret", "Secret")
                .number("age", "Age")
                .textarea("bio", "Bio")
                .date("born", "Born")
                .time("at", "At")
                .file("avatar", "Avatar")
                .checkbox("active", "Active"),
        );
        let schema = presentation_schema(&form).unwrap();
        let p = &schema.properties;
        assert_eq!(p["name"], json!({"type": "string", "title": "Name"}));
        assert_eq!(p["email"]["format"], "email");
        assert_eq!(p["secret"]["format"], "password");
        assert_eq!(p["age"]["type"], "number");
        assert_eq!(p["bio"]["type"], "string");
        assert!(p["bio"].get("format").is_none());
        assert_eq!(p["born"]["format"], "date");
        assert_eq!(p["at"]["format"], "time");
        assert_eq!(p["avatar"]["format"], "data-url");
        assert_eq!(p["active"]["type"], "boolean");
    }

    #[test]
    fn test_property_order_follows_fields() {
        let form = build(
            FormBuilder::new("f", "F")
                .text("zeta", "Z")
                .text("alpha", "A")
                .number("mid", "M"),
        );
        let schema = presentation_schema(&form).unwrap();
        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_select_single_and_multiple() {
        let options = vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")];
        let form = build(
            FormBuilder::new("f", "F")
                .select("one", "One", options.clone())
                .multi_select("many", "Many", options)
                .radio("none", "None", vec![]),
        );
        let schema = presentation_schema(&form).unwrap();
        assert_eq!(schema.properties["one"]["enum"], json!(["a", "b"]));
        assert_eq!(schema.properties["many"]["type"], "array");
        assert_eq!(schema.properties["many"]["uniqueItems"], true);
        assert_eq!(schema.properties["many"]["items"]["enum"], json!(["a", "b"]));
        assert!(schema.properties["none"].get("enum").is_none());
    }

    #[test]
    fn test_hidden_fields_excluded() {
        let form = build(
            FormBuilder::new("f", "F")
                .text("name", "Name")
                .field(crate::form::Field::hidden("token", "abc").required()),
        );
        let schema = presentation_schema(&form).unwrap();
        assert!(!schema.properties.contains_key("token"));
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_required_matches_visible_required_fields() {
        let form = build(
            FormBuilder::new("f", "F")
                .field(crate::form::Field::text("a", "A").required())
                .text("b", "B")
                .field(crate::form::Field::email("c", "C").required())
                .field(crate::form::Field::hidden("d", 1).required()),
        );
        let schema = presentation_schema(&form).unwrap();
        let required: HashSet<&str> = schema.required.iter().map(String::as_str).collect();
        assert_eq!(required, HashSet::from(["a", "c"]));
    }

    #[test]
    fn test_rules_projected() {
        let form = build(
            FormBuilder::new("f", "F")
                .field(
                    crate::form::Field::number("age", "Age")
                        .rule(ValidationRule::min(0))
                        .rule(ValidationRule::max(120.5)),
                )
                .field(
                    crate::form::Field::text("code", "Code")
                        .rule(ValidationRule::min_length("3"))
                        .rule(ValidationRule::max_length(8))
                        .rule(ValidationRule::pattern(r"^\d+$")),
                ),
        );
        let schema = presentation_schema(&form).unwrap();
        assert_eq!(schema.properties["age"]["minimum"], json!(0));
        assert_eq!(schema.properties["age"]["maximum"], json!(120.5));
        assert_eq!(schema.properties["code"]["minLength"], json!(3));
        assert_eq!(schema.properties["code"]["maxLength"], json!(8));
        assert_eq!(schema.properties["code"]["pattern"], r"^\d+$");
    }

    #[test]
    fn test_email_rule_not_projected() {
        let form = build(FormBuilder::new("f", "F").email("email", "Email"));
        let schema = presentation_schema(&form).unwrap();
        let keys: Vec<&str> = schema.properties["email"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["type", "format", "title"]);
    }

    #[test]
    fn test_placeholder_and_default() {
        let form = build(
            FormBuilder::new("f", "F")
                .field(crate::form::Field::text("city", "City").placeholder("Berlin"))
                .field(crate::form::Field::number("qty", "Qty").placeholder("1").default_value(1)),
        );
        let schema = presentation_schema(&form).unwrap();
        assert_eq!(schema.properties["city"]["examples"], json!(["Berlin"]));
        assert!(schema.properties["qty"].get("examples").is_none());
        assert_eq!(schema.properties["qty"]["default"], json!(1));
    }

    #[test]
    fn test_table_shape_ignores_columns() {
        let form = build(FormBuilder::new("f", "F").table("users", "Users", |t| {
            t.text_column("name", "Name").sortable();
            t.email_column("email", "Email");
        }));
        let schema = presentation_schema(&form).unwrap();
        let table = &schema.properties["users"];
        assert_eq!(table["type"], "object");
        assert_eq!(table["title"], "Users");
        let keys: Vec<&str> =
            table["properties"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["columns", "rows", "total", "page", "limit"]);
        assert_eq!(table["properties"]["columns"]["items"]["$ref"], "#/definitions/tableColumn");
        assert!(schema.definitions.contains_key(TABLE_COLUMN_DEFINITION));
    }

    #[test]
    fn test_invalid_rule_parameter() {
        let mut form = Form::empty("f", "F");
        form.fields.push(crate::form::Field::number("n", "N").rule(ValidationRule::max("lots")));
        let err = presentation_schema(&form).unwrap_err();
        assert!(err.to_string().starts_with("invalid max rule on field 'n'"));
    }

    #[test]
    fn test_non_finite_bound_is_invalid() {
        let mut form = Form::empty("f", "F");
        form.fields.push(crate::form::Field::number("n", "N").rule(ValidationRule::max("NaN")));
        let SchemaError::InvalidRule { source, .. } = presentation_schema(&form).unwrap_err();
        assert!(matches!(source, ValidationError::NotANumber { .. }));
    }

    #[test]
    fn test_malformed_pattern() {
        let mut form = Form::empty("f", "F");
        form.fields.push(crate::form::Field::text("t", "T").rule(ValidationRule::pattern("[")));
        let SchemaError::InvalidRule { source, .. } = presentation_schema(&form).unwrap_err();
        assert!(matches!(source, ValidationError::MalformedPattern { .. }));
    }
}
