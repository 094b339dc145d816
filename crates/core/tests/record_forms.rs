use formist_core::form::{FieldType, FormBuilder, RuleKind};
use formist_core::schema::project;
use formist_core::validation::validate_form_report;
use formist_core::value::payload_from_json;
use serde_json::json;

formist_core::form_record! {
    #[derive(Debug, Default)]
    pub struct Customer {
        #[form(label = "Full name", required = "true")]
        pub name: String,
        #[form(form = "mail", required = "true")]
        pub contact_email: String,
        #[form(type = "date")]
        pub birthday: String,
        pub newsletter: bool,
        pub credit: i64,
        notes: String,
    }
}

#[test]
fn record_fields_follow_declaration_order() {
    let entry = FormBuilder::from_record::<Customer>("customers", "Customers").build().unwrap();
    let form = &entry.form;

    let summary: Vec<(&str, FieldType, bool)> =
        form.fields.iter().map(|f| (f.name.as_str(), f.field_type, f.required)).collect();
    assert_eq!(
        summary,
        vec![
            ("name", FieldType::Text, true),
            ("mail", FieldType::Email, true),
            ("birthday", FieldType::Date, false),
            ("newsletter", FieldType::Checkbox, false),
            ("credit", FieldType::Number, false),
        ]
    );
    assert_eq!(form.fields[0].label, "Full name");
    assert_eq!(form.fields[1].label, "contact_email");
    assert!(form.fields[1].has_rule(RuleKind::Email));
}

#[test]
fn record_form_projects_and_validates() {
    let entry = FormBuilder::from_record::<Customer>("customers", "Customers")
        .text("referrer", "Referrer")
        .build()
        .unwrap();

    let projection = project(&entry.form).unwrap();
    let schema = projection.schema.to_json();
    assert_eq!(schema["required"], json!(["name", "mail"]));
    assert_eq!(schema["properties"]["birthday"]["format"], "date");
    assert_eq!(schema["properties"]["newsletter"]["type"], "boolean");
    assert_eq!(projection.ui_schema.order.last().map(String::as_str), Some("referrer"));

    let report = validate_form_report(&entry.form, &payload_from_json(json!({ "mail": "x" })));
    assert!(!report.valid);
    let failed: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(failed, ["name", "mail"]);

    let ok = payload_from_json(json!({ "name": "Grace", "mail": "grace@example.com" }));
    assert!(validate_form_report(&entry.form, &ok).valid);
}
