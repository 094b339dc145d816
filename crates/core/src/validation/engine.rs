//! The rule engine shared by single-field checks and payload validation.

use std::sync::LazyLock;

use regex::Regex;

use super::coerce::{to_f64, to_usize};
use super::errors::{FieldError, ValidationError, ValidationReport};
use crate::form::{Field, Form, RuleKind, ValidationRule};
use crate::value::{Value, ValueMap};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Validate one value against a field.
///
/// Empty values fail only when the field is required; an empty optional value
/// passes without running any rule. Otherwise rules run in declared order and
/// the first failure is returned.
pub fn validate_field(field: &Field, value: &Value) -> Result<(), ValidationError> {
    if value.is_empty() {
        if field.required {
            return Err(ValidationError::MissingRequiredField { field: field.name.clone() });
        }
        return Ok(());
    }

    for rule in &field.validation {
        apply_rule(&field.name, rule, value)?;
    }
    Ok(())
}

/// Validate a decoded payload against every field of a form, stopping at the
/// first failing field in field order. Absent keys are treated as null.
pub fn validate_form(form: &Form, payload: &ValueMap) -> Result<(), FieldError> {
    for field in &form.fields {
        check_field(field, payload)?;
    }
    Ok(())
}

/// Validate a payload against every field and collect one error per failing
/// field.
pub fn validate_form_report(form: &Form, payload: &ValueMap) -> ValidationReport {
    let mut report = ValidationReport::success();
    for field in &form.fields {
        if let Err(e) = check_field(field, payload) {
            report.add_error(e);
        }
    }
    report
}

fn check_field(field: &Field, payload: &ValueMap) -> Result<(), FieldError> {
    let value = payload.get(&field.name).unwrap_or(&Value::Null);
    validate_field(field, value).map_err(|error| FieldError {
        field: field.name.clone(),
        label: display_label(field),
        error,
    })
}

fn display_label(field: &Field) -> String {
    if field.label.is_empty() { field.name.clone() } else { field.label.clone() }
}

fn apply_rule(field: &str, rule: &ValidationRule, value: &Value) -> Result<(), ValidationError> {
    let parameter = rule.parameter.as_ref().unwrap_or(&Value::Null);

    let failure = match rule.kind {
        RuleKind::Email => {
            let s = expect_str(field, value)?;
            (!EMAIL_RE.is_match(s)).then(|| "invalid email address".to_string())
        }
        RuleKind::Min => {
            let actual = to_f64(field, value)?;
            let bound = to_f64(field, parameter)?;
            (actual < bound).then(|| format!("value must be at least {bound}"))
        }
        RuleKind::Max => {
            let actual = to_f64(field, value)?;
            let bound = to_f64(field, parameter)?;
            (actual > bound).then(|| format!("value must be at most {bound}"))
        }
        RuleKind::MinLength => {
            let len = expect_str(field, value)?.chars().count();
            let bound = to_usize(field, parameter)?;
            (len < bound).then(|| format!("length must be at least {bound} characters"))
        }
        RuleKind::MaxLength => {
            let len = expect_str(field, value)?.chars().count();
            let bound = to_usize(field, parameter)?;
            (len > bound).then(|| format!("length must be at most {bound} characters"))
        }
        RuleKind::Pattern => {
            let s = expect_str(field, value)?;
            let re = compile_pattern(field, parameter)?;
            (!re.is_match(s)).then(|| "value does not match the required format".to_string())
        }
    };

    match failure {
        Some(default_message) => Err(ValidationError::ValidationFailed {
            field: field.to_string(),
            rule: rule.kind,
            message: rule.custom_message().map_or(default_message, ToString::to_string),
        }),
        None => Ok(()),
    }
}

/// Compile the parameter of a `pattern` rule.
pub(crate) fn compile_pattern(field: &str, parameter: &Value) -> Result<Regex, ValidationError> {
    let pattern = expect_str(field, parameter)?;
    Regex::new(pattern).map_err(|source| ValidationError::MalformedPattern {
        field: field.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn expect_str<'a>(field: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::NotAString {
        field: field.to_string(),
        actual: value.type_name().to_string(),
    })
}
