//! Error types for field and form validation.

use thiserror::Error;

use crate::form::RuleKind;

/// Errors produced while validating one field value.
///
/// All variants are recoverable and carry a human-readable message.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required field was empty (null, blank string, empty list).
    #[error("field is required")]
    MissingRequiredField { field: String },

    /// A rule rejected the value. `message` is the rule's custom message or
    /// the kind-specific default.
    #[error("{message}")]
    ValidationFailed { field: String, rule: RuleKind, message: String },

    /// A value or rule parameter could not be read as a number.
    #[error("cannot convert {actual} to a number")]
    NotANumber { field: String, actual: String },

    /// A string was expected (string rules, pattern parameters).
    #[error("expected a string, got {actual}")]
    NotAString { field: String, actual: String },

    /// The pattern parameter of a rule is not a valid regular expression.
    #[error("invalid regular expression '{pattern}': {source}")]
    MalformedPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ValidationError {
    /// Name of the field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequiredField { field }
            | Self::ValidationFailed { field, .. }
            | Self::NotANumber { field, .. }
            | Self::NotAString { field, .. }
            | Self::MalformedPattern { field, .. } => field,
        }
    }

    /// Whether the error comes from the form's own configuration rather than
    /// from the submitted value.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MalformedPattern { .. })
    }
}

/// A validation failure attributed to a field of a form, for display to the
/// person who submitted it.
#[derive(Debug, Clone, Error)]
#[error("field '{label}': {error}")]
pub struct FieldError {
    pub field: String,
    pub label: String,
    #[source]
    pub error: ValidationError,
}

impl FieldError {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Result of checking every field of a form.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Whether the submission is valid.
    pub valid: bool,
    /// At most one error per field, in field order.
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Create a successful report.
    pub fn success() -> Self {
        Self { valid: true, errors: vec![] }
    }

    /// Add an error to the report.
    pub fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
        self.valid = false;
    }

    /// First error in field order, if any.
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn into_result(self) -> Result<(), FieldError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
