//! Errors raised while assembling form definitions.

use thiserror::Error;

/// Errors that indicate a defect in the code (or file) defining a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The builder was used in a way that would produce an inconsistent form.
    #[error("builder misuse in form '{form}': {message}")]
    BuilderMisuse { form: String, message: String },
}

impl FormError {
    pub(crate) fn misuse(form: &str, message: impl Into<String>) -> Self {
        Self::BuilderMisuse { form: form.to_string(), message: message.into() }
    }
}
