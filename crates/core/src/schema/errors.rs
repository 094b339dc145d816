//! Errors raised while projecting a form into schema documents.

use thiserror::Error;

use crate::form::RuleKind;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// A rule parameter cannot be expressed as a schema constraint.
    #[error("invalid {rule} rule on field '{field}': {source}")]
    InvalidRule {
        field: String,
        rule: RuleKind,
        #[source]
        source: ValidationError,
    },
}
