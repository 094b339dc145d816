//! Server-side validation of submitted values.
//!
//! A single engine backs both entry points: [`validate_field`] for one value
//! and [`validate_form`] / [`validate_form_report`] for a decoded payload.
//! Numeric and length coercion are shared with schema projection through
//! [`coerce`].

pub mod coerce;
pub mod engine;
pub mod errors;

pub use coerce::{to_f64, to_usize};
pub use engine::{validate_field, validate_form, validate_form_report};
pub use errors::{FieldError, ValidationError, ValidationReport};
