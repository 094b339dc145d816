//! Schema projection.
//!
//! A [`Form`] is projected into two independent documents: a presentation
//! schema (JSON Schema draft 2020-12) describing the data shape, and a UI
//! schema carrying widget choice, ordering, grouping and table options.
//! Both are pure functions of the form.

pub mod errors;
pub mod presentation;
pub mod ui;

use serde::Serialize;

use crate::form::Form;

pub use errors::SchemaError;
pub use presentation::{PresentationSchema, SCHEMA_DIALECT, presentation_schema};
pub use ui::{UiGroup, UiSchema, ui_schema};

/// Both schema documents of a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub schema: PresentationSchema,
    pub ui_schema: UiSchema,
}

/// Project a form into its presentation and UI schemas.
pub fn project(form: &Form) -> Result<Projection, SchemaError> {
    Ok(Projection { schema: presentation_schema(form)?, ui_schema: ui_schema(form) })
}
