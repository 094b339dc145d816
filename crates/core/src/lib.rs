//! Declarative admin forms.
//!
//! Forms are described once, with [`form::FormBuilder`], derived from a
//! record type, or loaded from definition files, and then:
//!
//! - projected into a presentation schema and a UI schema ([`schema`]),
//! - used to validate submitted payloads ([`validation`]),
//! - served by name from a [`registry::FormRegistry`] through the
//!   [`admin::Admin`] facade.

pub mod admin;
pub mod config;
pub mod definitions;
pub mod form;
pub mod registry;
pub mod schema;
pub mod storage;
pub mod validation;
pub mod value;

pub use admin::{Admin, AdminError, AdminOverview, AdminSettings, FormResponse};
pub use form::{Field, FieldType, Form, FormBuilder, Page, PageBuilder};
pub use registry::{FormRegistry, RegistryError};
pub use value::{Value, ValueMap};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
