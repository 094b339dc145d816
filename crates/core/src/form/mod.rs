//! Form definition model.
//!
//! This module provides the canonical in-memory representation of forms:
//! - Fields with their types, constraints and nested table configuration
//! - Builders that assemble forms in call order
//! - Derivation of fields from native record types
//! - Application handlers, held out-of-band from the serializable data
//!
//! # Example
//!
//! ```
//! use formist_core::form::{Field, FormBuilder, SelectOption, ValidationRule};
//!
//! let entry = FormBuilder::new("users", "Users")
//!     .description("Manage accounts")
//!     .field(Field::text("name", "Name").required().rule(ValidationRule::min_length(2)))
//!     .email("email", "Email")
//!     .select("role", "Role", vec![SelectOption::new("admin", "Administrator")])
//!     .table("recent", "Recent sign-ups", |t| {
//!         t.text_column("name", "Name").sortable().date_column("joined", "Joined");
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(entry.form.fields.len(), 4);
//! ```

pub mod builder;
pub mod definition;
pub mod errors;
pub mod field;
pub mod handlers;
pub mod record;

pub use builder::{FormBuilder, PageBuilder, TableBuilder, finalize_form};
pub use definition::{Form, FormEntry, Page, PageEntry};
pub use errors::FormError;
pub use field::{
    DEFAULT_EMAIL_MESSAGE, Field, FieldGroup, FieldType, RuleKind, SelectOption, TableColumn,
    TableConfig, ValidationRule,
};
pub use handlers::{
    FormHandlers, HandlerError, HandlerResult, LoadHandler, PageHandler, PageRequest,
    PageResponse, SubmitHandler, TableData, TableDataSource, TableQuery,
};
pub use record::{FormRecord, MemberDescriptor, NativeKind, fields_from_members};
