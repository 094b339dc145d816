//! Form and page definition files.
//!
//! A definitions directory holds one form or page per file, in TOML, YAML or
//! JSON. Each file carries a `kind` of `form` or `page` next to the usual
//! fields:
//!
//! ```yaml
//! kind: form
//! name: contact
//! title: Contact us
//! fields:
//!   - name: email
//!     type: email
//!     label: Email
//!     required: true
//! ```

pub mod discovery;
pub mod errors;

pub use discovery::{
    Definition, DefinitionFormat, DefinitionInfo, DefinitionRepository, discover_definitions,
    load_definition_from_file,
};
pub use errors::DefinitionError;
