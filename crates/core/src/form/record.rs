//! Deriving forms from native record types.
//!
//! A record describes its members through [`FormRecord`], either written by
//! hand or generated by [`form_record!`](crate::form_record). Each member is
//! resolved into a [`Field`] as follows (first match wins per step):
//!
//! 1. Members that are not `pub` are skipped.
//! 2. Name: the `form` tag, else the lower-cased member name.
//! 3. Label: the `label` tag, else the member name unchanged.
//! 4. Required: the `required` tag equals `"true"` or `"1"`.
//! 5. Type: the `type` tag through a fixed lookup table, else inferred from
//!    the native type (bool -> checkbox, numeric -> number, string -> text,
//!    promoted to email/password when the member name contains it).
//! 6. Email fields get a default `email` rule.

use super::builder::FormBuilder;
use super::field::{Field, FieldType};

/// Coarse classification of a member's native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKind {
    Bool,
    Numeric,
    String,
    Other,
}

impl NativeKind {
    /// Classify a type by its source spelling, as produced by `stringify!`.
    pub fn from_type_name(type_name: &str) -> Self {
        let compact: String = type_name.chars().filter(|c| !c.is_whitespace()).collect();
        let base = compact.rsplit("::").next().unwrap_or(&compact);
        match base {
            "bool" => Self::Bool,
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "u128" | "usize" | "f32" | "f64" => Self::Numeric,
            "String" | "str" | "&str" | "&'staticstr" => Self::String,
            _ => Self::Other,
        }
    }
}

/// Description of one member of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: &'static str,
    pub kind: NativeKind,
    /// Whether the member is visible outside its defining module.
    pub exported: bool,
    pub tags: Vec<(&'static str, &'static str)>,
}

impl MemberDescriptor {
    /// An exported member without tags.
    pub fn new(name: &'static str, kind: NativeKind) -> Self {
        Self { name, kind, exported: true, tags: Vec::new() }
    }

    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn tag(mut self, key: &'static str, value: &'static str) -> Self {
        self.tags.push((key, value));
        self
    }

    /// Value of a declared tag. Empty values count as absent.
    pub fn get_tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
    }
}

/// A native record type that can describe its members in declaration order.
pub trait FormRecord {
    fn members() -> Vec<MemberDescriptor>;
}

/// Resolve member descriptors into fields, in declaration order.
pub fn fields_from_members(members: &[MemberDescriptor]) -> Vec<Field> {
    members
        .iter()
        .filter(|m| m.exported)
        .map(field_from_member)
        .filter(|f| !f.name.is_empty())
        .collect()
}

fn field_from_member(member: &MemberDescriptor) -> Field {
    let name = member
        .get_tag("form")
        .map_or_else(|| member.name.to_lowercase(), ToString::to_string);
    let label = member.get_tag("label").unwrap_or(member.name);

    let mut field = Field::new(name, resolve_type(member), label);
    field.required = matches!(member.get_tag("required"), Some("true" | "1"));
    field.with_type_defaults()
}

fn resolve_type(member: &MemberDescriptor) -> FieldType {
    if let Some(declared) = member.get_tag("type").and_then(type_from_tag) {
        return declared;
    }

    match member.kind {
        NativeKind::Bool => FieldType::Checkbox,
        NativeKind::Numeric => FieldType::Number,
        NativeKind::String => {
            let lower = member.name.to_lowercase();
            if lower.contains("email") {
                FieldType::Email
            } else if lower.contains("password") {
                FieldType::Password
            } else {
                FieldType::Text
            }
        }
        NativeKind::Other => FieldType::Text,
    }
}

/// Types that may be declared through the `type` tag. `text` and `table`
/// are not in the table; an unknown value falls back to inference.
fn type_from_tag(tag: &str) -> Option<FieldType> {
    match tag {
        "email" => Some(FieldType::Email),
        "password" => Some(FieldType::Password),
        "textarea" => Some(FieldType::Textarea),
        "select" => Some(FieldType::Select),
        "radio" => Some(FieldType::Radio),
        "checkbox" => Some(FieldType::Checkbox),
        "date" => Some(FieldType::Date),
        "time" => Some(FieldType::Time),
        "file" => Some(FieldType::File),
        "hidden" => Some(FieldType::Hidden),
        "number" => Some(FieldType::Number),
        _ => None,
    }
}

impl FormBuilder {
    /// Start a form whose fields are derived from `R`'s members.
    pub fn from_record<R: FormRecord>(name: impl Into<String>, title: impl Into<String>) -> Self {
        fields_from_members(&R::members())
            .into_iter()
            .fold(Self::new(name, title), FormBuilder::field)
    }
}

/// Declare a struct and implement [`FormRecord`](crate::form::FormRecord)
/// for it from its field list.
///
/// Tags are given with an optional `#[form(key = "value", ...)]` attribute on
/// each field; the attribute is consumed by the macro.
///
/// ```
/// use formist_core::form::{FormBuilder, FieldType};
///
/// formist_core::form_record! {
///     #[derive(Debug, Default)]
///     pub struct Signup {
///         #[form(form = "login", label = "Login", required = "true")]
///         pub username: String,
///         pub user_email: String,
///         #[form(type = "textarea")]
///         pub bio: String,
///         pub age: u32,
///         secret: String,
///     }
/// }
///
/// let entry = FormBuilder::from_record::<Signup>("signup", "Sign up").build().unwrap();
/// let names: Vec<&str> = entry.form.fields.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["login", "user_email", "bio", "age"]);
/// assert_eq!(entry.form.fields[1].field_type, FieldType::Email);
/// ```
#[macro_export]
macro_rules! form_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[form($($key:tt = $val:literal),* $(,)?)])?
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($fvis $field: $fty),*
        }

        impl $crate::form::FormRecord for $name {
            fn members() -> ::std::vec::Vec<$crate::form::MemberDescriptor> {
                ::std::vec![
                    $(
                        $crate::form::MemberDescriptor {
                            name: stringify!($field),
                            kind: $crate::form::NativeKind::from_type_name(stringify!($fty)),
                            exported: stringify!($fvis) == "pub",
                            tags: ::std::vec![$($((stringify!($key), $val)),*)?],
                        }
                    ),*
                ]
            }
        }
    };
}
