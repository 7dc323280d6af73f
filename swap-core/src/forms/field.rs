use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when a form update addresses a field incorrectly.
///
/// These are programming errors on the caller's side (wrong path or wrong
/// value type), not user-facing validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' expects {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("field '{0}' is not a multi-select list")]
    NotAList(String),
}

/// A dot-separated address of a form field.
///
/// `"title"` addresses a top-level field; `"location.city"` addresses the
/// `city` field of the nested `location` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath<'a> {
    raw: &'a str,
    parent: Option<&'a str>,
    name: &'a str,
}

impl<'a> FieldPath<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('.') {
            Some((parent, name)) => Self {
                raw,
                parent: Some(parent),
                name,
            },
            None => Self {
                raw,
                parent: None,
                name: raw,
            },
        }
    }

    pub fn parent(&self) -> Option<&'a str> {
        self.parent
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Key under which validation errors for this field are stored.
    ///
    /// Errors are keyed by the leaf name (`city`, not `location.city`).
    pub fn error_key(&self) -> &'a str {
        self.name
    }

    pub fn unknown(&self) -> FormError {
        FormError::UnknownField(self.raw.to_string())
    }

    pub fn mismatch(
        &self,
        expected: &'static str,
    ) -> FormError {
        FormError::TypeMismatch {
            field: self.raw.to_string(),
            expected,
        }
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.raw)
    }
}

/// A value written into a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(Decimal),
    Flag(bool),
}

impl FieldValue {
    pub fn into_text(
        self,
        path: &FieldPath<'_>,
    ) -> Result<String, FormError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Integer(i) => Ok(i.to_string()),
            FieldValue::Number(d) => Ok(d.to_string()),
            FieldValue::Flag(_) => Err(path.mismatch("text")),
        }
    }

    pub fn into_flag(
        self,
        path: &FieldPath<'_>,
    ) -> Result<bool, FormError> {
        match self {
            FieldValue::Flag(b) => Ok(b),
            _ => Err(path.mismatch("a boolean")),
        }
    }

    pub fn into_count(
        self,
        path: &FieldPath<'_>,
    ) -> Result<u32, FormError> {
        match self {
            FieldValue::Integer(i) => u32::try_from(i).map_err(|_| path.mismatch("a non-negative integer")),
            FieldValue::Text(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| path.mismatch("a non-negative integer")),
            _ => Err(path.mismatch("a non-negative integer")),
        }
    }

    pub fn into_number(
        self,
        path: &FieldPath<'_>,
    ) -> Result<Decimal, FormError> {
        match self {
            FieldValue::Number(d) => Ok(d),
            FieldValue::Integer(i) => Ok(Decimal::from(i)),
            FieldValue::Text(s) => s.trim().parse().map_err(|_| path.mismatch("a number")),
            FieldValue::Flag(_) => Err(path.mismatch("a number")),
        }
    }

    /// Optional number: empty text clears the field.
    pub fn into_optional_number(
        self,
        path: &FieldPath<'_>,
    ) -> Result<Option<Decimal>, FormError> {
        match self {
            FieldValue::Text(s) if s.trim().is_empty() => Ok(None),
            other => other.into_number(path).map(Some),
        }
    }

    /// Optional count: empty text clears the field.
    pub fn into_optional_count(
        self,
        path: &FieldPath<'_>,
    ) -> Result<Option<u32>, FormError> {
        match self {
            FieldValue::Text(s) if s.trim().is_empty() => Ok(None),
            other => other.into_count(path).map(Some),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

/// A form whose fields can be addressed by [`FieldPath`].
///
/// Implementations dispatch on the path explicitly, so every addressable
/// field is named in code and unknown paths are rejected.
pub trait FormFields {
    /// Writes `value` into the field at `path`.
    ///
    /// A two-level path writes one member of a nested group and leaves the
    /// group's other members as they were.
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError>;

    /// The multi-select list at `path`, if there is one.
    fn list_field_mut(
        &mut self,
        path: &FieldPath<'_>,
    ) -> Option<&mut Vec<String>> {
        let _ = path;
        None
    }
}
