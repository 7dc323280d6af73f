use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Key under which failures that belong to no single field are reported.
pub const GENERAL_FIELD: &str = "general";

/// Field name to human-readable message.
///
/// Each field holds at most one message. Inserting a second message for a
/// field keeps the first one, so validators that run their rules in order
/// report the first failing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors consisting of a single `general` message.
    pub fn general(message: impl Into<String>) -> Self {
        Self::single(GENERAL_FIELD, message)
    }

    /// Errors consisting of one message for one field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Records the message if `message` is `Some`.
    pub fn insert_opt(&mut self, field: &str, message: Option<&str>) {
        if let Some(message) = message {
            self.insert(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Removes the error for a single field. Returns whether one was present.
    pub fn clear_field(&mut self, field: &str) -> bool {
        self.0.remove(field).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Adds every error from `other` for fields that have none yet.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts to a `Result`, `Ok` when there are no errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (field, message) in &self.0 {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
