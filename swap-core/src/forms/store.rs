use std::future::Future;

use tracing::{debug, info, warn};

use super::errors::{GENERAL_FIELD, ValidationErrors};
use super::field::{FieldPath, FieldValue, FormError, FormFields};

/// Result of [`FormStore::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<R> {
    /// Validation failed; the action was not run.
    Invalid,
    /// The action ran and failed; the store's errors describe why.
    Failed,
    /// The action ran and succeeded.
    Completed(R),
}

impl<R> SubmitOutcome<R> {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(_))
    }

    pub fn completed(self) -> Option<R> {
        match self {
            SubmitOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// Owns a form's data, its current validation errors and the loading flag.
#[derive(Debug, Clone, Default)]
pub struct FormStore<T> {
    data: T,
    errors: ValidationErrors,
    loading: bool,
}

impl<T> FormStore<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: ValidationErrors::new(),
            loading: false,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Direct mutable access, bypassing error clearing.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(
        &self,
        field: &str,
    ) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the whole error map.
    pub fn set_errors(
        &mut self,
        errors: ValidationErrors,
    ) {
        self.errors = errors;
    }

    pub fn set_general_error(
        &mut self,
        message: impl Into<String>,
    ) {
        self.errors = ValidationErrors::general(message);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Runs `validate` against the current data and stores its result.
    ///
    /// Returns `true` when the form is valid.
    pub fn validate_with(
        &mut self,
        validate: impl FnOnce(&T) -> ValidationErrors,
    ) -> bool {
        self.errors = validate(&self.data);
        if !self.errors.is_empty() {
            debug!(fields = ?self.errors.fields().collect::<Vec<_>>(), "validation failed");
        }
        self.errors.is_empty()
    }
}

impl<T: FormFields> FormStore<T> {
    /// Writes `value` at `path` and clears that field's error, if any.
    pub fn update(
        &mut self,
        path: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let path = FieldPath::parse(path);
        self.data.set_field(&path, value.into())?;
        if self.errors.clear_field(path.error_key()) {
            debug!(field = %path, "cleared field error on edit");
        }
        Ok(())
    }

    /// Removes `value` from the list at `path` if present, else appends it.
    ///
    /// Returns `true` when the value is a member after the toggle.
    pub fn toggle_array_member(
        &mut self,
        path: &str,
        value: &str,
    ) -> Result<bool, FormError> {
        let path = FieldPath::parse(path);
        let list = self
            .data
            .list_field_mut(&path)
            .ok_or_else(|| FormError::NotAList(path.to_string()))?;
        let present = match list.iter().position(|v| v == value) {
            Some(idx) => {
                list.remove(idx);
                false
            }
            None => {
                list.push(value.to_string());
                true
            }
        };
        self.errors.clear_field(path.error_key());
        debug!(field = %path, value, present, "toggled list member");
        Ok(present)
    }

    /// Validates, then runs `action` with the loading flag set.
    ///
    /// Errors are cleared before the action runs. When the action fails its
    /// error becomes the store's errors; the loading flag is reset whatever
    /// the outcome.
    pub async fn submit<R, V, A, Fut>(
        &mut self,
        validate: V,
        action: A,
    ) -> SubmitOutcome<R>
    where
        V: FnOnce(&T) -> ValidationErrors,
        A: FnOnce(&T) -> Fut,
        Fut: Future<Output = Result<R, ValidationErrors>>,
    {
        if !self.validate_with(validate) {
            return SubmitOutcome::Invalid;
        }

        self.loading = true;
        self.errors.clear();
        let result = action(&self.data).await;
        self.loading = false;

        match result {
            Ok(value) => {
                info!("form submitted");
                SubmitOutcome::Completed(value)
            }
            Err(errors) => {
                warn!(general = errors.get(GENERAL_FIELD), "form submission failed");
                self.errors = errors;
                SubmitOutcome::Failed
            }
        }
    }
}
