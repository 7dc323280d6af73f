use tracing::info;

use super::errors::ValidationErrors;
use super::field::{FieldValue, FormError, FormFields};
use super::sequencer::{Advance, StepForm, StepSequencer};
use super::store::FormStore;

/// Result of [`Wizard::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every step is valid and the wizard is on its last step.
    Ready,
    /// Not on the last step yet.
    NotAtLastStep,
    /// The contained step is the first one that is not valid.
    Incomplete(usize),
}

/// A multi-step form: one shared [`FormStore`] navigated by a
/// [`StepSequencer`].
#[derive(Debug, Clone)]
pub struct Wizard<F> {
    store: FormStore<F>,
    steps: StepSequencer,
}

impl<F: StepForm + FormFields + Default> Default for Wizard<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: StepForm + FormFields> Wizard<F> {
    pub fn new(data: F) -> Self {
        Self {
            store: FormStore::new(data),
            steps: StepSequencer::new(F::STEP_COUNT),
        }
    }

    pub fn data(&self) -> &F {
        self.store.data()
    }

    pub fn store(&self) -> &FormStore<F> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FormStore<F> {
        &mut self.store
    }

    pub fn errors(&self) -> &ValidationErrors {
        self.store.errors()
    }

    pub fn current_step(&self) -> usize {
        self.steps.current()
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.steps
    }

    pub fn update(
        &mut self,
        path: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        self.store.update(path, value)
    }

    pub fn toggle_array_member(
        &mut self,
        path: &str,
        value: &str,
    ) -> Result<bool, FormError> {
        self.store.toggle_array_member(path, value)
    }

    pub fn is_step_valid(
        &self,
        step: usize,
    ) -> bool {
        self.store.data().is_step_valid(step)
    }

    pub fn next(&mut self) -> Advance {
        self.steps.next(self.store.data())
    }

    pub fn previous(&mut self) -> usize {
        self.steps.previous()
    }

    pub fn go_to(
        &mut self,
        step: usize,
    ) -> bool {
        self.steps.go_to(step, self.store.data())
    }

    pub fn is_step_accessible(
        &self,
        step: usize,
    ) -> bool {
        self.steps.is_accessible(step, self.store.data())
    }

    /// Checks whether the wizard can be finished. Never changes the step or
    /// the data; the caller decides what to do with a finished form.
    pub fn complete(&self) -> Completion {
        if !self.steps.is_last() {
            return Completion::NotAtLastStep;
        }
        let data = self.store.data();
        match (1..=F::STEP_COUNT).find(|&step| !data.is_step_valid(step)) {
            Some(step) => Completion::Incomplete(step),
            None => {
                info!(steps = F::STEP_COUNT, "wizard complete");
                Completion::Ready
            }
        }
    }

    pub fn into_data(self) -> F {
        self.store.into_data()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::forms::FieldPath;

    #[derive(Debug, Default)]
    struct Trip {
        origin: String,
        destination: String,
    }

    impl FormFields for Trip {
        fn set_field(
            &mut self,
            path: &FieldPath<'_>,
            value: FieldValue,
        ) -> Result<(), FormError> {
            match path.as_str() {
                "origin" => self.origin = value.into_text(path)?,
                "destination" => self.destination = value.into_text(path)?,
                _ => return Err(path.unknown()),
            }
            Ok(())
        }
    }

    impl StepForm for Trip {
        const STEP_COUNT: usize = 2;

        fn is_step_valid(
            &self,
            step: usize,
        ) -> bool {
            match step {
                1 => !self.origin.is_empty(),
                2 => !self.destination.is_empty(),
                _ => false,
            }
        }
    }

    #[test]
    fn walks_steps_and_completes_without_resetting() {
        let mut wizard = Wizard::<Trip>::default();
        assert_eq!(wizard.next(), Advance::Blocked);

        wizard.update("origin", "Paris").unwrap();
        assert_eq!(wizard.next(), Advance::Moved(2));
        assert_eq!(wizard.complete(), Completion::Incomplete(2));

        wizard.update("destination", "Rome").unwrap();
        assert_eq!(wizard.complete(), Completion::Ready);
        assert_eq!(wizard.complete(), Completion::Ready);
        assert_eq!(wizard.current_step(), 2);
        assert_eq!(wizard.data().origin, "Paris");
    }

    #[test]
    fn complete_requires_last_step() {
        let wizard = Wizard::<Trip>::default();

        assert_eq!(wizard.complete(), Completion::NotAtLastStep);
    }
}
