//! Form engine shared by every FlatSwaps form and wizard.
//!
//! A form is a plain struct implementing [`FormFields`]. It lives inside a
//! [`FormStore`], which owns the field values, the current
//! [`ValidationErrors`] and the loading flag of an in-flight submission.
//! Multi-step forms additionally implement [`StepForm`] and are driven by a
//! [`Wizard`], which pairs the store with a [`StepSequencer`].

mod errors;
mod field;
mod rules;
mod sequencer;
mod store;
mod wizard;

pub use errors::{GENERAL_FIELD, ValidationErrors};
pub use field::{FieldPath, FieldValue, FormError, FormFields};
pub use rules::{Rule, first_failure};
pub use sequencer::{Advance, StepForm, StepSequencer};
pub use store::{FormStore, SubmitOutcome};
pub use wizard::{Completion, Wizard};
