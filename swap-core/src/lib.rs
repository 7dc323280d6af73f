pub mod auth;
pub mod checklist;
pub mod common;
pub mod contract;
pub mod dashboard;
pub mod db;
pub mod forms;
pub mod listings;
pub mod messaging;
pub mod models;
pub mod onboarding;
pub mod samples;

pub use db::repository::{RepositoryError, SwapRepository};
pub use forms::{FieldValue, FormError, FormStore, StepForm, StepSequencer, ValidationErrors, Wizard};
pub use models::*;
