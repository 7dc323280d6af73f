//! Three-step onboarding after sign-up: profile, email verification and an
//! optional first property.

pub mod profile_step;
pub mod property_step;
pub mod verification;

use crate::auth::Route;
use crate::db::{RepositoryError, SwapRepository};
use crate::models::ProfileInput;

pub use profile_step::{ContactMethod, ProfileSetupForm, submit_profile_setup, validate_profile_setup};
pub use property_step::{PropertySetupForm, finish_onboarding, submit_property_setup, validate_property_setup};
pub use verification::{EmailVerificationStep, ResendCooldown, VerificationForm};

pub const STEP_COUNT: u8 = 3;

/// Labels shown by the step indicator; the last one marks completion.
pub const STEP_LABELS: [&str; 4] = ["Profile Setup", "Verification", "Property Setup", "Complete"];

/// Where "continue" leads from `step`.
pub fn next_route(step: u8) -> Route {
    if step >= STEP_COUNT {
        Route::Profile
    } else {
        Route::Onboarding(step + 1)
    }
}

/// Where "back" leads from `step`. Step 1 returns to sign-up.
pub fn back_route(step: u8) -> Route {
    if step <= 1 {
        Route::SignUp
    } else {
        Route::Onboarding(step - 1)
    }
}

/// The stored profile as upsert input, or a blank one for a new user.
async fn load_profile_input(
    repo: &dyn SwapRepository,
    user_id: &str,
) -> Result<ProfileInput, RepositoryError> {
    match repo.get_profile(user_id).await {
        Ok(existing) => Ok(existing.into()),
        Err(RepositoryError::NotFound) => Ok(ProfileInput {
            user_id: user_id.to_string(),
            ..ProfileInput::default()
        }),
        Err(e) => Err(e),
    }
}

/// Indicator state while on `step`: every earlier step is complete.
pub fn completed_steps(step: u8) -> [bool; 4] {
    std::array::from_fn(|i| (i as u8) + 1 < step)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn routes_between_steps() {
        assert_eq!(next_route(1).path(), "/auth/onboarding/step-2");
        assert_eq!(next_route(2).path(), "/auth/onboarding/step-3");
        assert_eq!(next_route(3).path(), "/profile");
        assert_eq!(back_route(1).path(), "/auth/signup");
        assert_eq!(back_route(3).path(), "/auth/onboarding/step-2");
    }

    #[test]
    fn indicator_marks_earlier_steps() {
        assert_eq!(completed_steps(1), [false, false, false, false]);
        assert_eq!(completed_steps(3), [true, true, false, false]);
    }
}
