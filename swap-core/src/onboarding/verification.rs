use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::auth::validation::validate_verification_code;
use crate::auth::{AuthService, Route};
use crate::forms::{FieldPath, FieldValue, FormError, FormFields, FormStore, ValidationErrors};

pub const RESEND_COOLDOWN: Duration = Duration::from_secs(60);
pub const VERIFY_FIRST: &str = "Please verify your email address to continue";
pub const SEND_FAILED: &str = "Failed to send verification email";

/// Blocks resending a code until a fixed interval has passed.
#[derive(Debug, Clone, Copy)]
pub struct ResendCooldown {
    period: Duration,
    last_sent: Option<Instant>,
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new(RESEND_COOLDOWN)
    }
}

impl ResendCooldown {
    pub fn new(period: Duration) -> Self {
        Self { period, last_sent: None }
    }

    pub fn start(
        &mut self,
        now: Instant,
    ) {
        self.last_sent = Some(now);
    }

    pub fn remaining(
        &self,
        now: Instant,
    ) -> Duration {
        match self.last_sent {
            Some(sent) => self.period.saturating_sub(now.saturating_duration_since(sent)),
            None => Duration::ZERO,
        }
    }

    /// Whole seconds left, rounded up, as the countdown shows them.
    pub fn remaining_secs(
        &self,
        now: Instant,
    ) -> u64 {
        let left = self.remaining(now);
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }

    pub fn is_ready(
        &self,
        now: Instant,
    ) -> bool {
        self.remaining(now).is_zero()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationForm {
    pub email_code: String,
}

impl FormFields for VerificationForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "email_code" => self.email_code = value.into_text(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }
}

pub fn validate_verification(form: &VerificationForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert_opt("email_code", validate_verification_code(form.email_code.trim()));
    errors
}

/// Onboarding step 2: send a code to the account email, then confirm it.
#[derive(Debug, Clone, Default)]
pub struct EmailVerificationStep {
    store: FormStore<VerificationForm>,
    cooldown: ResendCooldown,
    sent: bool,
    verified: bool,
    resending: bool,
}

impl EmailVerificationStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &FormStore<VerificationForm> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FormStore<VerificationForm> {
        &mut self.store
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn is_resending(&self) -> bool {
        self.resending
    }

    pub fn cooldown(&self) -> &ResendCooldown {
        &self.cooldown
    }

    /// Sends a code unless the cooldown is still running.
    ///
    /// Returns whether a code went out.
    pub async fn send_code(
        &mut self,
        auth: &dyn AuthService,
        email: &str,
        now: Instant,
    ) -> bool {
        if !self.cooldown.is_ready(now) {
            debug!(remaining = self.cooldown.remaining_secs(now), "resend still cooling down");
            return false;
        }
        self.resending = true;
        let result = auth.send_verification_email(email).await;
        self.resending = false;
        match result {
            Ok(()) => {
                self.sent = true;
                self.cooldown.start(now);
                self.store.clear_errors();
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to send verification email");
                self.store.set_general_error(SEND_FAILED);
                false
            }
        }
    }

    /// Checks the typed code with the auth service.
    pub async fn verify(
        &mut self,
        auth: &dyn AuthService,
        email: &str,
    ) -> bool {
        let verified = self
            .store
            .submit(validate_verification, |form| {
                let code = form.email_code.trim().to_string();
                async move { auth.verify_email(email, &code).await.map_err(|e| e.to_form_errors()) }
            })
            .await
            .is_completed();
        if verified {
            self.verified = true;
        }
        verified
    }

    /// Continues to step 3 once the email is verified.
    pub fn submit(&mut self) -> Option<Route> {
        if !self.verified {
            self.store.set_general_error(VERIFY_FIRST);
            return None;
        }
        Some(Route::Onboarding(3))
    }

    pub fn skip(&self) -> Route {
        Route::Onboarding(3)
    }

    pub fn back(&self) -> Route {
        Route::Onboarding(1)
    }
}
