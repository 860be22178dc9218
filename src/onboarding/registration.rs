//! Account creation: collect credentials, then verify the emailed code.

use std::time::Duration;

use super::notice::Toasts;
use super::types::{RegistrationPhase, WizardAction};

#[derive(Debug, Clone)]
pub struct RegistrationFlow {
    pub phase: RegistrationPhase,
    pub name: String,
    pub email: String,
    pub password: String,
    pub verification_code: String,
    expected_code: String,
    alternate_login_delay: Duration,
    alternate_login_pending: bool,
}

impl RegistrationFlow {
    pub fn new(expected_code: impl Into<String>, alternate_login_delay: Duration) -> Self {
        Self {
            phase: RegistrationPhase::Collecting,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            verification_code: String::new(),
            expected_code: expected_code.into(),
            alternate_login_delay,
            alternate_login_pending: false,
        }
    }

    /// Back to a blank form, as on first entry. The expected code and the
    /// login delay are kept.
    pub fn reset(&mut self) {
        *self = Self::new(
            std::mem::take(&mut self.expected_code),
            self.alternate_login_delay,
        );
    }

    /// Names of required credential fields that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// Submit the form for the current phase
    pub fn submit(&mut self, toasts: &mut Toasts) -> WizardAction {
        match self.phase {
            RegistrationPhase::Collecting => {
                let missing = self.missing_fields();
                if !missing.is_empty() {
                    toasts.error(
                        "Missing required fields",
                        &format!("Please fill in: {}.", missing.join(", ")),
                    );
                    return WizardAction::None;
                }
                toasts.info(
                    "Verification code sent",
                    "Please check your email for the verification code.",
                );
                tracing::info!("[registration] code sent, verifying");
                self.phase = RegistrationPhase::Verifying;
                WizardAction::None
            }
            RegistrationPhase::Verifying => {
                let code = self.verification_code.trim();
                if code.is_empty() {
                    toasts.error(
                        "Verification code required",
                        "Enter the code from your email.",
                    );
                    WizardAction::None
                } else if code == self.expected_code {
                    toasts.success(
                        "Email verified successfully!",
                        Some("You can now proceed to the next step."),
                    );
                    tracing::info!("[registration] email verified");
                    WizardAction::Advance
                } else {
                    toasts.error("Invalid verification code", "Please try again.");
                    WizardAction::None
                }
            }
        }
    }

    /// Verifying → Collecting. Entered credentials are kept.
    pub fn back_to_registration(&mut self) {
        if self.phase == RegistrationPhase::Verifying {
            self.phase = RegistrationPhase::Collecting;
        }
    }

    /// Skip both phases through the external login stand-in
    pub fn alternate_login(&mut self, toasts: &mut Toasts) -> WizardAction {
        if self.phase != RegistrationPhase::Collecting || self.alternate_login_pending {
            return WizardAction::None;
        }
        toasts.info(
            "Continuing with Google...",
            "This feature is not implemented in this demo.",
        );
        self.alternate_login_pending = true;
        WizardAction::ScheduleAlternateLogin {
            delay: self.alternate_login_delay,
        }
    }

    /// The external login stand-in returned
    pub fn alternate_login_finished(&mut self) -> WizardAction {
        if !self.alternate_login_pending {
            return WizardAction::None;
        }
        self.alternate_login_pending = false;
        WizardAction::Advance
    }

    pub fn alternate_login_pending(&self) -> bool {
        self.alternate_login_pending
    }
}
