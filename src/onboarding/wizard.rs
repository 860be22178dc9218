//! Onboarding Wizard
//!
//! Composes the step coordinator with the three flows. Intents are routed to
//! the flow that owns the current step; `Advance`/`Retreat` are consumed here
//! and every other action is handed back to the host.

use super::coordinator::StepCoordinator;
use super::integration::IntegrationFlow;
use super::notice::Toasts;
use super::organization::OrganizationFlow;
use super::registration::RegistrationFlow;
use super::types::{WizardAction, WizardStep};
use crate::config::Config;
use crate::provider::{CompletionReply, ProviderError};

/// Main onboarding wizard state
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    coordinator: StepCoordinator,
    pub registration: RegistrationFlow,
    pub organization: OrganizationFlow,
    pub integration: IntegrationFlow,
    pub toasts: Toasts,
    completed: bool,
}

impl OnboardingWizard {
    pub fn new(config: &Config) -> Self {
        Self {
            coordinator: StepCoordinator::new(),
            registration: RegistrationFlow::new(
                config.registration.verification_code.clone(),
                config.registration.alternate_login_delay(),
            ),
            organization: OrganizationFlow::new(config.organization.description_fetch_delay()),
            integration: IntegrationFlow::new(
                config.integration.check_delay(),
                config.integration.script_url.clone(),
                config.chat.model.clone(),
                config.chat.max_tokens,
            ),
            toasts: Toasts::new(),
            completed: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.coordinator.current()
    }

    /// 1-based position, for "Step n of 3" headers
    pub fn step_number(&self) -> usize {
        self.coordinator.position() + 1
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Consume navigation actions, pass everything else through
    fn route(&mut self, action: WizardAction) -> WizardAction {
        match action {
            WizardAction::Advance => {
                let from = self.step();
                if self.coordinator.advance() {
                    return self.leave(from);
                }
                WizardAction::None
            }
            WizardAction::Retreat => {
                let from = self.step();
                if self.coordinator.retreat() {
                    return self.leave(from);
                }
                WizardAction::None
            }
            WizardAction::Complete => {
                self.completed = true;
                tracing::info!("[wizard] onboarding complete");
                WizardAction::Complete
            }
            other => other,
        }
    }

    /// A step that is left starts over on its next visit
    fn leave(&mut self, from: WizardStep) -> WizardAction {
        tracing::debug!("[wizard] {:?} -> {:?}", from, self.step());
        match from {
            WizardStep::Registration => self.registration.reset(),
            WizardStep::Organization => self.organization.reset(),
            WizardStep::Integration => self.integration.reset(),
        }
        WizardAction::LeftStep(from)
    }

    fn on_step(&self, step: WizardStep) -> bool {
        self.step() == step
    }

    // --- Registration ---

    pub fn submit_registration(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Registration) {
            return WizardAction::None;
        }
        let action = self.registration.submit(&mut self.toasts);
        self.route(action)
    }

    pub fn back_to_registration(&mut self) {
        if self.on_step(WizardStep::Registration) {
            self.registration.back_to_registration();
        }
    }

    pub fn alternate_login(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Registration) {
            return WizardAction::None;
        }
        let action = self.registration.alternate_login(&mut self.toasts);
        self.route(action)
    }

    /// The alternate login delay elapsed. Dropped if the user already left
    /// the registration step.
    pub fn alternate_login_finished(&mut self) -> WizardAction {
        let action = self.registration.alternate_login_finished();
        if !self.on_step(WizardStep::Registration) {
            tracing::debug!("[wizard] stale alternate login dropped");
            return WizardAction::None;
        }
        self.route(action)
    }

    // --- Organization ---

    pub fn set_company_url(&mut self, url: impl Into<String>) -> WizardAction {
        if !self.on_step(WizardStep::Organization) {
            return WizardAction::None;
        }
        self.organization.set_company_url(url)
    }

    pub fn description_fetched(&mut self, generation: u64) -> bool {
        self.organization
            .description_fetched(generation, &mut self.toasts)
    }

    pub fn select_page(&mut self, index: usize) {
        if self.on_step(WizardStep::Organization) {
            self.organization.select_page(index);
        }
    }

    pub fn finish_training(&mut self) {
        if self.on_step(WizardStep::Organization) {
            self.organization.finish_training(&mut self.toasts);
        }
    }

    pub fn continue_setup(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Organization) {
            return WizardAction::None;
        }
        let action = self.organization.continue_setup();
        self.route(action)
    }

    // --- Integration ---

    pub fn run_check(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Integration) {
            return WizardAction::None;
        }
        self.integration.run_check()
    }

    pub fn integration_checked(&mut self, generation: u64, passed: bool) -> bool {
        self.integration.integration_checked(generation, passed)
    }

    pub fn send_instructions(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Integration) {
            return WizardAction::None;
        }
        self.integration.send_instructions(&mut self.toasts)
    }

    pub fn submit_feedback(&mut self) {
        self.integration.submit_feedback(&mut self.toasts);
    }

    pub fn chat_send(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Integration) {
            return WizardAction::None;
        }
        self.integration.chat_send()
    }

    pub fn chat_replied(&mut self, result: Result<CompletionReply, ProviderError>) {
        self.integration.chat_replied(result, &mut self.toasts);
    }

    pub fn finish(&mut self) -> WizardAction {
        if !self.on_step(WizardStep::Integration) {
            return WizardAction::None;
        }
        let action = self.integration.finish();
        self.route(action)
    }

    /// Step-level "Back"
    pub fn back(&mut self) -> WizardAction {
        let action = match self.step() {
            WizardStep::Registration => WizardAction::None,
            WizardStep::Organization => self.organization.back(),
            WizardStep::Integration => self.integration.back(),
        };
        self.route(action)
    }
}
