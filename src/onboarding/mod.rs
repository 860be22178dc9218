//! Onboarding Wizard
//!
//! Three-step onboarding for a chatbot product: user registration,
//! organization setup, and chatbot integration with a live test chat.
//! Nothing here touches the terminal; the TUI drives it through intents and
//! feeds timer and provider results back in.

mod chat;
mod coordinator;
mod integration;
mod notice;
mod organization;
mod registration;
pub mod timer;
mod types;
mod wizard;

#[cfg(test)]
mod tests;

// Re-export all public types
pub use types::{
    DETECTED_PAGES, DetectedPage, FETCHED_DESCRIPTION, IntegrationMode, IntegrationView,
    PageStatus, RegistrationPhase, TestResult, TrainingStatus, WizardAction, WizardStep,
};

pub use chat::{ChatSession, FALLBACK_REPLY};
pub use coordinator::StepCoordinator;
pub use integration::{FeedbackDialog, IntegrationFlow, IntegrationProbe, RandomProbe};
pub use notice::{Notice, Severity, Toasts};
pub use organization::OrganizationFlow;
pub use registration::RegistrationFlow;
pub use timer::{Generation, TimerSlots};
pub use wizard::OnboardingWizard;
