use std::time::Duration;

use crate::provider::CompletionRequest;

/// Top-level wizard stage, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Registration,
    Organization,
    Integration,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::Registration,
        WizardStep::Organization,
        WizardStep::Integration,
    ];

    /// Zero-based position
    pub fn index(&self) -> usize {
        match self {
            Self::Registration => 0,
            Self::Organization => 1,
            Self::Integration => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Registration => "User Registration",
            Self::Organization => "Setup Organization",
            Self::Integration => "Chatbot Integration",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Registration => "Join us to set up your AI chatbot",
            Self::Organization => "Tell us about your company",
            Self::Integration => "Chatbot Integration & Testing",
        }
    }
}

/// Sub-state of the registration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPhase {
    Collecting,
    Verifying,
}

/// Scrape status of a detected page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Scraped,
    Pending,
    Detected,
}

impl PageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scraped => "scraped",
            Self::Pending => "pending",
            Self::Detected => "detected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedPage {
    pub url: &'static str,
    pub status: PageStatus,
    pub chunks: &'static [&'static str],
}

/// Pages "found" on the company website. Static; nothing adds or removes pages.
pub const DETECTED_PAGES: &[DetectedPage] = &[
    DetectedPage {
        url: "/home",
        status: PageStatus::Scraped,
        chunks: &["Welcome to our company", "We provide innovative solutions"],
    },
    DetectedPage {
        url: "/about",
        status: PageStatus::Scraped,
        chunks: &["Our mission is to transform businesses", "Founded in 2020"],
    },
    DetectedPage {
        url: "/products",
        status: PageStatus::Pending,
        chunks: &[],
    },
    DetectedPage {
        url: "/contact",
        status: PageStatus::Detected,
        chunks: &[],
    },
];

/// Canned text written into the description by the auto-fetch
pub const FETCHED_DESCRIPTION: &str =
    "This is an auto-fetched meta description for the company website.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    InProgress,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMode {
    Options,
    Integrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    None,
    Success,
    Failure,
}

/// What the integration step is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationView {
    Main,
    TestChat,
    /// Terminal "integration complete" view
    Complete,
}

/// What the host should do after the wizard handles an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Nothing special
    None,
    /// Flow asks the coordinator to move forward (consumed by the wizard)
    Advance,
    /// Flow asks the coordinator to move back (consumed by the wizard)
    Retreat,
    /// Simulated external login; call `alternate_login_finished` after `delay`
    ScheduleAlternateLogin { delay: Duration },
    /// Debounced description fetch; supersedes any earlier one
    ScheduleDescriptionFetch { generation: u64, delay: Duration },
    /// URL changed without a new fetch; drop the pending timer
    CancelDescriptionFetch,
    /// Simulated integration probe; report with `integration_checked`
    ScheduleIntegrationCheck { generation: u64, delay: Duration },
    /// Send the request to the completion provider, report with `chat_replied`
    SendChat(CompletionRequest),
    /// Hand the embed instructions to whoever mails developers
    SendInstructions { email: String },
    /// The wizard moved off this step; its timers are void
    LeftStep(WizardStep),
    /// Wizard finished
    Complete,
}
