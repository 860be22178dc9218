//! Keyboard input
//!
//! Maps keys to wizard intents. Each screen exposes an ordered list of
//! focusable fields; Tab cycles through them, Enter activates buttons, and
//! printable keys edit the focused text field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::App;
use crate::onboarding::{
    DETECTED_PAGES, IntegrationMode, IntegrationView, OnboardingWizard, RegistrationPhase,
    TestResult, WizardAction, WizardStep,
};

/// Everything that can hold focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
    CreateAccount,
    GoogleLogin,
    Code,
    Verify,
    BackToRegistration,
    CompanyName,
    CompanyUrl,
    CompanyDescription,
    Pages,
    FinishTraining,
    ContinueSetup,
    Back,
    OpenTestChat,
    Integrate,
    RunCheck,
    Retry,
    ReportIssue,
    DeveloperEmail,
    SendInstructions,
    BackToOptions,
    ToggleChat,
    ChatInput,
    ChatSend,
    CloseChat,
    FeedbackText,
    SubmitFeedback,
    CancelFeedback,
    ExploreAdmin,
    StartTalking,
}

impl Field {
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Field::Name
                | Field::Email
                | Field::Password
                | Field::Code
                | Field::CompanyName
                | Field::CompanyUrl
                | Field::CompanyDescription
                | Field::DeveloperEmail
                | Field::ChatInput
                | Field::FeedbackText
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::CreateAccount => "Create Account",
            Field::GoogleLogin => "Continue with Google",
            Field::Code => "Verification Code",
            Field::Verify => "Verify Email",
            Field::BackToRegistration => "Back to Registration",
            Field::CompanyName => "Company Name",
            Field::CompanyUrl => "Website URL",
            Field::CompanyDescription => "Description",
            Field::Pages => "Detected Pages",
            Field::FinishTraining => "Finish Training",
            Field::ContinueSetup => "Continue",
            Field::Back => "Back",
            Field::OpenTestChat => "Test Chatbot",
            Field::Integrate => "Integrate on Website",
            Field::RunCheck => "Test Integration",
            Field::Retry => "Try Again",
            Field::ReportIssue => "Report an Issue",
            Field::DeveloperEmail => "Developer Email",
            Field::SendInstructions => "Send Instructions",
            Field::BackToOptions => "Back to Options",
            Field::ToggleChat => "Chat",
            Field::ChatInput => "Message",
            Field::ChatSend => "Send",
            Field::CloseChat => "Back to Integration",
            Field::FeedbackText => "Feedback",
            Field::SubmitFeedback => "Submit Feedback",
            Field::CancelFeedback => "Cancel",
            Field::ExploreAdmin => "Explore Admin Panel",
            Field::StartTalking => "Start Talking to Your Chatbot",
        }
    }
}

/// Focusable fields on the screen currently showing, in Tab order
pub fn fields_for(wizard: &OnboardingWizard) -> Vec<Field> {
    match wizard.step() {
        WizardStep::Registration => match wizard.registration.phase {
            RegistrationPhase::Collecting => vec![
                Field::Name,
                Field::Email,
                Field::Password,
                Field::CreateAccount,
                Field::GoogleLogin,
            ],
            RegistrationPhase::Verifying => {
                vec![Field::Code, Field::Verify, Field::BackToRegistration]
            }
        },
        WizardStep::Organization => vec![
            Field::CompanyName,
            Field::CompanyUrl,
            Field::CompanyDescription,
            Field::Pages,
            Field::FinishTraining,
            Field::ContinueSetup,
            Field::Back,
        ],
        WizardStep::Integration => integration_fields(wizard),
    }
}

fn integration_fields(wizard: &OnboardingWizard) -> Vec<Field> {
    let integration = &wizard.integration;
    if integration.feedback.open {
        return vec![
            Field::FeedbackText,
            Field::SubmitFeedback,
            Field::CancelFeedback,
        ];
    }
    match integration.view {
        IntegrationView::Complete => vec![Field::ExploreAdmin, Field::StartTalking],
        IntegrationView::TestChat => {
            let mut fields = vec![Field::ToggleChat];
            if integration.chat().is_some_and(|c| c.open) {
                fields.extend([Field::ChatInput, Field::ChatSend]);
            }
            fields.extend([Field::ReportIssue, Field::CloseChat]);
            fields
        }
        IntegrationView::Main => {
            let mut fields = match integration.mode {
                IntegrationMode::Options => {
                    vec![Field::OpenTestChat, Field::Integrate, Field::RunCheck]
                }
                IntegrationMode::Integrate => vec![
                    Field::DeveloperEmail,
                    Field::SendInstructions,
                    Field::BackToOptions,
                ],
            };
            if integration.test_result == TestResult::Failure {
                fields.extend([Field::Retry, Field::ReportIssue]);
            }
            if integration.mode == IntegrationMode::Options {
                fields.push(Field::Back);
            }
            fields
        }
    }
}

/// Text buffer behind a plain text field. The URL is excluded: edits to it
/// go through the organization flow so the fetch gets rescheduled.
fn text_mut(wizard: &mut OnboardingWizard, field: Field) -> Option<&mut String> {
    match field {
        Field::Name => Some(&mut wizard.registration.name),
        Field::Email => Some(&mut wizard.registration.email),
        Field::Password => Some(&mut wizard.registration.password),
        Field::Code => Some(&mut wizard.registration.verification_code),
        Field::CompanyName => Some(&mut wizard.organization.company_name),
        Field::CompanyDescription => Some(&mut wizard.organization.company_description),
        Field::DeveloperEmail => Some(&mut wizard.integration.developer_email),
        Field::ChatInput => wizard.integration.chat_mut().map(|c| &mut c.input),
        Field::FeedbackText => Some(&mut wizard.integration.feedback.text),
        _ => None,
    }
}

impl App {
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => self.cycle_focus(1),
            KeyCode::BackTab => self.cycle_focus(-1),
            KeyCode::Esc => self.go_back(),
            KeyCode::Up if self.focused == Field::Pages => self.move_page_selection(-1),
            KeyCode::Down if self.focused == Field::Pages => self.move_page_selection(1),
            KeyCode::Up => self.cycle_focus(-1),
            KeyCode::Down => self.cycle_focus(1),
            KeyCode::Enter => self.activate(),
            KeyCode::Backspace => self.edit_text(|s| {
                s.pop();
            }),
            KeyCode::Char(c) if self.focused.is_text() => self.edit_text(|s| s.push(c)),
            _ => {}
        }
        self.refocus();
    }

    pub(crate) fn handle_paste(&mut self, text: &str) {
        if self.focused.is_text() {
            let text = text.replace(['\r', '\n'], " ");
            self.edit_text(|s| s.push_str(&text));
        }
    }

    fn cycle_focus(&mut self, delta: isize) {
        let fields = fields_for(&self.wizard);
        if fields.is_empty() {
            return;
        }
        let len = fields.len() as isize;
        let current = fields
            .iter()
            .position(|f| *f == self.focused)
            .unwrap_or(0) as isize;
        self.focused = fields[(current + delta).rem_euclid(len) as usize];
    }

    /// Keep focus on a field that exists on the current screen
    pub(crate) fn refocus(&mut self) {
        let fields = fields_for(&self.wizard);
        if !fields.contains(&self.focused)
            && let Some(first) = fields.first()
        {
            self.focused = *first;
        }
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        if self.focused == Field::CompanyUrl {
            let mut url = self.wizard.organization.company_url().to_string();
            edit(&mut url);
            let action = self.wizard.set_company_url(url);
            self.perform(action);
            return;
        }
        if let Some(text) = text_mut(&mut self.wizard, self.focused) {
            edit(text);
        }
    }

    fn move_page_selection(&mut self, delta: isize) {
        let len = DETECTED_PAGES.len() as isize;
        let next = match self.wizard.organization.selected_index() {
            Some(i) => (i as isize + delta).clamp(0, len - 1),
            None => 0,
        };
        self.wizard.select_page(next as usize);
    }

    /// Esc: step out of whatever sub-view is showing, else go back a step
    fn go_back(&mut self) {
        match self.wizard.step() {
            WizardStep::Registration => self.wizard.back_to_registration(),
            WizardStep::Organization => {
                let action = self.wizard.back();
                self.perform(action);
            }
            WizardStep::Integration => {
                let integration = &self.wizard.integration;
                if integration.feedback.open {
                    self.wizard.integration.close_feedback();
                } else if integration.view == IntegrationView::TestChat {
                    self.close_test_chat();
                } else if integration.mode == IntegrationMode::Integrate {
                    self.wizard.integration.back_to_options();
                } else {
                    let action = self.wizard.back();
                    self.perform(action);
                }
            }
        }
    }

    fn activate(&mut self) {
        let action = match self.focused {
            // Enter in a plain field moves on
            Field::Name
            | Field::Email
            | Field::Password
            | Field::CompanyName
            | Field::CompanyUrl
            | Field::CompanyDescription => {
                self.cycle_focus(1);
                WizardAction::None
            }
            Field::CreateAccount | Field::Code | Field::Verify => self.wizard.submit_registration(),
            Field::GoogleLogin => self.wizard.alternate_login(),
            Field::BackToRegistration => {
                self.wizard.back_to_registration();
                WizardAction::None
            }
            Field::Pages => {
                if self.wizard.organization.selected_index().is_none() {
                    self.wizard.select_page(0);
                }
                WizardAction::None
            }
            Field::FinishTraining => {
                self.wizard.finish_training();
                WizardAction::None
            }
            Field::ContinueSetup => self.wizard.continue_setup(),
            Field::Back => self.wizard.back(),
            Field::OpenTestChat => {
                self.wizard.integration.open_test_chat();
                WizardAction::None
            }
            Field::Integrate => {
                self.wizard.integration.enter_integrate();
                WizardAction::None
            }
            Field::RunCheck => self.wizard.run_check(),
            Field::Retry => {
                self.wizard.integration.retry();
                WizardAction::None
            }
            Field::ReportIssue => {
                self.wizard.integration.report_issue();
                WizardAction::None
            }
            Field::DeveloperEmail | Field::SendInstructions => self.wizard.send_instructions(),
            Field::BackToOptions => {
                self.wizard.integration.back_to_options();
                WizardAction::None
            }
            Field::ToggleChat => {
                if let Some(chat) = self.wizard.integration.chat_mut() {
                    chat.open = !chat.open;
                }
                WizardAction::None
            }
            Field::ChatInput | Field::ChatSend => self.wizard.chat_send(),
            Field::CloseChat => {
                self.close_test_chat();
                WizardAction::None
            }
            Field::FeedbackText | Field::SubmitFeedback => {
                self.wizard.submit_feedback();
                WizardAction::None
            }
            Field::CancelFeedback => {
                self.wizard.integration.close_feedback();
                WizardAction::None
            }
            Field::ExploreAdmin | Field::StartTalking => self.wizard.finish(),
        };
        self.perform(action);
    }
}
