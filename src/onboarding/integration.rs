//! Integration step: test chat, embed instructions, and the integration check.

use std::time::Duration;

use rand::Rng;

use super::chat::ChatSession;
use super::notice::Toasts;
use super::timer::Generation;
use super::types::{IntegrationMode, IntegrationView, TestResult, WizardAction};
use crate::provider::{CompletionReply, ProviderError};

/// Decides whether the chatbot is reachable on the customer's site.
pub trait IntegrationProbe: Send + Sync {
    fn passes(&self) -> bool;
}

/// Demo stand-in: a fair coin. Swap in a real reachability check for production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomProbe;

impl IntegrationProbe for RandomProbe {
    fn passes(&self) -> bool {
        rand::rng().random_bool(0.5)
    }
}

/// Free-text "report an issue" dialog. Acknowledged, never stored.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDialog {
    pub open: bool,
    pub text: String,
}

impl FeedbackDialog {
    pub fn show(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.text.clear();
    }

    pub fn submit(&mut self, toasts: &mut Toasts) {
        if !self.open {
            return;
        }
        tracing::info!("[feedback] submitted ({} chars)", self.text.chars().count());
        toasts.success("Feedback submitted", Some("Thank you for your feedback!"));
        self.close();
    }
}

#[derive(Debug, Clone)]
pub struct IntegrationFlow {
    pub mode: IntegrationMode,
    pub view: IntegrationView,
    pub test_result: TestResult,
    pub developer_email: String,
    pub feedback: FeedbackDialog,
    chat: Option<ChatSession>,
    check: Generation,
    check_delay: Duration,
    script_url: String,
    chat_model: String,
    chat_max_tokens: u32,
}

impl IntegrationFlow {
    pub fn new(
        check_delay: Duration,
        script_url: impl Into<String>,
        chat_model: impl Into<String>,
        chat_max_tokens: u32,
    ) -> Self {
        Self {
            mode: IntegrationMode::Options,
            view: IntegrationView::Main,
            test_result: TestResult::None,
            developer_email: String::new(),
            feedback: FeedbackDialog::default(),
            chat: None,
            check: Generation::default(),
            check_delay,
            script_url: script_url.into(),
            chat_model: chat_model.into(),
            chat_max_tokens,
        }
    }

    /// Options view with no result, chat or dialog. A check still in flight
    /// is retired.
    pub fn reset(&mut self) {
        self.check.cancel();
        self.mode = IntegrationMode::Options;
        self.view = IntegrationView::Main;
        self.test_result = TestResult::None;
        self.developer_email.clear();
        self.feedback.close();
        self.chat = None;
    }

    /// Snippet the customer pastes into their site's `<head>`
    pub fn embed_snippet(&self) -> String {
        format!("<script src=\"{}\"></script>", self.script_url)
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatSession> {
        self.chat.as_mut()
    }

    /// Open the test page with a fresh chat
    pub fn open_test_chat(&mut self) {
        if self.view != IntegrationView::Main {
            return;
        }
        self.chat = Some(ChatSession::new(
            self.chat_model.clone(),
            self.chat_max_tokens,
        ));
        self.feedback.close();
        self.view = IntegrationView::TestChat;
    }

    /// Leave the test page. Any reply still in flight is dropped on arrival.
    pub fn close_test_chat(&mut self) {
        if self.view == IntegrationView::TestChat {
            self.chat = None;
            self.feedback.close();
            self.view = IntegrationView::Main;
        }
    }

    pub fn enter_integrate(&mut self) {
        if self.view == IntegrationView::Main {
            self.mode = IntegrationMode::Integrate;
        }
    }

    pub fn back_to_options(&mut self) {
        self.mode = IntegrationMode::Options;
    }

    /// Mail the embed instructions to a developer. A blank address is
    /// rejected before anything leaves the flow.
    pub fn send_instructions(&mut self, toasts: &mut Toasts) -> WizardAction {
        let email = self.developer_email.trim().to_string();
        if email.is_empty() {
            toasts.error("Error", "Please enter a valid email address.");
            return WizardAction::None;
        }
        toasts.success(
            "Instructions Sent",
            Some("Integration instructions have been sent to the developer."),
        );
        self.developer_email.clear();
        WizardAction::SendInstructions { email }
    }

    /// Start the simulated integration check. Ignored while one is running.
    pub fn run_check(&mut self) -> WizardAction {
        if self.view != IntegrationView::Main || self.check.pending().is_some() {
            return WizardAction::None;
        }
        self.test_result = TestResult::None;
        let generation = self.check.schedule();
        tracing::debug!("[integration] check #{} scheduled", generation);
        WizardAction::ScheduleIntegrationCheck {
            generation,
            delay: self.check_delay,
        }
    }

    pub fn is_checking(&self) -> bool {
        self.check.pending().is_some()
    }

    /// The check for `generation` came back
    pub fn integration_checked(&mut self, generation: u64, passed: bool) -> bool {
        if !self.check.settle(generation) {
            return false;
        }
        if passed {
            tracing::info!("[integration] check passed");
            self.test_result = TestResult::Success;
            self.feedback.close();
            self.view = IntegrationView::Complete;
        } else {
            tracing::info!("[integration] check failed");
            self.test_result = TestResult::Failure;
        }
        true
    }

    /// Dismiss a failed result
    pub fn retry(&mut self) {
        if self.test_result == TestResult::Failure {
            self.test_result = TestResult::None;
        }
    }

    pub fn report_issue(&mut self) {
        if self.test_result == TestResult::Failure || self.view == IntegrationView::TestChat {
            self.feedback.show();
        }
    }

    pub fn submit_feedback(&mut self, toasts: &mut Toasts) {
        self.feedback.submit(toasts);
    }

    pub fn close_feedback(&mut self) {
        self.feedback.close();
    }

    /// Send the chat input box
    pub fn chat_send(&mut self) -> WizardAction {
        if self.view != IntegrationView::TestChat {
            return WizardAction::None;
        }
        match self.chat.as_mut().and_then(ChatSession::submit_input) {
            Some(request) => WizardAction::SendChat(request),
            None => WizardAction::None,
        }
    }

    pub fn chat_replied(
        &mut self,
        result: Result<CompletionReply, ProviderError>,
        toasts: &mut Toasts,
    ) {
        match self.chat.as_mut() {
            Some(chat) => chat.finish_send(result, toasts),
            None => tracing::debug!("[integration] chat closed; dropping reply"),
        }
    }

    /// Leave the terminal success view
    pub fn finish(&self) -> WizardAction {
        match self.view {
            IntegrationView::Complete => WizardAction::Complete,
            IntegrationView::Main | IntegrationView::TestChat => WizardAction::None,
        }
    }

    /// Back to organization setup, only from the options list
    pub fn back(&self) -> WizardAction {
        if self.view == IntegrationView::Main && self.mode == IntegrationMode::Options {
            WizardAction::Retreat
        } else {
            WizardAction::None
        }
    }
}
