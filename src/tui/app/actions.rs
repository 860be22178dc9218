//! Carrying out what the wizard asks for: timers, the chat call, and the
//! instructions hand-off.

use super::events::TuiEvent;
use super::state::{App, TimerKey};
use crate::onboarding::{WizardAction, WizardStep};
use crate::provider::{CompletionReply, CompletionRequest, ProviderError};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Delivers exactly one `ChatReplied` for a request. If the task is aborted
/// or the provider panics, `Drop` reports `Cancelled` so the chat never
/// stays pending.
struct ReplyGuard {
    sender: mpsc::UnboundedSender<TuiEvent>,
    request_id: u64,
    delivered: bool,
}

impl ReplyGuard {
    fn new(sender: mpsc::UnboundedSender<TuiEvent>, request_id: u64) -> Self {
        Self {
            sender,
            request_id,
            delivered: false,
        }
    }

    fn deliver(mut self, result: Result<CompletionReply, ProviderError>) {
        self.delivered = true;
        let _ = self.sender.send(TuiEvent::ChatReplied {
            request_id: self.request_id,
            result,
        });
    }
}

impl Drop for ReplyGuard {
    fn drop(&mut self) {
        if !self.delivered {
            let _ = self.sender.send(TuiEvent::ChatReplied {
                request_id: self.request_id,
                result: Err(ProviderError::Cancelled),
            });
        }
    }
}

impl App {
    /// Act on a wizard action
    pub(crate) fn perform(&mut self, action: WizardAction) {
        match action {
            WizardAction::None | WizardAction::Advance | WizardAction::Retreat => {}
            WizardAction::ScheduleAlternateLogin { delay } => {
                let sender = self.event_sender();
                self.timers
                    .schedule(TimerKey::AlternateLogin, delay, move || {
                        let _ = sender.send(TuiEvent::AlternateLoginFinished);
                    });
            }
            WizardAction::ScheduleDescriptionFetch { generation, delay } => {
                let sender = self.event_sender();
                self.timers
                    .schedule(TimerKey::DescriptionFetch, delay, move || {
                        let _ = sender.send(TuiEvent::DescriptionFetched { generation });
                    });
            }
            WizardAction::CancelDescriptionFetch => {
                self.timers.cancel(TimerKey::DescriptionFetch);
            }
            WizardAction::ScheduleIntegrationCheck { generation, delay } => {
                let sender = self.event_sender();
                let probe = Arc::clone(&self.probe);
                self.timers
                    .schedule(TimerKey::IntegrationCheck, delay, move || {
                        let passed = probe.passes();
                        let _ = sender.send(TuiEvent::IntegrationChecked { generation, passed });
                    });
            }
            WizardAction::SendChat(request) => self.spawn_chat(request),
            WizardAction::LeftStep(step) => match step {
                WizardStep::Registration => {
                    self.timers.cancel(TimerKey::AlternateLogin);
                }
                WizardStep::Organization => {
                    self.timers.cancel(TimerKey::DescriptionFetch);
                }
                WizardStep::Integration => {
                    self.timers.cancel(TimerKey::IntegrationCheck);
                    self.abandon_chat();
                }
            },
            WizardAction::SendInstructions { email } => {
                // Mail delivery is out of scope; the request is only recorded
                tracing::info!("Integration instructions requested for {}", email);
            }
            WizardAction::Complete => {
                self.timers.cancel_all();
                self.should_quit = true;
            }
        }
    }

    fn spawn_chat(&mut self, request: CompletionRequest) {
        self.chat_request += 1;
        let guard = ReplyGuard::new(self.event_sender(), self.chat_request);
        let provider = Arc::clone(&self.provider);
        tracing::debug!(
            "Sending chat request {} ({} messages) via {}",
            self.chat_request,
            request.messages.len(),
            provider.name()
        );
        self.chat_task = Some(tokio::spawn(async move {
            let result = provider.complete(request).await;
            guard.deliver(result);
        }));
    }

    /// Leave the test chat, abandoning any reply still on its way
    pub(crate) fn close_test_chat(&mut self) {
        self.abandon_chat();
        self.wizard.integration.close_test_chat();
    }

    fn abandon_chat(&mut self) {
        self.chat_request += 1;
        if let Some(task) = self.chat_task.take() {
            task.abort();
        }
    }
}
