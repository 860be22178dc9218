//! TUI Application State
//!
//! The `App` is the single owner of the wizard. Every mutation happens in
//! `handle_event`; background tasks only ever send events back.

use super::events::{EventHandler, TuiEvent};
use super::input::{Field, fields_for};
use crate::config::Config;
use crate::onboarding::{IntegrationProbe, OnboardingWizard, TimerSlots};
use crate::provider::CompletionProvider;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One slot per kind of delayed task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    AlternateLogin,
    DescriptionFetch,
    IntegrationCheck,
}

pub struct App {
    pub wizard: OnboardingWizard,
    pub focused: Field,
    pub should_quit: bool,

    /// Animation state
    pub animation_frame: usize,

    pub(crate) toast_ttl: chrono::Duration,
    pub max_visible_toasts: usize,

    pub(crate) provider: Arc<dyn CompletionProvider>,
    pub(crate) probe: Arc<dyn IntegrationProbe>,
    pub(crate) timers: TimerSlots<TimerKey>,

    /// Id of the latest chat request; replies for older ids are dropped
    pub(crate) chat_request: u64,
    pub(crate) chat_task: Option<JoinHandle<()>>,

    event_handler: EventHandler,
}

impl App {
    pub fn new(
        config: &Config,
        provider: Arc<dyn CompletionProvider>,
        probe: Arc<dyn IntegrationProbe>,
    ) -> Self {
        let wizard = OnboardingWizard::new(config);
        let focused = fields_for(&wizard).first().copied().unwrap_or(Field::Name);
        Self {
            wizard,
            focused,
            should_quit: false,
            animation_frame: 0,
            toast_ttl: chrono::Duration::seconds(config.ui.toast_ttl_secs as i64),
            max_visible_toasts: config.ui.max_visible_toasts,
            provider,
            probe,
            timers: TimerSlots::new(),
            chat_request: 0,
            chat_task: None,
            event_handler: EventHandler::new(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Get event sender
    pub fn event_sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.event_handler.sender()
    }

    /// Receive next event (blocks until available)
    pub async fn next_event(&mut self) -> Option<TuiEvent> {
        self.event_handler.next().await
    }

    /// Try to receive next event without blocking (returns None if queue is empty)
    pub fn try_next_event(&mut self) -> Option<TuiEvent> {
        self.event_handler.try_next()
    }

    /// Handle an event
    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key_event) => {
                self.handle_key_event(key_event);
            }
            TuiEvent::Paste(text) => {
                self.handle_paste(&text);
            }
            TuiEvent::Resize => {}
            TuiEvent::Tick => {
                self.animation_frame = self.animation_frame.wrapping_add(1);
                self.wizard.toasts.expire(chrono::Utc::now(), self.toast_ttl);
            }
            TuiEvent::Quit => {
                self.should_quit = true;
            }
            TuiEvent::DescriptionFetched { generation } => {
                self.wizard.description_fetched(generation);
            }
            TuiEvent::AlternateLoginFinished => {
                let action = self.wizard.alternate_login_finished();
                self.perform(action);
            }
            TuiEvent::IntegrationChecked { generation, passed } => {
                self.wizard.integration_checked(generation, passed);
            }
            TuiEvent::ChatReplied { request_id, result } => {
                if request_id == self.chat_request {
                    self.chat_task = None;
                    self.wizard.chat_replied(result);
                } else {
                    tracing::debug!("Dropping reply for superseded chat request {}", request_id);
                }
            }
        }
        self.refocus();
    }
}
