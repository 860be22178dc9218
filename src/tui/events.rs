//! TUI Events
//!
//! Everything that can wake the event loop: terminal input, the animation
//! tick, and results coming back from timers and the chat provider.

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::provider::{CompletionReply, ProviderError};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
    Quit,
    /// Debounced description fetch fired
    DescriptionFetched { generation: u64 },
    /// Alternate login stand-in returned
    AlternateLoginFinished,
    /// Simulated integration check reported
    IntegrationChecked { generation: u64, passed: bool },
    /// Completion for chat request `request_id`
    ChatReplied {
        request_id: u64,
        result: Result<CompletionReply, ProviderError>,
    },
}

/// Owns the receiving end of the event channel
pub struct EventHandler {
    sender: mpsc::UnboundedSender<TuiEvent>,
    receiver: mpsc::UnboundedReceiver<TuiEvent>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.sender.clone()
    }

    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<TuiEvent> {
        self.receiver.try_recv().ok()
    }

    /// Forward crossterm events and a periodic tick into the channel.
    /// Both tasks stop once the receiver is gone.
    pub fn start_terminal_listener(sender: mpsc::UnboundedSender<TuiEvent>) {
        let input_sender = sender.clone();
        tokio::spawn(async move {
            let mut stream = crossterm::event::EventStream::new();
            while let Some(event) = stream.next().await {
                let event = match event {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => TuiEvent::Key(key),
                    Ok(Event::Paste(text)) => TuiEvent::Paste(text),
                    Ok(Event::Resize(_, _)) => TuiEvent::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("Terminal event stream failed: {}", e);
                        let _ = input_sender.send(TuiEvent::Quit);
                        break;
                    }
                };
                if input_sender.send(event).is_err() {
                    break;
                }
            }
        });

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                if sender.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}
