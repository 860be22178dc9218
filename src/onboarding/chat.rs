//! Test chat: an append-only message log exchanged with the completion
//! provider, one request in flight at a time.

use super::notice::Toasts;
use crate::provider::{
    ChatMessage, CompletionProvider, CompletionReply, CompletionRequest, ProviderError,
};

/// Shown when the endpoint answers without any content
pub const FALLBACK_REPLY: &str = "I'm not sure.";

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
    model: String,
    max_tokens: u32,
    /// Text being typed in the chat box
    pub input: String,
    /// Chat bubble expanded (the test page starts with it collapsed)
    pub open: bool,
}

/// Holds the pending flag for the duration of one call and releases it on
/// drop, whichever way the call ends.
struct PendingGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a mut bool) -> Option<Self> {
        if *flag {
            return None;
        }
        *flag = true;
        Some(Self { flag })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

impl ChatSession {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            messages: Vec::new(),
            pending: false,
            model: model.into(),
            max_tokens,
            input: String::new(),
            open: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Append the user's message and build the outbound request.
    ///
    /// Returns `None` without touching state when the text is blank or a
    /// request is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<CompletionRequest> {
        if text.trim().is_empty() {
            return None;
        }
        if self.pending {
            tracing::debug!("[chat] send ignored: reply pending");
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        self.pending = true;
        Some(self.request())
    }

    /// Send whatever is in the input box
    pub fn submit_input(&mut self) -> Option<CompletionRequest> {
        let text = self.input.clone();
        let request = self.begin_send(&text)?;
        self.input.clear();
        Some(request)
    }

    /// Record the outcome of the in-flight request. Clears pending on every path.
    pub fn finish_send(
        &mut self,
        result: Result<CompletionReply, ProviderError>,
        toasts: &mut Toasts,
    ) {
        if !self.pending {
            tracing::warn!("[chat] reply arrived with nothing pending; ignoring");
            return;
        }
        self.pending = false;
        Self::append_reply(&mut self.messages, result, toasts);
    }

    /// One full round trip against `provider`.
    ///
    /// The pending flag is released even if this future is dropped before
    /// the provider answers.
    pub async fn send_message(
        &mut self,
        provider: &dyn CompletionProvider,
        text: &str,
        toasts: &mut Toasts,
    ) {
        if text.trim().is_empty() {
            return;
        }
        let Some(_guard) = PendingGuard::acquire(&mut self.pending) else {
            tracing::debug!("[chat] send ignored: reply pending");
            return;
        };
        self.messages.push(ChatMessage::user(text));
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            max_tokens: self.max_tokens,
        };
        let result = provider.complete(request).await;
        Self::append_reply(&mut self.messages, result, toasts);
    }

    fn request(&self) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            max_tokens: self.max_tokens,
        }
    }

    fn append_reply(
        messages: &mut Vec<ChatMessage>,
        result: Result<CompletionReply, ProviderError>,
        toasts: &mut Toasts,
    ) {
        match result {
            Ok(reply) => {
                let text = reply.unwrap_or_else(|| FALLBACK_REPLY.to_string());
                messages.push(ChatMessage::assistant(text));
            }
            Err(e) => {
                tracing::warn!("[chat] completion failed: {}", e);
                toasts.error("Error", "Failed to get a response. Please try again.");
            }
        }
    }
}
