//! Toast notifications
//!
//! Fire-and-forget `{title, description, severity}` notices raised by the
//! flows. The queue belongs to one wizard session and dies with it.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Upper bound on retained notices; older ones are dropped first.
const MAX_RETAINED: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: VecDeque<Notice>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, title: &str, description: Option<&str>) {
        tracing::debug!("[toast] {:?}: {}", severity, title);
        if self.queue.len() == MAX_RETAINED {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            title: title.to_string(),
            description: description.map(str::to_string),
            severity,
            created_at: Utc::now(),
        });
    }

    pub fn info(&mut self, title: &str, description: &str) {
        self.push(Severity::Info, title, Some(description));
    }

    pub fn success(&mut self, title: &str, description: Option<&str>) {
        self.push(Severity::Success, title, description);
    }

    pub fn error(&mut self, title: &str, description: &str) {
        self.push(Severity::Error, title, Some(description));
    }

    /// Drop notices older than `ttl`
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.queue.retain(|n| now - n.created_at < ttl);
    }

    /// Newest `limit` notices, newest last
    pub fn visible(&self, limit: usize) -> impl Iterator<Item = &Notice> {
        self.queue.iter().skip(self.queue.len().saturating_sub(limit))
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Count of retained notices with the given title
    pub fn count_titled(&self, title: &str) -> usize {
        self.queue.iter().filter(|n| n.title == title).count()
    }
}
