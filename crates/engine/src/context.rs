//! Per-request context threaded through use cases and repository ports.

use std::time::Duration;

use placebook_domain::User;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Ambient data of one inbound request: the authenticated principal, an
/// optional deadline and a cancellation signal.
///
/// Cloning is cheap; clones share the cancellation token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    user: Option<User>,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RequestContext {
    /// A context with no principal, no deadline and a fresh token.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the deadline `timeout` from now. An earlier deadline already set
    /// is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when no deadline is set,
    /// `Some(ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
