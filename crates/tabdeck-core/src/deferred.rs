//! Generation tickets for delayed results.
//!
//! Async work (a weather request, the fake latency before a fact or a chat
//! reply) is fire-and-forget: nothing cancels the task. Instead, the owner of
//! the view state keeps a [`Generation`] and hands a [`Ticket`] to each task.
//! When the result comes back the owner checks the ticket; a stale one is
//! dropped without touching the view.

/// Opaque stamp handed to a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its ticket. Every ticket issued
    /// before this call becomes stale.
    pub fn issue(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    /// Ticket for the current generation, without superseding anything.
    pub fn current(&self) -> Ticket {
        Ticket(self.current)
    }

    /// Make every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}
