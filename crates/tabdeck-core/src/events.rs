//! DeskEvent enum — results of deferred work, sent back to the UI loop.

use crate::chat::PendingReply;
use crate::deferred::Ticket;
use crate::types::Fact;
use crate::weather::{LookupError, WeatherReport};

/// Completions delivered from spawned tasks to whoever owns the view state.
#[derive(Debug, Clone)]
pub enum DeskEvent {
    /// A weather lookup finished (either way)
    Weather {
        ticket: Ticket,
        outcome: Result<WeatherReport, LookupError>,
    },

    /// The fact delay elapsed
    Fact { ticket: Ticket, fact: Fact },

    /// The assistant's reply for a placeholder is ready
    ChatReply { pending: PendingReply, text: String },
}
