//! Lead-capture dialogue: conversation state and phone extraction.
//!
//! The flow is a small per-chat state machine: `Idle -> AwaitingPhone ->
//! done` (exiting the dialogue). State lives in teloxide's in-memory
//! dialogue storage, keyed by chat id, so one user's pending prompt never
//! affects another's. The storage is process-local: in a multi-instance
//! deployment pending prompts would not survive a failover.

use chrono::{DateTime, Duration, Utc};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// A phone prompt older than this is considered abandoned; the next message
/// from the chat is handled as a normal menu message instead.
pub const LEAD_PROMPT_TTL_MINUTES: i64 = 30;

/// Conversation state for the call-request flow.
#[derive(Clone, Debug, Default)]
pub enum LeadState {
    #[default]
    Idle,
    /// The user pressed "request a call" and we are waiting for their next
    /// message to carry a phone number (shared contact or free text).
    AwaitingPhone {
        requested_at: DateTime<Utc>,
        /// Product name when the request came from an "order" button.
        product: Option<String>,
    },
}

/// Type alias for the lead dialogue handle injected into handlers.
pub type LeadDialogue = Dialogue<LeadState, InMemStorage<LeadState>>;

/// Derive a phone string from the user's reply: the structured contact field
/// wins, otherwise non-empty message text is accepted as-is. No format
/// validation or normalization is applied.
pub fn phone_from_parts(contact_phone: Option<&str>, text: Option<&str>) -> Option<String> {
    if let Some(phone) = contact_phone {
        let trimmed = phone.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if let Some(text) = text {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    None
}

/// Whether a phone prompt issued at `requested_at` has expired by `now`.
pub fn prompt_expired(requested_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - requested_at > Duration::minutes(LEAD_PROMPT_TTL_MINUTES)
}
