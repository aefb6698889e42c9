use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque handle for a group member (e.g. a chat username).
///
/// Equality is exact-match and case-sensitive; any normalisation (trimming,
/// stripping platform decorations) happens once at the transport boundary
/// before a `Participant` is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Participant(pub String);

impl Participant {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Participant {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Participant {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A message received from the transport, already addressed to the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// When the transport received the message.
    pub timestamp: DateTime<Utc>,

    /// Who sent it.
    pub sender: Participant,

    /// Message body with any bot-address prefix already stripped.
    pub content: String,

    /// Full raw payload from the platform for cases that need extra fields.
    pub raw_payload: Option<serde_json::Value>,
}

impl InboundMessage {
    pub fn new(sender: impl Into<Participant>, content: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            sender: sender.into(),
            content: content.into(),
            raw_payload: None,
        }
    }
}
