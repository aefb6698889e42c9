//! Console channel adapter — a local stand-in for a real chat transport.
//!
//! Inbound lines are read as `sender: message text` from stdin; outbound
//! messages are printed to stdout. The roster is static, taken from config
//! (a real adapter would query the room's member list instead).

use async_trait::async_trait;
use tracing::info;

use orderbot_channels::{Channel, ChannelError, ChannelStatus, OutboundMessage};
use orderbot_core::{InboundMessage, Participant};

pub struct ConsoleChannel {
    roster: Vec<Participant>,
    status: ChannelStatus,
}

impl ConsoleChannel {
    /// `roster` should include the bot's own nick when it sits in the room;
    /// the core excludes it from roster-derived checks itself.
    pub fn new(roster: Vec<String>) -> Self {
        Self {
            roster: roster.into_iter().map(Participant::from).collect(),
            status: ChannelStatus::Disconnected,
        }
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn connect(&mut self) -> Result<(), ChannelError> {
        info!(roster = self.roster.len(), "console channel ready");
        self.status = ChannelStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), ChannelError> {
        self.status = ChannelStatus::Disconnected;
        Ok(())
    }

    async fn send(&self, msg: &OutboundMessage) -> Result<(), ChannelError> {
        println!("{}", msg.content);
        Ok(())
    }

    async fn roster(&self) -> Result<Vec<Participant>, ChannelError> {
        Ok(self.roster.clone())
    }

    fn status(&self) -> ChannelStatus {
        self.status.clone()
    }
}

/// Parse a `sender: message` console line into an [`InboundMessage`].
///
/// Returns `None` for blank lines or lines without the `sender:` prefix.
pub fn parse_line(line: &str) -> Option<InboundMessage> {
    let line = line.trim();
    let (sender, body) = line.split_once(':')?;
    let sender = sender.trim();
    let body = body.trim();
    if sender.is_empty() || body.is_empty() {
        return None;
    }
    Some(InboundMessage::new(sender, body))
}

/// Return the message body if it is addressed to the bot, with the address
/// prefix (`@nick` or `nick:`) stripped; `None` otherwise.
///
/// Only addressed messages are classified; everything else in the room is
/// ignored.
pub fn addressed_to_bot<'a>(content: &'a str, nick: &str) -> Option<&'a str> {
    let content = content.trim();
    for prefix in [format!("@{nick}"), format!("{nick}:")] {
        if let Some(rest) = content.strip_prefix(&prefix) {
            return Some(rest.trim());
        }
    }
    None
}
