use thiserror::Error;

/// Errors that can occur within any channel adapter.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying transport could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A message could not be delivered to the room.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The current participant list could not be retrieved.
    #[error("Roster lookup failed: {0}")]
    RosterFailed(String),

    /// The channel-specific configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
