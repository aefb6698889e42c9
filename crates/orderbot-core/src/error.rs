use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command was recognised but its arguments are missing or empty.
    /// `usage` is the full user-visible hint (e.g. "Improper format:
    /// 'new [link]'"); rendered as a single error reply, session state
    /// left unchanged.
    #[error("{usage}")]
    MalformedCommand { usage: String },

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, OrderbotError>;
