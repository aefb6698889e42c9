//! `orderbot-core` — shared types, command classification and configuration.
//!
//! Everything here is transport- and runtime-agnostic: the classifier is a
//! pure function over tokenized message text, and `OrderbotConfig` is plain
//! data loaded through figment.

pub mod command;
pub mod config;
pub mod error;
pub mod types;

pub use command::{classify, tokenize, Verb};
pub use config::OrderbotConfig;
pub use error::{OrderbotError, Result};
pub use types::{InboundMessage, Participant};
