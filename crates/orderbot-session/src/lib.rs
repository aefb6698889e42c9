//! `orderbot-session` — the shared order-session state.
//!
//! One [`OrderSession`] holds a room's in-progress orders and notes for the
//! current batch. The struct performs no locking of its own: the controller
//! and the reminder task serialise access through a single shared mutex, so
//! every method here assumes single-writer-at-a-time.

pub mod error;
pub mod session;

pub use error::{Result, SessionError};
pub use session::OrderSession;

/// Order line recorded when a participant explicitly passes.
pub const PASS_ORDER_TEXT: &str = "Not ordering";
