use thiserror::Error;

/// Errors raised by [`OrderSession`](crate::session::OrderSession) operations.
///
/// All variants are recovered at the command boundary as a single
/// user-visible error reply; session state is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// `new` was issued without a destination link.
    #[error("Improper format: 'new [link]'")]
    MissingLink,

    /// `order` was issued without any order text.
    #[error("Improper format: 'order [item]' (rageguy)")]
    EmptyOrder,

    /// `note` was issued without any note text.
    #[error("Improper format: 'note [item]' (rageguy)")]
    EmptyNote,
}

pub type Result<T> = std::result::Result<T, SessionError>;
