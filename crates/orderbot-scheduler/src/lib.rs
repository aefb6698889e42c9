//! `orderbot-scheduler` — the cancellable periodic reminder task.
//!
//! [`NagScheduler`] owns at most one live Tokio task. The tick body is
//! supplied by the caller so this crate stays transport-agnostic: the
//! controller passes a closure that locks the shared session state, decides
//! reminder-vs-close, and reports back whether the loop should keep running.

pub mod scheduler;

pub use scheduler::{NagScheduler, TickOutcome};
