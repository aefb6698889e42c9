use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What the tick body wants the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking — there are still laggards to remind.
    Continue,

    /// End the loop — everyone has responded (auto-close) or the tick hit
    /// an unrecoverable condition such as a failed roster lookup.
    Stop,
}

/// Owns the single periodic reminder task for a session.
///
/// State machine: IDLE (no task, or the task has run to completion) and
/// ACTIVE (a live task). `start` always stops any prior task first, so two
/// reminder loops can never run concurrently; `stop` is idempotent.
pub struct NagScheduler {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl NagScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    /// True while a tick loop is live.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Begin the periodic task, cancelling any prior one first.
    ///
    /// The first tick runs immediately, then once per interval. `tick`
    /// is called once per firing; returning [`TickOutcome::Stop`] ends the
    /// loop from inside (the auto-close path).
    pub fn start<F, Fut>(&mut self, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickOutcome> + Send + 'static,
    {
        self.stop();
        let period = self.interval;
        info!(interval_secs = period.as_secs(), "nag scheduler starting");
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if tick().await == TickOutcome::Stop {
                    info!("nag loop ending (tick requested stop)");
                    break;
                }
            }
        }));
    }

    /// Cancel the periodic task. No-op when already idle.
    ///
    /// Safe to call from any task, including from a command handler while a
    /// tick waits on the session lock. Once this returns, no further tick
    /// begins; a tick already past its await points may still complete.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("nag scheduler stopped");
        }
    }
}

impl Drop for NagScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
