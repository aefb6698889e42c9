//! Session controller — the single entry point for inbound commands.
//!
//! Owns the session lock and the nag scheduler. Both execution contexts
//! that touch shared state — the command handler and the periodic reminder
//! task — go through the one `Mutex<SharedState>`, so no operation ever
//! observes a partially-updated session. The reminder tick (read roster,
//! decide reminder-vs-close, maybe emit summary and close) runs as one
//! critical section under that lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use orderbot_channels::{Channel, OutboundMessage};
use orderbot_core::{classify, tokenize, InboundMessage, OrderbotError, Participant, Verb};
use orderbot_scheduler::{NagScheduler, TickOutcome};
use orderbot_session::{OrderSession, SessionError};

use crate::replies;

/// Everything the two concurrent contexts share, behind one guard.
pub struct SharedState {
    pub session: OrderSession,
    pub nag: NagScheduler,
}

pub struct SessionController {
    state: Arc<Mutex<SharedState>>,
    channel: Arc<dyn Channel>,
    bot_nick: Participant,
}

impl SessionController {
    pub fn new(channel: Arc<dyn Channel>, bot_nick: Participant, nag_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState {
                session: OrderSession::new(),
                nag: NagScheduler::new(nag_interval),
            })),
            channel,
            bot_nick,
        }
    }

    /// Handle one inbound command and return at most one reply.
    ///
    /// Malformed arguments are reported once as an error reply; session
    /// state is left unchanged. `None` means no reply is warranted.
    pub async fn handle_message(&self, msg: &InboundMessage) -> Option<String> {
        let tokens = tokenize(&msg.content);
        let verb = classify(&tokens);
        let args: &[&str] = tokens.get(1..).unwrap_or(&[]);

        info!(sender = %msg.sender, ?verb, "command received");

        match self.dispatch(verb, &msg.sender, args).await {
            Ok(reply) => reply,
            Err(e) => Some(format!("Error: {e}")),
        }
    }

    async fn dispatch(
        &self,
        verb: Verb,
        sender: &Participant,
        args: &[&str],
    ) -> Result<Option<String>, OrderbotError> {
        let mut shared = self.state.lock().await;
        let reply = match verb {
            Verb::New => {
                // Exactly one argument: the destination link.
                if args.len() != 1 {
                    return Err(malformed(SessionError::MissingLink));
                }
                shared.session.open_new_batch(args[0]).map_err(malformed)?;
                self.start_nagging(&mut shared);
                Some(format!(
                    "Hey, @all Let's get ALL our orders in! (allthethings) Order from here: {}",
                    args[0]
                ))
            }
            Verb::Clear => {
                shared.session.clear_participant(sender);
                Some(format!("Clearing out your order, {sender}"))
            }
            Verb::AddOrder => {
                let order = args.join(" ");
                shared.session.add_order(sender, &order).map_err(malformed)?;
                Some(format!(
                    "Adding order {order} from {sender}... {}",
                    replies::random_yummy()
                ))
            }
            Verb::AddNote => {
                let note = args.join(" ");
                shared.session.add_note(sender, &note).map_err(malformed)?;
                Some(format!("Adding note {note} from {sender}"))
            }
            Verb::Summary => {
                let roster = self.roster().await?;
                Some(shared.session.summary(&roster, &self.bot_nick))
            }
            Verb::Help => Some(replies::help_text()),
            Verb::Skip => {
                shared.session.skip(sender);
                Some("Okay, if you say so... (foreveralone)".to_string())
            }
            Verb::Finish => {
                let roster = self.roster().await?;
                let text = finish_text(&shared.session, &roster, &self.bot_nick);
                shared.session.close();
                shared.nag.stop();
                Some(text)
            }
            Verb::Nag => {
                // Undocumented manual override — no reply beyond the log.
                self.start_nagging(&mut shared);
                None
            }
            Verb::StopNag => {
                shared.nag.stop();
                Some("Alright... (okay)".to_string())
            }
            Verb::Where => Some(match shared.session.destination_link() {
                Some(link) => format!("We're eating from here: {link}"),
                None => "I don't know... Y U GUYS NOT DECIDE YET (yuno)".to_string(),
            }),
            Verb::Unknown => Some(format!(
                "What? (disapproval) Call `@{} help` for help.",
                self.bot_nick
            )),
        };
        Ok(reply)
    }

    /// Whether the reminder loop is currently live (used by tests and status).
    pub async fn is_nagging(&self) -> bool {
        self.state.lock().await.nag.is_active()
    }

    /// Current link, if a batch is open.
    pub async fn destination_link(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .session
            .destination_link()
            .map(String::from)
    }

    async fn roster(&self) -> Result<Vec<Participant>, OrderbotError> {
        self.channel
            .roster()
            .await
            .map_err(|e| OrderbotError::Channel(e.to_string()))
    }

    /// (Re)start the reminder loop. The scheduler cancels any prior task
    /// itself, so this never races into two concurrent loops.
    fn start_nagging(&self, shared: &mut SharedState) {
        let state = Arc::clone(&self.state);
        let channel = Arc::clone(&self.channel);
        let bot_nick = self.bot_nick.clone();
        shared
            .nag
            .start(move || nag_tick(Arc::clone(&state), Arc::clone(&channel), bot_nick.clone()));
    }
}

/// One reminder tick: a single critical section under the session lock.
///
/// Reminds all laggards in one message, or — when everyone has responded —
/// performs the same close sequence as an explicit finish and ends the loop.
async fn nag_tick(
    state: Arc<Mutex<SharedState>>,
    channel: Arc<dyn Channel>,
    bot_nick: Participant,
) -> TickOutcome {
    let mut shared = state.lock().await;

    let roster = match channel.roster().await {
        Ok(roster) => roster,
        Err(e) => {
            // Stop-and-report: a broken roster call must not loop forever.
            error!(error = %e, "roster lookup failed — stopping the nag loop");
            return TickOutcome::Stop;
        }
    };

    let missing = shared.session.missing_participants(&roster, &bot_nick);
    if missing.is_empty() {
        // Everyone has responded: autonomous close, same sequence as finish.
        let text = finish_text(&shared.session, &roster, &bot_nick);
        shared.session.close();
        send(&channel, text).await;
        info!("all orders in — batch auto-closed");
        return TickOutcome::Stop;
    }

    let mut reminder = String::from("Order something,");
    for participant in &missing {
        reminder.push_str(&format!(" @{participant}"));
    }
    send(&channel, reminder).await;
    TickOutcome::Continue
}

/// Closing message: done banner plus the final summary, as one outbound text.
fn finish_text(session: &OrderSession, roster: &[Participant], bot_nick: &Participant) -> String {
    format!(
        "Yay we're done (yey)\n{}",
        session.summary(roster, bot_nick)
    )
}

fn malformed(e: SessionError) -> OrderbotError {
    OrderbotError::MalformedCommand {
        usage: e.to_string(),
    }
}

async fn send(channel: &Arc<dyn Channel>, content: String) {
    if let Err(e) = channel.send(&OutboundMessage::text(content)).await {
        warn!(error = %e, "outbound send failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    use orderbot_channels::{ChannelError, ChannelStatus};

    /// In-memory channel: fixed roster, records everything sent.
    struct RecordingChannel {
        roster: Vec<Participant>,
        fail_roster: bool,
        sent: StdMutex<Vec<String>>,
    }

    impl RecordingChannel {
        fn new(roster: &[&str]) -> Self {
            Self {
                roster: roster.iter().map(|s| Participant::from(*s)).collect(),
                fail_roster: false,
                sent: StdMutex::new(Vec::new()),
            }
        }

        fn failing_roster() -> Self {
            Self {
                roster: Vec::new(),
                fail_roster: true,
                sent: StdMutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn connect(&mut self) -> Result<(), ChannelError> {
            Ok(())
        }

        async fn disconnect(&mut self) -> Result<(), ChannelError> {
            Ok(())
        }

        async fn send(&self, msg: &OutboundMessage) -> Result<(), ChannelError> {
            self.sent.lock().unwrap().push(msg.content.clone());
            Ok(())
        }

        async fn roster(&self) -> Result<Vec<Participant>, ChannelError> {
            if self.fail_roster {
                return Err(ChannelError::RosterFailed("roster unavailable".into()));
            }
            Ok(self.roster.clone())
        }

        fn status(&self) -> ChannelStatus {
            ChannelStatus::Connected
        }
    }

    fn controller_with(channel: Arc<RecordingChannel>) -> SessionController {
        SessionController::new(channel, Participant::from("orderbot"), Duration::from_secs(3))
    }

    async fn say(controller: &SessionController, sender: &str, text: &str) -> Option<String> {
        controller
            .handle_message(&InboundMessage::new(sender, text))
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn new_order_summary_scenario() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "bob", "orderbot"]));
        let controller = controller_with(channel.clone());

        let reply = say(&controller, "alice", "new http://menu.example").await;
        assert!(reply.unwrap().contains("http://menu.example"));
        assert!(controller.is_nagging().await);

        say(&controller, "alice", "order pizza").await;
        say(&controller, "bob", "order salad").await;

        let summary = say(&controller, "alice", "summary").await.unwrap();
        assert!(summary.contains("# alice's demands:"));
        assert!(summary.contains("# pizza\n"));
        assert!(summary.contains("# bob's demands:"));
        assert!(summary.contains("# salad\n"));
        assert!(!summary.contains("didn't order"));
    }

    #[tokio::test(start_paused = true)]
    async fn order_without_args_is_malformed_and_leaves_state_unchanged() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        let reply = say(&controller, "alice", "order").await.unwrap();
        assert_eq!(reply, "Error: Improper format: 'order [item]' (rageguy)");

        let summary = say(&controller, "alice", "summary").await.unwrap();
        assert_eq!(summary, "No one made any orders yet (okay)");
    }

    #[tokio::test(start_paused = true)]
    async fn new_requires_exactly_one_argument() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        let reply = say(&controller, "alice", "new").await.unwrap();
        assert_eq!(reply, "Error: Improper format: 'new [link]'");

        let reply = say(&controller, "alice", "new http://a http://b").await.unwrap();
        assert_eq!(reply, "Error: Improper format: 'new [link]'");
        assert!(!controller.is_nagging().await);
    }

    #[tokio::test(start_paused = true)]
    async fn where_before_and_after_new() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        let reply = say(&controller, "alice", "where").await.unwrap();
        assert_eq!(reply, "I don't know... Y U GUYS NOT DECIDE YET (yuno)");

        say(&controller, "alice", "new http://x").await;
        let reply = say(&controller, "alice", "where").await.unwrap();
        assert_eq!(reply, "We're eating from here: http://x");
    }

    #[tokio::test(start_paused = true)]
    async fn nag_tick_reminds_only_laggards() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "bob", "orderbot"]));
        let controller = controller_with(channel.clone());

        say(&controller, "alice", "new http://menu.example").await;
        say(&controller, "alice", "order pizza").await;

        // Let at least one tick run after alice's order is in.
        tokio::time::sleep(Duration::from_secs(4)).await;

        let reminders: Vec<String> = channel
            .sent()
            .into_iter()
            .filter(|m| m.starts_with("Order something,"))
            .collect();
        assert!(!reminders.is_empty());
        let last = reminders.last().unwrap().clone();
        assert!(last.contains("@bob"));
        assert!(!last.contains("@alice"));
        assert!(!last.contains("@orderbot"));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_auto_closes_when_everyone_responded() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "bob", "orderbot"]));
        let controller = controller_with(channel.clone());

        say(&controller, "alice", "new http://menu.example").await;
        say(&controller, "alice", "order pizza").await;
        say(&controller, "bob", "pass").await;

        tokio::time::sleep(Duration::from_secs(4)).await;

        assert!(!controller.is_nagging().await);
        assert_eq!(controller.destination_link().await, None);

        let closing: Vec<String> = channel
            .sent()
            .into_iter()
            .filter(|m| m.starts_with("Yay we're done"))
            .collect();
        // Exactly one summary-and-close action, even across several intervals.
        assert_eq!(closing.len(), 1);
        assert!(closing[0].contains("HERE ARE THE ORDERS SO FAR"));
        assert!(closing[0].contains("Not ordering"));

        // Closed and idle: no further reminders ever.
        let total = channel.sent().len();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(channel.sent().len(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_closes_and_stops_nagging() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        say(&controller, "alice", "new http://menu.example").await;
        say(&controller, "alice", "order pizza").await;

        let reply = say(&controller, "alice", "finish").await.unwrap();
        assert!(reply.starts_with("Yay we're done (yey)"));
        assert!(reply.contains("# alice's demands:"));

        assert!(!controller.is_nagging().await);
        assert_eq!(controller.destination_link().await, None);

        // Summary stays queryable after close.
        let summary = say(&controller, "alice", "summary").await.unwrap();
        assert!(summary.contains("# pizza\n"));

        // No reminder fires after the explicit finish.
        let total = channel.sent().len();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(channel.sent().len(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn stopnag_is_idempotent() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        // Stop without ever starting — must not error.
        let reply = say(&controller, "alice", "stopnag").await.unwrap();
        assert_eq!(reply, "Alright... (okay)");

        say(&controller, "alice", "new http://x").await;
        assert!(controller.is_nagging().await);
        say(&controller, "alice", "stopnag").await;
        say(&controller, "alice", "stopnag").await;
        assert!(!controller.is_nagging().await);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_nag_restart_keeps_a_single_loop() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        say(&controller, "alice", "new http://x").await;
        say(&controller, "alice", "nag").await;
        say(&controller, "alice", "nag").await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        let baseline = channel.sent().len();
        tokio::time::sleep(Duration::from_secs(9)).await;
        // One live loop at 3 s: exactly three reminders in nine seconds.
        assert_eq!(channel.sent().len(), baseline + 3);
    }

    #[tokio::test(start_paused = true)]
    async fn roster_failure_stops_the_nag_loop() {
        let channel = Arc::new(RecordingChannel::failing_roster());
        let controller = controller_with(channel.clone());

        say(&controller, "alice", "nag").await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(!controller.is_nagging().await);
        assert!(channel.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_sender_only() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "bob", "orderbot"]));
        let controller = controller_with(channel.clone());

        say(&controller, "alice", "order pizza").await;
        say(&controller, "bob", "order salad").await;
        say(&controller, "alice", "note no onions").await;

        let reply = say(&controller, "alice", "clear").await.unwrap();
        assert_eq!(reply, "Clearing out your order, alice");

        let summary = say(&controller, "bob", "summary").await.unwrap();
        assert!(summary.contains("# alice didn't order!"));
        assert!(summary.contains("# salad\n"));
        assert!(!summary.contains("no onions"));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_command_points_at_help() {
        let channel = Arc::new(RecordingChannel::new(&["alice", "orderbot"]));
        let controller = controller_with(channel.clone());

        let reply = say(&controller, "alice", "lunchtime???").await.unwrap();
        assert_eq!(reply, "What? (disapproval) Call `@orderbot help` for help.");
    }
}
