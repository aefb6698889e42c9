use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use orderbot_core::Participant;

use crate::error::{Result, SessionError};
use crate::PASS_ORDER_TEXT;

const SEPARATOR: &str = "# ------------------------------------ #\n";

const SUMMARY_BANNER: &str = "\
# ------------------------------------ #\n\
#                                      #\n\
#     HERE ARE THE ORDERS SO FAR       #\n\
#                                      #\n\
# ------------------------------------ #\n";

const NO_ORDERS_YET: &str = "No one made any orders yet (okay)";

/// The shared, mutable order state for one room.
///
/// Lives for the process lifetime; `open_new_batch` resets it for each new
/// ordering cycle and `close` ends the cycle while keeping orders queryable
/// until the next batch.
#[derive(Debug, Default)]
pub struct OrderSession {
    /// Where the group is ordering from. `None` exactly when no batch is open.
    destination_link: Option<String>,

    /// Per-participant order lines, insertion order preserved.
    /// Absence of a key means "has not responded".
    orders: HashMap<Participant, Vec<String>>,

    /// Per-participant free-text annotations, independent of orders.
    notes: HashMap<Participant, Vec<String>>,

    /// Cached predicate: true iff `orders` is non-empty (a pass counts,
    /// since passing records an order entry with fixed text).
    has_any_order: bool,

    /// Log-correlation id for the current batch.
    batch_id: Option<Uuid>,
}

impl OrderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new ordering cycle: throw out previous orders and notes,
    /// record the destination link, and assign a fresh batch id.
    pub fn open_new_batch(&mut self, link: &str) -> Result<()> {
        if link.trim().is_empty() {
            return Err(SessionError::MissingLink);
        }
        let batch_id = Uuid::new_v4();
        self.destination_link = Some(link.to_string());
        self.orders.clear();
        self.notes.clear();
        self.has_any_order = false;
        self.batch_id = Some(batch_id);
        info!(batch_id = %batch_id, link, "new order batch opened");
        Ok(())
    }

    /// Append an order line for `participant`.
    pub fn add_order(&mut self, participant: &Participant, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyOrder);
        }
        self.orders
            .entry(participant.clone())
            .or_default()
            .push(text.to_string());
        self.has_any_order = true;
        debug!(participant = %participant, order = text, "order added");
        Ok(())
    }

    /// Append a note line for `participant`. Notes do not count as orders.
    pub fn add_note(&mut self, participant: &Participant, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyNote);
        }
        self.notes
            .entry(participant.clone())
            .or_default()
            .push(text.to_string());
        debug!(participant = %participant, note = text, "note added");
        Ok(())
    }

    /// Record that `participant` is sitting this one out.
    ///
    /// A pass is an order entry with fixed text, so the nag loop and
    /// summary treat the participant as having responded.
    pub fn skip(&mut self, participant: &Participant) {
        self.orders
            .entry(participant.clone())
            .or_default()
            .push(PASS_ORDER_TEXT.to_string());
        self.has_any_order = true;
        debug!(participant = %participant, "participant passed");
    }

    /// Remove `participant`'s entries from both orders and notes.
    pub fn clear_participant(&mut self, participant: &Participant) {
        self.orders.remove(participant);
        self.notes.remove(participant);
        if self.orders.is_empty() {
            self.has_any_order = false;
        }
        debug!(participant = %participant, "orders and notes cleared");
    }

    /// End the current batch. Orders and notes are preserved until the next
    /// `open_new_batch` so a summary stays queryable after close.
    pub fn close(&mut self) {
        if let Some(batch_id) = self.batch_id.take() {
            info!(batch_id = %batch_id, "order batch closed");
        }
        self.destination_link = None;
    }

    pub fn is_open(&self) -> bool {
        self.destination_link.is_some()
    }

    pub fn destination_link(&self) -> Option<&str> {
        self.destination_link.as_deref()
    }

    pub fn has_any_order(&self) -> bool {
        self.has_any_order
    }

    pub fn batch_id(&self) -> Option<Uuid> {
        self.batch_id
    }

    /// Order lines recorded for `participant` so far, if any.
    pub fn orders_for(&self, participant: &Participant) -> Option<&[String]> {
        self.orders.get(participant).map(|v| v.as_slice())
    }

    /// Note lines recorded for `participant` so far, if any.
    pub fn notes_for(&self, participant: &Participant) -> Option<&[String]> {
        self.notes.get(participant).map(|v| v.as_slice())
    }

    /// Roster members who have not yet responded, in roster order.
    ///
    /// The bot's own identity is excluded so it never nags itself.
    pub fn missing_participants(
        &self,
        roster: &[Participant],
        bot_nick: &Participant,
    ) -> Vec<Participant> {
        roster
            .iter()
            .filter(|p| *p != bot_nick)
            .filter(|p| self.orders.get(p).is_none_or(|orders| orders.is_empty()))
            .cloned()
            .collect()
    }

    /// Render the deterministic order summary for the given roster.
    ///
    /// One block per non-bot roster participant, in roster order: either a
    /// "didn't order" line or their order lines plus any notes, each block
    /// followed by a separator. When nothing has been ordered this cycle the
    /// sentinel line is returned instead.
    pub fn summary(&self, roster: &[Participant], bot_nick: &Participant) -> String {
        if !self.has_any_order {
            return NO_ORDERS_YET.to_string();
        }

        let mut out = String::from(SUMMARY_BANNER);
        for participant in roster.iter().filter(|p| *p != bot_nick) {
            match self.orders.get(participant).filter(|o| !o.is_empty()) {
                None => {
                    out.push_str(&format!("# {participant} didn't order!\n"));
                }
                Some(orders) => {
                    out.push_str(&format!("# {participant}'s demands:\n"));
                    out.push_str("# ORDER(S):\n");
                    for order in orders {
                        out.push_str(&format!("# {order}\n"));
                    }
                    if let Some(notes) = self.notes.get(participant) {
                        out.push_str("# NOTE(S):\n");
                        for note in notes {
                            out.push_str(&format!("# {note}\n"));
                        }
                    }
                }
            }
            out.push_str(SEPARATOR);
        }
        out
    }
}
