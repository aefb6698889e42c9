//! Canned reply text — acknowledgements, help, and the yummy-reply pool.

/// Replies when someone orders something, picked pseudo-randomly.
pub const YUMMY_REPLIES: &[&str] = &[
    "Yum",
    "Sounds good",
    "That's a little strange, but okay",
    "MMM...",
    "Awesome!",
    "Ew, that's disgusting, but alright if you say so...",
    "Good Choice!",
    "Awesome!",
    "Cool!",
];

/// Pick a yummy reply.
///
/// Uses the sub-second nanos of the current wall clock as the index source,
/// avoiding a rand dependency for a nine-entry list.
pub fn random_yummy() -> &'static str {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    YUMMY_REPLIES[nanos as usize % YUMMY_REPLIES.len()]
}

/// Static help block listing every command and its aliases.
pub fn help_text() -> String {
    [
        "# ------------------------------------ #",
        "#               Commands:",
        "# ------------------------------------ #",
        "  new|n|newbatch [link] - create a new batch of orders (and start the nagging)",
        "  order|add|a|o|ord [order] - add an order",
        "  note|no [message] - add a note about your order",
        "  summary|sum|s - prints out a summary of all orders",
        "  clear|c|cancel - remove your order (if you wanna start again)",
        "  sk|p|pass|skip|forgetme - if you're not ordering lunch, this is how you say it",
        "  done|finish|f|completed - finish off ordering (also turns off nagging)",
        "  where|w - ask where we are ordering from?",
        "  h|help|usage - prints out this help",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_yummy_is_from_the_pool() {
        for _ in 0..32 {
            assert!(YUMMY_REPLIES.contains(&random_yummy()));
        }
    }

    #[test]
    fn help_mentions_every_primary_alias() {
        let help = help_text();
        for verb in ["new", "order", "note", "summary", "clear", "skip", "finish", "where", "help"] {
            assert!(help.contains(verb), "help missing {verb:?}");
        }
    }
}
