//! Provider resolution for insurance queries.
//!
//! Decides which provider a conversation turn targets. The decision is a
//! pure function of session state and the query text; the caller owns the
//! follow-up side effects (recording a detected mention, clearing history on
//! explicit selection).

use crate::session::Session;

/// Canonical provider identifiers mapped to the query keywords that name
/// them, localized aliases included. Matching is case-insensitive substring.
const PROVIDER_ALIASES: &[(&str, &[&str])] = &[
    ("bluecross", &["blue cross", "bluecross", "藍十字"]),
    ("one_degree", &["one degree", "onedegree"]),
    ("prudential", &["prudential", "pruchoice", "保誠"]),
    ("bolttech", &["bolttech"]),
];

/// Scan query text for a provider mention. Returns the canonical identifier
/// of the first provider whose alias appears in the query.
pub fn detect(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    PROVIDER_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| query.contains(alias)))
        .map(|(id, _)| *id)
}

/// Resolve the provider a query should be answered against.
///
/// Priority, first match wins:
/// 1. the session's explicit selected provider,
/// 2. a provider keyword detected in the query,
/// 3. the session's last-mentioned provider,
/// 4. none, and the assistant call goes out unscoped.
pub fn resolve<'a>(session: Option<&'a Session>, query: &str) -> Option<&'a str> {
    if let Some(selected) = session.and_then(|s| s.selected_provider.as_deref()) {
        return Some(selected);
    }
    if let Some(detected) = detect(query) {
        return Some(detected);
    }
    session.and_then(|s| s.last_mentioned_provider.as_deref())
}
