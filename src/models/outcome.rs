//! Classified results of fetching one page.

use std::fmt;

/// Result of a single HTTP attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 200 with a non-empty body
    Found(String),
    /// 404, the page does not exist
    Absent,
    /// Anything else; worth another attempt
    Transient(TransientReason),
}

/// Why an attempt was classified transient. Used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientReason {
    /// Status other than 200 or 404
    Status(u16),
    /// 200 with an empty body, the upstream is likely broken
    EmptyBody,
    /// Connection, timeout or body decoding failure
    Transport(String),
}

impl fmt::Display for TransientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::EmptyBody => write!(f, "empty body on 200"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
        }
    }
}

/// Terminal outcome for one identifier once retries are settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Found(String),
    Absent,
}

/// A settled identifier along with the attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Resolved,
    pub attempts: u32,
}
