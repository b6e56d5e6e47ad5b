use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an account in the transaction network.
///
/// The engine treats account ids exactly as the upstream feed delivers
/// them: no normalization, no case folding, and no attempt to resolve
/// two ids to the same real-world holder. Two ids are the same account
/// iff they are byte-identical.
///
/// Synthetic batches produced by the generator use `ACC-<nnnn>` ids, but
/// nothing in the engine depends on that shape — bank account numbers,
/// wallet addresses or free-form labels all work.
///
/// Ordering matters: detectors iterate accounts in sorted id order so
/// that cycle enumeration (and the ring ids derived from it) is
/// reproducible across runs. In serialized envelopes the id appears as a
/// bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
