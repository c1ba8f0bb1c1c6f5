use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use irc::proto::casemap;
use serde::{Deserialize, Serialize};

/// Nickname with RFC 1459 identity semantics: comparison, ordering and
/// hashing all go through the casemapped form, while the original
/// spelling is preserved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nick(String);

impl Nick {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Nick {
    fn from(nick: &str) -> Self {
        Self(nick.to_string())
    }
}

impl From<String> for Nick {
    fn from(nick: String) -> Self {
        Self(nick)
    }
}

impl From<Nick> for String {
    fn from(nick: Nick) -> Self {
        nick.0
    }
}

impl fmt::Display for Nick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for Nick {
    fn eq(&self, other: &Self) -> bool {
        casemap::eq(&self.0, &other.0)
    }
}

impl Eq for Nick {}

impl Ord for Nick {
    fn cmp(&self, other: &Self) -> Ordering {
        casemap::fold(&self.0).cmp(&casemap::fold(&other.0))
    }
}

impl PartialOrd for Nick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Nick {
    fn hash<H: Hasher>(&self, state: &mut H) {
        casemap::fold(&self.0).hash(state);
    }
}
