use std::sync::Arc;
use std::{cmp, fmt};

use futures::channel::mpsc::Sender;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::stream::Request;

pub type Handle = Sender<Request>;

/// Server identity. The configured url doubles as the stable key for
/// dispatch, events and transcript paths.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Server {
    pub name: Arc<str>,
}

impl From<&str> for Server {
    fn from(name: &str) -> Self {
        Self {
            name: Arc::from(name),
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

// Use case-insensitive comparison first, falling back to case-sensitive
// only when server names are equal (in a case-insensitive context).
impl Ord for Server {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let case_insensitive_ordering =
            self.name.to_lowercase().cmp(&other.name.to_lowercase());

        if !matches!(case_insensitive_ordering, cmp::Ordering::Equal) {
            return case_insensitive_ordering;
        }

        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Server {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub server: Server,
    pub config: Arc<config::Server>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ordering_is_case_insensitive_first() {
        let mut servers = vec![
            Server::from("irc.beta.org"),
            Server::from("IRC.alpha.org"),
            Server::from("irc.alpha.org"),
        ];
        servers.sort();

        assert_eq!(
            servers
                .iter()
                .map(|server| server.name.as_ref())
                .collect::<Vec<_>>(),
            vec!["IRC.alpha.org", "irc.alpha.org", "irc.beta.org"],
        );
    }

    #[test]
    fn serializes_as_bare_string() {
        let server = Server::from("irc.example.com");

        assert_eq!(
            serde_json::to_string(&server).unwrap(),
            r#""irc.example.com""#
        );
    }
}
