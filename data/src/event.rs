//! Domain events, one JSON object per line on the outbound surface.
//!
//! Payload keys mirror the wire they came from: absent optionals are
//! omitted rather than serialized as null.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::server::Server;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum Event {
    #[serde(rename = "server:connecting")]
    Connecting { server: Server },
    #[serde(rename = "server:connected")]
    Connected { server: Server, message: String },
    #[serde(rename = "channel:joining")]
    Joining { server: Server, channel: String },
    #[serde(rename = "channel:joined")]
    Joined {
        server: Server,
        channel: String,
        user: String,
        my_nick: String,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "channel:parted")]
    Parted {
        server: Server,
        channel: String,
        user: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        reason: Option<String>,
        my_nick: String,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "channel:topicChanged")]
    TopicChanged {
        server: Server,
        channel: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        topic: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        set_by_nick: Option<String>,
        #[serde(with = "crate::serde::iso8601")]
        set_at_timestamp: DateTime<Utc>,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "channel:usersListed")]
    UsersListed {
        server: Server,
        channel: String,
        users: Vec<String>,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "message:sent")]
    MessageSent {
        server: Server,
        from_user: String,
        to_user_or_channel: String,
        message_text: String,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "action:sent")]
    ActionSent {
        server: Server,
        from_user: String,
        to_user_or_channel: String,
        action_text: String,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "user:nickChanged")]
    NickChanged {
        server: Server,
        old_nick: String,
        new_nick: String,
        channels: Vec<String>,
        my_nick: String,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "server:whois")]
    Whois {
        server: Server,
        info: WhoisInfo,
        #[serde(with = "crate::serde::iso8601")]
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "user:userStatus")]
    UserStatus {
        server: Server,
        nick: String,
        away: bool,
    },
}

impl Event {
    pub fn server(&self) -> &Server {
        match self {
            Event::Connecting { server }
            | Event::Connected { server, .. }
            | Event::Joining { server, .. }
            | Event::Joined { server, .. }
            | Event::Parted { server, .. }
            | Event::TopicChanged { server, .. }
            | Event::UsersListed { server, .. }
            | Event::MessageSent { server, .. }
            | Event::ActionSent { server, .. }
            | Event::NickChanged { server, .. }
            | Event::Whois { server, .. }
            | Event::UserStatus { server, .. } => server,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Event::Joined { timestamp, .. }
            | Event::Parted { timestamp, .. }
            | Event::TopicChanged { timestamp, .. }
            | Event::UsersListed { timestamp, .. }
            | Event::MessageSent { timestamp, .. }
            | Event::ActionSent { timestamp, .. }
            | Event::NickChanged { timestamp, .. }
            | Event::Whois { timestamp, .. } => Some(*timestamp),
            Event::Connecting { .. }
            | Event::Connected { .. }
            | Event::Joining { .. }
            | Event::UserStatus { .. } => None,
        }
    }

    /// Transcript lines this event contributes, as (channel, summary)
    /// pairs. Nick changes fan out to every channel the user was in.
    pub fn transcript_lines(&self) -> Vec<(String, String)> {
        match self {
            Event::Joined { channel, user, .. } => {
                vec![(channel.clone(), format!("{user} joined the channel"))]
            }
            Event::Parted { channel, user, .. } => {
                vec![(channel.clone(), format!("{user} left the channel"))]
            }
            Event::TopicChanged { channel, topic, .. } => {
                let topic = topic.as_deref().unwrap_or_default();
                vec![(channel.clone(), format!("Topic is: {topic}"))]
            }
            Event::UsersListed { channel, users, .. } => {
                vec![(
                    channel.clone(),
                    format!("Users: {}", users.iter().join(", ")),
                )]
            }
            Event::MessageSent {
                to_user_or_channel,
                from_user,
                message_text,
                ..
            } => vec![(
                to_user_or_channel.clone(),
                format!("<{from_user}> {message_text}"),
            )],
            Event::ActionSent {
                to_user_or_channel,
                from_user,
                action_text,
                ..
            } => vec![(
                to_user_or_channel.clone(),
                format!("\u{2022} {from_user} {action_text}"),
            )],
            Event::NickChanged {
                old_nick,
                new_nick,
                channels,
                ..
            } => channels
                .iter()
                .map(|channel| {
                    (
                        channel.clone(),
                        format!("{old_nick} is now known as {new_nick}"),
                    )
                })
                .collect(),
            Event::Connecting { .. }
            | Event::Connected { .. }
            | Event::Joining { .. }
            | Event::Whois { .. }
            | Event::UserStatus { .. } => vec![],
        }
    }
}

/// WHOIS payload with the wire's own field names; everything past the
/// nick is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhoisInfo {
    pub nick: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub realname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub server: Option<String>,
    #[serde(
        rename = "serverinfo",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub server_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub idle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub channels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub away: Option<String>,
}

impl WhoisInfo {
    pub fn is_away(&self) -> bool {
        self.away.is_some()
    }
}

impl From<irc::Whois> for WhoisInfo {
    fn from(whois: irc::Whois) -> Self {
        Self {
            nick: whois.nick,
            user: whois.user,
            host: whois.host,
            realname: whois.realname,
            server: whois.server,
            server_info: whois.server_info,
            operator: whois.operator,
            idle: whois.idle,
            channels: whois.channels,
            away: whois.away,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::DateTime;

    use super::*;

    fn stamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .to_utc()
    }

    #[test]
    fn joined_serializes_with_tag_and_camel_case() {
        let event = Event::Joined {
            server: Server::from("irc.example.com"),
            channel: "#general".to_string(),
            user: "alice".to_string(),
            my_nick: "bob".to_string(),
            timestamp: stamp(),
        };

        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r##"{"event":"channel:joined","server":"irc.example.com","channel":"#general","user":"alice","myNick":"bob","timestamp":"2024-01-01T00:00:00.000Z"}"##
        );
    }

    #[test]
    fn user_status_has_no_timestamp() {
        let event = Event::UserStatus {
            server: Server::from("irc.example.com"),
            nick: "alice".to_string(),
            away: true,
        };

        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"user:userStatus","server":"irc.example.com","nick":"alice","away":true}"#
        );
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let event = Event::Parted {
            server: Server::from("irc.example.com"),
            channel: "#general".to_string(),
            user: "alice".to_string(),
            reason: None,
            my_nick: "bob".to_string(),
            timestamp: stamp(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("reason"));

        let whois = Event::Whois {
            server: Server::from("irc.example.com"),
            info: WhoisInfo {
                nick: "carol".to_string(),
                ..WhoisInfo::default()
            },
            timestamp: stamp(),
        };

        assert_eq!(
            serde_json::to_string(&whois).unwrap(),
            r#"{"event":"server:whois","server":"irc.example.com","info":{"nick":"carol"},"timestamp":"2024-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn nick_change_carries_affected_channels() {
        let event = Event::NickChanged {
            server: Server::from("irc.example.com"),
            old_nick: "alice".to_string(),
            new_nick: "alicia".to_string(),
            channels: vec!["#general".to_string(), "#work".to_string()],
            my_nick: "bob".to_string(),
            timestamp: stamp(),
        };

        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r##"{"event":"user:nickChanged","server":"irc.example.com","oldNick":"alice","newNick":"alicia","channels":["#general","#work"],"myNick":"bob","timestamp":"2024-01-01T00:00:00.000Z"}"##
        );
    }

    #[test]
    fn transcript_lines() {
        let message = Event::MessageSent {
            server: Server::from("irc.example.com"),
            from_user: "alice".to_string(),
            to_user_or_channel: "#general".to_string(),
            message_text: "hi".to_string(),
            timestamp: stamp(),
        };
        assert_eq!(
            message.transcript_lines(),
            vec![("#general".to_string(), "<alice> hi".to_string())]
        );

        let action = Event::ActionSent {
            server: Server::from("irc.example.com"),
            from_user: "alice".to_string(),
            to_user_or_channel: "#general".to_string(),
            action_text: "waves".to_string(),
            timestamp: stamp(),
        };
        assert_eq!(
            action.transcript_lines(),
            vec![("#general".to_string(), "\u{2022} alice waves".to_string())]
        );

        let users = Event::UsersListed {
            server: Server::from("irc.example.com"),
            channel: "#general".to_string(),
            users: vec!["alice".to_string(), "bob".to_string()],
            timestamp: stamp(),
        };
        assert_eq!(
            users.transcript_lines(),
            vec![("#general".to_string(), "Users: alice, bob".to_string())]
        );

        let renamed = Event::NickChanged {
            server: Server::from("irc.example.com"),
            old_nick: "alice".to_string(),
            new_nick: "alicia".to_string(),
            channels: vec!["#general".to_string(), "#work".to_string()],
            my_nick: "bob".to_string(),
            timestamp: stamp(),
        };
        assert_eq!(
            renamed.transcript_lines(),
            vec![
                (
                    "#general".to_string(),
                    "alice is now known as alicia".to_string()
                ),
                (
                    "#work".to_string(),
                    "alice is now known as alicia".to_string()
                ),
            ]
        );

        let status = Event::UserStatus {
            server: Server::from("irc.example.com"),
            nick: "alice".to_string(),
            away: false,
        };
        assert!(status.transcript_lines().is_empty());
    }
}
