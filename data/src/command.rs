use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Me,
    Away,
    Msg,
    Query,
    Part,
    Quit,
    Join,
}

impl FromStr for Kind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "me" => Ok(Kind::Me),
            "away" => Ok(Kind::Away),
            "msg" => Ok(Kind::Msg),
            "query" => Ok(Kind::Query),
            "part" => Ok(Kind::Part),
            "quit" => Ok(Kind::Quit),
            "join" => Ok(Kind::Join),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say { target: String, text: String },
    Action { target: String, text: String },
    Away(Option<String>),
    Join { channel: String, key: Option<String> },
    Part { channel: String },
    Quit,
    Raw { command: String, args: Vec<String> },
}

/// Interprets one line of user input against the active conversation
/// target. Interpretation is total: anything unrecognized is either plain
/// chat or a raw passthrough, never an error.
///
/// Matching is on the whole first token, so `/m` is a raw `M` command and
/// not shorthand for `/me`. `/msg` and `/query` deliberately address the
/// *current* target rather than a named one.
pub fn parse(text: &str, target: &str) -> Command {
    let say = || Command::Say {
        target: target.to_string(),
        text: text.to_string(),
    };

    let Some(input) = text.strip_prefix('/') else {
        return say();
    };

    let (word, rest) = match input.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (input, ""),
    };

    if word.is_empty() {
        return say();
    }

    match word.parse::<Kind>() {
        Ok(Kind::Me) => Command::Action {
            target: target.to_string(),
            text: rest.to_string(),
        },
        Ok(Kind::Away) => {
            Command::Away((!rest.is_empty()).then(|| rest.to_string()))
        }
        Ok(Kind::Msg | Kind::Query) => Command::Say {
            target: target.to_string(),
            text: rest.to_string(),
        },
        Ok(Kind::Part) => {
            let channel = rest
                .split(' ')
                .next()
                .filter(|channel| !channel.is_empty())
                .unwrap_or(target);

            Command::Part {
                channel: channel.to_string(),
            }
        }
        Ok(Kind::Quit) => Command::Quit,
        Ok(Kind::Join) => {
            let mut args = rest.split_ascii_whitespace();

            match args.next() {
                Some(channel) => Command::Join {
                    channel: channel.to_string(),
                    key: args.next().map(String::from),
                },
                None => Command::Raw {
                    command: "JOIN".to_string(),
                    args: vec![],
                },
            }
        }
        Err(()) => Command::Raw {
            command: word.to_uppercase(),
            args: rest.split_ascii_whitespace().map(String::from).collect(),
        },
    }
}

/// Command surface accepted from the presentation layer, one JSON object
/// per line on stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Inbound {
    SendMessage {
        server_url: String,
        to_user_or_channel: String,
        message_text: String,
    },
    LeaveChannel {
        server_url: String,
        channel_name: String,
    },
    RefreshUserStatusesForChannel {
        server_url: String,
        channel_name: String,
    },
    RefreshUserStatus {
        server_url: String,
        nick: String,
    },
}
