//! Protocol session for one server: registration, channel membership,
//! and translation of parsed lines into typed events.
//!
//! The session holds no socket. Callers feed it every inbound
//! [`proto::Message`] and write whatever [`Reply::outgoing`] returns
//! back to the wire, so all of the protocol logic stays testable
//! without I/O.

use std::collections::{BTreeMap, BTreeSet};

use proto::{
    CHANNEL_MEMBERSHIP_PREFIXES, Command, Message, Numeric, Source, casemap,
    command, ctcp,
};

/// Registration parameters for one server.
#[derive(Debug, Clone)]
pub struct Config {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    config: Config,
    nickname: String,
    nick_suffix: u32,
    registered: bool,
    // Keyed by casemapped channel name
    channels: BTreeMap<String, Channel>,
    // Keyed by nick as echoed in the replies
    whois: BTreeMap<String, Whois>,
}

#[derive(Debug, Default)]
struct Channel {
    // Name as first seen on the wire
    name: String,
    users: BTreeSet<String>,
    // RPL_NAMREPLY accumulates here until RPL_ENDOFNAMES swaps it in
    names: BTreeSet<String>,
    topic: Option<String>,
    // RPL_TOPIC seen, emission deferred until RPL_TOPICWHOTIME or
    // RPL_ENDOFNAMES, whichever arrives first
    topic_pending: bool,
}

impl Channel {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

/// What a session operation produced: events for the consumer and
/// messages to put on the wire.
#[derive(Debug, Default)]
pub struct Reply {
    pub events: Vec<Event>,
    pub outgoing: Vec<Message>,
}

impl Reply {
    fn none() -> Self {
        Self::default()
    }

    fn event(event: Event) -> Self {
        Self {
            events: vec![event],
            outgoing: vec![],
        }
    }

    fn send(message: Message) -> Self {
        Self {
            events: vec![],
            outgoing: vec![message],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Registered {
        nick: String,
        message: String,
    },
    Names {
        channel: String,
        users: Vec<String>,
    },
    Topic {
        channel: String,
        topic: Option<String>,
        set_by: Option<String>,
        set_at: Option<u64>,
    },
    Join {
        channel: String,
        nick: String,
    },
    Part {
        channel: String,
        nick: String,
        reason: Option<String>,
    },
    Quit {
        nick: String,
        reason: Option<String>,
        channels: Vec<String>,
    },
    Kick {
        channel: String,
        nick: String,
        by: String,
        reason: Option<String>,
    },
    Kill {
        nick: String,
        reason: String,
        channels: Vec<String>,
    },
    Message {
        from: String,
        target: String,
        text: String,
    },
    /// Mirror of a message the local user sent via [`Session::say`].
    SelfMessage {
        target: String,
        text: String,
    },
    Notice {
        from: String,
        target: String,
        text: String,
    },
    NickChanged {
        old: String,
        new: String,
        channels: Vec<String>,
    },
    Action {
        from: String,
        target: String,
        text: String,
    },
    Whois(Whois),
    /// Anything not folded into a typed event, numeric replies included.
    Raw(Message),
}

/// Aggregated WHOIS reply, collected across 311/312/313/317/319/301
/// and flushed at 318.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whois {
    pub nick: String,
    pub user: Option<String>,
    pub host: Option<String>,
    pub realname: Option<String>,
    pub server: Option<String>,
    pub server_info: Option<String>,
    pub operator: Option<String>,
    pub idle: Option<String>,
    pub channels: Vec<String>,
    pub away: Option<String>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let nickname = config.nickname.clone();

        Self {
            config,
            nickname,
            nick_suffix: 0,
            registered: false,
            channels: BTreeMap::new(),
            whois: BTreeMap::new(),
        }
    }

    /// Messages for the initial handshake, in wire order.
    pub fn registration(&self) -> Vec<Message> {
        let mut messages = vec![];

        if let Some(pass) = &self.config.password {
            messages.push(command!("PASS", pass.as_str()));
        }
        messages.push(command!("NICK", self.config.nickname.as_str()));
        messages.push(command!(
            "USER",
            self.config.username.as_str(),
            self.config.realname.as_str()
        ));

        messages
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// One WHO per joined channel, for the presence ticker.
    pub fn who_refresh(&self) -> Vec<Message> {
        self.channels
            .values()
            .map(|channel| command!("WHO", channel.name.as_str()))
            .collect()
    }

    pub fn say(&self, target: &str, text: &str) -> Reply {
        Reply {
            events: vec![Event::SelfMessage {
                target: target.to_string(),
                text: text.to_string(),
            }],
            outgoing: vec![command!("PRIVMSG", target, text)],
        }
    }

    /// CTCP ACTION delivery. The mirrored event keeps the marker so
    /// consumers reclassify it the same way as received actions.
    pub fn action(&self, target: &str, text: &str) -> Reply {
        self.say(target, &ctcp::format_action(text))
    }

    pub fn receive(&mut self, message: Message) -> Reply {
        use Command::*;

        let from = source_name(&message.source);

        match message.command {
            PING(token) => Reply::send(command!("PONG", token)),
            PRIVMSG(target, text) => {
                let Some(from) = from else {
                    return Reply::none();
                };

                match ctcp::parse_action(&text) {
                    Some(action) => Reply::event(Event::Action {
                        from,
                        target,
                        text: action.to_string(),
                    }),
                    None => Reply::event(Event::Message { from, target, text }),
                }
            }
            NOTICE(target, text) => {
                let Some(from) = from else {
                    return Reply::none();
                };

                Reply::event(Event::Notice { from, target, text })
            }
            JOIN(channel, _) => {
                let Some(nick) = from else {
                    return Reply::none();
                };

                if casemap::eq(&nick, &self.nickname) {
                    self.channels.insert(
                        casemap::fold(&channel),
                        Channel::new(channel.clone()),
                    );
                } else if let Some(chan) =
                    self.channels.get_mut(&casemap::fold(&channel))
                {
                    chan.users.insert(nick.clone());
                }

                Reply::event(Event::Join { channel, nick })
            }
            PART(channel, reason) => {
                let Some(nick) = from else {
                    return Reply::none();
                };

                let key = casemap::fold(&channel);
                if casemap::eq(&nick, &self.nickname) {
                    self.channels.remove(&key);
                } else if let Some(chan) = self.channels.get_mut(&key) {
                    chan.users.remove(&nick);
                }

                Reply::event(Event::Part {
                    channel,
                    nick,
                    reason,
                })
            }
            QUIT(reason) => {
                let Some(nick) = from else {
                    return Reply::none();
                };

                let channels = self.remove_from_all(&nick);

                Reply::event(Event::Quit {
                    nick,
                    reason,
                    channels,
                })
            }
            KICK(channel, nick, reason) => {
                let Some(by) = from else {
                    return Reply::none();
                };

                let key = casemap::fold(&channel);
                if casemap::eq(&nick, &self.nickname) {
                    self.channels.remove(&key);
                } else if let Some(chan) = self.channels.get_mut(&key) {
                    chan.users.remove(&nick);
                }

                Reply::event(Event::Kick {
                    channel,
                    nick,
                    by,
                    reason,
                })
            }
            KILL(nick, reason) => {
                let channels = self.remove_from_all(&nick);

                Reply::event(Event::Kill {
                    nick,
                    reason,
                    channels,
                })
            }
            NICK(new) => {
                let Some(old) = from else {
                    return Reply::none();
                };

                if casemap::eq(&old, &self.nickname) {
                    self.nickname = new.clone();
                }

                let mut channels = vec![];
                for channel in self.channels.values_mut() {
                    if channel.users.remove(&old) {
                        channel.users.insert(new.clone());
                        channels.push(channel.name.clone());
                    }
                }

                Reply::event(Event::NickChanged { old, new, channels })
            }
            TOPIC(channel, topic) => {
                if let Some(chan) =
                    self.channels.get_mut(&casemap::fold(&channel))
                {
                    chan.topic = topic.clone();
                    chan.topic_pending = false;
                }

                Reply::event(Event::Topic {
                    channel,
                    topic,
                    set_by: from,
                    set_at: None,
                })
            }
            Numeric(numeric, args) => {
                self.numeric(numeric, args, message.source)
            }
            command => Reply::event(Event::Raw(Message {
                source: message.source,
                command,
            })),
        }
    }

    fn numeric(
        &mut self,
        numeric: Numeric,
        args: Vec<String>,
        source: Option<Source>,
    ) -> Reply {
        use Numeric::*;

        match numeric {
            RPL_WELCOME => {
                self.registered = true;

                let [nick, text, ..] = &args[..] else {
                    return Reply::none();
                };
                self.nickname = nick.clone();

                Reply::event(Event::Registered {
                    nick: nick.clone(),
                    message: text.clone(),
                })
            }
            ERR_NICKNAMEINUSE if !self.registered => {
                self.nick_suffix += 1;
                let nick =
                    format!("{}{}", self.config.nickname, self.nick_suffix);
                self.nickname = nick.clone();

                Reply::send(command!("NICK", nick))
            }
            RPL_NAMREPLY => {
                if let [_, _, channel, names, ..] = &args[..]
                    && let Some(chan) =
                        self.channels.get_mut(&casemap::fold(channel))
                {
                    chan.names.extend(names.split_whitespace().map(|nick| {
                        nick.trim_start_matches(&CHANNEL_MEMBERSHIP_PREFIXES[..])
                            .to_string()
                    }));
                }

                Reply::none()
            }
            RPL_ENDOFNAMES => {
                let [_, channel, ..] = &args[..] else {
                    return Reply::none();
                };
                let Some(chan) =
                    self.channels.get_mut(&casemap::fold(channel))
                else {
                    return Reply::none();
                };

                chan.users = std::mem::take(&mut chan.names);

                let mut reply = Reply::event(Event::Names {
                    channel: chan.name.clone(),
                    users: chan.users.iter().cloned().collect(),
                });

                // A topic recorded by 332 with no 333 still surfaces
                if chan.topic_pending {
                    chan.topic_pending = false;
                    reply.events.push(Event::Topic {
                        channel: chan.name.clone(),
                        topic: chan.topic.clone(),
                        set_by: None,
                        set_at: None,
                    });
                }

                reply
            }
            RPL_TOPIC => {
                if let [_, channel, topic, ..] = &args[..]
                    && let Some(chan) =
                        self.channels.get_mut(&casemap::fold(channel))
                {
                    chan.topic = Some(topic.clone());
                    chan.topic_pending = true;
                }

                Reply::none()
            }
            RPL_TOPICWHOTIME => {
                if let [_, channel, set_by, set_at, ..] = &args[..]
                    && let Some(chan) =
                        self.channels.get_mut(&casemap::fold(channel))
                {
                    chan.topic_pending = false;

                    return Reply::event(Event::Topic {
                        channel: chan.name.clone(),
                        topic: chan.topic.clone(),
                        set_by: Some(set_by.clone()),
                        set_at: set_at.parse().ok(),
                    });
                }

                Reply::none()
            }
            RPL_WHOISUSER => {
                if let [_, nick, user, host, _, realname, ..] = &args[..] {
                    let entry = self.whois_entry(nick);
                    entry.user = Some(user.clone());
                    entry.host = Some(host.clone());
                    entry.realname = Some(realname.clone());
                }

                Reply::none()
            }
            RPL_WHOISSERVER => {
                if let [_, nick, server, rest @ ..] = &args[..] {
                    let entry = self.whois_entry(nick);
                    entry.server = Some(server.clone());
                    entry.server_info = rest.first().cloned();
                }

                Reply::none()
            }
            RPL_WHOISOPERATOR => {
                if let [_, nick, text, ..] = &args[..] {
                    self.whois_entry(nick).operator = Some(text.clone());
                }

                Reply::none()
            }
            RPL_WHOISIDLE => {
                if let [_, nick, idle, ..] = &args[..] {
                    self.whois_entry(nick).idle = Some(idle.clone());
                }

                Reply::none()
            }
            RPL_WHOISCHANNELS => {
                if let [_, nick, channels, ..] = &args[..] {
                    self.whois_entry(nick).channels =
                        channels.split_whitespace().map(String::from).collect();
                }

                Reply::none()
            }
            // Away text joins the aggregate only while one is collecting
            RPL_AWAY => {
                if let [_, nick, text, ..] = &args[..]
                    && let Some(entry) = self.whois.get_mut(nick.as_str())
                {
                    entry.away = Some(text.clone());
                }

                Reply::none()
            }
            RPL_ENDOFWHOIS => {
                let [_, nick, ..] = &args[..] else {
                    return Reply::none();
                };

                let mut info =
                    self.whois.remove(nick.as_str()).unwrap_or_default();
                info.nick = nick.clone();

                Reply::event(Event::Whois(info))
            }
            _ => Reply::event(Event::Raw(Message {
                source,
                command: Command::Numeric(numeric, args),
            })),
        }
    }

    fn whois_entry(&mut self, nick: &str) -> &mut Whois {
        self.whois.entry(nick.to_string()).or_insert_with(|| Whois {
            nick: nick.to_string(),
            ..Whois::default()
        })
    }

    fn remove_from_all(&mut self, nick: &str) -> Vec<String> {
        let mut affected = vec![];

        for channel in self.channels.values_mut() {
            if channel.users.remove(nick) {
                affected.push(channel.name.clone());
            }
        }

        affected
    }
}

fn source_name(source: &Option<Source>) -> Option<String> {
    match source {
        Some(Source::User(user)) => Some(user.nickname.clone()),
        Some(Source::Server(host)) => Some(host.clone()),
        None => None,
    }
}

#[cfg(test)]
mod test {
    use proto::parse;

    use super::{Config, Event, Session, Whois};

    fn session() -> Session {
        Session::new(Config {
            nickname: "alice".to_string(),
            username: "alice".to_string(),
            realname: "Alice".to_string(),
            password: None,
        })
    }

    fn receive(session: &mut Session, line: &str) -> super::Reply {
        let message = parse::message(&format!("{line}\r\n")).unwrap();
        session.receive(message)
    }

    fn wire(reply: &super::Reply) -> Vec<String> {
        reply
            .outgoing
            .iter()
            .cloned()
            .map(proto::format::message)
            .collect()
    }

    #[test]
    fn registration_handshake() {
        let session = session();
        assert_eq!(
            session
                .registration()
                .into_iter()
                .map(proto::format::message)
                .collect::<Vec<_>>(),
            vec!["NICK alice\r\n", "USER alice 0 * Alice\r\n"]
        );

        let session = Session::new(Config {
            password: Some("hunter2".to_string()),
            ..session.config
        });
        assert_eq!(
            session
                .registration()
                .into_iter()
                .map(proto::format::message)
                .collect::<Vec<_>>(),
            vec![
                "PASS hunter2\r\n",
                "NICK alice\r\n",
                "USER alice 0 * Alice\r\n"
            ]
        );
    }

    #[test]
    fn auto_pong() {
        let mut session = session();
        let reply = receive(&mut session, "PING :1f8f95aa");

        assert!(reply.events.is_empty());
        assert_eq!(wire(&reply), vec!["PONG 1f8f95aa\r\n"]);
    }

    #[test]
    fn nick_in_use_retries_with_suffix() {
        let mut session = session();

        let reply = receive(
            &mut session,
            ":irc.example.com 433 * alice :Nickname is already in use.",
        );
        assert_eq!(wire(&reply), vec!["NICK alice1\r\n"]);

        let reply = receive(
            &mut session,
            ":irc.example.com 433 * alice1 :Nickname is already in use.",
        );
        assert_eq!(wire(&reply), vec!["NICK alice2\r\n"]);

        let reply =
            receive(&mut session, ":irc.example.com 001 alice2 :Welcome alice2");
        assert_eq!(
            reply.events,
            vec![Event::Registered {
                nick: "alice2".to_string(),
                message: "Welcome alice2".to_string(),
            }]
        );
        assert_eq!(session.nickname(), "alice2");
        assert!(session.is_registered());

        // Once registered, 433 falls through untouched
        let reply = receive(
            &mut session,
            ":irc.example.com 433 alice2 carol :Nickname is already in use.",
        );
        assert!(reply.outgoing.is_empty());
        assert!(matches!(reply.events[..], [Event::Raw(_)]));
    }

    #[test]
    fn names_accumulate_and_strip_prefixes() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");
        receive(
            &mut session,
            ":irc.example.com 353 alice = #general :alice @bob",
        );
        receive(
            &mut session,
            ":irc.example.com 353 alice = #general :+carol ~dan",
        );

        let reply =
            receive(&mut session, ":irc.example.com 366 alice #general :End");
        assert_eq!(
            reply.events,
            vec![Event::Names {
                channel: "#general".to_string(),
                users: vec![
                    "alice".to_string(),
                    "bob".to_string(),
                    "carol".to_string(),
                    "dan".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn join_and_part_track_membership() {
        let mut session = session();

        let reply = receive(&mut session, ":alice!a@localhost JOIN #general");
        assert_eq!(
            reply.events,
            vec![Event::Join {
                channel: "#general".to_string(),
                nick: "alice".to_string(),
            }]
        );

        receive(&mut session, ":bob!b@localhost JOIN #general");

        let reply = receive(&mut session, ":bob!b@localhost QUIT :bye");
        assert_eq!(
            reply.events,
            vec![Event::Quit {
                nick: "bob".to_string(),
                reason: Some("bye".to_string()),
                channels: vec!["#general".to_string()],
            }]
        );

        let reply =
            receive(&mut session, ":alice!a@localhost PART #general :done");
        assert_eq!(
            reply.events,
            vec![Event::Part {
                channel: "#general".to_string(),
                nick: "alice".to_string(),
                reason: Some("done".to_string()),
            }]
        );
        assert!(session.who_refresh().is_empty());
    }

    #[test]
    fn kick_removes_membership() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");
        receive(&mut session, ":bob!b@localhost JOIN #general");

        let reply = receive(
            &mut session,
            ":op!o@localhost KICK #general bob :flooding",
        );
        assert_eq!(
            reply.events,
            vec![Event::Kick {
                channel: "#general".to_string(),
                nick: "bob".to_string(),
                by: "op".to_string(),
                reason: Some("flooding".to_string()),
            }]
        );

        // Bob is gone, so his quit affects nothing
        let reply = receive(&mut session, ":bob!b@localhost QUIT :bye");
        assert_eq!(
            reply.events,
            vec![Event::Quit {
                nick: "bob".to_string(),
                reason: Some("bye".to_string()),
                channels: vec![],
            }]
        );

        receive(&mut session, ":op!o@localhost KICK #general alice :out");
        assert!(session.who_refresh().is_empty());
    }

    #[test]
    fn nick_change_renames_across_channels() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");
        receive(&mut session, ":alice!a@localhost JOIN #work");
        receive(&mut session, ":bob!b@localhost JOIN #general");
        receive(&mut session, ":bob!b@localhost JOIN #work");

        let reply = receive(&mut session, ":bob!b@localhost NICK :carol");
        assert_eq!(
            reply.events,
            vec![Event::NickChanged {
                old: "bob".to_string(),
                new: "carol".to_string(),
                channels: vec!["#general".to_string(), "#work".to_string()],
            }]
        );

        let reply = receive(&mut session, ":alice!a@localhost NICK :alice_");
        assert!(matches!(reply.events[..], [Event::NickChanged { .. }]));
        assert_eq!(session.nickname(), "alice_");
    }

    #[test]
    fn ctcp_action_reclassified() {
        let mut session = session();

        let reply = receive(
            &mut session,
            ":dan!d@localhost PRIVMSG #general :\u{1}ACTION waves\u{1}",
        );
        assert_eq!(
            reply.events,
            vec![Event::Action {
                from: "dan".to_string(),
                target: "#general".to_string(),
                text: "waves".to_string(),
            }]
        );

        let reply =
            receive(&mut session, ":dan!d@localhost PRIVMSG #general :hello");
        assert_eq!(
            reply.events,
            vec![Event::Message {
                from: "dan".to_string(),
                target: "#general".to_string(),
                text: "hello".to_string(),
            }]
        );
    }

    #[test]
    fn say_mirrors_self_message() {
        let session = session();

        let reply = session.say("#general", "hello");
        assert_eq!(
            reply.events,
            vec![Event::SelfMessage {
                target: "#general".to_string(),
                text: "hello".to_string(),
            }]
        );
        assert_eq!(wire(&reply), vec!["PRIVMSG #general hello\r\n"]);

        // Action mirrors keep the marker for downstream reclassification
        let reply = session.action("#general", "waves");
        assert_eq!(
            reply.events,
            vec![Event::SelfMessage {
                target: "#general".to_string(),
                text: "\u{1}ACTION waves\u{1}".to_string(),
            }]
        );
        assert_eq!(
            wire(&reply),
            vec!["PRIVMSG #general :\u{1}ACTION waves\u{1}\r\n"]
        );
    }

    #[test]
    fn topic_via_numerics() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");

        let reply = receive(
            &mut session,
            ":irc.example.com 332 alice #general :stand-up at 9",
        );
        assert!(reply.events.is_empty());

        let reply = receive(
            &mut session,
            ":irc.example.com 333 alice #general dan 1700000000",
        );
        assert_eq!(
            reply.events,
            vec![Event::Topic {
                channel: "#general".to_string(),
                topic: Some("stand-up at 9".to_string()),
                set_by: Some("dan".to_string()),
                set_at: Some(1_700_000_000),
            }]
        );
    }

    #[test]
    fn topic_without_whotime_flushes_at_endofnames() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");
        receive(
            &mut session,
            ":irc.example.com 332 alice #general :stand-up at 9",
        );
        receive(
            &mut session,
            ":irc.example.com 353 alice = #general :alice",
        );

        let reply =
            receive(&mut session, ":irc.example.com 366 alice #general :End");
        assert_eq!(
            reply.events,
            vec![
                Event::Names {
                    channel: "#general".to_string(),
                    users: vec!["alice".to_string()],
                },
                Event::Topic {
                    channel: "#general".to_string(),
                    topic: Some("stand-up at 9".to_string()),
                    set_by: None,
                    set_at: None,
                },
            ]
        );
    }

    #[test]
    fn live_topic_emits_immediately() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");

        let reply = receive(
            &mut session,
            ":dan!d@localhost TOPIC #general :lunch moved",
        );
        assert_eq!(
            reply.events,
            vec![Event::Topic {
                channel: "#general".to_string(),
                topic: Some("lunch moved".to_string()),
                set_by: Some("dan".to_string()),
                set_at: None,
            }]
        );
    }

    #[test]
    fn whois_aggregates_until_endofwhois() {
        let mut session = session();

        receive(
            &mut session,
            ":irc.example.com 311 alice bob b host.example.com * :Bob",
        );
        receive(
            &mut session,
            ":irc.example.com 312 alice bob irc.example.com :Example server",
        );
        receive(
            &mut session,
            ":irc.example.com 319 alice bob :@#general #work",
        );
        receive(&mut session, ":irc.example.com 301 alice bob :on holiday");

        let reply =
            receive(&mut session, ":irc.example.com 318 alice bob :End");
        assert_eq!(
            reply.events,
            vec![Event::Whois(Whois {
                nick: "bob".to_string(),
                user: Some("b".to_string()),
                host: Some("host.example.com".to_string()),
                realname: Some("Bob".to_string()),
                server: Some("irc.example.com".to_string()),
                server_info: Some("Example server".to_string()),
                channels: vec!["@#general".to_string(), "#work".to_string()],
                away: Some("on holiday".to_string()),
                ..Whois::default()
            })]
        );

        // A bare 318 still produces an event naming the nick
        let reply =
            receive(&mut session, ":irc.example.com 318 alice carol :End");
        assert_eq!(
            reply.events,
            vec![Event::Whois(Whois {
                nick: "carol".to_string(),
                ..Whois::default()
            })]
        );
    }

    #[test]
    fn away_outside_whois_is_dropped() {
        let mut session = session();

        let reply =
            receive(&mut session, ":irc.example.com 301 alice bob :afk");
        assert!(reply.events.is_empty());
        assert!(reply.outgoing.is_empty());
    }

    #[test]
    fn unhandled_numerics_fall_through_raw() {
        let mut session = session();

        let reply = receive(
            &mut session,
            ":irc.example.com 352 alice #general b host.example.com irc.example.com bob G :0 Bob",
        );
        assert!(matches!(reply.events[..], [Event::Raw(_)]));
    }

    #[test]
    fn who_refresh_covers_joined_channels() {
        let mut session = session();
        receive(&mut session, ":alice!a@localhost JOIN #general");
        receive(&mut session, ":alice!a@localhost JOIN #work");

        let who: Vec<String> = session
            .who_refresh()
            .into_iter()
            .map(proto::format::message)
            .collect();
        assert_eq!(who, vec!["WHO #general\r\n", "WHO #work\r\n"]);
    }
}
