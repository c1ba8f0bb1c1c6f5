//! Connection pool: one task per configured server, with every wire
//! event normalized into the outbound [`Event`] vocabulary here.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::channel::mpsc;
use irc::proto::{self, Command, Numeric, casemap, ctcp};
use thiserror::Error;

use crate::command;
use crate::config;
use crate::event::{Event, WhoisInfo};
use crate::server::{Entry, Handle, Server};
use crate::stream::{self, Request, Update};
use crate::user::Nick;

/// Pseudo-user handling authentication. Traffic addressed to it never
/// reaches the event surface.
const NICKSERV: &str = "NickServ";

const REQUEST_BUFFER: usize = 64;

pub struct Pool {
    connections: BTreeMap<Server, State>,
    updates: mpsc::Sender<Update>,
    sink: mpsc::UnboundedSender<Event>,
}

pub enum State {
    Disconnected { config: Arc<config::Server> },
    Ready(Connection),
}

pub struct Connection {
    handle: Handle,
    config: Arc<config::Server>,
    nick: String,
    registered: bool,
    // Keyed by casemapped channel name
    channels: BTreeMap<String, Membership>,
    // Join keys remembered per casemapped channel name
    passwords: HashMap<String, String>,
}

/// Per-channel bookkeeping. Entries are never removed once created;
/// parting merely flips `unjoined`.
#[derive(Debug, Default)]
pub struct Membership {
    pub topic: Option<String>,
    pub users: BTreeSet<Nick>,
    pub unjoined: bool,
}

impl Connection {
    fn new(handle: Handle, config: Arc<config::Server>) -> Self {
        let nick = config.nick.clone();
        let passwords = config
            .channel_keys
            .iter()
            .map(|(channel, key)| (casemap::fold(channel), key.clone()))
            .collect();

        Self {
            handle,
            config,
            nick,
            registered: false,
            channels: BTreeMap::new(),
            passwords,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn channels(&self) -> &BTreeMap<String, Membership> {
        &self.channels
    }

    fn request(&mut self, request: Request) {
        if let Err(e) = self.handle.try_send(request) {
            log::warn!("request dropped: {e}");
        }
    }

    fn membership(&mut self, channel: &str) -> &mut Membership {
        self.channels.entry(casemap::fold(channel)).or_default()
    }

    /// An explicit key always overwrites the remembered one; without
    /// one, any remembered key is resupplied.
    fn join(&mut self, channel: String, key: Option<String>) {
        if let Some(key) = &key {
            self.passwords.insert(casemap::fold(&channel), key.clone());
        }

        let key =
            key.or_else(|| self.passwords.get(&casemap::fold(&channel)).cloned());

        self.request(Request::Join { channel, key });
    }
}

impl Pool {
    pub fn new(
        updates: mpsc::Sender<Update>,
        sink: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            connections: BTreeMap::new(),
            updates,
            sink,
        }
    }

    /// Registers a server and, unless `autoConnect` is off, starts its
    /// connection task.
    pub fn add(&mut self, config: Arc<config::Server>) -> Result<(), Error> {
        let server = Server::from(config.url.as_str());

        if self.connections.contains_key(&server) {
            return Err(Error::AlreadyConnected(server));
        }

        let auto_connect = config.auto_connect;
        self.connections
            .insert(server.clone(), State::Disconnected { config });

        if auto_connect {
            self.connect(&server)?;
        }

        Ok(())
    }

    /// Starts the connection task for a known, currently disconnected
    /// server. The connecting notice goes out before the network
    /// attempt begins.
    pub fn connect(&mut self, server: &Server) -> Result<(), Error> {
        let config = match self.connections.get(server) {
            Some(State::Disconnected { config }) => config.clone(),
            Some(State::Ready(_)) => {
                return Err(Error::AlreadyConnected(server.clone()));
            }
            None => return Err(Error::UnknownServer),
        };

        self.emit(Event::Connecting {
            server: server.clone(),
        });

        let (handle, receiver) = mpsc::channel(REQUEST_BUFFER);

        tokio::spawn(stream::run(
            Entry {
                server: server.clone(),
                config: config.clone(),
            },
            receiver,
            self.updates.clone(),
        ));

        self.connections.insert(
            server.clone(),
            State::Ready(Connection::new(handle, config)),
        );

        Ok(())
    }

    /// Interprets one line of input in the context of `target` and
    /// routes the outcome to the server's task.
    pub fn send_message(
        &mut self,
        server: &Server,
        target: &str,
        text: &str,
    ) -> Result<(), Error> {
        let connection = self.connection_mut(server)?;

        match command::parse(text, target) {
            command::Command::Say { target, text } => {
                connection.request(Request::Say { target, text });
            }
            command::Command::Action { target, text } => {
                connection.request(Request::Action { target, text });
            }
            command::Command::Away(reason) => {
                connection.request(Request::Send(Command::AWAY(reason).into()));
            }
            command::Command::Join { channel, key } => {
                connection.join(channel, key);
            }
            command::Command::Part { channel } => {
                connection.request(Request::Part { channel });
            }
            command::Command::Quit => connection.request(Request::Quit),
            command::Command::Raw { command, args } => {
                connection.request(Request::Send(proto::command(&command, args)));
            }
        }

        Ok(())
    }

    pub fn leave_channel(
        &mut self,
        server: &Server,
        channel: &str,
    ) -> Result<(), Error> {
        self.connection_mut(server)?.request(Request::Part {
            channel: channel.to_string(),
        });

        Ok(())
    }

    pub fn refresh_channel_statuses(
        &mut self,
        server: &Server,
        channel: &str,
    ) -> Result<(), Error> {
        self.connection_mut(server)?
            .request(Request::Who(channel.to_string()));

        Ok(())
    }

    pub fn refresh_user_status(
        &mut self,
        server: &Server,
        nick: &str,
    ) -> Result<(), Error> {
        self.connection_mut(server)?
            .request(Request::Who(nick.to_string()));

        Ok(())
    }

    pub fn quit_all(&mut self) {
        for state in self.connections.values_mut() {
            if let State::Ready(connection) = state {
                connection.request(Request::Quit);
            }
        }
    }

    pub fn connected_count(&self) -> usize {
        self.connections
            .values()
            .filter(|state| matches!(state, State::Ready(_)))
            .count()
    }

    pub fn update(&mut self, update: Update) {
        match update {
            Update::Events(server, events) => {
                for event in events {
                    self.handle_event(&server, event);
                }
            }
            Update::ConnectionFailed { server, error } => {
                log::warn!("[{server}] connection failed: {error}");
                self.disconnected(&server);
            }
            Update::Disconnected { server, error } => {
                match &error {
                    Some(error) => {
                        log::warn!("[{server}] connection lost: {error}");
                    }
                    None => log::info!("[{server}] disconnected"),
                }
                self.disconnected(&server);
            }
        }
    }

    fn disconnected(&mut self, server: &Server) {
        if let Some(state) = self.connections.get_mut(server)
            && let State::Ready(connection) = &*state
        {
            let config = connection.config.clone();
            *state = State::Disconnected { config };
        }
    }

    fn connection_mut(
        &mut self,
        server: &Server,
    ) -> Result<&mut Connection, Error> {
        match self.connections.get_mut(server) {
            Some(State::Ready(connection)) => Ok(connection),
            _ => Err(Error::UnknownServer),
        }
    }

    fn emit(&self, event: Event) {
        let _ = self.sink.unbounded_send(event);
    }

    fn handle_event(&mut self, server: &Server, event: irc::Event) {
        let sink = self.sink.clone();
        let timestamp = Utc::now();

        let Ok(connection) = self.connection_mut(server) else {
            return;
        };

        let emit = |event: Event| {
            let _ = sink.unbounded_send(event);
        };

        match event {
            irc::Event::Registered { nick, message } => {
                connection.registered = true;
                connection.nick = nick;

                emit(Event::Connected {
                    server: server.clone(),
                    message,
                });

                if let Some(password) = &connection.config.nick_password {
                    let text = format!("identify {password}");
                    connection.request(Request::Say {
                        target: NICKSERV.to_string(),
                        text,
                    });
                }

                for channel in connection.config.channels.clone() {
                    connection.join(channel.clone(), None);

                    emit(Event::Joining {
                        server: server.clone(),
                        channel,
                    });
                }
            }
            irc::Event::Names { channel, users } => {
                let membership = connection.membership(&channel);
                membership.users = users.into_iter().map(Nick::from).collect();

                let users = membership
                    .users
                    .iter()
                    .map(|nick| nick.as_str().to_string())
                    .collect();

                emit(Event::UsersListed {
                    server: server.clone(),
                    channel,
                    users,
                    timestamp,
                });
            }
            irc::Event::Topic {
                channel,
                topic,
                set_by,
                set_at,
            } => {
                connection.membership(&channel).topic = topic.clone();

                let set_at_timestamp = set_at
                    .and_then(|seconds| DateTime::from_timestamp(seconds as i64, 0))
                    .unwrap_or(timestamp);

                emit(Event::TopicChanged {
                    server: server.clone(),
                    channel,
                    topic,
                    set_by_nick: set_by,
                    set_at_timestamp,
                    timestamp,
                });
            }
            irc::Event::Join { channel, nick } => {
                let me = casemap::eq(&nick, &connection.nick);
                let membership = connection.membership(&channel);

                if me {
                    membership.unjoined = false;
                } else {
                    membership.users.insert(Nick::from(nick.clone()));
                }

                emit(Event::Joined {
                    server: server.clone(),
                    channel: channel.clone(),
                    user: nick,
                    my_nick: connection.nick.clone(),
                    timestamp,
                });

                // Away status refreshes on every join, not just our own
                connection.request(Request::Who(channel));
            }
            irc::Event::Part {
                channel,
                nick,
                reason,
            } => {
                let me = casemap::eq(&nick, &connection.nick);
                let membership = connection.membership(&channel);

                if me {
                    membership.unjoined = true;
                    membership.users.clear();
                } else {
                    membership.users.remove(&Nick::from(nick.as_str()));
                }

                emit(Event::Parted {
                    server: server.clone(),
                    channel,
                    user: nick,
                    reason,
                    my_nick: connection.nick.clone(),
                    timestamp,
                });
            }
            // Membership upkeep only; neither has a domain counterpart.
            irc::Event::Quit { nick, channels, .. }
            | irc::Event::Kill { nick, channels, .. } => {
                for channel in &channels {
                    if let Some(membership) =
                        connection.channels.get_mut(&casemap::fold(channel))
                    {
                        membership.users.remove(&Nick::from(nick.as_str()));
                    }
                }
            }
            irc::Event::Kick { channel, nick, .. } => {
                let me = casemap::eq(&nick, &connection.nick);
                let membership = connection.membership(&channel);

                if me {
                    membership.unjoined = true;
                    membership.users.clear();
                } else {
                    membership.users.remove(&Nick::from(nick.as_str()));
                }
            }
            irc::Event::Message { from, target, text } => {
                let target = effective_target(&connection.nick, &from, target);

                emit(Event::MessageSent {
                    server: server.clone(),
                    from_user: from,
                    to_user_or_channel: target,
                    message_text: text,
                    timestamp,
                });
            }
            irc::Event::SelfMessage { target, text } => {
                if casemap::eq(&target, NICKSERV) {
                    return;
                }

                match ctcp::parse_action(&text) {
                    Some(action) => emit(Event::ActionSent {
                        server: server.clone(),
                        from_user: connection.nick.clone(),
                        to_user_or_channel: target,
                        action_text: action.to_string(),
                        timestamp,
                    }),
                    None => emit(Event::MessageSent {
                        server: server.clone(),
                        from_user: connection.nick.clone(),
                        to_user_or_channel: target,
                        message_text: text,
                        timestamp,
                    }),
                }
            }
            // Notices have no domain counterpart
            irc::Event::Notice { .. } => {}
            irc::Event::NickChanged { old, new, channels } => {
                if casemap::eq(&old, &connection.nick) {
                    connection.nick = new.clone();
                }

                for channel in &channels {
                    if let Some(membership) =
                        connection.channels.get_mut(&casemap::fold(channel))
                    {
                        membership.users.remove(&Nick::from(old.as_str()));
                        membership.users.insert(Nick::from(new.clone()));
                    }
                }

                emit(Event::NickChanged {
                    server: server.clone(),
                    old_nick: old,
                    new_nick: new,
                    channels,
                    my_nick: connection.nick.clone(),
                    timestamp,
                });
            }
            irc::Event::Action { from, target, text } => {
                let target = effective_target(&connection.nick, &from, target);

                emit(Event::ActionSent {
                    server: server.clone(),
                    from_user: from,
                    to_user_or_channel: target,
                    action_text: text,
                    timestamp,
                });
            }
            irc::Event::Whois(info) => {
                let info = WhoisInfo::from(info);
                let nick = info.nick.clone();
                let away = info.is_away();

                emit(Event::Whois {
                    server: server.clone(),
                    info,
                    timestamp,
                });
                emit(Event::UserStatus {
                    server: server.clone(),
                    nick,
                    away,
                });
            }
            irc::Event::Raw(message) => {
                if let Some(event) = user_status(server, &message) {
                    emit(event);
                }
            }
        }
    }

    #[cfg(test)]
    fn attach(
        &mut self,
        config: Arc<config::Server>,
    ) -> (Server, mpsc::Receiver<Request>) {
        let server = Server::from(config.url.as_str());
        let (handle, receiver) = mpsc::channel(REQUEST_BUFFER);

        self.connections.insert(
            server.clone(),
            State::Ready(Connection::new(handle, config)),
        );

        (server, receiver)
    }
}

/// Direct messages route under the *sender's* nick so each conversation
/// keeps a stable key; everything else keeps its literal target.
fn effective_target(my_nick: &str, from: &str, target: String) -> String {
    if casemap::eq(&target, my_nick) {
        from.to_string()
    } else {
        target
    }
}

/// Away status arrives only as numeric replies with no higher-level
/// event: each WHO row carries a here/gone flag, and 305/306 confirm
/// the local user's own state.
fn user_status(server: &Server, message: &proto::Message) -> Option<Event> {
    let Command::Numeric(numeric, args) = &message.command else {
        return None;
    };

    match numeric {
        Numeric::RPL_WHOREPLY => Some(Event::UserStatus {
            server: server.clone(),
            nick: args.get(5)?.clone(),
            away: args.get(6)?.starts_with('G'),
        }),
        Numeric::RPL_NOWAWAY | Numeric::RPL_UNAWAY => Some(Event::UserStatus {
            server: server.clone(),
            nick: args.first()?.clone(),
            away: matches!(numeric, Numeric::RPL_NOWAWAY),
        }),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("That server is not currently connected.")]
    UnknownServer,
    #[error("{0} is already connected")]
    AlreadyConnected(Server),
}
