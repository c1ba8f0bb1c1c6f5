use std::time::Duration;

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt, future, stream};
use irc::proto::{self, command};
use irc::{Codec, Connection, Session, connection, session};
use tokio::time::{self, Instant};
use tokio_stream::wrappers::IntervalStream;

use crate::config;
use crate::server::{self, Server};

/// Away-status WHO poll cadence once a connection is live.
const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Commands accepted by a running server task.
#[derive(Debug, PartialEq)]
pub enum Request {
    Join {
        channel: String,
        key: Option<String>,
    },
    Part {
        channel: String,
    },
    Say {
        target: String,
        text: String,
    },
    Action {
        target: String,
        text: String,
    },
    Who(String),
    Send(proto::Message),
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Update {
    Events(Server, Vec<irc::Event>),
    ConnectionFailed {
        server: Server,
        error: String,
    },
    Disconnected {
        server: Server,
        error: Option<String>,
    },
}

enum Input {
    Received(Result<irc::codec::ParseResult, irc::codec::Error>),
    Request(Request),
    Tick,
    Closed,
}

/// Drives one server connection to completion: registration, then a
/// single loop over socket lines, pool requests and the presence ticker.
/// Everything stateful lives in the [`Session`]; the task only moves
/// messages between it and the wire.
pub async fn run(
    entry: server::Entry,
    receiver: mpsc::Receiver<Request>,
    mut sender: mpsc::Sender<Update>,
) {
    let server::Entry { server, config } = entry;

    let connection = match connect(&config).await {
        Ok(connection) => connection,
        Err(e) => {
            let _ = sender
                .send(Update::ConnectionFailed {
                    server,
                    error: e.to_string(),
                })
                .await;
            return;
        }
    };

    log::info!("[{server}] connected");

    let mut session = Session::new(session::Config {
        nickname: config.nick.clone(),
        username: config.user_name().to_string(),
        realname: config.real_name().to_string(),
        password: config.password.clone(),
    });

    let (mut writer, reader) = connection.split();

    for message in session.registration() {
        if let Err(e) = writer.send(message).await {
            let _ = sender
                .send(Update::Disconnected {
                    server,
                    error: Some(e.to_string()),
                })
                .await;
            return;
        }
    }

    // The socket closing must end the loop even though the other inputs
    // keep pending, hence the explicit trailer.
    let socket = reader
        .map(Input::Received)
        .chain(stream::once(future::ready(Input::Closed)));
    let ticker = IntervalStream::new(time::interval_at(
        Instant::now() + REFRESH_INTERVAL,
        REFRESH_INTERVAL,
    ));

    let mut inputs = stream::select(
        socket,
        stream::select(
            receiver.map(Input::Request),
            ticker.map(|_| Input::Tick),
        ),
    );

    let mut error = None;

    'live: while let Some(input) = inputs.next().await {
        let (outgoing, events) = match input {
            Input::Received(Ok(Ok(message))) => {
                let reply = session.receive(message);
                (reply.outgoing, reply.events)
            }
            Input::Received(Ok(Err(e))) => {
                log::warn!("[{server}] dropped malformed line: {e}");
                continue;
            }
            Input::Received(Err(e)) => {
                error = Some(e.to_string());
                break 'live;
            }
            Input::Request(request) => match request {
                Request::Join { channel, key } => {
                    let join = match key {
                        Some(key) => command!("JOIN", channel, key),
                        None => command!("JOIN", channel),
                    };
                    (vec![join], vec![])
                }
                Request::Part { channel } => {
                    (vec![command!("PART", channel)], vec![])
                }
                Request::Say { target, text } => {
                    let reply = session.say(&target, &text);
                    (reply.outgoing, reply.events)
                }
                Request::Action { target, text } => {
                    let reply = session.action(&target, &text);
                    (reply.outgoing, reply.events)
                }
                Request::Who(target) => (vec![command!("WHO", target)], vec![]),
                Request::Send(message) => (vec![message], vec![]),
                Request::Quit => {
                    let _ = writer.send(command!("QUIT")).await;
                    let _ = writer.close().await;
                    break 'live;
                }
            },
            Input::Tick if session.is_registered() => {
                (session.who_refresh(), vec![])
            }
            Input::Tick => continue,
            Input::Closed => break 'live,
        };

        for message in outgoing {
            if let Err(e) = writer.send(message).await {
                error = Some(e.to_string());
                break 'live;
            }
        }

        if !events.is_empty() {
            let _ = sender
                .send(Update::Events(server.clone(), events))
                .await;
        }
    }

    let _ = sender.send(Update::Disconnected { server, error }).await;
}

async fn connect(
    config: &config::Server,
) -> Result<Connection<Codec>, connection::Error> {
    let security = if config.secure {
        connection::Security::Secured {
            accept_invalid_certs: config.accept_invalid_certs,
        }
    } else {
        connection::Security::Unsecured
    };

    Connection::new(
        connection::Config {
            server: &config.url,
            port: config.port,
            security,
        },
        Codec,
    )
    .await
}
