mod logger;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use data::Server;
use data::client::Pool;
use data::command::Inbound;
use data::config::Config;
use data::event::Event;
use data::history;
use data::stream::Update;
use futures::channel::mpsc;
use futures::{StreamExt, future, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const UPDATE_BUFFER: usize = 128;

enum Input {
    Command(io::Result<String>),
    Closed,
    Update(Update),
}

pub fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    let is_debug = true;
    #[cfg(not(debug_assertions))]
    let is_debug = false;

    logger::setup(is_debug).context("setup logging")?;
    log::info!("backchat ({VERSION}) has started");

    let config = Config::load_or_default();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start runtime")?
        .block_on(run(config));

    Ok(())
}

async fn run(config: Config) {
    let (updates, update_receiver) = mpsc::channel(UPDATE_BUFFER);
    let (sink, mut events) = mpsc::unbounded();

    let mut pool = Pool::new(updates, sink);

    for server in config.servers {
        if let Err(e) = pool.add(Arc::new(server)) {
            log::warn!("{e}");
        }
    }
    forward(&mut events).await;

    // One JSON command per stdin line; the trailing marker turns EOF
    // into an orderly quit.
    let commands = LinesStream::new(BufReader::new(tokio::io::stdin()).lines())
        .map(Input::Command)
        .chain(stream::once(future::ready(Input::Closed)));

    let mut inputs =
        stream::select(commands, update_receiver.map(Input::Update));

    let mut closing = false;

    while let Some(input) = inputs.next().await {
        match input {
            Input::Command(Ok(line)) => dispatch(&mut pool, &line),
            Input::Command(Err(e)) => {
                log::warn!("could not read command: {e}");
            }
            Input::Closed => {
                closing = true;
                pool.quit_all();
            }
            Input::Update(update) => pool.update(update),
        }

        forward(&mut events).await;

        if closing && pool.connected_count() == 0 {
            break;
        }
    }

    log::info!("backchat has stopped");
}

fn dispatch(pool: &mut Pool, line: &str) {
    let line = line.trim();

    if line.is_empty() {
        return;
    }

    let command = match serde_json::from_str::<Inbound>(line) {
        Ok(command) => command,
        Err(e) => {
            log::warn!("discarded malformed command: {e}");
            return;
        }
    };

    let result = match command {
        Inbound::SendMessage {
            server_url,
            to_user_or_channel,
            message_text,
        } => pool.send_message(
            &Server::from(server_url.as_str()),
            &to_user_or_channel,
            &message_text,
        ),
        Inbound::LeaveChannel {
            server_url,
            channel_name,
        } => {
            pool.leave_channel(&Server::from(server_url.as_str()), &channel_name)
        }
        Inbound::RefreshUserStatusesForChannel {
            server_url,
            channel_name,
        } => pool.refresh_channel_statuses(
            &Server::from(server_url.as_str()),
            &channel_name,
        ),
        Inbound::RefreshUserStatus { server_url, nick } => {
            pool.refresh_user_status(&Server::from(server_url.as_str()), &nick)
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
    }
}

/// Drains every queued event to stdout as one JSON object per line,
/// recording channel traffic to the transcripts as it goes.
async fn forward(events: &mut mpsc::UnboundedReceiver<Event>) {
    let mut stdout = io::stdout();

    while let Ok(Some(event)) = events.try_next() {
        match serde_json::to_string(&event) {
            Ok(json) => {
                if let Err(e) = writeln!(stdout, "{json}") {
                    log::error!("could not write event: {e}");
                }
            }
            Err(e) => log::error!("could not serialize event: {e}"),
        }

        if let Err(e) = history::record(&event).await {
            log::warn!("could not record transcript: {e}");
        }
    }

    let _ = stdout.flush();
}
