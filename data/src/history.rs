//! Plain-text transcripts, one file per server, channel and day.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::environment;
use crate::event::Event;
use crate::serde::iso8601;
use crate::server::Server;

/// Appends whatever transcript lines the event carries. Events without a
/// transcript representation are a no-op.
pub async fn record(event: &Event) -> Result<(), Error> {
    let Some(timestamp) = event.timestamp() else {
        return Ok(());
    };

    for (channel, summary) in event.transcript_lines() {
        let line = line(timestamp, &summary);
        append(event.server(), &channel, timestamp, line.as_bytes()).await?;
    }

    Ok(())
}

pub fn line(timestamp: DateTime<Utc>, summary: &str) -> String {
    format!("[{}] {summary}\n", timestamp.format(iso8601::FORMAT))
}

async fn append(
    server: &Server,
    channel: &str,
    timestamp: DateTime<Utc>,
    line: &[u8],
) -> Result<(), Error> {
    let path = path(server, channel, timestamp);

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(line).await?;

    Ok(())
}

fn path(server: &Server, channel: &str, timestamp: DateTime<Utc>) -> PathBuf {
    environment::data_dir()
        .join("logs")
        .join(server.name.as_ref())
        .join(channel)
        .join(format!("{}.txt", timestamp.format("%Y-%m-%d")))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
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
    fn line_format() {
        assert_eq!(
            line(stamp(), "<alice> hi"),
            "[2024-01-01T00:00:00.000Z] <alice> hi\n"
        );
    }

    #[test]
    fn path_is_per_server_channel_and_day() {
        let path = path(&Server::from("irc.example.com"), "#general", stamp());

        assert!(path.ends_with("logs/irc.example.com/#general/2024-01-01.txt"));
    }
}
