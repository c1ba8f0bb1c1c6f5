use std::io;

use data::config::Config;
use thiserror::Error;

pub fn setup(is_debug: bool) -> Result<(), Error> {
    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}:{} -- {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Off)
        .level_for("data", log::LevelFilter::Trace)
        .level_for("irc", log::LevelFilter::Trace)
        .level_for("backchat", log::LevelFilter::Trace);

    // Stdout carries the event stream, so diagnostics go to stderr
    // during development and to disk otherwise.
    if is_debug {
        logger = logger.chain(io::stderr());
    } else {
        use std::fs::OpenOptions;

        let log_file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(false)
            .truncate(true)
            .open(Config::config_dir().join("backchat.log"))?;

        logger = logger.chain(log_file);
    }

    logger.apply()?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("logger error: {0}")]
    Log(#[from] log::SetLoggerError),
}
