#![allow(clippy::large_enum_variant)]

pub use self::command::Command;
pub use self::config::Config;
pub use self::event::Event;
pub use self::server::Server;
pub use self::user::Nick;

pub mod client;
pub mod command;
pub mod config;
pub mod environment;
pub mod event;
pub mod history;
pub mod serde;
pub mod server;
pub mod stream;
pub mod user;
