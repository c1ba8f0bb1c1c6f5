pub use self::codec::Codec;
pub use self::connection::Connection;
pub use self::session::{Event, Reply, Session, Whois};

pub mod codec;
pub mod connection;
mod invalid_cert_verifier;
pub mod session;
pub use proto;
