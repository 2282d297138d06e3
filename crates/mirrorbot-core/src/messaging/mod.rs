pub mod port;
pub mod types;

pub use port::RemoteSink;
pub use types::{LogChannel, OutgoingMessage, RemoteMessageId};
