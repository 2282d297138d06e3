use async_trait::async_trait;

use crate::{
    messaging::types::{LogChannel, OutgoingMessage, RemoteMessageId},
    Result,
};

/// Port for the remote chat platform's log channels.
///
/// The core depends only on this shape; the concrete transport (Discord,
/// Telegram, a test double) lives in an adapter crate. Implementations are
/// expected to deliver messages to one channel in FIFO order per connection,
/// but the core does not enforce that beyond sending sequentially.
#[async_trait]
pub trait RemoteSink: Send + Sync {
    /// Posts a new message and returns its remote identifier.
    async fn send(&self, channel: LogChannel, message: OutgoingMessage) -> Result<RemoteMessageId>;

    /// Replaces the content of an existing message.
    async fn edit(
        &self,
        channel: LogChannel,
        id: &RemoteMessageId,
        message: OutgoingMessage,
    ) -> Result<()>;
}
