//! Recurring messages: post once, edit in place afterwards.
//!
//! A recurring message (e.g. the status board) keeps its position in the
//! channel across updates and process restarts. The identity store remembers
//! which remote messages currently display it; updates edit those in place
//! when possible and only repost when the shape of the content changed.

use std::sync::Arc;

use crate::db::MessageIdentityStore;
use crate::grouping::MessageGroup;
use crate::messaging::{LogChannel, RemoteSink};
use crate::Result;

/// Handle to one recurring logical message.
pub struct RecurringMessage {
    name: String,
    namespace: String,
    channel: LogChannel,
    store: Arc<dyn MessageIdentityStore>,
    sink: Arc<dyn RemoteSink>,
}

impl RecurringMessage {
    pub fn new(
        store: Arc<dyn MessageIdentityStore>,
        sink: Arc<dyn RemoteSink>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        channel: LogChannel,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            channel,
            store,
            sink,
        }
    }

    /// Publishes the current content.
    ///
    /// When the stored remote-ID count matches the group count, each remote
    /// message is edited in place. Otherwise fresh messages are sent and the
    /// stored mapping is replaced with the new IDs.
    pub async fn publish(&self, groups: Vec<MessageGroup>) -> Result<()> {
        let existing = self
            .store
            .get(&self.name, &self.namespace)?
            .map(|identity| identity.remote_ids)
            .unwrap_or_default();

        if !existing.is_empty() && existing.len() == groups.len() {
            for (id, group) in existing.iter().zip(groups) {
                self.sink.edit(self.channel, id, group.into()).await?;
            }
            return Ok(());
        }

        let mut new_ids = Vec::with_capacity(groups.len());
        for group in groups {
            new_ids.push(self.sink.send(self.channel, group.into()).await?);
        }
        self.store.set(&self.name, &self.namespace, &new_ids)?;
        Ok(())
    }
}
