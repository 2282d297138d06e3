//! Message-identity store.
//!
//! A logical recurring message (say, the status board) is identified by a
//! `(name, namespace)` key; the store maps that key to the remote message IDs
//! currently displaying it. That mapping is what lets the bot edit a
//! recurring message in place instead of reposting it, across process
//! restarts.

use rusqlite::{params, OptionalExtension};

use crate::messaging::RemoteMessageId;
use crate::Result;

use super::Database;

pub const DEFAULT_NAMESPACE: &str = "global";

/// One logical recurring message and its current remote representation.
///
/// A logical message may span multiple remote messages when its content
/// exceeds one message's capacity, hence the list.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageIdentity {
    pub id: i64,
    pub name: String,
    pub namespace: String,
    pub remote_ids: Vec<RemoteMessageId>,
}

/// Store capability for message identities.
pub trait MessageIdentityStore: Send + Sync {
    /// Looks up an identity by key. Absence is a normal outcome, not an error.
    fn get(&self, name: &str, namespace: &str) -> Result<Option<MessageIdentity>>;

    fn get_by_id(&self, id: i64) -> Result<Option<MessageIdentity>>;

    /// Upserts the identity and replaces its remote IDs wholesale.
    ///
    /// An empty `remote_ids` clears the mapping but keeps the identity row;
    /// rows are never deleted here. Idempotent: calling twice with the same
    /// arguments leaves the same persisted state.
    fn set(
        &self,
        name: &str,
        namespace: &str,
        remote_ids: &[RemoteMessageId],
    ) -> Result<MessageIdentity>;
}

const SELECT_BY_KEY: &str = "
    select msg.id, msg.name, msg.namespace, msg_component.remote_id from msg
    left join msg_component on msg_component.msg_id = msg.id
    where msg.name = ?1 and msg.namespace = ?2
    order by msg_component.rowid;
";

const SELECT_BY_ID: &str = "
    select msg.id, msg.name, msg.namespace, msg_component.remote_id from msg
    left join msg_component on msg_component.msg_id = msg.id
    where msg.id = ?1
    order by msg_component.rowid;
";

type IdentityRow = (i64, String, String, Option<String>);

fn collect_identity(rows: Vec<IdentityRow>) -> Option<MessageIdentity> {
    let (id, name, namespace, _) = rows.first()?.clone();
    Some(MessageIdentity {
        id,
        name,
        namespace,
        remote_ids: rows
            .into_iter()
            .filter_map(|(_, _, _, remote_id)| remote_id.map(RemoteMessageId))
            .collect(),
    })
}

impl MessageIdentityStore for Database {
    fn get(&self, name: &str, namespace: &str) -> Result<Option<MessageIdentity>> {
        let rows = self.query_rows(SELECT_BY_KEY, params![name, namespace], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;
        Ok(collect_identity(rows))
    }

    fn get_by_id(&self, id: i64) -> Result<Option<MessageIdentity>> {
        let rows = self.query_rows(SELECT_BY_ID, params![id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;
        Ok(collect_identity(rows))
    }

    fn set(
        &self,
        name: &str,
        namespace: &str,
        remote_ids: &[RemoteMessageId],
    ) -> Result<MessageIdentity> {
        const SELECT_ID: &str = "select id from msg where name = ?1 and namespace = ?2;";
        const INSERT_IDENTITY: &str = "insert into msg (name, namespace) values (?1, ?2);";
        const DELETE_COMPONENTS: &str = "delete from msg_component where msg_id = ?1;";
        const INSERT_COMPONENT: &str =
            "insert into msg_component (msg_id, remote_id) values (?1, ?2);";

        // The delete + bulk insert must be one atomic unit: a concurrent
        // reader must never observe a partially cleared component set.
        {
            let mut conn = self.lock();
            let tx = conn.transaction()?;

            let lookup = |tx: &rusqlite::Transaction<'_>| -> Result<Option<i64>> {
                Ok(tx
                    .query_row(SELECT_ID, params![name, namespace], |row| row.get(0))
                    .optional()?)
            };

            self.log_statement(SELECT_ID);
            let id = match lookup(&tx)? {
                Some(id) => id,
                None => {
                    // Insert, then re-read: the identity only exists once the
                    // re-read finds it.
                    self.log_statement(INSERT_IDENTITY);
                    tx.execute(INSERT_IDENTITY, params![name, namespace])?;
                    lookup(&tx)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?
                }
            };

            self.log_statement(DELETE_COMPONENTS);
            tx.execute(DELETE_COMPONENTS, params![id])?;

            self.log_statement(INSERT_COMPONENT);
            {
                let mut insert = tx.prepare(INSERT_COMPONENT)?;
                for remote_id in remote_ids {
                    insert.execute(params![id, remote_id.0])?;
                }
            }

            tx.commit()?;
        }

        self.get(name, namespace)?
            .ok_or_else(|| crate::Error::Db(rusqlite::Error::QueryReturnedNoRows))
    }
}
