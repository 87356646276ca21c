//! Durable identifier allocation.
//!
//! The next sequence number is derived from the ids already in storage,
//! inside the caller's transaction. Counting rows would reuse ids after a
//! delete; a process-local counter would reuse them after a restart. Taking
//! `max(suffix) + 1` survives both.

use sea_orm::{ConnectionTrait, DatabaseTransaction, Statement};

use crate::{IdKind, ResultEngine};

use super::Engine;

fn table(kind: IdKind) -> &'static str {
    match kind {
        IdKind::Customer => "customers",
        IdKind::Card => "cards",
        IdKind::Case => "cases",
        IdKind::Trip => "trips",
        IdKind::Tap => "tap_history",
    }
}

impl Engine {
    /// Allocates the next id of `kind` within `db`'s transaction.
    ///
    /// Ids that match the prefix but not the allocator format (externally
    /// supplied card or trip ids) are skipped; the primary key still guards
    /// against a collision with them at insert time.
    pub(super) async fn next_id(
        &self,
        db: &DatabaseTransaction,
        kind: IdKind,
    ) -> ResultEngine<String> {
        let rows = db
            .query_all(Statement::from_sql_and_values(
                db.get_database_backend(),
                format!("SELECT id FROM {} WHERE id LIKE ?;", table(kind)),
                vec![format!("{}%", kind.prefix()).into()],
            ))
            .await?;

        let mut max_seq = 0u64;
        for row in rows {
            let id: String = row.try_get("", "id")?;
            if let Ok(seq) = kind.sequence_of(&id) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(kind.format(max_seq + 1))
    }
}
