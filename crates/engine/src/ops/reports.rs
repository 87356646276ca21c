use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Statement, TransactionTrait};

use crate::{EngineError, MoneyCents, ResultEngine};

use super::{Engine, with_tx};

/// System-wide totals for the operations dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryReport {
    pub total_cards: i64,
    pub total_customers: i64,
    pub total_trips: i64,
    pub total_cases: i64,
    pub total_tap_entries: i64,
    pub total_balance: MoneyCents,
    pub generated_at: DateTime<Utc>,
}

impl Engine {
    /// Aggregate counts and the outstanding stored value, in one statement
    /// so the numbers are a consistent snapshot.
    pub async fn summary(&self) -> ResultEngine<SummaryReport> {
        with_tx!(self, |db_tx| {
            let row = db_tx
                .query_one(Statement::from_string(
                    db_tx.get_database_backend(),
                    "SELECT \
                       (SELECT COUNT(*) FROM cards) AS total_cards, \
                       (SELECT COUNT(*) FROM customers) AS total_customers, \
                       (SELECT COUNT(*) FROM trips) AS total_trips, \
                       (SELECT COUNT(*) FROM cases) AS total_cases, \
                       (SELECT COUNT(*) FROM tap_history) AS total_tap_entries, \
                       (SELECT COALESCE(SUM(balance_minor), 0) FROM cards) AS total_balance;",
                ))
                .await?
                .ok_or_else(|| {
                    EngineError::Database(sea_orm::DbErr::Custom(
                        "summary aggregate returned no row".to_string(),
                    ))
                })?;

            Ok(SummaryReport {
                total_cards: row.try_get("", "total_cards")?,
                total_customers: row.try_get("", "total_customers")?,
                total_trips: row.try_get("", "total_trips")?,
                total_cases: row.try_get("", "total_cases")?,
                total_tap_entries: row.try_get("", "total_tap_entries")?,
                total_balance: MoneyCents::new(row.try_get("", "total_balance")?),
                generated_at: Utc::now(),
            })
        })
    }
}
