//! Atomic balance mutations.
//!
//! Every credit and debit is a single conditional `UPDATE` on the card row,
//! so the read-modify-write cannot interleave with a concurrent mutation of
//! the same card. Operations on different cards never contend with each
//! other. The card row is the only authority on a balance; nothing is cached
//! outside storage.

use sea_orm::{ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait};

use crate::{EngineError, MoneyCents, ResultEngine};

use super::{Engine, require_positive, with_tx};

impl Engine {
    /// Credit a card directly, outside any wider flow. Returns the new
    /// balance.
    pub async fn credit_card(&self, card_id: &str, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        let amount = require_positive(amount, "credit amount")?;
        with_tx!(self, |db_tx| {
            self.credit_balance(&db_tx, card_id, amount).await
        })
    }

    /// Debit a card directly, failing hard on a short balance. Returns the
    /// new balance.
    pub async fn debit_card(&self, card_id: &str, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        let amount = require_positive(amount, "debit amount")?;
        with_tx!(self, |db_tx| {
            self.debit_balance(&db_tx, card_id, amount).await
        })
    }

    /// Adds `amount` to the card's balance and returns the new balance.
    pub(super) async fn credit_balance(
        &self,
        db: &DatabaseTransaction,
        card_id: &str,
        amount: MoneyCents,
    ) -> ResultEngine<MoneyCents> {
        let result = db
            .execute(Statement::from_sql_and_values(
                db.get_database_backend(),
                "UPDATE cards SET balance_minor = balance_minor + ? WHERE id = ?;",
                vec![amount.cents().into(), card_id.into()],
            ))
            .await?;
        if result.rows_affected() == 0 {
            return Err(EngineError::CardNotFound(card_id.to_string()));
        }
        self.balance_of(db, card_id).await
    }

    /// Subtracts `amount` from the card's balance, failing with
    /// `InsufficientFunds` when the balance would go negative.
    pub(super) async fn debit_balance(
        &self,
        db: &DatabaseTransaction,
        card_id: &str,
        amount: MoneyCents,
    ) -> ResultEngine<MoneyCents> {
        if !self.try_debit_balance(db, card_id, amount).await? {
            // The guard did not fire; figure out which precondition failed.
            let card = self.require_card(db, card_id).await?;
            return Err(EngineError::InsufficientFunds(format!(
                "card {card_id} holds {}, needs {amount}",
                MoneyCents::new(card.balance_minor)
            )));
        }
        self.balance_of(db, card_id).await
    }

    /// Debit variant for flows where a short balance is an outcome rather
    /// than an error. Returns whether the debit happened. The caller is
    /// expected to have resolved the card already.
    pub(super) async fn try_debit_balance(
        &self,
        db: &DatabaseTransaction,
        card_id: &str,
        amount: MoneyCents,
    ) -> ResultEngine<bool> {
        let result = db
            .execute(Statement::from_sql_and_values(
                db.get_database_backend(),
                "UPDATE cards SET balance_minor = balance_minor - ? \
                 WHERE id = ? AND balance_minor >= ?;",
                vec![amount.cents().into(), card_id.into(), amount.cents().into()],
            ))
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub(super) async fn balance_of(
        &self,
        db: &DatabaseTransaction,
        card_id: &str,
    ) -> ResultEngine<MoneyCents> {
        let card = self.require_card(db, card_id).await?;
        Ok(MoneyCents::new(card.balance_minor))
    }
}
