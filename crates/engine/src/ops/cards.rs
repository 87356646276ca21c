use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, Statement, TransactionTrait, prelude::*,
};

use crate::{
    Card, CardStatus, CardType, EngineError, IdKind, MoneyCents, ResultEngine, cards,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Issue a new card to an existing customer.
    ///
    /// The id may be supplied by the caller (physical cards carry printed
    /// serials) or left out to have one allocated. Either way the existence
    /// check and the insert run in one transaction, so two concurrent
    /// issuances of the same id cannot both succeed.
    pub async fn issue_card(
        &self,
        card_id: Option<&str>,
        card_type: CardType,
        customer_id: &str,
        issue_date: DateTime<Utc>,
        initial_balance: MoneyCents,
        product: Option<&str>,
    ) -> ResultEngine<Card> {
        if initial_balance.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "initial balance must not be negative, got {initial_balance}"
            )));
        }
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;

            let id = match normalize_optional_text(card_id) {
                Some(id) => {
                    let taken = cards::Entity::find_by_id(id.clone())
                        .one(&db_tx)
                        .await?
                        .is_some();
                    if taken {
                        return Err(EngineError::DuplicateCard(id));
                    }
                    id
                }
                None => self.next_id(&db_tx, IdKind::Card).await?,
            };

            let card = Card::new(
                id,
                card_type,
                customer_id.to_string(),
                issue_date,
                initial_balance,
                normalize_optional_text(product),
            );
            // The existence check above can still lose a race on snapshot
            // backends; the primary key catches it, map that to a duplicate.
            if let Err(err) = cards::ActiveModel::from(&card).insert(&db_tx).await {
                return match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        Err(EngineError::DuplicateCard(card.id))
                    }
                    _ => Err(err.into()),
                };
            }
            Ok(card)
        })
    }

    /// Return a card snapshot from DB.
    pub async fn card(&self, card_id: &str) -> ResultEngine<Card> {
        with_tx!(self, |db_tx| {
            let model = self.require_card(&db_tx, card_id).await?;
            Card::try_from(model)
        })
    }

    /// List cards, optionally restricted to one customer.
    pub async fn cards(
        &self,
        customer_id: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> ResultEngine<Vec<Card>> {
        with_tx!(self, |db_tx| {
            let mut query = cards::Entity::find().order_by_asc(cards::Column::Id);
            if let Some(customer_id) = customer_id {
                query = query.filter(cards::Column::CustomerId.eq(customer_id.to_string()));
            }
            let models = query.offset(offset).limit(limit).all(&db_tx).await?;
            models.into_iter().map(Card::try_from).collect()
        })
    }

    /// Current balance of a card.
    pub async fn card_balance(&self, card_id: &str) -> ResultEngine<MoneyCents> {
        with_tx!(self, |db_tx| self.balance_of(&db_tx, card_id).await)
    }

    /// Attach a product label to a card, crediting its value when positive.
    ///
    /// The label always overwrites the previous one. The value goes through
    /// the balance ledger, never a direct field write, so it lands in the
    /// same audit path as a reload.
    pub async fn attach_product(
        &self,
        card_id: &str,
        product: &str,
        value: MoneyCents,
    ) -> ResultEngine<Card> {
        let product = normalize_optional_text(Some(product)).ok_or_else(|| {
            EngineError::InvalidAmount("product label must not be empty".to_string())
        })?;
        with_tx!(self, |db_tx| {
            self.set_product(&db_tx, card_id, &product).await?;
            if value.is_positive() {
                self.credit_balance(&db_tx, card_id, value).await?;
            }
            let model = self.require_card(&db_tx, card_id).await?;
            Card::try_from(model)
        })
    }

    pub(super) async fn set_product(
        &self,
        db: &DatabaseTransaction,
        card_id: &str,
        product: &str,
    ) -> ResultEngine<()> {
        let model = self.require_card(db, card_id).await?;
        let mut active: cards::ActiveModel = model.into();
        active.product = ActiveValue::Set(Some(product.to_string()));
        active.update(db).await?;
        Ok(())
    }

    /// Set a card's lifecycle status. Any status is reachable from any other.
    pub async fn set_card_status(
        &self,
        card_id: &str,
        status: CardStatus,
    ) -> ResultEngine<Card> {
        with_tx!(self, |db_tx| {
            let model = self.require_card(&db_tx, card_id).await?;
            let mut active: cards::ActiveModel = model.into();
            active.status = ActiveValue::Set(status.as_str().to_string());
            let model = active.update(&db_tx).await?;
            Card::try_from(model)
        })
    }

    /// Reassign a card to another customer.
    ///
    /// Historical trips and taps stay attached to whoever held the card
    /// when they happened; only future activity follows the new owner.
    pub async fn register_card(
        &self,
        card_id: &str,
        customer_id: &str,
    ) -> ResultEngine<Card> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let model = self.require_card(&db_tx, card_id).await?;
            let mut active: cards::ActiveModel = model.into();
            active.customer_id = ActiveValue::Set(customer_id.to_string());
            let model = active.update(&db_tx).await?;
            Card::try_from(model)
        })
    }

    /// Remove a card and everything hanging off it.
    ///
    /// The cascade is spelled out here rather than left to the schema, so
    /// it holds even on backends with foreign key enforcement disabled.
    pub async fn delete_card(&self, card_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_card(&db_tx, card_id).await?;
            let backend = db_tx.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM fare_disputes WHERE card_id = ? \
                     OR trip_id IN (SELECT id FROM trips WHERE card_id = ?);",
                    vec![card_id.into(), card_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM trips WHERE card_id = ?;",
                    vec![card_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM cases WHERE card_id = ?;",
                    vec![card_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM cards WHERE id = ?;",
                    vec![card_id.into()],
                ))
                .await?;
            Ok(())
        })
    }
}
