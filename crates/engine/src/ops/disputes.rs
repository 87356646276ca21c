use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{FareDispute, MoneyCents, ResultEngine, disputes};

use super::{Engine, normalize_optional_text, normalize_required, require_positive, with_tx};

/// Per-field dispute update. `None` leaves the field alone.
#[derive(Clone, Debug, Default)]
pub struct DisputeUpdate {
    pub amount: Option<MoneyCents>,
    pub description: Option<Option<String>>,
    pub dispute_type: Option<String>,
}

impl Engine {
    /// File a dispute over a trip's fare.
    pub async fn new_dispute(
        &self,
        card_id: &str,
        trip_id: &str,
        amount: MoneyCents,
        description: Option<&str>,
        dispute_type: &str,
    ) -> ResultEngine<FareDispute> {
        let amount = require_positive(amount, "disputed amount")?;
        let dispute_type = normalize_required(dispute_type, "dispute type")?;
        with_tx!(self, |db_tx| {
            let card = self.require_card(&db_tx, card_id).await?;
            let trip = self.require_trip(&db_tx, trip_id).await?;

            let model = disputes::ActiveModel {
                id: ActiveValue::NotSet,
                dispute_date: ActiveValue::Set(Utc::now()),
                card_id: ActiveValue::Set(card.id),
                trip_id: ActiveValue::Set(trip.id),
                amount_minor: ActiveValue::Set(amount.cents()),
                description: ActiveValue::Set(normalize_optional_text(description)),
                dispute_type: ActiveValue::Set(dispute_type),
            }
            .insert(&db_tx)
            .await?;
            FareDispute::try_from(model)
        })
    }

    pub async fn dispute(&self, dispute_id: i32) -> ResultEngine<FareDispute> {
        with_tx!(self, |db_tx| {
            let model = self.require_dispute(&db_tx, dispute_id).await?;
            FareDispute::try_from(model)
        })
    }

    /// List disputes, newest first.
    pub async fn disputes(&self, offset: u64, limit: u64) -> ResultEngine<Vec<FareDispute>> {
        with_tx!(self, |db_tx| {
            let models = disputes::Entity::find()
                .order_by_desc(disputes::Column::DisputeDate)
                .offset(offset)
                .limit(limit)
                .all(&db_tx)
                .await?;
            models.into_iter().map(FareDispute::try_from).collect()
        })
    }

    pub async fn update_dispute(
        &self,
        dispute_id: i32,
        update: DisputeUpdate,
    ) -> ResultEngine<FareDispute> {
        with_tx!(self, |db_tx| {
            let model = self.require_dispute(&db_tx, dispute_id).await?;
            let mut active: disputes::ActiveModel = model.into();
            if let Some(amount) = update.amount {
                active.amount_minor =
                    ActiveValue::Set(require_positive(amount, "disputed amount")?.cents());
            }
            if let Some(description) = update.description {
                active.description =
                    ActiveValue::Set(description.and_then(|d| normalize_optional_text(Some(&d))));
            }
            if let Some(dispute_type) = update.dispute_type {
                active.dispute_type =
                    ActiveValue::Set(normalize_required(&dispute_type, "dispute type")?);
            }
            let model = active.update(&db_tx).await?;
            FareDispute::try_from(model)
        })
    }

    pub async fn delete_dispute(&self, dispute_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_dispute(&db_tx, dispute_id).await?;
            disputes::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
