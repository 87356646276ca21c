use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    IdKind, MoneyCents, ResultEngine, Tap, TapDirection, TapOutcome, Trip, taps, trips,
};

use super::{Engine, normalize_required, with_tx};

/// Listing filter for tap history.
#[derive(Clone, Debug)]
pub struct TapListFilter {
    pub customer_id: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

impl Default for TapListFilter {
    fn default() -> Self {
        Self {
            customer_id: None,
            offset: 0,
            limit: 100,
        }
    }
}

/// Everything a card has been charged for: settled trips plus the tap trail
/// of the customer holding it.
#[derive(Clone, Debug, PartialEq)]
pub struct CardTransactions {
    pub card_id: String,
    pub card_balance: MoneyCents,
    pub trips: Vec<Trip>,
    pub tap_history: Vec<Tap>,
}

impl Engine {
    /// Record a tap event reported after the fact, e.g. a reader batch
    /// upload. Gate taps that charge a fare go through [`Engine::tap`];
    /// this writes the history row only.
    pub async fn record_tap(
        &self,
        customer_id: &str,
        tap_time: DateTime<Utc>,
        location: &str,
        device_id: &str,
        transit_mode: &str,
        direction: TapDirection,
        outcome: TapOutcome,
    ) -> ResultEngine<Tap> {
        let location = normalize_required(location, "location")?;
        let device_id = normalize_required(device_id, "device id")?;
        let transit_mode = normalize_required(transit_mode, "transit mode")?;
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let tap = Tap {
                id: self.next_id(&db_tx, IdKind::Tap).await?,
                tap_time,
                location,
                device_id,
                transit_mode,
                direction,
                customer_id: customer_id.to_string(),
                outcome,
            };
            taps::ActiveModel::from(&tap).insert(&db_tx).await?;
            Ok(tap)
        })
    }

    pub async fn tap_entry(&self, tap_id: &str) -> ResultEngine<Tap> {
        with_tx!(self, |db_tx| {
            let model = self.require_tap(&db_tx, tap_id).await?;
            Tap::try_from(model)
        })
    }

    /// Tap history, newest first.
    pub async fn tap_history(&self, filter: TapListFilter) -> ResultEngine<Vec<Tap>> {
        with_tx!(self, |db_tx| {
            let mut query = taps::Entity::find().order_by_desc(taps::Column::TapTime);
            if let Some(customer_id) = filter.customer_id {
                query = query.filter(taps::Column::CustomerId.eq(customer_id));
            }
            let models = query
                .offset(filter.offset)
                .limit(filter.limit)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Tap::try_from).collect()
        })
    }

    /// Trip and tap activity for one card, newest first on both lists.
    pub async fn card_transactions(&self, card_id: &str) -> ResultEngine<CardTransactions> {
        with_tx!(self, |db_tx| {
            let card = self.require_card(&db_tx, card_id).await?;

            let trips = trips::Entity::find()
                .filter(trips::Column::CardId.eq(card.id.clone()))
                .order_by_desc(trips::Column::StartTime)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Trip::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let tap_history = taps::Entity::find()
                .filter(taps::Column::CustomerId.eq(card.customer_id.clone()))
                .order_by_desc(taps::Column::TapTime)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Tap::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(CardTransactions {
                card_id: card.id,
                card_balance: MoneyCents::new(card.balance_minor),
                trips,
                tap_history,
            })
        })
    }
}
