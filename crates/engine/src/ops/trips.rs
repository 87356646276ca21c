use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{EngineError, IdKind, MoneyCents, ResultEngine, Trip, trips};

use super::{Engine, normalize_optional_text, normalize_required, with_tx};

/// Per-field trip update. `None` leaves the field alone.
#[derive(Clone, Debug, Default)]
pub struct TripUpdate {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub entry_location: Option<String>,
    pub exit_location: Option<String>,
    pub fare: Option<MoneyCents>,
    pub route: Option<String>,
    pub operator: Option<String>,
    pub transit_mode: Option<String>,
    pub adjustable: Option<bool>,
}

fn check_times(start: DateTime<Utc>, end: DateTime<Utc>) -> ResultEngine<()> {
    if end < start {
        return Err(EngineError::InvalidAmount(format!(
            "trip ends at {end} before it starts at {start}"
        )));
    }
    Ok(())
}

fn check_fare(fare: MoneyCents) -> ResultEngine<MoneyCents> {
    if fare.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "fare must not be negative, got {fare}"
        )));
    }
    Ok(fare)
}

impl Engine {
    /// Record a completed trip against a card.
    ///
    /// Callers may supply the id (imports from operator feeds) or leave it
    /// out to have one allocated.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_trip(
        &self,
        trip_id: Option<&str>,
        card_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        entry_location: &str,
        exit_location: &str,
        fare: MoneyCents,
        route: &str,
        operator: &str,
        transit_mode: &str,
        adjustable: bool,
    ) -> ResultEngine<Trip> {
        check_times(start_time, end_time)?;
        let fare = check_fare(fare)?;
        with_tx!(self, |db_tx| {
            self.require_card(&db_tx, card_id).await?;

            let id = match normalize_optional_text(trip_id) {
                Some(id) => {
                    let taken = trips::Entity::find_by_id(id.clone())
                        .one(&db_tx)
                        .await?
                        .is_some();
                    if taken {
                        return Err(EngineError::ExistingKey(id));
                    }
                    id
                }
                None => self.next_id(&db_tx, IdKind::Trip).await?,
            };

            let trip = Trip {
                id,
                start_time,
                end_time,
                entry_location: normalize_required(entry_location, "entry location")?,
                exit_location: normalize_required(exit_location, "exit location")?,
                fare,
                route: normalize_required(route, "route")?,
                operator: normalize_required(operator, "operator")?,
                transit_mode: normalize_required(transit_mode, "transit mode")?,
                adjustable,
                card_id: card_id.to_string(),
            };
            trips::ActiveModel::from(&trip).insert(&db_tx).await?;
            Ok(trip)
        })
    }

    pub async fn trip(&self, trip_id: &str) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip(&db_tx, trip_id).await?;
            Trip::try_from(model)
        })
    }

    pub async fn trips(&self, offset: u64, limit: u64) -> ResultEngine<Vec<Trip>> {
        with_tx!(self, |db_tx| {
            let models = trips::Entity::find()
                .order_by_desc(trips::Column::StartTime)
                .offset(offset)
                .limit(limit)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Trip::try_from).collect()
        })
    }

    /// Administrative trip correction.
    pub async fn update_trip(&self, trip_id: &str, update: TripUpdate) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip(&db_tx, trip_id).await?;
            let start = update.start_time.unwrap_or(model.start_time);
            let end = update.end_time.unwrap_or(model.end_time);
            check_times(start, end)?;

            let mut active: trips::ActiveModel = model.into();
            active.start_time = ActiveValue::Set(start);
            active.end_time = ActiveValue::Set(end);
            if let Some(entry_location) = update.entry_location {
                active.entry_location =
                    ActiveValue::Set(normalize_required(&entry_location, "entry location")?);
            }
            if let Some(exit_location) = update.exit_location {
                active.exit_location =
                    ActiveValue::Set(normalize_required(&exit_location, "exit location")?);
            }
            if let Some(fare) = update.fare {
                active.fare_minor = ActiveValue::Set(check_fare(fare)?.cents());
            }
            if let Some(route) = update.route {
                active.route = ActiveValue::Set(normalize_required(&route, "route")?);
            }
            if let Some(operator) = update.operator {
                active.operator = ActiveValue::Set(normalize_required(&operator, "operator")?);
            }
            if let Some(transit_mode) = update.transit_mode {
                active.transit_mode =
                    ActiveValue::Set(normalize_required(&transit_mode, "transit mode")?);
            }
            if let Some(adjustable) = update.adjustable {
                active.adjustable = ActiveValue::Set(adjustable);
            }
            let model = active.update(&db_tx).await?;
            Trip::try_from(model)
        })
    }

    pub async fn delete_trip(&self, trip_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip(&db_tx, trip_id).await?;
            crate::disputes::Entity::delete_many()
                .filter(crate::disputes::Column::TripId.eq(trip_id.to_string()))
                .exec(&db_tx)
                .await?;
            trips::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
