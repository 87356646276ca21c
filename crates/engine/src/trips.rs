//! The module contains the `Trip` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, MoneyCents};

/// A completed journey billed against a card.
///
/// `end_time` is never before `start_time`; the engine rejects such rows
/// before they reach storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub entry_location: String,
    pub exit_location: String,
    pub fare: MoneyCents,
    pub route: String,
    pub operator: String,
    pub transit_mode: String,
    /// Whether the fare may still be corrected by a dispute adjustment.
    pub adjustable: bool,
    pub card_id: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub entry_location: String,
    pub exit_location: String,
    pub fare_minor: i64,
    pub route: String,
    pub operator: String,
    pub transit_mode: String,
    pub adjustable: bool,
    pub card_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cards,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trip> for ActiveModel {
    fn from(trip: &Trip) -> Self {
        Self {
            id: ActiveValue::Set(trip.id.clone()),
            start_time: ActiveValue::Set(trip.start_time),
            end_time: ActiveValue::Set(trip.end_time),
            entry_location: ActiveValue::Set(trip.entry_location.clone()),
            exit_location: ActiveValue::Set(trip.exit_location.clone()),
            fare_minor: ActiveValue::Set(trip.fare.cents()),
            route: ActiveValue::Set(trip.route.clone()),
            operator: ActiveValue::Set(trip.operator.clone()),
            transit_mode: ActiveValue::Set(trip.transit_mode.clone()),
            adjustable: ActiveValue::Set(trip.adjustable),
            card_id: ActiveValue::Set(trip.card_id.clone()),
        }
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            start_time: model.start_time,
            end_time: model.end_time,
            entry_location: model.entry_location,
            exit_location: model.exit_location,
            fare: MoneyCents::new(model.fare_minor),
            route: model.route,
            operator: model.operator,
            transit_mode: model.transit_mode,
            adjustable: model.adjustable,
            card_id: model.card_id,
        })
    }
}
