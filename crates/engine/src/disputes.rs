//! The module contains the `FareDispute` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, MoneyCents};

/// A rider's claim that a trip was mischarged.
///
/// Disputes are the one entity keyed by a plain auto-increment id rather
/// than a prefixed string.
#[derive(Clone, Debug, PartialEq)]
pub struct FareDispute {
    pub id: i32,
    pub dispute_date: DateTime<Utc>,
    pub card_id: String,
    pub trip_id: String,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub dispute_type: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fare_disputes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub dispute_date: DateTimeUtc,
    pub card_id: String,
    pub trip_id: String,
    pub amount_minor: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub dispute_type: String,
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
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trips,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert conversion. The id stays `NotSet` so storage assigns it.
impl From<&FareDispute> for ActiveModel {
    fn from(dispute: &FareDispute) -> Self {
        Self {
            id: ActiveValue::NotSet,
            dispute_date: ActiveValue::Set(dispute.dispute_date),
            card_id: ActiveValue::Set(dispute.card_id.clone()),
            trip_id: ActiveValue::Set(dispute.trip_id.clone()),
            amount_minor: ActiveValue::Set(dispute.amount.cents()),
            description: ActiveValue::Set(dispute.description.clone()),
            dispute_type: ActiveValue::Set(dispute.dispute_type.clone()),
        }
    }
}

impl TryFrom<Model> for FareDispute {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            dispute_date: model.dispute_date,
            card_id: model.card_id,
            trip_id: model.trip_id,
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            dispute_type: model.dispute_type,
        })
    }
}
