//! The module contains the `Tap` struct and its storage model.
//!
//! Tap rows are append-only: every presentation of a card at a reader is
//! recorded, including the ones that charged nothing.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Which gate line the card was presented at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapDirection {
    Entry,
    Exit,
}

impl TapDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

impl TryFrom<&str> for TapDirection {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(Self::Entry),
            "exit" => Ok(Self::Exit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid tap direction: {other}"
            ))),
        }
    }
}

/// How a tap resolved at the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapOutcome {
    Success,
    Failure,
    InsufficientBalance,
    Timeout,
}

impl TapOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::InsufficientBalance => "insufficient_balance",
            Self::Timeout => "timeout",
        }
    }

    /// True when the tap actually charged the card.
    pub fn charged(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl TryFrom<&str> for TapOutcome {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "insufficient_balance" => Ok(Self::InsufficientBalance),
            "timeout" => Ok(Self::Timeout),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid tap outcome: {other}"
            ))),
        }
    }
}

/// One recorded card presentation, keyed to the customer the card belonged
/// to at tap time.
#[derive(Clone, Debug, PartialEq)]
pub struct Tap {
    pub id: String,
    pub tap_time: DateTime<Utc>,
    pub location: String,
    pub device_id: String,
    pub transit_mode: String,
    pub direction: TapDirection,
    pub customer_id: String,
    pub outcome: TapOutcome,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tap_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tap_time: DateTimeUtc,
    pub location: String,
    pub device_id: String,
    pub transit_mode: String,
    pub direction: String,
    pub customer_id: String,
    pub outcome: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tap> for ActiveModel {
    fn from(tap: &Tap) -> Self {
        Self {
            id: ActiveValue::Set(tap.id.clone()),
            tap_time: ActiveValue::Set(tap.tap_time),
            location: ActiveValue::Set(tap.location.clone()),
            device_id: ActiveValue::Set(tap.device_id.clone()),
            transit_mode: ActiveValue::Set(tap.transit_mode.clone()),
            direction: ActiveValue::Set(tap.direction.as_str().to_string()),
            customer_id: ActiveValue::Set(tap.customer_id.clone()),
            outcome: ActiveValue::Set(tap.outcome.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Tap {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tap_time: model.tap_time,
            location: model.location,
            device_id: model.device_id,
            transit_mode: model.transit_mode,
            direction: TapDirection::try_from(model.direction.as_str())?,
            customer_id: model.customer_id,
            outcome: TapOutcome::try_from(model.outcome.as_str())?,
        })
    }
}
