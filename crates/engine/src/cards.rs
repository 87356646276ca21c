//! The module contains the `Card` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// The kind of fare medium a card is backed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Bank,
    AccountBased,
    ClosedLoop,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::AccountBased => "account_based",
            Self::ClosedLoop => "closed_loop",
        }
    }
}

impl TryFrom<&str> for CardType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "bank" => Ok(Self::Bank),
            "account_based" => Ok(Self::AccountBased),
            "closed_loop" => Ok(Self::ClosedLoop),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid card type: {other}"
            ))),
        }
    }
}

/// Card lifecycle status.
///
/// Any status is reachable from any other; the engine validates the value
/// but does not enforce a transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Expired,
    Suspended,
    Blocked,
}

impl CardStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Suspended => "suspended",
            Self::Blocked => "blocked",
        }
    }
}

impl TryFrom<&str> for CardStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "suspended" => Ok(Self::Suspended),
            "blocked" => Ok(Self::Blocked),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid card status: {other}"
            ))),
        }
    }
}

/// A stored-value transit card.
///
/// The card row is the unit of balance mutation: every credit or debit is an
/// atomic read-modify-write on this row, and the balance never goes negative.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: String,
    pub card_type: CardType,
    pub status: CardStatus,
    pub balance: MoneyCents,
    pub product: Option<String>,
    pub issue_date: DateTime<Utc>,
    pub customer_id: String,
}

impl Card {
    pub fn new(
        id: String,
        card_type: CardType,
        customer_id: String,
        issue_date: DateTime<Utc>,
        balance: MoneyCents,
        product: Option<String>,
    ) -> Self {
        Self {
            id,
            card_type,
            status: CardStatus::Active,
            balance,
            product,
            issue_date,
            customer_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub card_type: String,
    pub status: String,
    pub balance_minor: i64,
    pub product: Option<String>,
    pub issue_date: DateTimeUtc,
    pub customer_id: String,
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
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Card> for ActiveModel {
    fn from(card: &Card) -> Self {
        Self {
            id: ActiveValue::Set(card.id.clone()),
            card_type: ActiveValue::Set(card.card_type.as_str().to_string()),
            status: ActiveValue::Set(card.status.as_str().to_string()),
            balance_minor: ActiveValue::Set(card.balance.cents()),
            product: ActiveValue::Set(card.product.clone()),
            issue_date: ActiveValue::Set(card.issue_date),
            customer_id: ActiveValue::Set(card.customer_id.clone()),
        }
    }
}

impl TryFrom<Model> for Card {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            card_type: CardType::try_from(model.card_type.as_str())?,
            status: CardStatus::try_from(model.status.as_str())?,
            balance: MoneyCents::new(model.balance_minor),
            product: model.product,
            issue_date: model.issue_date,
            customer_id: model.customer_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_type_round_trips() {
        for ty in [CardType::Bank, CardType::AccountBased, CardType::ClosedLoop] {
            assert_eq!(CardType::try_from(ty.as_str()).unwrap(), ty);
        }
        // Hyphenated spellings come in from older POS firmware.
        assert_eq!(
            CardType::try_from("closed-loop").unwrap(),
            CardType::ClosedLoop
        );
        assert!(CardType::try_from("prepaid").is_err());
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(CardStatus::try_from("Active").unwrap(), CardStatus::Active);
        assert_eq!(
            CardStatus::try_from("BLOCKED").unwrap(),
            CardStatus::Blocked
        );
        assert!(CardStatus::try_from("melted").is_err());
    }

    #[test]
    fn new_card_starts_active() {
        let card = Card::new(
            "CD001".to_string(),
            CardType::ClosedLoop,
            "C001".to_string(),
            Utc::now(),
            MoneyCents::ZERO,
            None,
        );
        assert_eq!(card.status, CardStatus::Active);
        assert_eq!(card.balance, MoneyCents::ZERO);
    }
}
