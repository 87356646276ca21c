//! The module contains the `Case` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

/// A customer-service case, optionally tied to a specific card.
///
/// `last_updated` is refreshed by the engine on every mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub id: String,
    pub created_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub customer_id: String,
    pub card_id: Option<String>,
    pub case_status: String,
    pub priority: String,
    pub category: String,
    pub assigned_agent: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_date: DateTimeUtc,
    pub last_updated: DateTimeUtc,
    pub customer_id: String,
    pub card_id: Option<String>,
    pub case_status: String,
    pub priority: String,
    pub category: String,
    pub assigned_agent: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cards,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Case> for ActiveModel {
    fn from(case: &Case) -> Self {
        Self {
            id: ActiveValue::Set(case.id.clone()),
            created_date: ActiveValue::Set(case.created_date),
            last_updated: ActiveValue::Set(case.last_updated),
            customer_id: ActiveValue::Set(case.customer_id.clone()),
            card_id: ActiveValue::Set(case.card_id.clone()),
            case_status: ActiveValue::Set(case.case_status.clone()),
            priority: ActiveValue::Set(case.priority.clone()),
            category: ActiveValue::Set(case.category.clone()),
            assigned_agent: ActiveValue::Set(case.assigned_agent.clone()),
            notes: ActiveValue::Set(case.notes.clone()),
        }
    }
}

impl From<Model> for Case {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            created_date: model.created_date,
            last_updated: model.last_updated,
            customer_id: model.customer_id,
            card_id: model.card_id,
            case_status: model.case_status,
            priority: model.priority,
            category: model.category,
            assigned_agent: model.assigned_agent,
            notes: model.notes,
        }
    }
}
