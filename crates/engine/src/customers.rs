//! The module contains the `Customer` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

/// A registered rider.
///
/// Name and email are unique across the system; a customer owns their cards,
/// cases and tap history and those rows go away with the customer.
#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Notification channel preference, free-form ("email", "sms", "none").
    pub notifications: String,
    pub join_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub notifications: String,
    pub join_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cards::Entity")]
    Cards,
    #[sea_orm(has_many = "super::cases::Entity")]
    Cases,
    #[sea_orm(has_many = "super::taps::Entity")]
    Taps,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cases.def()
    }
}

impl Related<super::taps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Customer> for ActiveModel {
    fn from(customer: &Customer) -> Self {
        Self {
            id: ActiveValue::Set(customer.id.clone()),
            name: ActiveValue::Set(customer.name.clone()),
            email: ActiveValue::Set(customer.email.clone()),
            phone: ActiveValue::Set(customer.phone.clone()),
            notifications: ActiveValue::Set(customer.notifications.clone()),
            join_date: ActiveValue::Set(customer.join_date),
        }
    }
}

impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            notifications: model.notifications,
            join_date: model.join_date,
        }
    }
}
