use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, Statement, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{Customer, EngineError, IdKind, ResultEngine, customers};

use super::{Engine, normalize_email, normalize_required, with_tx};

/// Per-field customer update. `None` leaves the field alone.
#[derive(Clone, Debug, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notifications: Option<String>,
}

impl Engine {
    /// Register a new customer. Name and email must both be unused.
    pub async fn new_customer(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        notifications: &str,
    ) -> ResultEngine<Customer> {
        let name = normalize_required(name, "customer name")?;
        let email = normalize_email(email)?;
        let phone = normalize_required(phone, "phone")?;
        let notifications = normalize_required(notifications, "notification preference")?;
        with_tx!(self, |db_tx| {
            let clash = customers::Entity::find()
                .filter(
                    customers::Column::Name
                        .eq(name.clone())
                        .or(customers::Column::Email.eq(email.clone())),
                )
                .one(&db_tx)
                .await?;
            if clash.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "customer '{name}' <{email}>"
                )));
            }

            let customer = Customer {
                id: self.next_id(&db_tx, IdKind::Customer).await?,
                name,
                email,
                phone,
                notifications,
                join_date: Utc::now(),
            };
            customers::ActiveModel::from(&customer).insert(&db_tx).await?;
            Ok(customer)
        })
    }

    pub async fn customer(&self, customer_id: &str) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| {
            let model = self.require_customer(&db_tx, customer_id).await?;
            Ok(Customer::from(model))
        })
    }

    pub async fn customers(&self, offset: u64, limit: u64) -> ResultEngine<Vec<Customer>> {
        with_tx!(self, |db_tx| {
            let models = customers::Entity::find()
                .order_by_asc(customers::Column::Id)
                .offset(offset)
                .limit(limit)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Customer::from).collect())
        })
    }

    /// Update a customer's contact fields.
    pub async fn update_customer(
        &self,
        customer_id: &str,
        update: CustomerUpdate,
    ) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| {
            let model = self.require_customer(&db_tx, customer_id).await?;
            let mut active: customers::ActiveModel = model.into();
            if let Some(name) = update.name {
                active.name = ActiveValue::Set(normalize_required(&name, "customer name")?);
            }
            if let Some(email) = update.email {
                active.email = ActiveValue::Set(normalize_email(&email)?);
            }
            if let Some(phone) = update.phone {
                active.phone = ActiveValue::Set(normalize_required(&phone, "phone")?);
            }
            if let Some(notifications) = update.notifications {
                active.notifications =
                    ActiveValue::Set(normalize_required(&notifications, "notification preference")?);
            }
            let model = active.update(&db_tx).await?;
            Ok(Customer::from(model))
        })
    }

    /// Remove a customer and the whole aggregate under them: cards, the
    /// trips and disputes on those cards, their cases and tap history.
    pub async fn delete_customer(&self, customer_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let backend = db_tx.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM fare_disputes WHERE card_id IN \
                     (SELECT id FROM cards WHERE customer_id = ?);",
                    vec![customer_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM trips WHERE card_id IN \
                     (SELECT id FROM cards WHERE customer_id = ?);",
                    vec![customer_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM tap_history WHERE customer_id = ?;",
                    vec![customer_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM cases WHERE customer_id = ?;",
                    vec![customer_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM cards WHERE customer_id = ?;",
                    vec![customer_id.into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM customers WHERE id = ?;",
                    vec![customer_id.into()],
                ))
                .await?;
            Ok(())
        })
    }
}
