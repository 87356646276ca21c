use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{Case, IdKind, ResultEngine, cases};

use super::{Engine, normalize_optional_text, normalize_required, with_tx};

/// Per-field case update. `None` leaves the field alone. Any applied update
/// refreshes `last_updated`.
#[derive(Clone, Debug, Default)]
pub struct CaseUpdate {
    pub case_status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub assigned_agent: Option<String>,
    pub notes: Option<Option<String>>,
}

impl Engine {
    /// Open a support case for a customer, optionally tied to one card.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_case(
        &self,
        customer_id: &str,
        card_id: Option<&str>,
        case_status: &str,
        priority: &str,
        category: &str,
        assigned_agent: &str,
        notes: Option<&str>,
    ) -> ResultEngine<Case> {
        let case_status = normalize_required(case_status, "case status")?;
        let priority = normalize_required(priority, "priority")?;
        let category = normalize_required(category, "category")?;
        let assigned_agent = normalize_required(assigned_agent, "assigned agent")?;
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let card_id = match normalize_optional_text(card_id) {
                Some(card_id) => Some(self.require_card(&db_tx, &card_id).await?.id),
                None => None,
            };

            let now = Utc::now();
            let case = Case {
                id: self.next_id(&db_tx, IdKind::Case).await?,
                created_date: now,
                last_updated: now,
                customer_id: customer_id.to_string(),
                card_id,
                case_status,
                priority,
                category,
                assigned_agent,
                notes: normalize_optional_text(notes),
            };
            cases::ActiveModel::from(&case).insert(&db_tx).await?;
            Ok(case)
        })
    }

    pub async fn case(&self, case_id: &str) -> ResultEngine<Case> {
        with_tx!(self, |db_tx| {
            let model = self.require_case(&db_tx, case_id).await?;
            Ok(Case::from(model))
        })
    }

    /// List cases, newest first.
    pub async fn cases(&self, offset: u64, limit: u64) -> ResultEngine<Vec<Case>> {
        with_tx!(self, |db_tx| {
            let models = cases::Entity::find()
                .order_by_desc(cases::Column::CreatedDate)
                .offset(offset)
                .limit(limit)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Case::from).collect())
        })
    }

    pub async fn update_case(&self, case_id: &str, update: CaseUpdate) -> ResultEngine<Case> {
        with_tx!(self, |db_tx| {
            let model = self.require_case(&db_tx, case_id).await?;
            let mut active: cases::ActiveModel = model.into();
            if let Some(case_status) = update.case_status {
                active.case_status =
                    ActiveValue::Set(normalize_required(&case_status, "case status")?);
            }
            if let Some(priority) = update.priority {
                active.priority = ActiveValue::Set(normalize_required(&priority, "priority")?);
            }
            if let Some(category) = update.category {
                active.category = ActiveValue::Set(normalize_required(&category, "category")?);
            }
            if let Some(assigned_agent) = update.assigned_agent {
                active.assigned_agent =
                    ActiveValue::Set(normalize_required(&assigned_agent, "assigned agent")?);
            }
            if let Some(notes) = update.notes {
                active.notes = ActiveValue::Set(notes.and_then(|n| normalize_optional_text(Some(&n))));
            }
            active.last_updated = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Ok(Case::from(model))
        })
    }

    pub async fn delete_case(&self, case_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_case(&db_tx, case_id).await?;
            cases::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
