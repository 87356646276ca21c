//! Money-moving flows: reload, payment simulation, tap-to-pay and CRM sync.
//!
//! Each flow is one transaction: the balance change and its side records
//! commit together or not at all.

use chrono::Utc;
use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    Card, IdKind, MoneyCents, ResultEngine, Tap, TapDirection, TapOutcome, taps,
};

use super::{Engine, MIN_FARE, normalize_optional_text, require_positive, with_tx};

/// What a reload did to the card.
#[derive(Clone, Debug, PartialEq)]
pub struct ReloadReceipt {
    pub card_id: String,
    pub amount: MoneyCents,
    pub previous_balance: MoneyCents,
    pub new_balance: MoneyCents,
}

/// Result of a payment attempt. A declined payment is a business outcome,
/// not an error; the card and the request were both fine.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentOutcome {
    Approved {
        card_id: String,
        new_balance: MoneyCents,
        method: String,
    },
    Declined {
        card_id: String,
        current_balance: MoneyCents,
        required: MoneyCents,
    },
}

/// The recorded tap plus the balance the gate display shows.
#[derive(Clone, Debug, PartialEq)]
pub struct TapReceipt {
    pub tap: Tap,
    pub card_id: String,
    pub remaining_balance: MoneyCents,
}

/// What a CRM sync ended up doing.
#[derive(Clone, Debug, PartialEq)]
pub enum CrmSyncReport {
    Reloaded { card: Card, amount: MoneyCents },
    ProductAdded { card: Card, product: String },
    /// Unknown or incomplete action: acknowledged without touching the card.
    /// External callers evolve ahead of us; an action we don't recognize is
    /// not their error.
    Synced { card: Card },
}

impl CrmSyncReport {
    pub fn card(&self) -> &Card {
        match self {
            Self::Reloaded { card, .. }
            | Self::ProductAdded { card, .. }
            | Self::Synced { card } => card,
        }
    }
}

impl Engine {
    /// Add funds to a card.
    pub async fn reload(&self, card_id: &str, amount: MoneyCents) -> ResultEngine<ReloadReceipt> {
        let amount = require_positive(amount, "reload amount")?;
        with_tx!(self, |db_tx| {
            let model = self.require_card(&db_tx, card_id).await?;
            let previous_balance = MoneyCents::new(model.balance_minor);
            let new_balance = self.credit_balance(&db_tx, card_id, amount).await?;
            Ok(ReloadReceipt {
                card_id: model.id,
                amount,
                previous_balance,
                new_balance,
            })
        })
    }

    /// Attempt to charge `amount` against a card.
    pub async fn simulate_payment(
        &self,
        card_id: &str,
        amount: MoneyCents,
        method: &str,
    ) -> ResultEngine<PaymentOutcome> {
        let amount = require_positive(amount, "payment amount")?;
        let method = normalize_optional_text(Some(method)).unwrap_or_else(|| "unknown".to_string());
        with_tx!(self, |db_tx| {
            let model = self.require_card(&db_tx, card_id).await?;
            if !self.try_debit_balance(&db_tx, card_id, amount).await? {
                return Ok(PaymentOutcome::Declined {
                    card_id: model.id,
                    current_balance: MoneyCents::new(model.balance_minor),
                    required: amount,
                });
            }
            let new_balance = self.balance_of(&db_tx, card_id).await?;
            Ok(PaymentOutcome::Approved {
                card_id: model.id,
                new_balance,
                method,
            })
        })
    }

    /// Process a physical card tap at a gate.
    ///
    /// The tap row is written no matter how the tap resolved. A reader event
    /// happened in the world; the audit trail records it even when no fare
    /// was taken.
    pub async fn tap(
        &self,
        card_id: &str,
        location: &str,
        device_id: &str,
        transit_mode: &str,
        direction: TapDirection,
    ) -> ResultEngine<TapReceipt> {
        with_tx!(self, |db_tx| {
            let card = self.require_card(&db_tx, card_id).await?;

            let outcome = if self.try_debit_balance(&db_tx, card_id, MIN_FARE).await? {
                TapOutcome::Success
            } else {
                TapOutcome::InsufficientBalance
            };

            let tap = Tap {
                id: self.next_id(&db_tx, IdKind::Tap).await?,
                tap_time: Utc::now(),
                location: location.trim().to_string(),
                device_id: device_id.trim().to_string(),
                transit_mode: transit_mode.trim().to_string(),
                direction,
                customer_id: card.customer_id,
                outcome,
            };
            taps::ActiveModel::from(&tap).insert(&db_tx).await?;

            let remaining_balance = self.balance_of(&db_tx, card_id).await?;
            Ok(TapReceipt {
                tap,
                card_id: card.id,
                remaining_balance,
            })
        })
    }

    /// Apply a CRM-originated action to a card.
    ///
    /// `reload` credits funds, `add_product` sets the label and credits any
    /// accompanying value. An action missing its payload, or one we have
    /// never heard of, acknowledges without mutating.
    pub async fn sync_crm(
        &self,
        card_id: &str,
        action: &str,
        amount: Option<MoneyCents>,
        product: Option<&str>,
    ) -> ResultEngine<CrmSyncReport> {
        let action = action.trim().to_ascii_lowercase();
        let product = normalize_optional_text(product);
        with_tx!(self, |db_tx| {
            self.require_card(&db_tx, card_id).await?;

            let report = match (action.as_str(), amount, product) {
                ("reload", Some(amount), _) => {
                    let amount = require_positive(amount, "reload amount")?;
                    self.credit_balance(&db_tx, card_id, amount).await?;
                    let card = Card::try_from(self.require_card(&db_tx, card_id).await?)?;
                    CrmSyncReport::Reloaded { card, amount }
                }
                ("add_product", amount, Some(product)) => {
                    if let Some(value) = amount {
                        let value = require_positive(value, "product value")?;
                        self.credit_balance(&db_tx, card_id, value).await?;
                    }
                    self.set_product(&db_tx, card_id, &product).await?;
                    let card = Card::try_from(self.require_card(&db_tx, card_id).await?)?;
                    CrmSyncReport::ProductAdded { card, product }
                }
                _ => {
                    let card = Card::try_from(self.require_card(&db_tx, card_id).await?)?;
                    CrmSyncReport::Synced { card }
                }
            };
            Ok(report)
        })
    }
}
