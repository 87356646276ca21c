use sea_orm::DatabaseConnection;

use crate::{EngineError, MoneyCents, ResultEngine};

mod access;
mod cards;
mod cases;
mod customers;
mod disputes;
mod idents;
mod ledger;
mod payments;
mod reports;
mod taps;
mod trips;

pub use cases::CaseUpdate;
pub use customers::CustomerUpdate;
pub use disputes::DisputeUpdate;
pub use payments::{CrmSyncReport, PaymentOutcome, ReloadReceipt, TapReceipt};
pub use reports::SummaryReport;
pub use taps::{CardTransactions, TapListFilter};
pub use trips::TripUpdate;

/// Flat fare deducted on a successful tap.
pub const MIN_FARE: MoneyCents = MoneyCents::new(250);

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn require_positive(amount: MoneyCents, label: &str) -> ResultEngine<MoneyCents> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(EngineError::InvalidAmount(format!(
            "invalid email address: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
