//! The module contains the errors the engine can throw.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
///
/// `Database` wraps storage failures; when it surfaces, the whole flow's
/// transaction has been rolled back and no partial effect persists.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("card \"{0}\" not found")]
    CardNotFound(String),
    #[error("customer \"{0}\" not found")]
    CustomerNotFound(String),
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error("card \"{0}\" already exists")]
    DuplicateCard(String),
    #[error("\"{0}\" already present")]
    ExistingKey(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::CardNotFound(a), Self::CardNotFound(b)) => a == b,
            (Self::CustomerNotFound(a), Self::CustomerNotFound(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::DuplicateCard(a), Self::DuplicateCard(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
