pub use cards::{Card, CardStatus, CardType};
pub use cases::Case;
pub use customers::Customer;
pub use disputes::FareDispute;
pub use error::EngineError;
pub use ids::IdKind;
pub use money::MoneyCents;
pub use ops::{
    CardTransactions, CaseUpdate, CrmSyncReport, CustomerUpdate, DisputeUpdate, Engine,
    EngineBuilder, MIN_FARE, PaymentOutcome, ReloadReceipt, SummaryReport, TapListFilter,
    TapReceipt, TripUpdate,
};
pub use taps::{Tap, TapDirection, TapOutcome};
pub use trips::Trip;

mod cards;
mod cases;
mod customers;
mod disputes;
mod error;
mod ids;
mod money;
mod ops;
mod taps;
mod trips;

type ResultEngine<T> = Result<T, EngineError>;
