use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod cards;
mod cases;
mod crm;
mod customers;
mod disputes;
mod payments;
mod reports;
mod server;
mod taps;
mod trips;
mod views;

pub mod types {
    pub mod card {
        pub use api_types::card::{
            BalanceView, CardIssue, CardView, ProductAdd, Reload, ReloadReceiptView, StatusSet,
        };
    }

    pub mod customer {
        pub use api_types::customer::{CustomerNew, CustomerUpdate, CustomerView};
    }

    pub mod payment {
        pub use api_types::payment::{PaymentResult, PaymentSimulate};
    }

    pub mod tap {
        pub use api_types::tap::{TapReceiptView, TapRecord, TapSimulate, TapView};
    }

    pub mod trip {
        pub use api_types::trip::{CardTransactionsView, TripNew, TripUpdate, TripView};
    }

    pub mod case {
        pub use api_types::case::{CaseNew, CaseUpdate, CaseView};
    }

    pub mod dispute {
        pub use api_types::dispute::{DisputeNew, DisputeUpdate, DisputeView};
    }

    pub mod crm {
        pub use api_types::crm::{CardSync, CrmCardView, CustomerRegister};
        pub use api_types::envelope::{AckStatus, Envelope};
    }

    pub mod report {
        pub use api_types::report::SummaryView;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::CardNotFound(_)
        | EngineError::CustomerNotFound(_)
        | EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::DuplicateCard(_) | EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_card_maps_to_404() {
        let res = ServerError::from(EngineError::CardNotFound("CD404".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_customer_maps_to_404() {
        let res =
            ServerError::from(EngineError::CustomerNotFound("C404".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_card_maps_to_409() {
        let res = ServerError::from(EngineError::DuplicateCard("CD001".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn insufficient_funds_maps_to_422() {
        let res =
            ServerError::from(EngineError::InsufficientFunds("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_error_is_redacted() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("secret detail".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
