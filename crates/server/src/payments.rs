//! Payment and tap simulation endpoints

use api_types::payment::{PaymentResult, PaymentSimulate};
use api_types::tap::{TapReceiptView, TapSimulate};
use axum::{Json, extract::State};
use engine::{MoneyCents, PaymentOutcome};

use crate::{ServerError, server::ServerState, views};

/// Handle requests for simulating a payment against a card
pub async fn simulate(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentSimulate>,
) -> Result<Json<PaymentResult>, ServerError> {
    let outcome = state
        .engine
        .simulate_payment(
            &payload.card_id,
            MoneyCents::new(payload.amount_minor),
            &payload.method,
        )
        .await?;

    let result = match outcome {
        PaymentOutcome::Approved {
            card_id,
            new_balance,
            method,
        } => PaymentResult::Approved {
            card_id,
            new_balance_minor: new_balance.cents(),
            method,
        },
        PaymentOutcome::Declined {
            card_id,
            current_balance,
            required,
        } => PaymentResult::Declined {
            card_id,
            current_balance_minor: current_balance.cents(),
            required_minor: required.cents(),
        },
    };
    Ok(Json(result))
}

/// Handle requests for a physical gate tap
pub async fn tap(
    State(state): State<ServerState>,
    Json(payload): Json<TapSimulate>,
) -> Result<Json<TapReceiptView>, ServerError> {
    let receipt = state
        .engine
        .tap(
            &payload.card_id,
            &payload.location,
            &payload.device_id,
            &payload.transit_mode,
            views::tap_direction_to_engine(payload.direction),
        )
        .await?;

    Ok(Json(TapReceiptView {
        tap: views::tap_view(receipt.tap),
        card_id: receipt.card_id,
        remaining_balance_minor: receipt.remaining_balance.cents(),
    }))
}
