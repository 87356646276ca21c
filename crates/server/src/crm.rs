//! CRM integration endpoints
//!
//! These responses are wrapped in the [`Envelope`] the CRM side expects,
//! with a fresh transaction id per response for log correlation.

use api_types::crm::{CardSync, CrmCardView, CustomerRegister};
use api_types::envelope::{AckStatus, Envelope};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use engine::{CrmSyncReport, MoneyCents};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

fn envelope<T>(message: String, robot_run_id: Option<String>, data: T) -> Envelope<T> {
    Envelope {
        status: AckStatus::Success,
        timestamp: Utc::now(),
        transaction_id: Uuid::new_v4(),
        robot_run_id,
        message,
        data,
    }
}

/// Handle CRM-originated card mutations
pub async fn sync_card(
    State(state): State<ServerState>,
    Json(payload): Json<CardSync>,
) -> Result<Json<Envelope<CrmCardView>>, ServerError> {
    let report = state
        .engine
        .sync_crm(
            &payload.card_id,
            &payload.action,
            payload.amount_minor.map(MoneyCents::new),
            payload.product.as_deref(),
        )
        .await?;

    let message = match &report {
        CrmSyncReport::Reloaded { card, amount } => {
            format!("card {} reloaded with {amount}", card.id)
        }
        CrmSyncReport::ProductAdded { card, product } => {
            format!("product {product} added to card {}", card.id)
        }
        CrmSyncReport::Synced { card } => format!("card {} synced successfully", card.id),
    };

    let card = report.card().clone();
    let customer_name = state
        .engine
        .customer(&card.customer_id)
        .await
        .map(|c| c.name)
        .ok();
    let view = CrmCardView {
        card: views::card_view(card),
        customer_name,
    };
    Ok(Json(envelope(message, payload.robot_run_id, view)))
}

/// Handle CRM requests to reassign a card to a customer
pub async fn register_card(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<CustomerRegister>,
) -> Result<Json<Envelope<CrmCardView>>, ServerError> {
    let card = state.engine.register_card(&payload.card_id, &customer_id).await?;
    let customer = state.engine.customer(&customer_id).await?;

    let message = format!("card {} registered to customer {customer_id}", card.id);
    let view = CrmCardView {
        card: views::card_view(card),
        customer_name: Some(customer.name),
    };
    Ok(Json(envelope(message, payload.robot_run_id, view)))
}

/// Handle CRM card status lookups
pub async fn card_status(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
) -> Result<Json<Envelope<CrmCardView>>, ServerError> {
    let card = state.engine.card(&card_id).await?;
    let customer_name = state
        .engine
        .customer(&card.customer_id)
        .await
        .map(|c| c.name)
        .ok();
    let view = CrmCardView {
        card: views::card_view(card),
        customer_name,
    };
    Ok(Json(envelope(
        "card status retrieved successfully".to_string(),
        None,
        view,
    )))
}

/// Handle CRM customer lookups
pub async fn customer_status(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Envelope<api_types::customer::CustomerView>>, ServerError> {
    let customer = state.engine.customer(&customer_id).await?;
    Ok(Json(envelope(
        "customer retrieved successfully".to_string(),
        None,
        views::customer_view(customer),
    )))
}
