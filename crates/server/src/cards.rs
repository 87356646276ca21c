//! Card API endpoints

use api_types::ListQuery;
use api_types::card::{
    BalanceView, CardIssue, CardView, ProductAdd, Reload, ReloadReceiptView, StatusSet,
};
use api_types::trip::CardTransactionsView;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::MoneyCents;

use crate::{ServerError, server::ServerState, views};

/// Handle requests for issuing a new card
pub async fn issue(
    State(state): State<ServerState>,
    Json(payload): Json<CardIssue>,
) -> Result<Json<CardView>, ServerError> {
    let card = state
        .engine
        .issue_card(
            payload.card_id.as_deref(),
            views::card_type_to_engine(payload.card_type),
            &payload.customer_id,
            payload.issue_date.unwrap_or_else(Utc::now),
            MoneyCents::new(payload.initial_balance_minor),
            payload.product.as_deref(),
        )
        .await?;

    Ok(Json(views::card_view(card)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
) -> Result<Json<CardView>, ServerError> {
    let card = state.engine.card(&card_id).await?;
    Ok(Json(views::card_view(card)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CardView>>, ServerError> {
    let cards = state
        .engine
        .cards(query.customer_id.as_deref(), query.offset, query.limit)
        .await?;
    Ok(Json(cards.into_iter().map(views::card_view).collect()))
}

pub async fn balance(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
) -> Result<Json<BalanceView>, ServerError> {
    let card = state.engine.card(&card_id).await?;
    Ok(Json(views::balance_view(card)))
}

/// Handle requests for reloading funds onto a card
pub async fn reload(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    Json(payload): Json<Reload>,
) -> Result<Json<ReloadReceiptView>, ServerError> {
    let receipt = state
        .engine
        .reload(&card_id, MoneyCents::new(payload.amount_minor))
        .await?;

    Ok(Json(ReloadReceiptView {
        card_id: receipt.card_id,
        amount_minor: receipt.amount.cents(),
        previous_balance_minor: receipt.previous_balance.cents(),
        new_balance_minor: receipt.new_balance.cents(),
    }))
}

/// Handle requests for attaching a product to a card
pub async fn add_product(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    Json(payload): Json<ProductAdd>,
) -> Result<Json<CardView>, ServerError> {
    let card = state
        .engine
        .attach_product(&card_id, &payload.product, MoneyCents::new(payload.value_minor))
        .await?;
    Ok(Json(views::card_view(card)))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    Json(payload): Json<StatusSet>,
) -> Result<Json<CardView>, ServerError> {
    let card = state
        .engine
        .set_card_status(&card_id, views::card_status_to_engine(payload.status))
        .await?;
    Ok(Json(views::card_view(card)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_card(&card_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Trip and tap activity for one card
pub async fn transactions(
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
) -> Result<Json<CardTransactionsView>, ServerError> {
    let activity = state.engine.card_transactions(&card_id).await?;
    Ok(Json(CardTransactionsView {
        card_id: activity.card_id,
        card_balance_minor: activity.card_balance.cents(),
        trips: activity.trips.into_iter().map(views::trip_view).collect(),
        tap_history: activity
            .tap_history
            .into_iter()
            .map(views::tap_view)
            .collect(),
    }))
}
