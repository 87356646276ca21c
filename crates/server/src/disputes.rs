//! Fare dispute API endpoints

use api_types::ListQuery;
use api_types::dispute::{DisputeNew, DisputeUpdate, DisputeView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::MoneyCents;

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DisputeNew>,
) -> Result<Json<DisputeView>, ServerError> {
    let dispute = state
        .engine
        .new_dispute(
            &payload.card_id,
            &payload.trip_id,
            MoneyCents::new(payload.amount_minor),
            payload.description.as_deref(),
            &payload.dispute_type,
        )
        .await?;
    Ok(Json(views::dispute_view(dispute)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(dispute_id): Path<i32>,
) -> Result<Json<DisputeView>, ServerError> {
    let dispute = state.engine.dispute(dispute_id).await?;
    Ok(Json(views::dispute_view(dispute)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DisputeView>>, ServerError> {
    let disputes = state.engine.disputes(query.offset, query.limit).await?;
    Ok(Json(disputes.into_iter().map(views::dispute_view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(dispute_id): Path<i32>,
    Json(payload): Json<DisputeUpdate>,
) -> Result<Json<DisputeView>, ServerError> {
    let dispute = state
        .engine
        .update_dispute(
            dispute_id,
            engine::DisputeUpdate {
                amount: payload.amount_minor.map(MoneyCents::new),
                description: payload.description.map(Some),
                dispute_type: payload.dispute_type,
            },
        )
        .await?;
    Ok(Json(views::dispute_view(dispute)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(dispute_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_dispute(dispute_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
