//! Tap history API endpoints

use api_types::ListQuery;
use api_types::tap::{TapRecord, TapView};
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{ServerError, server::ServerState, views};

pub async fn record(
    State(state): State<ServerState>,
    Json(payload): Json<TapRecord>,
) -> Result<Json<TapView>, ServerError> {
    let tap = state
        .engine
        .record_tap(
            &payload.customer_id,
            payload.tap_time,
            &payload.location,
            &payload.device_id,
            &payload.transit_mode,
            views::tap_direction_to_engine(payload.direction),
            views::tap_outcome_to_engine(payload.outcome),
        )
        .await?;
    Ok(Json(views::tap_view(tap)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(tap_id): Path<String>,
) -> Result<Json<TapView>, ServerError> {
    let tap = state.engine.tap_entry(&tap_id).await?;
    Ok(Json(views::tap_view(tap)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TapView>>, ServerError> {
    let taps = state
        .engine
        .tap_history(engine::TapListFilter {
            customer_id: query.customer_id,
            offset: query.offset,
            limit: query.limit,
        })
        .await?;
    Ok(Json(taps.into_iter().map(views::tap_view).collect()))
}
