//! Trip API endpoints

use api_types::ListQuery;
use api_types::trip::{TripNew, TripUpdate, TripView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::MoneyCents;

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TripNew>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state
        .engine
        .new_trip(
            payload.id.as_deref(),
            &payload.card_id,
            payload.start_time,
            payload.end_time,
            &payload.entry_location,
            &payload.exit_location,
            MoneyCents::new(payload.fare_minor),
            &payload.route,
            &payload.operator,
            &payload.transit_mode,
            payload.adjustable,
        )
        .await?;
    Ok(Json(views::trip_view(trip)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state.engine.trip(&trip_id).await?;
    Ok(Json(views::trip_view(trip)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TripView>>, ServerError> {
    let trips = state.engine.trips(query.offset, query.limit).await?;
    Ok(Json(trips.into_iter().map(views::trip_view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
    Json(payload): Json<TripUpdate>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state
        .engine
        .update_trip(
            &trip_id,
            engine::TripUpdate {
                start_time: payload.start_time,
                end_time: payload.end_time,
                entry_location: payload.entry_location,
                exit_location: payload.exit_location,
                fare: payload.fare_minor.map(MoneyCents::new),
                route: payload.route,
                operator: payload.operator,
                transit_mode: payload.transit_mode,
                adjustable: payload.adjustable,
            },
        )
        .await?;
    Ok(Json(views::trip_view(trip)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_trip(&trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
