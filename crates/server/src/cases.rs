//! Support case API endpoints

use api_types::ListQuery;
use api_types::case::{CaseNew, CaseUpdate, CaseView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CaseNew>,
) -> Result<Json<CaseView>, ServerError> {
    let case = state
        .engine
        .new_case(
            &payload.customer_id,
            payload.card_id.as_deref(),
            &payload.case_status,
            &payload.priority,
            &payload.category,
            &payload.assigned_agent,
            payload.notes.as_deref(),
        )
        .await?;
    Ok(Json(views::case_view(case)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(case_id): Path<String>,
) -> Result<Json<CaseView>, ServerError> {
    let case = state.engine.case(&case_id).await?;
    Ok(Json(views::case_view(case)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CaseView>>, ServerError> {
    let cases = state.engine.cases(query.offset, query.limit).await?;
    Ok(Json(cases.into_iter().map(views::case_view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(case_id): Path<String>,
    Json(payload): Json<CaseUpdate>,
) -> Result<Json<CaseView>, ServerError> {
    let case = state
        .engine
        .update_case(
            &case_id,
            engine::CaseUpdate {
                case_status: payload.case_status,
                priority: payload.priority,
                category: payload.category,
                assigned_agent: payload.assigned_agent,
                notes: payload.notes.map(Some),
            },
        )
        .await?;
    Ok(Json(views::case_view(case)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(case_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_case(&case_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
