//! Customer API endpoints

use api_types::ListQuery;
use api_types::customer::{CustomerNew, CustomerUpdate, CustomerView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state
        .engine
        .new_customer(
            &payload.name,
            &payload.email,
            &payload.phone,
            &payload.notifications,
        )
        .await?;
    Ok(Json(views::customer_view(customer)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.customer(&customer_id).await?;
    Ok(Json(views::customer_view(customer)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CustomerView>>, ServerError> {
    let customers = state.engine.customers(query.offset, query.limit).await?;
    Ok(Json(
        customers.into_iter().map(views::customer_view).collect(),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state
        .engine
        .update_customer(
            &customer_id,
            engine::CustomerUpdate {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                notifications: payload.notifications,
            },
        )
        .await?;
    Ok(Json(views::customer_view(customer)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_customer(&customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
