//! Reporting endpoints

use api_types::report::SummaryView;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, views};

pub async fn summary(
    State(state): State<ServerState>,
) -> Result<Json<SummaryView>, ServerError> {
    let report = state.engine.summary().await?;
    Ok(Json(views::summary_view(report)))
}
