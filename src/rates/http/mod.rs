use axum::{extract::State, routing::get, Json, Router};

use crate::{
    http_err::ApiResponse, rates::services::RateService, rates::snapshot::RateSnapshot,
    server::AppState,
};

mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/original", get(get_original_snapshot))
        .route("/normalized", get(get_normalized_rates))
}

/// Pass the upstream snapshot through untouched, for diagnostics.
async fn get_original_snapshot(
    State(rate_service): State<RateService>,
) -> ApiResponse<Json<RateSnapshot>> {
    let snapshot = rate_service.original_snapshot().await?;

    Ok(Json(snapshot))
}

async fn get_normalized_rates(
    State(rate_service): State<RateService>,
) -> ApiResponse<Json<reps::NormalizedResponse>> {
    let normalized = rate_service.normalized_response().await?;

    Ok(Json(reps::NormalizedResponse::from(&normalized)))
}
