use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    currencies::services::CurrencyService,
    http_err::{ApiError, ApiResponse},
    server::AppState,
};

mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_currencies).post(create_currency))
        .route("/search", get(search_currencies))
        .route(
            "/:code",
            get(get_currency)
                .put(replace_currency)
                .patch(update_currency)
                .delete(delete_currency),
        )
        .route("/:code/reactivate", post(reactivate_currency))
}

async fn get_currencies(
    State(currency_service): State<CurrencyService>,
) -> ApiResponse<Json<Vec<reps::Currency>>> {
    let currencies = currency_service.find_all_active().await?;

    Ok(Json(currencies.iter().map(reps::Currency::from).collect()))
}

async fn get_currency(
    State(currency_service): State<CurrencyService>,
    Path(code): Path<String>,
) -> ApiResponse<Json<reps::Currency>> {
    let currency = currency_service.find_active_by_code(&code).await?;

    Ok(Json(reps::Currency::from(&currency)))
}

#[derive(Deserialize)]
struct SearchCurrenciesParams {
    name: String,
}

async fn search_currencies(
    State(currency_service): State<CurrencyService>,
    Query(params): Query<SearchCurrenciesParams>,
) -> ApiResponse<Json<Vec<reps::Currency>>> {
    if params.name.is_empty() {
        return Err(ApiError::BadRequest(
            "Search parameter 'name' cannot be blank.".to_owned(),
        ));
    }

    let currencies = currency_service
        .search_active_by_display_name(&params.name)
        .await?;

    Ok(Json(currencies.iter().map(reps::Currency::from).collect()))
}

async fn create_currency(
    State(currency_service): State<CurrencyService>,
    Json(new_currency): Json<reps::NewCurrency>,
) -> ApiResponse<(StatusCode, Json<reps::Currency>)> {
    let created = currency_service.create(new_currency.into()).await?;

    Ok((StatusCode::CREATED, Json(reps::Currency::from(&created))))
}

async fn replace_currency(
    State(currency_service): State<CurrencyService>,
    Path(code): Path<String>,
    Json(replacement): Json<reps::NewCurrency>,
) -> ApiResponse<Json<reps::Currency>> {
    let replaced = currency_service.replace(&code, replacement.into()).await?;

    Ok(Json(reps::Currency::from(&replaced)))
}

async fn update_currency(
    State(currency_service): State<CurrencyService>,
    Path(code): Path<String>,
    Json(patch): Json<reps::UpdateCurrency>,
) -> ApiResponse<Json<reps::Currency>> {
    let updated = currency_service.partial_update(&code, patch.into()).await?;

    Ok(Json(reps::Currency::from(&updated)))
}

async fn delete_currency(
    State(currency_service): State<CurrencyService>,
    Path(code): Path<String>,
) -> ApiResponse<StatusCode> {
    currency_service.soft_delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn reactivate_currency(
    State(currency_service): State<CurrencyService>,
    Path(code): Path<String>,
) -> ApiResponse<Json<reps::Currency>> {
    let reactivated = currency_service.reactivate(&code).await?;

    Ok(Json(reps::Currency::from(&reactivated)))
}
