use std::{sync::Arc, time::Duration};

use axum::{extract::FromRef, http::Method, routing::get, Router};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    currencies::services::CurrencyService,
    database::PostgresConnection,
    rates::{client::HttpRateSourceClient, services::RateService},
    repos::currencies::DynCurrencyRepo,
};

pub struct Options {
    pub database_pool_size: u32,
    pub database_timeout_seconds: u8,
    pub database_url: String,

    pub rate_source_url: String,
    pub rate_source_connect_timeout_ms: u64,
    pub rate_source_read_timeout_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    db: PgPool,
    currency_service: CurrencyService,
    rate_service: RateService,
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let db_pool = PgPoolOptions::new()
        .max_connections(opts.database_pool_size)
        .acquire_timeout(Duration::from_secs(opts.database_timeout_seconds.into()))
        .connect(&opts.database_url)
        .await?;

    let db_connection = PostgresConnection::new(db_pool.clone());

    let currency_repo: DynCurrencyRepo = Arc::new(db_connection);
    let rate_source = Arc::new(HttpRateSourceClient::new(
        opts.rate_source_url,
        Duration::from_millis(opts.rate_source_connect_timeout_ms),
        Duration::from_millis(opts.rate_source_read_timeout_ms),
    )?);

    let currency_service = CurrencyService::new(currency_repo.clone());
    let rate_service = RateService::new(rate_source, currency_repo);

    let state = AppState {
        db: db_pool,
        currency_service,
        rate_service,
    };

    let app = Router::new()
        .route("/", get(health_check))
        .nest("/currencies", crate::currencies::http::routes())
        .nest("/rates", crate::rates::http::routes())
        .layer(cors_layer())
        .with_state(state);

    axum::Server::bind(&"0.0.0.0:8000".parse().unwrap())
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::DELETE,
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(Any)
        .allow_origin(Any)
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for CurrencyService {
    fn from_ref(state: &AppState) -> Self {
        state.currency_service.clone()
    }
}

impl FromRef<AppState> for RateService {
    fn from_ref(state: &AppState) -> Self {
        state.rate_service.clone()
    }
}
