use crate::{
    index_handler, precipitation, routes, stations, temperatures_between, temperatures_from,
    tobs, ClimateAccess, ClimateData, Database, DatasetWindow,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub dataset: DatasetWindow,
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperatures_from,
        routes::climate::climate_routes::temperatures_between,
    ),
    components(
        schemas(
                routes::climate::climate_routes::PrecipitationResponse,
                routes::climate::climate_routes::StationsResponse,
                routes::climate::climate_routes::TobsResponse,
                routes::climate::climate_routes::StartSummary,
                routes::climate::climate_routes::RangeSummary,
        )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only api over historical Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Verifies the database and wires the query layer into the shared state.
pub async fn build_app_state(
    remote_url: String,
    dataset: DatasetWindow,
    database: Arc<Database>,
) -> Result<AppState, anyhow::Error> {
    database
        .health_check()
        .await
        .map_err(|e| anyhow!("error checking climate database: {}", e))?;

    let climate_db = Arc::new(ClimateAccess::new(database));

    Ok(AppState {
        remote_url,
        dataset,
        climate_db,
    })
}

/// Opens the read-only database at `database_path`.
pub async fn open_database(database_path: &str) -> Result<Arc<Database>, anyhow::Error> {
    let database = Database::new(database_path)
        .await
        .map_err(|e| anyhow!("error opening climate database: {}", e))?;
    Ok(Arc::new(database))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperatures_from))
        .route("/api/v1.0/{start}/{end}", get(temperatures_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
