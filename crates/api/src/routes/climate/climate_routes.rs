use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{
    iso_date, parse_date_param, AggregateRows, AppState, DatasetWindow, Error, Precipitation,
    TemperatureObservation, TemperatureSummary,
};

/// Date -> every precipitation reading recorded that day.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct PrecipitationResponse(pub Precipitation);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StationsResponse {
    #[serde(rename = "List of temperature stations in Hawaii")]
    pub stations: Vec<String>,
}

/// Single labelled key holding `[date, tobs]` pairs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct TobsResponse(pub BTreeMap<String, Vec<TemperatureObservation>>);

impl TobsResponse {
    pub fn new(window: &DatasetWindow, observations: Vec<TemperatureObservation>) -> Self {
        Self(BTreeMap::from([(window.tobs_label(), observations)]))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartSummary {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "Max Temp")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub max_temp: AggregateRows,
    #[serde(rename = "Min Temp")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub min_temp: AggregateRows,
    #[serde(rename = "Average Temp")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub average_temp: AggregateRows,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RangeSummary {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Max Temp")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub max_temp: AggregateRows,
    #[serde(rename = "Min Temp")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub min_temp: AggregateRows,
    #[serde(rename = "Average Temp")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub average_temp: AggregateRows,
}

impl StartSummary {
    fn new(start_date: String, summary: TemperatureSummary) -> Self {
        Self {
            start_date,
            max_temp: summary.max,
            min_temp: summary.min,
            average_temp: summary.avg,
        }
    }
}

impl RangeSummary {
    fn new(start_date: String, end_date: String, summary: TemperatureSummary) -> Self {
        Self {
            start_date,
            end_date,
            max_temp: summary.max,
            min_temp: summary.min,
            average_temp: summary.avg,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation readings per date for the last year of data", content_type = "application/json", body = PrecipitationResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query precipitation")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationResponse>, Error> {
    let readings = state
        .climate_db
        .precipitation(state.dataset.cutoff())
        .await?;
    Ok(Json(PrecipitationResponse(readings)))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Distinct station ids in the dataset", content_type = "application/json", body = StationsResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query stations")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<StationsResponse>, Error> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(StationsResponse { stations }))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station for the last year of data", content_type = "application/json", body = TobsResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperature observations")
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<TobsResponse>, Error> {
    let window = &state.dataset;
    let observations = state
        .climate_db
        .temperature_observations(&window.station, window.cutoff())
        .await?;
    Ok(Json(TobsResponse::new(window, observations)))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "Start date, hyphens optional (2017-01-01 or 20170101)"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature from the start date on", content_type = "application/json", body = StartSummary),
        (status = INTERNAL_SERVER_ERROR, description = "Malformed date or failed query")
    ))]
pub async fn temperatures_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<StartSummary>, Error> {
    let start = parse_date_param(&start)?;
    debug!("summarizing temperatures from {}", start);

    let summary = state.climate_db.temperatures_from(start).await?;
    Ok(Json(StartSummary::new(iso_date(start), summary)))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "Start date (inclusive), hyphens optional"),
         ("end" = String, Path, description = "End date (inclusive), hyphens optional"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature between the two dates", content_type = "application/json", body = RangeSummary),
        (status = INTERNAL_SERVER_ERROR, description = "Malformed date or failed query")
    ))]
pub async fn temperatures_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<RangeSummary>, Error> {
    let start = parse_date_param(&start)?;
    let end = parse_date_param(&end)?;
    debug!("summarizing temperatures from {} to {}", start, end);

    // an inverted range is not rejected, the aggregates just come back null
    let summary = state.climate_db.temperatures_between(start, end).await?;
    Ok(Json(RangeSummary::new(
        iso_date(start),
        iso_date(end),
        summary,
    )))
}
