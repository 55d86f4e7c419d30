use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use catalog_core::{
    api_types::{
        FILM_YEAR_RANGE, ScreenListFilter, SeasonCreate, SeriesCreate,
        SeriesUpdate, validate_year_param,
    },
    models::Series,
};

use crate::{errors::AppResult, infra::app_state::AppState};

#[derive(Debug, Deserialize)]
pub struct SeriesListQuery {
    pub year: Option<i64>,
    pub country: Option<String>,
    pub director: Option<String>,
}

pub async fn list_series_handler(
    State(state): State<AppState>,
    Query(query): Query<SeriesListQuery>,
) -> AppResult<Json<Vec<Series>>> {
    if let Some(year) = query.year {
        validate_year_param(year, &FILM_YEAR_RANGE)?;
    }

    let filter = ScreenListFilter {
        year: query.year,
        country: query.country,
        director: query.director,
    };
    let series = state.db.series().list(&filter).await?;
    Ok(Json(series))
}

pub async fn get_series_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Series>> {
    let series = state.db.series().get(id).await?;
    Ok(Json(series))
}

pub async fn create_series_handler(
    State(state): State<AppState>,
    Json(payload): Json<SeriesCreate>,
) -> AppResult<(StatusCode, Json<Series>)> {
    payload.validate()?;

    let series = state.db.series().create(&payload).await?;
    info!(
        "Created series {} ({}) with {} seasons",
        series.title,
        series.year,
        series.seasons.len()
    );
    Ok((StatusCode::CREATED, Json(series)))
}

pub async fn update_series_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SeriesUpdate>,
) -> AppResult<Json<Series>> {
    payload.validate()?;

    let series = state.db.series().update(id, &payload).await?;
    Ok(Json(series))
}

pub async fn delete_series_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.db.series().delete(id).await?;
    info!("Deleted series {} (seasons and episodes cascade)", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_season_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SeasonCreate>,
) -> AppResult<(StatusCode, Json<Series>)> {
    payload.validate()?;

    let series = state.db.series().add_season(id, &payload).await?;
    info!("Added season {} to series {}", payload.number, id);
    Ok((StatusCode::CREATED, Json(series)))
}
