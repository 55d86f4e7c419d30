use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use catalog_core::{
    api_types::{
        FILM_YEAR_RANGE, MovieCreate, MovieUpdate, ScreenListFilter,
        validate_year_param,
    },
    models::Movie,
};

use crate::{errors::AppResult, infra::app_state::AppState};

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub year: Option<i64>,
    pub country: Option<String>,
    pub director: Option<String>,
}

pub async fn list_movies_handler(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    if let Some(year) = query.year {
        validate_year_param(year, &FILM_YEAR_RANGE)?;
    }

    let filter = ScreenListFilter {
        year: query.year,
        country: query.country,
        director: query.director,
    };
    let movies = state.db.movies().list(&filter).await?;
    Ok(Json(movies))
}

pub async fn get_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Movie>> {
    let movie = state.db.movies().get(id).await?;
    Ok(Json(movie))
}

pub async fn create_movie_handler(
    State(state): State<AppState>,
    Json(payload): Json<MovieCreate>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    payload.validate()?;

    let movie = state.db.movies().create(&payload).await?;
    info!("Created movie {} ({})", movie.title, movie.year);
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MovieUpdate>,
) -> AppResult<Json<Movie>> {
    payload.validate()?;

    let movie = state.db.movies().update(id, &payload).await?;
    Ok(Json(movie))
}

pub async fn delete_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.db.movies().delete(id).await?;
    info!("Deleted movie {}", id);
    Ok(StatusCode::NO_CONTENT)
}
