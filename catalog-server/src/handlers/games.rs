use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use catalog_core::{
    api_types::{
        GAME_YEAR_RANGE, GameCreate, GameListFilter, GameUpdate,
        validate_year_param,
    },
    models::Game,
};

use crate::{errors::AppResult, infra::app_state::AppState};

#[derive(Debug, Deserialize)]
pub struct GameListQuery {
    pub year: Option<i64>,
    pub country: Option<String>,
    pub publisher: Option<String>,
}

pub async fn list_games_handler(
    State(state): State<AppState>,
    Query(query): Query<GameListQuery>,
) -> AppResult<Json<Vec<Game>>> {
    if let Some(year) = query.year {
        validate_year_param(year, &GAME_YEAR_RANGE)?;
    }

    let filter = GameListFilter {
        year: query.year,
        country: query.country,
        publisher: query.publisher,
    };
    let games = state.db.games().list(&filter).await?;
    Ok(Json(games))
}

pub async fn get_game_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Game>> {
    let game = state.db.games().get(id).await?;
    Ok(Json(game))
}

pub async fn create_game_handler(
    State(state): State<AppState>,
    Json(payload): Json<GameCreate>,
) -> AppResult<(StatusCode, Json<Game>)> {
    payload.validate()?;

    let game = state.db.games().create(&payload).await?;
    info!("Created game {} ({})", game.title, game.year);
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn update_game_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GameUpdate>,
) -> AppResult<Json<Game>> {
    payload.validate()?;

    let game = state.db.games().update(id, &payload).await?;
    Ok(Json(game))
}

pub async fn delete_game_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.db.games().delete(id).await?;
    info!("Deleted game {}", id);
    Ok(StatusCode::NO_CONTENT)
}
