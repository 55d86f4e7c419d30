use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::{
    handlers::{
        games::{
            create_game_handler, delete_game_handler, get_game_handler,
            list_games_handler, update_game_handler,
        },
        movies::{
            create_movie_handler, delete_movie_handler, get_movie_handler,
            list_movies_handler, update_movie_handler,
        },
        reference::{
            list_countries_handler, list_directors_handler,
            list_publishers_handler,
        },
        series::{
            add_season_handler, create_series_handler, delete_series_handler,
            get_series_handler, list_series_handler, update_series_handler,
        },
    },
    infra::app_state::AppState,
};

/// Assemble the full catalog API surface.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(create_reference_routes())
        .merge(create_movie_routes())
        .merge(create_series_routes())
        .merge(create_game_routes())
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Flat listings of the shared lookup tables, name ascending.
fn create_reference_routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries_handler))
        .route("/directors", get(list_directors_handler))
        .route("/publishers", get(list_publishers_handler))
}

fn create_movie_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/movies",
            get(list_movies_handler).post(create_movie_handler),
        )
        .route(
            "/movies/{id}",
            get(get_movie_handler)
                .put(update_movie_handler)
                .delete(delete_movie_handler),
        )
}

fn create_series_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/series",
            get(list_series_handler).post(create_series_handler),
        )
        .route(
            "/series/{id}",
            get(get_series_handler)
                .put(update_series_handler)
                .delete(delete_series_handler),
        )
        .route("/series/{id}/seasons", post(add_season_handler))
}

fn create_game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games_handler).post(create_game_handler))
        .route(
            "/games/{id}",
            get(get_game_handler)
                .put(update_game_handler)
                .delete(delete_game_handler),
        )
}
