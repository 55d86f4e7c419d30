use axum::{extract::State, response::Json};

use catalog_core::models::{Country, Director, Publisher};

use crate::{errors::AppResult, infra::app_state::AppState};

pub async fn list_countries_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Country>>> {
    let countries = state.db.references().list_countries().await?;
    Ok(Json(countries))
}

pub async fn list_directors_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Director>>> {
    let directors = state.db.references().list_directors().await?;
    Ok(Json(directors))
}

pub async fn list_publishers_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Publisher>>> {
    let publishers = state.db.references().list_publishers().await?;
    Ok(Json(publishers))
}
