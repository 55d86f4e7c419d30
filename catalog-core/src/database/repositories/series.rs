use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::{
    api_types::{ScreenListFilter, SeasonCreate, SeriesCreate, SeriesUpdate},
    database::repositories::ReferenceRepository,
    error::{CatalogError, Result, is_unique_violation},
    models::{Country, Director, Episode, Season, Series},
};

const SERIES_SELECT: &str = "\
    SELECT s.id, s.title, s.year, \
           d.id AS director_id, d.name AS director_name, \
           c.id AS country_id, c.name AS country_name \
    FROM series s \
    JOIN directors d ON s.director_id = d.id \
    JOIN countries c ON s.country_id = c.id";

#[derive(sqlx::FromRow)]
struct SeriesRow {
    id: i64,
    title: String,
    year: i64,
    director_id: i64,
    director_name: String,
    country_id: i64,
    country_name: String,
}

impl SeriesRow {
    fn into_series(self, seasons: Vec<Season>) -> Series {
        Series {
            id: self.id,
            title: self.title,
            year: self.year,
            director: Director {
                id: self.director_id,
                name: self.director_name,
            },
            country: Country {
                id: self.country_id,
                name: self.country_name,
            },
            seasons,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SeasonRow {
    id: i64,
    series_id: i64,
    number: i64,
    year: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct EpisodeRow {
    id: i64,
    season_id: i64,
    number: i64,
    title: String,
}

#[derive(Clone, Debug)]
pub struct SeriesRepository {
    pool: SqlitePool,
    references: ReferenceRepository,
}

impl SeriesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        let references = ReferenceRepository::new(pool.clone());
        Self { pool, references }
    }

    pub async fn list(&self, filter: &ScreenListFilter) -> Result<Vec<Series>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SERIES_SELECT);
        query.push(" WHERE 1 = 1");
        if let Some(year) = filter.year {
            query.push(" AND s.year = ").push_bind(year);
        }
        if let Some(country) = &filter.country {
            query.push(" AND c.name = ").push_bind(country);
        }
        if let Some(director) = &filter.director {
            query.push(" AND d.name = ").push_bind(director);
        }
        query.push(" ORDER BY s.year DESC, s.title ASC");

        let rows: Vec<SeriesRow> =
            query.build_query_as().fetch_all(&self.pool).await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut seasons_by_series = self.load_seasons(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let seasons =
                    seasons_by_series.remove(&row.id).unwrap_or_default();
                row.into_series(seasons)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Series> {
        let row = sqlx::query_as::<_, SeriesRow>(
            &format!("{SERIES_SELECT} WHERE s.id = ?"),
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(CatalogError::NotFound("Series not found".into()));
        };

        let mut seasons_by_series = self.load_seasons(&[id]).await?;
        let seasons = seasons_by_series.remove(&id).unwrap_or_default();
        Ok(row.into_series(seasons))
    }

    pub async fn create(&self, data: &SeriesCreate) -> Result<Series> {
        let country = self.references.get_or_create_country(&data.country_name).await?;
        let director = self
            .references
            .get_or_create_director(&data.director_name)
            .await?;

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO series (title, year, director_id, country_id) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&data.title)
        .bind(data.year)
        .bind(director.id)
        .bind(country.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| duplicate_title(err, &data.title, data.year))?;

        for season in &data.seasons {
            insert_season(&mut tx, id, season).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn update(&self, id: i64, changes: &SeriesUpdate) -> Result<Series> {
        let current = self.get(id).await?;

        let title = changes.title.as_ref().unwrap_or(&current.title);
        let year = changes.year.unwrap_or(current.year);
        let director_id = match &changes.director_name {
            Some(name) => self.references.get_or_create_director(name).await?.id,
            None => current.director.id,
        };
        let country_id = match &changes.country_name {
            Some(name) => self.references.get_or_create_country(name).await?.id,
            None => current.country.id,
        };

        sqlx::query(
            "UPDATE series SET title = ?, year = ?, director_id = ?, country_id = ? \
             WHERE id = ?",
        )
        .bind(title)
        .bind(year)
        .bind(director_id)
        .bind(country_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| duplicate_title(err, title, year))?;

        self.get(id).await
    }

    /// Removing a series also removes its seasons and their episodes via
    /// the cascading foreign keys.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM series WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound("Series not found".into()));
        }
        Ok(())
    }

    /// Append a season (with its episodes) to an existing series. The season
    /// and episode inserts share one transaction: a duplicate episode number
    /// rolls the season back too.
    pub async fn add_season(&self, series_id: i64, season: &SeasonCreate) -> Result<Series> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM series WHERE id = ?")
            .bind(series_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(CatalogError::NotFound("Series not found".into()));
        }

        let mut tx = self.pool.begin().await?;
        insert_season(&mut tx, series_id, season).await?;
        tx.commit().await?;

        self.get(series_id).await
    }

    async fn load_seasons(
        &self,
        series_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Season>>> {
        if series_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, series_id, number, year FROM seasons WHERE series_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in series_ids {
            separated.push_bind(*id);
        }
        query.push(") ORDER BY series_id ASC, number ASC");
        let season_rows: Vec<SeasonRow> =
            query.build_query_as().fetch_all(&self.pool).await?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT e.id, e.season_id, e.number, e.title FROM episodes e \
             JOIN seasons s ON e.season_id = s.id WHERE s.series_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in series_ids {
            separated.push_bind(*id);
        }
        query.push(") ORDER BY e.number ASC");
        let episode_rows: Vec<EpisodeRow> =
            query.build_query_as().fetch_all(&self.pool).await?;

        let mut episodes_by_season: HashMap<i64, Vec<Episode>> = HashMap::new();
        for row in episode_rows {
            episodes_by_season
                .entry(row.season_id)
                .or_default()
                .push(Episode {
                    id: row.id,
                    number: row.number,
                    title: row.title,
                });
        }

        let mut seasons_by_series: HashMap<i64, Vec<Season>> = HashMap::new();
        for row in season_rows {
            let episodes =
                episodes_by_season.remove(&row.id).unwrap_or_default();
            seasons_by_series
                .entry(row.series_id)
                .or_default()
                .push(Season {
                    id: row.id,
                    number: row.number,
                    year: row.year,
                    episodes,
                });
        }

        Ok(seasons_by_series)
    }
}

async fn insert_season(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    series_id: i64,
    season: &SeasonCreate,
) -> Result<()> {
    let conn: &mut SqliteConnection = &mut *tx;

    let season_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO seasons (series_id, number, year) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(series_id)
    .bind(season.number)
    .bind(season.year)
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            CatalogError::Conflict(format!(
                "Season {} already exists for this series",
                season.number
            ))
        } else {
            err.into()
        }
    })?;

    for episode in &season.episodes {
        sqlx::query("INSERT INTO episodes (season_id, number, title) VALUES (?, ?, ?)")
            .bind(season_id)
            .bind(episode.number)
            .bind(&episode.title)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    CatalogError::Conflict(format!(
                        "Episode {} already exists in season {}",
                        episode.number, season.number
                    ))
                } else {
                    CatalogError::from(err)
                }
            })?;
    }

    Ok(())
}

fn duplicate_title(err: sqlx::Error, title: &str, year: i64) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::Conflict(format!(
            "Series \"{title}\" ({year}) already exists"
        ))
    } else {
        err.into()
    }
}
