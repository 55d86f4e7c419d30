use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    api_types::{GameCreate, GameListFilter, GameUpdate},
    database::repositories::ReferenceRepository,
    error::{CatalogError, Result, is_unique_violation},
    models::{Country, Game, Publisher},
};

const GAME_SELECT: &str = "\
    SELECT g.id, g.title, g.year, \
           c.id AS country_id, c.name AS country_name, \
           p.id AS publisher_id, p.name AS publisher_name \
    FROM games g \
    JOIN countries c ON g.country_id = c.id \
    JOIN publishers p ON g.publisher_id = p.id";

#[derive(sqlx::FromRow)]
struct GameRow {
    id: i64,
    title: String,
    year: i64,
    country_id: i64,
    country_name: String,
    publisher_id: i64,
    publisher_name: String,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            title: row.title,
            year: row.year,
            country: Country {
                id: row.country_id,
                name: row.country_name,
            },
            publisher: Publisher {
                id: row.publisher_id,
                name: row.publisher_name,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameRepository {
    pool: SqlitePool,
    references: ReferenceRepository,
}

impl GameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        let references = ReferenceRepository::new(pool.clone());
        Self { pool, references }
    }

    pub async fn list(&self, filter: &GameListFilter) -> Result<Vec<Game>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(GAME_SELECT);
        query.push(" WHERE 1 = 1");
        if let Some(year) = filter.year {
            query.push(" AND g.year = ").push_bind(year);
        }
        if let Some(country) = &filter.country {
            query.push(" AND c.name = ").push_bind(country);
        }
        if let Some(publisher) = &filter.publisher {
            query.push(" AND p.name = ").push_bind(publisher);
        }
        query.push(" ORDER BY g.year DESC, g.title ASC");

        let rows: Vec<GameRow> =
            query.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Game::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Game> {
        let row = sqlx::query_as::<_, GameRow>(
            &format!("{GAME_SELECT} WHERE g.id = ?"),
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(CatalogError::NotFound("Game not found".into())),
        }
    }

    pub async fn create(&self, data: &GameCreate) -> Result<Game> {
        let country = self.references.get_or_create_country(&data.country_name).await?;
        let publisher = self
            .references
            .get_or_create_publisher(&data.publisher_name)
            .await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO games (title, year, country_id, publisher_id) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&data.title)
        .bind(data.year)
        .bind(country.id)
        .bind(publisher.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| duplicate_title(err, &data.title, data.year))?;

        self.get(id).await
    }

    pub async fn update(&self, id: i64, changes: &GameUpdate) -> Result<Game> {
        let current = self.get(id).await?;

        let title = changes.title.as_ref().unwrap_or(&current.title);
        let year = changes.year.unwrap_or(current.year);
        let country_id = match &changes.country_name {
            Some(name) => self.references.get_or_create_country(name).await?.id,
            None => current.country.id,
        };
        let publisher_id = match &changes.publisher_name {
            Some(name) => self.references.get_or_create_publisher(name).await?.id,
            None => current.publisher.id,
        };

        sqlx::query(
            "UPDATE games SET title = ?, year = ?, country_id = ?, publisher_id = ? \
             WHERE id = ?",
        )
        .bind(title)
        .bind(year)
        .bind(country_id)
        .bind(publisher_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| duplicate_title(err, title, year))?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound("Game not found".into()));
        }
        Ok(())
    }
}

fn duplicate_title(err: sqlx::Error, title: &str, year: i64) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::Conflict(format!(
            "Game \"{title}\" ({year}) already exists"
        ))
    } else {
        err.into()
    }
}
