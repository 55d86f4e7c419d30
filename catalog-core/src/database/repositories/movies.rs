use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    api_types::{MovieCreate, MovieUpdate, ScreenListFilter},
    database::repositories::ReferenceRepository,
    error::{CatalogError, Result, is_unique_violation},
    models::{Country, Director, Movie},
};

const MOVIE_SELECT: &str = "\
    SELECT m.id, m.title, m.year, \
           d.id AS director_id, d.name AS director_name, \
           c.id AS country_id, c.name AS country_name \
    FROM movies m \
    JOIN directors d ON m.director_id = d.id \
    JOIN countries c ON m.country_id = c.id";

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: i64,
    title: String,
    year: i64,
    director_id: i64,
    director_name: String,
    country_id: i64,
    country_name: String,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            year: row.year,
            director: Director {
                id: row.director_id,
                name: row.director_name,
            },
            country: Country {
                id: row.country_id,
                name: row.country_name,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct MovieRepository {
    pool: SqlitePool,
    references: ReferenceRepository,
}

impl MovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        let references = ReferenceRepository::new(pool.clone());
        Self { pool, references }
    }

    pub async fn list(&self, filter: &ScreenListFilter) -> Result<Vec<Movie>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(MOVIE_SELECT);
        query.push(" WHERE 1 = 1");
        if let Some(year) = filter.year {
            query.push(" AND m.year = ").push_bind(year);
        }
        if let Some(country) = &filter.country {
            query.push(" AND c.name = ").push_bind(country);
        }
        if let Some(director) = &filter.director {
            query.push(" AND d.name = ").push_bind(director);
        }
        query.push(" ORDER BY m.year DESC, m.title ASC");

        let rows: Vec<MovieRow> =
            query.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        let row = sqlx::query_as::<_, MovieRow>(
            &format!("{MOVIE_SELECT} WHERE m.id = ?"),
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(CatalogError::NotFound("Movie not found".into())),
        }
    }

    pub async fn create(&self, data: &MovieCreate) -> Result<Movie> {
        let country = self.references.get_or_create_country(&data.country_name).await?;
        let director = self.references.get_or_create_director(&data.director_name).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO movies (title, year, director_id, country_id) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&data.title)
        .bind(data.year)
        .bind(director.id)
        .bind(country.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| duplicate_title(err, &data.title, data.year))?;

        self.get(id).await
    }

    /// Partial update: only fields present in `changes` are written; name
    /// fields re-resolve through get-or-create and replace the foreign key.
    pub async fn update(&self, id: i64, changes: &MovieUpdate) -> Result<Movie> {
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
            "UPDATE movies SET title = ?, year = ?, director_id = ?, country_id = ? \
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

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound("Movie not found".into()));
        }
        Ok(())
    }
}

fn duplicate_title(err: sqlx::Error, title: &str, year: i64) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::Conflict(format!(
            "Movie \"{title}\" ({year}) already exists"
        ))
    } else {
        err.into()
    }
}
