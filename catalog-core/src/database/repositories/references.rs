use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    error::{Result, is_unique_violation},
    models::{Country, Director, Publisher},
};

/// Get-or-create access to the shared lookup tables. Names are matched
/// exactly after trimming; no fuzzy matching, no update-in-place, and
/// nothing here ever deletes a row.
#[derive(Clone, Debug)]
pub struct ReferenceRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct NamedRow {
    id: i64,
    name: String,
}

impl ReferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_or_create_country(&self, name: &str) -> Result<Country> {
        let row = self.get_or_create("countries", name).await?;
        Ok(Country {
            id: row.id,
            name: row.name,
        })
    }

    pub async fn get_or_create_director(&self, name: &str) -> Result<Director> {
        let row = self.get_or_create("directors", name).await?;
        Ok(Director {
            id: row.id,
            name: row.name,
        })
    }

    pub async fn get_or_create_publisher(&self, name: &str) -> Result<Publisher> {
        let row = self.get_or_create("publishers", name).await?;
        Ok(Publisher {
            id: row.id,
            name: row.name,
        })
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        let rows = sqlx::query_as::<_, Country>(
            "SELECT id, name FROM countries ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_directors(&self) -> Result<Vec<Director>> {
        let rows = sqlx::query_as::<_, Director>(
            "SELECT id, name FROM directors ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_publishers(&self) -> Result<Vec<Publisher>> {
        let rows = sqlx::query_as::<_, Publisher>(
            "SELECT id, name FROM publishers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_or_create(&self, table: &'static str, name: &str) -> Result<NamedRow> {
        let name = name.trim();

        let select = format!("SELECT id, name FROM {table} WHERE name = ?");
        if let Some(row) = sqlx::query_as::<_, NamedRow>(&select)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok(row);
        }

        let insert = format!("INSERT INTO {table} (name) VALUES (?) RETURNING id, name");
        match sqlx::query_as::<_, NamedRow>(&insert)
            .bind(name)
            .fetch_one(&self.pool)
            .await
        {
            Ok(row) => {
                debug!("Created {} entry '{}'", table, name);
                Ok(row)
            }
            // Another request inserted the same name between our lookup and
            // the insert; the unique index is the source of truth, so re-read
            // the winning row instead of surfacing an error.
            Err(err) if is_unique_violation(&err) => {
                let row = sqlx::query_as::<_, NamedRow>(&select)
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(row)
            }
            Err(err) => Err(err.into()),
        }
    }
}
