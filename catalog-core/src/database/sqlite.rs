use std::{fmt, str::FromStr};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use crate::{
    database::repositories::{
        GameRepository, MovieRepository, ReferenceRepository, SeriesRepository,
    },
    error::Result,
};

/// Connection pool plus the repositories built on top of it. One instance is
/// shared across requests; each operation checks a connection out of the pool
/// and releases it when done.
#[derive(Clone)]
pub struct CatalogDatabase {
    pool: SqlitePool,
    references: ReferenceRepository,
    movies: MovieRepository,
    series: SeriesRepository,
    games: GameRepository,
}

impl fmt::Debug for CatalogDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish_non_exhaustive()
    }
}

impl CatalogDatabase {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);

        // foreign_keys is what makes series -> seasons -> episodes cascades
        // fire; SQLite leaves the pragma off by default.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!(
            "Database pool initialized with max_connections={}",
            max_connections
        );

        Ok(Self::from_pool(pool))
    }

    /// Build the database over an existing pool (mainly for testing).
    pub fn from_pool(pool: SqlitePool) -> Self {
        let references = ReferenceRepository::new(pool.clone());
        let movies = MovieRepository::new(pool.clone());
        let series = SeriesRepository::new(pool.clone());
        let games = GameRepository::new(pool.clone());

        CatalogDatabase {
            pool,
            references,
            movies,
            series,
            games,
        }
    }

    /// Private in-memory database for tests. Pinned to a single connection:
    /// every checkout of a `:memory:` SQLite would otherwise see its own
    /// empty database.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    /// Apply embedded migrations. The server runs this once on startup
    /// before binding.
    pub async fn initialize_schema(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn references(&self) -> &ReferenceRepository {
        &self.references
    }

    pub fn movies(&self) -> &MovieRepository {
        &self.movies
    }

    pub fn series(&self) -> &SeriesRepository {
        &self.series
    }

    pub fn games(&self) -> &GameRepository {
        &self.games
    }
}
