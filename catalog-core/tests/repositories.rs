use catalog_core::{
    CatalogDatabase, CatalogError,
    api_types::{
        EpisodeCreate, GameCreate, GameListFilter, MovieCreate, MovieUpdate,
        ScreenListFilter, SeasonCreate, SeriesCreate,
    },
};

async fn test_db() -> CatalogDatabase {
    let db = CatalogDatabase::connect_in_memory().await.unwrap();
    db.initialize_schema().await.unwrap();
    db
}

fn movie(title: &str, year: i64, country: &str, director: &str) -> MovieCreate {
    MovieCreate {
        title: title.into(),
        year,
        director_name: director.into(),
        country_name: country.into(),
    }
}

fn season(number: i64, episodes: &[(i64, &str)]) -> SeasonCreate {
    SeasonCreate {
        number,
        year: None,
        episodes: episodes
            .iter()
            .map(|&(number, title)| EpisodeCreate {
                number,
                title: title.into(),
            })
            .collect(),
    }
}

async fn count(db: &CatalogDatabase, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn get_or_create_is_idempotent_and_trims() {
    let db = test_db().await;

    let first = db.references().get_or_create_country("Japan").await.unwrap();
    let second = db
        .references()
        .get_or_create_country("  Japan  ")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Japan");
    assert_eq!(count(&db, "countries").await, 1);
}

#[tokio::test]
async fn reference_listings_sort_by_name() {
    let db = test_db().await;
    for name in ["Poland", "France", "Japan"] {
        db.references().get_or_create_country(name).await.unwrap();
    }

    let countries = db.references().list_countries().await.unwrap();
    let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["France", "Japan", "Poland"]);
}

#[tokio::test]
async fn duplicate_title_year_is_a_conflict() {
    let db = test_db().await;
    let payload = movie("The Matrix", 1999, "United States", "Lana Wachowski & Lilly Wachowski");

    db.movies().create(&payload).await.unwrap();
    let err = db.movies().create(&payload).await.unwrap_err();

    assert!(matches!(err, CatalogError::Conflict(_)));
    assert_eq!(count(&db, "movies").await, 1);
}

#[tokio::test]
async fn same_title_in_a_different_year_is_allowed() {
    let db = test_db().await;
    db.movies()
        .create(&movie("Dune", 1984, "United States", "David Lynch"))
        .await
        .unwrap();
    db.movies()
        .create(&movie("Dune", 2021, "United States", "Denis Villeneuve"))
        .await
        .unwrap();

    assert_eq!(count(&db, "movies").await, 2);
}

#[tokio::test]
async fn movie_listing_orders_year_desc_then_title_asc() {
    let db = test_db().await;
    for (title, year) in [
        ("The Matrix", 1999),
        ("Inception", 2010),
        ("Memento", 2010),
        ("Parasite", 2019),
    ] {
        db.movies()
            .create(&movie(title, year, "Somewhere", "Someone"))
            .await
            .unwrap();
    }

    let movies = db.movies().list(&ScreenListFilter::default()).await.unwrap();
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Parasite", "Inception", "Memento", "The Matrix"]);
}

#[tokio::test]
async fn movie_listing_filters_are_exact() {
    let db = test_db().await;
    db.movies()
        .create(&movie("Spirited Away", 2001, "Japan", "Hayao Miyazaki"))
        .await
        .unwrap();
    db.movies()
        .create(&movie("Inception", 2010, "United States", "Christopher Nolan"))
        .await
        .unwrap();

    let by_year = db
        .movies()
        .list(&ScreenListFilter {
            year: Some(2001),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_year.len(), 1);
    assert_eq!(by_year[0].title, "Spirited Away");

    let by_country = db
        .movies()
        .list(&ScreenListFilter {
            country: Some("Japan".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_country.len(), 1);

    let by_director = db
        .movies()
        .list(&ScreenListFilter {
            director: Some("Christopher Nolan".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_director.len(), 1);
    assert_eq!(by_director[0].title, "Inception");

    // Exact matching only, no fuzz.
    let no_match = db
        .movies()
        .list(&ScreenListFilter {
            director: Some("Nolan".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(no_match.is_empty());
}

#[tokio::test]
async fn partial_update_touches_only_supplied_fields() {
    let db = test_db().await;
    let created = db
        .movies()
        .create(&movie("The Matrix", 1998, "United States", "Lana Wachowski & Lilly Wachowski"))
        .await
        .unwrap();

    let updated = db
        .movies()
        .update(
            created.id,
            &MovieUpdate {
                year: Some(1999),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.year, 1999);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.director, created.director);
    assert_eq!(updated.country, created.country);
}

#[tokio::test]
async fn update_reresolves_reference_names() {
    let db = test_db().await;
    let created = db
        .movies()
        .create(&movie("Parasite", 2019, "United States", "Bong Joon-ho"))
        .await
        .unwrap();

    let updated = db
        .movies()
        .update(
            created.id,
            &MovieUpdate {
                country_name: Some("South Korea".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.country.name, "South Korea");
    assert_ne!(updated.country.id, created.country.id);
    // The old country row stays; reference entities are never deleted.
    assert_eq!(count(&db, "countries").await, 2);
}

#[tokio::test]
async fn missing_ids_surface_as_not_found() {
    let db = test_db().await;

    assert!(matches!(
        db.movies().get(42).await.unwrap_err(),
        CatalogError::NotFound(msg) if msg == "Movie not found"
    ));
    assert!(matches!(
        db.movies().delete(42).await.unwrap_err(),
        CatalogError::NotFound(_)
    ));
    assert!(matches!(
        db.series().get(42).await.unwrap_err(),
        CatalogError::NotFound(msg) if msg == "Series not found"
    ));
    assert!(matches!(
        db.games().get(42).await.unwrap_err(),
        CatalogError::NotFound(msg) if msg == "Game not found"
    ));
}

#[tokio::test]
async fn series_create_persists_nested_seasons_and_episodes() {
    let db = test_db().await;
    let created = db
        .series()
        .create(&SeriesCreate {
            title: "Breaking Bad".into(),
            year: 2008,
            director_name: "Vince Gilligan".into(),
            country_name: "United States".into(),
            seasons: vec![
                season(2, &[(1, "Seven Thirty-Seven"), (2, "Grilled")]),
                season(1, &[(1, "Pilot"), (2, "Cat's in the Bag...")]),
            ],
        })
        .await
        .unwrap();

    // Seasons and episodes come back ordered by number regardless of
    // insertion order.
    assert_eq!(created.seasons.len(), 2);
    assert_eq!(created.seasons[0].number, 1);
    assert_eq!(created.seasons[1].number, 2);
    assert_eq!(created.seasons[0].episodes[0].title, "Pilot");
    assert_eq!(created.seasons[1].episodes[1].title, "Grilled");
}

#[tokio::test]
async fn deleting_a_series_cascades_to_seasons_and_episodes() {
    let db = test_db().await;
    let created = db
        .series()
        .create(&SeriesCreate {
            title: "Chernobyl".into(),
            year: 2019,
            director_name: "Johan Renck".into(),
            country_name: "United Kingdom".into(),
            seasons: vec![season(1, &[(1, "1:23:45"), (2, "Please Remain Calm")])],
        })
        .await
        .unwrap();

    assert_eq!(count(&db, "seasons").await, 1);
    assert_eq!(count(&db, "episodes").await, 2);

    db.series().delete(created.id).await.unwrap();

    assert_eq!(count(&db, "series").await, 0);
    assert_eq!(count(&db, "seasons").await, 0);
    assert_eq!(count(&db, "episodes").await, 0);
}

#[tokio::test]
async fn add_season_rejects_duplicate_number_and_changes_nothing() {
    let db = test_db().await;
    let created = db
        .series()
        .create(&SeriesCreate {
            title: "Stranger Things".into(),
            year: 2016,
            director_name: "The Duffer Brothers".into(),
            country_name: "United States".into(),
            seasons: vec![season(1, &[(1, "Chapter One")])],
        })
        .await
        .unwrap();

    let err = db
        .series()
        .add_season(created.id, &season(1, &[(1, "MADMAX")]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    let after = db.series().get(created.id).await.unwrap();
    assert_eq!(after.seasons, created.seasons);
}

#[tokio::test]
async fn add_season_rolls_back_the_season_on_episode_conflict() {
    let db = test_db().await;
    let created = db
        .series()
        .create(&SeriesCreate {
            title: "The Office (US)".into(),
            year: 2005,
            director_name: "Greg Daniels".into(),
            country_name: "United States".into(),
            seasons: vec![],
        })
        .await
        .unwrap();

    // Episode number 1 twice in one payload: the episode insert fails and
    // must take the already-inserted season down with it.
    let err = db
        .series()
        .add_season(created.id, &season(1, &[(1, "Pilot"), (1, "Diversity Day")]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    assert_eq!(count(&db, "seasons").await, 0);
    assert_eq!(count(&db, "episodes").await, 0);
}

#[tokio::test]
async fn add_season_to_missing_series_is_not_found() {
    let db = test_db().await;
    let err = db
        .series()
        .add_season(42, &season(1, &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(msg) if msg == "Series not found"));
}

#[tokio::test]
async fn game_listing_filters_by_publisher() {
    let db = test_db().await;
    for (title, year, country, publisher) in [
        ("The Witcher 3: Wild Hunt", 2015, "Poland", "CD PROJEKT RED"),
        ("Halo Infinite", 2021, "United States", "Xbox Game Studios"),
    ] {
        db.games()
            .create(&GameCreate {
                title: title.into(),
                year,
                country_name: country.into(),
                publisher_name: publisher.into(),
            })
            .await
            .unwrap();
    }

    let games = db
        .games()
        .list(&GameListFilter {
            publisher: Some("CD PROJEKT RED".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].title, "The Witcher 3: Wild Hunt");
    assert_eq!(games[0].publisher.name, "CD PROJEKT RED");
}
