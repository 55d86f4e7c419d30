//! Demonstration data: a handful of well-known movies, series (with
//! seasons/episodes), and games. Re-running against a populated database
//! downgrades duplicate conflicts to a log line instead of failing.

use tracing::{info, warn};

use catalog_core::{
    CatalogDatabase, CatalogError, Result,
    api_types::{EpisodeCreate, GameCreate, MovieCreate, SeasonCreate, SeriesCreate},
};

const COUNTRIES: &[&str] = &[
    "United States",
    "United Kingdom",
    "Japan",
    "South Korea",
    "France",
    "Poland",
];

const DIRECTORS: &[&str] = &[
    "Lana Wachowski & Lilly Wachowski",
    "Christopher Nolan",
    "Hayao Miyazaki",
    "Bong Joon-ho",
    "Vince Gilligan",
    "The Duffer Brothers",
    "Greg Daniels",
    "David Benioff & D. B. Weiss",
    "Johan Renck",
];

const PUBLISHERS: &[&str] = &[
    "Nintendo",
    "Sony Interactive Entertainment",
    "Xbox Game Studios",
    "CD PROJEKT RED",
    "Ubisoft",
];

const MOVIES: &[(&str, i64, &str, &str)] = &[
    ("The Matrix", 1999, "United States", "Lana Wachowski & Lilly Wachowski"),
    ("Inception", 2010, "United States", "Christopher Nolan"),
    ("Spirited Away", 2001, "Japan", "Hayao Miyazaki"),
    ("The Dark Knight", 2008, "United States", "Christopher Nolan"),
    ("Parasite", 2019, "South Korea", "Bong Joon-ho"),
];

const GAMES: &[(&str, i64, &str, &str)] = &[
    ("The Legend of Zelda: Breath of the Wild", 2017, "Japan", "Nintendo"),
    ("The Last of Us Part II", 2020, "United States", "Sony Interactive Entertainment"),
    ("Halo Infinite", 2021, "United States", "Xbox Game Studios"),
    ("The Witcher 3: Wild Hunt", 2015, "Poland", "CD PROJEKT RED"),
    ("Assassin's Creed Valhalla", 2020, "France", "Ubisoft"),
];

pub async fn run(db: &CatalogDatabase) -> Result<()> {
    for name in COUNTRIES {
        db.references().get_or_create_country(name).await?;
    }
    for name in DIRECTORS {
        db.references().get_or_create_director(name).await?;
    }
    for name in PUBLISHERS {
        db.references().get_or_create_publisher(name).await?;
    }

    for &(title, year, country, director) in MOVIES {
        let payload = MovieCreate {
            title: title.into(),
            year,
            director_name: director.into(),
            country_name: country.into(),
        };
        tolerate_duplicate(db.movies().create(&payload).await.map(|_| ()))?;
    }

    for payload in series_payloads() {
        tolerate_duplicate(db.series().create(&payload).await.map(|_| ()))?;
    }

    for &(title, year, country, publisher) in GAMES {
        let payload = GameCreate {
            title: title.into(),
            year,
            country_name: country.into(),
            publisher_name: publisher.into(),
        };
        tolerate_duplicate(db.games().create(&payload).await.map(|_| ()))?;
    }

    info!("Seed OK: 5 movies, 5 series (with seasons/episodes) and 5 games");
    Ok(())
}

fn tolerate_duplicate(result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(CatalogError::Conflict(msg)) => {
            warn!("Seed: {msg}, skipping");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn series_payloads() -> Vec<SeriesCreate> {
    vec![
        series(
            "Breaking Bad",
            2008,
            "United States",
            "Vince Gilligan",
            vec![
                season(1, Some(2008), &[(1, "Pilot"), (2, "Cat's in the Bag...")]),
                season(2, Some(2009), &[(1, "Seven Thirty-Seven"), (2, "Grilled")]),
            ],
        ),
        series(
            "Stranger Things",
            2016,
            "United States",
            "The Duffer Brothers",
            vec![
                season(1, Some(2016), &[(1, "Chapter One"), (2, "Chapter Two")]),
                season(2, Some(2017), &[(1, "MADMAX"), (2, "Trick or Treat, Freak")]),
            ],
        ),
        series(
            "The Office (US)",
            2005,
            "United States",
            "Greg Daniels",
            vec![
                season(1, Some(2005), &[(1, "Pilot"), (2, "Diversity Day")]),
                season(2, Some(2005), &[(1, "The Dundies"), (2, "Sexual Harassment")]),
            ],
        ),
        series(
            "Game of Thrones",
            2011,
            "United States",
            "David Benioff & D. B. Weiss",
            vec![
                season(1, Some(2011), &[(1, "Winter Is Coming"), (2, "The Kingsroad")]),
                season(2, Some(2012), &[(1, "The North Remembers"), (2, "The Night Lands")]),
            ],
        ),
        series(
            "Chernobyl",
            2019,
            "United Kingdom",
            "Johan Renck",
            vec![season(1, Some(2019), &[(1, "1:23:45"), (2, "Please Remain Calm")])],
        ),
    ]
}

fn series(
    title: &str,
    year: i64,
    country: &str,
    director: &str,
    seasons: Vec<SeasonCreate>,
) -> SeriesCreate {
    SeriesCreate {
        title: title.into(),
        year,
        director_name: director.into(),
        country_name: country.into(),
        seasons,
    }
}

fn season(number: i64, year: Option<i64>, episodes: &[(i64, &str)]) -> SeasonCreate {
    SeasonCreate {
        number,
        year,
        episodes: episodes
            .iter()
            .map(|&(number, title)| EpisodeCreate {
                number,
                title: title.into(),
            })
            .collect(),
    }
}
