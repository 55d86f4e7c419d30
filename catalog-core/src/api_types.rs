//! Request payloads and list filters crossing the API boundary, with the
//! field-level validation the HTTP layer runs before any persistence access.
//!
//! Update payloads are explicit optional-field structs: a field left out of
//! the request body deserializes to `None` and the corresponding column is
//! not touched.

use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::error::{CatalogError, Result};

/// Accepted release years for movies, series, and seasons.
pub const FILM_YEAR_RANGE: RangeInclusive<i64> = 1888..=2100;
/// Accepted release years for games.
pub const GAME_YEAR_RANGE: RangeInclusive<i64> = 1950..=2100;

#[derive(Debug, Clone, Deserialize)]
pub struct MovieCreate {
    pub title: String,
    pub year: i64,
    pub director_name: String,
    pub country_name: String,
}

impl MovieCreate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_text("title", &self.title, &mut problems);
        check_year("year", self.year, &FILM_YEAR_RANGE, &mut problems);
        check_text("director_name", &self.director_name, &mut problems);
        check_text("country_name", &self.country_name, &mut problems);
        finish(problems)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub year: Option<i64>,
    pub director_name: Option<String>,
    pub country_name: Option<String>,
}

impl MovieUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_optional_text("title", self.title.as_deref(), &mut problems);
        if let Some(year) = self.year {
            check_year("year", year, &FILM_YEAR_RANGE, &mut problems);
        }
        check_optional_text(
            "director_name",
            self.director_name.as_deref(),
            &mut problems,
        );
        check_optional_text(
            "country_name",
            self.country_name.as_deref(),
            &mut problems,
        );
        finish(problems)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeCreate {
    pub number: i64,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonCreate {
    pub number: i64,
    pub year: Option<i64>,
    #[serde(default)]
    pub episodes: Vec<EpisodeCreate>,
}

impl SeasonCreate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        self.collect_problems("", &mut problems);
        finish(problems)
    }

    fn collect_problems(&self, prefix: &str, problems: &mut Vec<String>) {
        check_number(&format!("{prefix}number"), self.number, problems);
        if let Some(year) = self.year {
            check_year(
                &format!("{prefix}year"),
                year,
                &FILM_YEAR_RANGE,
                problems,
            );
        }
        for (index, episode) in self.episodes.iter().enumerate() {
            let field = format!("{prefix}episodes[{index}].");
            check_number(&format!("{field}number"), episode.number, problems);
            check_text(&format!("{field}title"), &episode.title, problems);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesCreate {
    pub title: String,
    pub year: i64,
    pub director_name: String,
    pub country_name: String,
    #[serde(default)]
    pub seasons: Vec<SeasonCreate>,
}

impl SeriesCreate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_text("title", &self.title, &mut problems);
        check_year("year", self.year, &FILM_YEAR_RANGE, &mut problems);
        check_text("director_name", &self.director_name, &mut problems);
        check_text("country_name", &self.country_name, &mut problems);
        for (index, season) in self.seasons.iter().enumerate() {
            season.collect_problems(&format!("seasons[{index}]."), &mut problems);
        }
        finish(problems)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesUpdate {
    pub title: Option<String>,
    pub year: Option<i64>,
    pub director_name: Option<String>,
    pub country_name: Option<String>,
}

impl SeriesUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_optional_text("title", self.title.as_deref(), &mut problems);
        if let Some(year) = self.year {
            check_year("year", year, &FILM_YEAR_RANGE, &mut problems);
        }
        check_optional_text(
            "director_name",
            self.director_name.as_deref(),
            &mut problems,
        );
        check_optional_text(
            "country_name",
            self.country_name.as_deref(),
            &mut problems,
        );
        finish(problems)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameCreate {
    pub title: String,
    pub year: i64,
    pub country_name: String,
    pub publisher_name: String,
}

impl GameCreate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_text("title", &self.title, &mut problems);
        check_year("year", self.year, &GAME_YEAR_RANGE, &mut problems);
        check_text("country_name", &self.country_name, &mut problems);
        check_text("publisher_name", &self.publisher_name, &mut problems);
        finish(problems)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameUpdate {
    pub title: Option<String>,
    pub year: Option<i64>,
    pub country_name: Option<String>,
    pub publisher_name: Option<String>,
}

impl GameUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_optional_text("title", self.title.as_deref(), &mut problems);
        if let Some(year) = self.year {
            check_year("year", year, &GAME_YEAR_RANGE, &mut problems);
        }
        check_optional_text(
            "country_name",
            self.country_name.as_deref(),
            &mut problems,
        );
        check_optional_text(
            "publisher_name",
            self.publisher_name.as_deref(),
            &mut problems,
        );
        finish(problems)
    }
}

/// Optional exact-match filters for movie and series listings. Absent
/// filters are no-ops; reference names join through their lookup table.
#[derive(Debug, Clone, Default)]
pub struct ScreenListFilter {
    pub year: Option<i64>,
    pub country: Option<String>,
    pub director: Option<String>,
}

/// Optional exact-match filters for game listings.
#[derive(Debug, Clone, Default)]
pub struct GameListFilter {
    pub year: Option<i64>,
    pub country: Option<String>,
    pub publisher: Option<String>,
}

/// Validate a year taken from a query string against an entity's accepted
/// range. Shared with the payload validators so the message matches.
pub fn validate_year_param(year: i64, range: &RangeInclusive<i64>) -> Result<()> {
    let mut problems = Vec::new();
    check_year("year", year, range, &mut problems);
    finish(problems)
}

fn check_text(field: &str, value: &str, problems: &mut Vec<String>) {
    if value.trim().is_empty() {
        problems.push(format!("{field}: must not be empty"));
    }
}

fn check_optional_text(field: &str, value: Option<&str>, problems: &mut Vec<String>) {
    if let Some(value) = value {
        check_text(field, value, problems);
    }
}

fn check_year(
    field: &str,
    value: i64,
    range: &RangeInclusive<i64>,
    problems: &mut Vec<String>,
) {
    if !range.contains(&value) {
        problems.push(format!(
            "{field}: must be between {} and {}",
            range.start(),
            range.end()
        ));
    }
}

fn check_number(field: &str, value: i64, problems: &mut Vec<String>) {
    if value < 1 {
        problems.push(format!("{field}: must be a positive integer"));
    }
}

fn finish(problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_create_accepts_valid_payload() {
        let payload = MovieCreate {
            title: "The Matrix".into(),
            year: 1999,
            director_name: "Lana Wachowski & Lilly Wachowski".into(),
            country_name: "United States".into(),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn movie_create_rejects_pre_cinema_year_and_blank_title() {
        let payload = MovieCreate {
            title: "   ".into(),
            year: 1800,
            director_name: "Someone".into(),
            country_name: "Somewhere".into(),
        };
        let err = payload.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("title: must not be empty"));
        assert!(message.contains("year: must be between 1888 and 2100"));
    }

    #[test]
    fn game_year_range_starts_later_than_film() {
        let payload = GameCreate {
            title: "Pong".into(),
            year: 1949,
            country_name: "United States".into(),
            publisher_name: "Atari".into(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_payload_ignores_absent_fields() {
        let payload = MovieUpdate {
            year: Some(2001),
            ..Default::default()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn season_rejects_zero_numbers() {
        let payload = SeasonCreate {
            number: 0,
            year: None,
            episodes: vec![EpisodeCreate {
                number: 0,
                title: "Pilot".into(),
            }],
        };
        let message = payload.validate().unwrap_err().to_string();
        assert!(message.contains("number: must be a positive integer"));
        assert!(message.contains("episodes[0].number"));
    }

    #[test]
    fn seasons_default_to_empty_on_series_create() {
        let payload: SeriesCreate = serde_json::from_value(serde_json::json!({
            "title": "Chernobyl",
            "year": 2019,
            "director_name": "Johan Renck",
            "country_name": "United Kingdom"
        }))
        .unwrap();
        assert!(payload.seasons.is_empty());
        assert!(payload.validate().is_ok());
    }
}
