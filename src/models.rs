//! Domain model for the catalog. `Book` mirrors one entry of the JSON library
//! file and is passed around by every other layer. The parsing helpers live
//! next to it because both the add form and the CSV importer turn raw text
//! into the same typed fields, and they must agree on what counts as valid.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lowest rating a book can carry.
pub const MIN_RATING: f64 = 1.0;
/// Highest rating a book can carry.
pub const MAX_RATING: f64 = 5.0;
/// Text written in place of a rating when a book is unrated. Older library
/// files stored it verbatim, so it is also accepted on input.
pub const UNRATED: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One catalogued book.
pub struct Book {
    /// Generated identifier. Files written before ids existed lack the key,
    /// so a fresh one is minted while loading.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Title shown in lists and used for title lookups. Not unique.
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    /// Whether the owner has finished the book.
    pub read_status: bool,
    /// Rating in `[MIN_RATING, MAX_RATING]`, or `None` when unrated. Omitted
    /// from the JSON output entirely when absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_rating"
    )]
    pub rating: Option<f64>,
}

/// Validated field set for a book that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub read_status: bool,
    pub rating: Option<f64>,
}

impl Book {
    /// Build a record from validated fields, assigning a fresh identifier.
    pub fn new(fields: NewBook) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            author: fields.author,
            publication_year: fields.publication_year,
            genre: fields.genre,
            read_status: fields.read_status,
            rating: fields.rating,
        }
    }

    /// `Read` / `Unread` label used by list views.
    pub fn read_label(&self) -> &'static str {
        if self.read_status {
            "Read"
        } else {
            "Unread"
        }
    }

    /// The rating formatted for display, falling back to `N/A`.
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format_rating(rating),
            None => UNRATED.to_string(),
        }
    }
}

impl fmt::Display for Book {
    /// Single-line summary: `Title by Author (Year) - Genre - Read - Rating: 4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {} - Rating: {}",
            self.title,
            self.author,
            self.publication_year,
            self.genre,
            self.read_label(),
            self.rating_label()
        )
    }
}

/// Drop the trailing `.0` from whole ratings so `4` prints as `4`, not `4.0`.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.0}")
    } else {
        format!("{rating}")
    }
}

/// Reasons a single raw field can fail to parse.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("invalid year \"{0}\": please enter a whole number")]
    InvalidYear(String),
    #[error("invalid rating \"{0}\": please enter a number between 1 and 5")]
    InvalidRating(String),
    #[error("rating {0} is out of range: please enter a number between 1 and 5")]
    RatingOutOfRange(f64),
    #[error("invalid read status \"{0}\": please enter 'yes' or 'no'")]
    InvalidReadStatus(String),
}

/// Parse a publication year. Surrounding whitespace is ignored; negative years
/// are allowed for antiquity.
pub fn parse_year(raw: &str) -> Result<i32, FieldError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| FieldError::InvalidYear(trimmed.to_string()))
}

/// Parse an optional rating. Blank input and `N/A` both mean "unrated".
pub fn parse_rating(raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNRATED) {
        return Ok(None);
    }
    let rating = trimmed
        .parse::<f64>()
        .map_err(|_| FieldError::InvalidRating(trimmed.to_string()))?;
    if !rating.is_finite() {
        return Err(FieldError::InvalidRating(trimmed.to_string()));
    }
    check_rating(rating).map(Some)
}

/// Reject ratings outside `[MIN_RATING, MAX_RATING]`.
fn check_rating(rating: f64) -> Result<f64, FieldError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(FieldError::RatingOutOfRange(rating))
    }
}

/// Strict yes/no parser used by the interactive form.
pub fn parse_read_status(raw: &str) -> Result<bool, FieldError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(FieldError::InvalidReadStatus(other.to_string())),
    }
}

/// Accepts a number, `null`, or a legacy string (`"N/A"`, `""`, `"4.5"`).
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRating {
        Number(f64),
        Text(String),
    }

    match Option::<RawRating>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawRating::Number(value)) => check_rating(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(RawRating::Text(text)) => parse_rating(&text).map_err(serde::de::Error::custom),
    }
}
