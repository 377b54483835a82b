//! Book domain model.
//!
//! # Responsibility
//! - Define the persisted book record and its JSON shape.
//! - Normalize raw form input (trimmed text, calendar-checked year).
//!
//! # Invariants
//! - `id` is assigned once and never reused for another book.
//! - `title` and `author` are non-empty after trimming.
//! - `year` is the year component of a valid calendar date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a book, derived from creation time in epoch millis.
pub type BookId = i64;

/// Required form field names, used in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Year,
}

impl BookField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Year => "year",
        }
    }
}

/// Validation failures for raw book input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// A required field is empty after trimming.
    MissingField(BookField),
    /// Year text does not describe a calendar date.
    InvalidYear(String),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{} is required", field.as_str()),
            Self::InvalidYear(value) => write!(f, "invalid year `{value}`"),
        }
    }
}

impl Error for BookValidationError {}

/// Canonical book record.
///
/// Serialized with camelCase `isComplete` to keep the stored snapshot
/// layout stable across hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Older snapshots may hold the year as text; it is coerced on load.
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    /// Missing in older snapshots; defaults to unfinished.
    #[serde(rename = "isComplete", default)]
    pub is_complete: bool,
}

impl Book {
    /// Builds a record from already-normalized values.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        is_complete: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            is_complete,
        }
    }

    /// Returns whether this book matches the duplicate triple.
    ///
    /// Title and author compare case-insensitively and the normalized year
    /// exactly, so `"1965"` and `"1965-01-01"` collide.
    pub fn matches_triple(&self, title: &str, author: &str, year: i32) -> bool {
        self.year == year
            && self.title.to_lowercase() == title.to_lowercase()
            && self.author.to_lowercase() == author.to_lowercase()
    }
}

/// Trimmed and validated book fields ready for the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl BookDraft {
    /// Trims and validates raw input.
    ///
    /// # Errors
    /// - `MissingField` for the first empty field in title, author, year order.
    /// - `InvalidYear` when the year is not a calendar date.
    pub fn parse(title: &str, author: &str, year: &str) -> Result<Self, BookValidationError> {
        let title = required(title, BookField::Title)?;
        let author = required(author, BookField::Author)?;
        let year = normalize_year(&required(year, BookField::Year)?)?;
        Ok(Self {
            title,
            author,
            year,
        })
    }
}

fn required(value: &str, field: BookField) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Converts year text to a calendar year.
///
/// Four-character input is read as January 1st of that year; anything else
/// must be an ISO `YYYY-MM-DD` date or `YYYY-MM` month. Free-form text such
/// as `June 1965` is rejected.
pub fn normalize_year(raw: &str) -> Result<i32, BookValidationError> {
    let trimmed = raw.trim();
    let date = if trimmed.chars().count() == 4 {
        trimmed
            .bytes()
            .all(|byte| byte.is_ascii_digit())
            .then(|| trimmed.parse::<i32>().ok())
            .flatten()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    } else {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
            .ok()
    };

    date.map(|date| date.year())
        .ok_or_else(|| BookValidationError::InvalidYear(trimmed.to_string()))
}

/// Reads leading decimal digits the way loosely-typed snapshots were written.
fn parse_leading_int(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|value| sign * value)
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i64),
        Text(String),
    }

    match RawYear::deserialize(deserializer)? {
        RawYear::Number(value) => i32::try_from(value)
            .map_err(|_| serde::de::Error::custom(format!("year out of range: {value}"))),
        RawYear::Text(value) => parse_leading_int(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid year text `{value}`"))),
    }
}
