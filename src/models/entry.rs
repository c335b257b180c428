use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// A persisted guestbook submission.
///
/// `id` and `created_at` are assigned by the database on insert and never
/// change afterwards. `created_at` stays server-side.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Entry {
    pub id: i64,
    #[serde(skip_serializing)]
    pub created_at: String,
    pub rating: i64,
    pub testimonial: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    pub occupation: String,
    pub github: String,
}

/// Client input for a new entry. Missing fields fall back to their zero
/// value so an absent rating is caught by validation, not by parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewEntry {
    pub rating: i64,
    pub testimonial: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    pub occupation: String,
    pub github: String,
}

impl NewEntry {
    pub fn is_valid(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
            && !self.testimonial.is_empty()
            && !self.first_name.is_empty()
    }
}

/// Optional ordering for the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Best,
    Worst,
}

impl SortOrder {
    pub fn order_by(self) -> &'static str {
        match self {
            SortOrder::Newest => "ORDER BY id DESC",
            SortOrder::Best => "ORDER BY rating DESC, id DESC",
            SortOrder::Worst => "ORDER BY rating ASC, id DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "best" => Ok(SortOrder::Best),
            "worst" => Ok(SortOrder::Worst),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}
