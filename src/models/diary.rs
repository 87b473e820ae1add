//! Diary records: one row per uploaded diary scan.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::normalize_optional;

/// A stored diary record. The filename references an object in the diaries
/// file store; the file is written before the record is inserted, and
/// neither is ever deleted by this system.
#[derive(Debug, Clone, Serialize)]
pub struct Diary {
    pub id: i64,
    pub roll: String,
    pub title: Option<String>,
    /// Diary date as a `YYYY-MM-DD` string; defaults to the upload date.
    pub date: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload for a new diary record.
#[derive(Debug, Clone)]
pub struct NewDiary {
    pub roll: String,
    pub title: Option<String>,
    /// None or blank defaults to the current UTC date at insert.
    pub date: Option<String>,
    pub filename: String,
}

impl NewDiary {
    pub fn from_form(
        roll: String,
        title: Option<String>,
        date: Option<String>,
        filename: String,
    ) -> Self {
        NewDiary {
            roll,
            title: normalize_optional(title),
            date: normalize_optional(date),
            filename,
        }
    }
}
