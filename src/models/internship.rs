//! Internship records: one row per reported placement.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::normalize_optional;

/// A stored internship record. Created via form submission; never updated
/// or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Internship {
    pub id: i64,
    /// Free-text student roll identifier; not unique.
    pub roll: String,
    pub student_name: String,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new internship record.
#[derive(Debug, Clone)]
pub struct NewInternship {
    pub roll: String,
    pub student_name: String,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub note: Option<String>,
}

impl NewInternship {
    /// Build an insert payload from raw form values, normalizing blank
    /// optional fields to None. Required-field validation happens at insert.
    pub fn from_form(
        roll: String,
        student_name: String,
        company: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        note: Option<String>,
    ) -> Self {
        NewInternship {
            roll,
            student_name,
            company: normalize_optional(company),
            start_date: normalize_optional(start_date),
            end_date: normalize_optional(end_date),
            note: normalize_optional(note),
        }
    }
}
