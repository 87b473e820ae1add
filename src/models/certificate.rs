//! Certificate records: one row per uploaded certificate scan.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::normalize_optional;

/// A stored certificate record. Same lifecycle shape as a diary record.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub id: i64,
    pub roll: String,
    pub cert_type: Option<String>,
    pub issued_by: Option<String>,
    /// Issue date as a `YYYY-MM-DD` string; defaults to the upload date.
    pub date: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload for a new certificate record.
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub roll: String,
    pub cert_type: Option<String>,
    pub issued_by: Option<String>,
    /// None or blank defaults to the current UTC date at insert.
    pub date: Option<String>,
    pub filename: String,
}

impl NewCertificate {
    pub fn from_form(
        roll: String,
        cert_type: Option<String>,
        issued_by: Option<String>,
        date: Option<String>,
        filename: String,
    ) -> Self {
        NewCertificate {
            roll,
            cert_type: normalize_optional(cert_type),
            issued_by: normalize_optional(issued_by),
            date: normalize_optional(date),
            filename,
        }
    }
}
