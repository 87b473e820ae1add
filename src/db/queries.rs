//! Database query functions for the three record types.
//!
//! Inserts validate required fields and stamp timestamps; there are no
//! update or delete operations anywhere in this system.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params, params_from_iter};

use crate::error::{AppError, AppResult};
use crate::models::{Certificate, Diary, Internship, NewCertificate, NewDiary, NewInternship};

// ============================================================================
// Internship Queries
// ============================================================================

/// Insert a new internship record, returning its id.
///
/// Fails with a validation error if roll or student_name is empty or
/// whitespace-only after trimming.
pub fn insert_internship(conn: &Connection, new: &NewInternship) -> AppResult<i64> {
    let roll = new.roll.trim();
    let student_name = new.student_name.trim();

    if roll.is_empty() {
        return Err(AppError::Validation("Roll is required".to_string()));
    }
    if student_name.is_empty() {
        return Err(AppError::Validation("Student name is required".to_string()));
    }

    conn.execute(
        "INSERT INTO internships (roll, student_name, company, start_date, end_date, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            roll,
            student_name,
            new.company.as_deref(),
            new.start_date.as_deref(),
            new.end_date.as_deref(),
            new.note.as_deref(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| AppError::Database(format!("Failed to insert internship: {}", e)))?;

    Ok(conn.last_insert_rowid())
}

/// List all internships ordered by roll.
///
/// Rolls are free text, so the order is lexicographic string order, not
/// numeric ("9" sorts after "40").
pub fn list_internships(conn: &Connection) -> AppResult<Vec<Internship>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, roll, student_name, company, start_date, end_date, note, created_at
             FROM internships ORDER BY roll, id",
        )
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(InternshipRow {
                id: row.get(0)?,
                roll: row.get(1)?,
                student_name: row.get(2)?,
                company: row.get(3)?,
                start_date: row.get(4)?,
                end_date: row.get(5)?,
                note: row.get(6)?,
                created_at: row.get(7)?,
            })
        })
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    rows.into_iter().map(row_to_internship).collect()
}

// ============================================================================
// Diary Queries
// ============================================================================

/// Insert a new diary record, returning its id.
///
/// The date defaults to the current UTC date when absent; uploaded_at is
/// stamped at insert.
pub fn insert_diary(conn: &Connection, new: &NewDiary) -> AppResult<i64> {
    let roll = new.roll.trim();
    if roll.is_empty() {
        return Err(AppError::Validation("Roll is required".to_string()));
    }

    conn.execute(
        "INSERT INTO diaries (roll, title, date, filename, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            roll,
            new.title.as_deref(),
            effective_date(new.date.as_deref()),
            new.filename,
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| AppError::Database(format!("Failed to insert diary: {}", e)))?;

    Ok(conn.last_insert_rowid())
}

/// List the most recently uploaded diaries, newest first, truncated to `limit`.
pub fn list_diaries(conn: &Connection, limit: u32) -> AppResult<Vec<Diary>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, roll, title, date, filename, uploaded_at
             FROM diaries ORDER BY uploaded_at DESC, id DESC LIMIT ?1",
        )
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit], map_diary_row)
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    rows.into_iter().map(row_to_diary).collect()
}

/// List diaries whose roll is in the given set, ordered by roll.
///
/// An empty roll set or no matching rows yields an empty vec, not an error.
pub fn list_diaries_by_rolls(conn: &Connection, rolls: &[String]) -> AppResult<Vec<Diary>> {
    if rolls.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT id, roll, title, date, filename, uploaded_at
         FROM diaries WHERE roll IN ({}) ORDER BY roll, id",
        placeholders(rolls.len())
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows = stmt
        .query_map(params_from_iter(rolls.iter()), map_diary_row)
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    rows.into_iter().map(row_to_diary).collect()
}

// ============================================================================
// Certificate Queries
// ============================================================================

/// Insert a new certificate record, returning its id.
pub fn insert_certificate(conn: &Connection, new: &NewCertificate) -> AppResult<i64> {
    let roll = new.roll.trim();
    if roll.is_empty() {
        return Err(AppError::Validation("Roll is required".to_string()));
    }

    conn.execute(
        "INSERT INTO certificates (roll, cert_type, issued_by, date, filename, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            roll,
            new.cert_type.as_deref(),
            new.issued_by.as_deref(),
            effective_date(new.date.as_deref()),
            new.filename,
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| AppError::Database(format!("Failed to insert certificate: {}", e)))?;

    Ok(conn.last_insert_rowid())
}

/// List the most recently uploaded certificates, newest first, truncated to `limit`.
pub fn list_certificates(conn: &Connection, limit: u32) -> AppResult<Vec<Certificate>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, roll, cert_type, issued_by, date, filename, uploaded_at
             FROM certificates ORDER BY uploaded_at DESC, id DESC LIMIT ?1",
        )
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit], map_certificate_row)
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    rows.into_iter().map(row_to_certificate).collect()
}

/// List certificates whose roll is in the given set, ordered by roll.
pub fn list_certificates_by_rolls(
    conn: &Connection,
    rolls: &[String],
) -> AppResult<Vec<Certificate>> {
    if rolls.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT id, roll, cert_type, issued_by, date, filename, uploaded_at
         FROM certificates WHERE roll IN ({}) ORDER BY roll, id",
        placeholders(rolls.len())
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows = stmt
        .query_map(params_from_iter(rolls.iter()), map_certificate_row)
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    rows.into_iter().map(row_to_certificate).collect()
}

// ============================================================================
// Row Conversion
// ============================================================================

struct InternshipRow {
    id: i64,
    roll: String,
    student_name: String,
    company: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    note: Option<String>,
    created_at: String,
}

struct DiaryRow {
    id: i64,
    roll: String,
    title: Option<String>,
    date: String,
    filename: String,
    uploaded_at: String,
}

struct CertificateRow {
    id: i64,
    roll: String,
    cert_type: Option<String>,
    issued_by: Option<String>,
    date: String,
    filename: String,
    uploaded_at: String,
}

fn map_diary_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiaryRow> {
    Ok(DiaryRow {
        id: row.get(0)?,
        roll: row.get(1)?,
        title: row.get(2)?,
        date: row.get(3)?,
        filename: row.get(4)?,
        uploaded_at: row.get(5)?,
    })
}

fn map_certificate_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CertificateRow> {
    Ok(CertificateRow {
        id: row.get(0)?,
        roll: row.get(1)?,
        cert_type: row.get(2)?,
        issued_by: row.get(3)?,
        date: row.get(4)?,
        filename: row.get(5)?,
        uploaded_at: row.get(6)?,
    })
}

fn row_to_internship(row: InternshipRow) -> AppResult<Internship> {
    Ok(Internship {
        id: row.id,
        roll: row.roll,
        student_name: row.student_name,
        company: row.company,
        start_date: row.start_date,
        end_date: row.end_date,
        note: row.note,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

fn row_to_diary(row: DiaryRow) -> AppResult<Diary> {
    Ok(Diary {
        id: row.id,
        roll: row.roll,
        title: row.title,
        date: row.date,
        filename: row.filename,
        uploaded_at: parse_timestamp(&row.uploaded_at)?,
    })
}

fn row_to_certificate(row: CertificateRow) -> AppResult<Certificate> {
    Ok(Certificate {
        id: row.id,
        roll: row.roll,
        cert_type: row.cert_type,
        issued_by: row.issued_by,
        date: row.date,
        filename: row.filename,
        uploaded_at: parse_timestamp(&row.uploaded_at)?,
    })
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("Invalid timestamp '{}': {}", value, e)))
}

/// The given date when present, otherwise the current UTC date.
fn effective_date(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.trim().is_empty() => d.trim().to_string(),
        _ => Utc::now().format("%Y-%m-%d").to_string(),
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}
