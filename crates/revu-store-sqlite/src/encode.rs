//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed number of
//! fractional digits, so `ORDER BY created_at` is chronological.

use chrono::{DateTime, SecondsFormat, Utc};
use revu_core::{
  review::{Rating, Review},
  subject::{Subject, SubjectSummary},
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current time truncated to what [`encode_dt`] keeps, so a record returned
/// straight after insert equals the same record read back.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `subjects` row joined with `AVG(reviews.rating)`.
pub struct RawSubject {
  pub id:             i64,
  pub name:           String,
  pub created_at:     String,
  pub average_rating: Option<f64>,
}

/// Column list matching [`RawSubject::from_row`]. Callers append their own
/// `WHERE` and must keep the `GROUP BY`.
pub const SUBJECT_SUMMARY_SELECT: &str = "
  SELECT s.id, s.name, s.created_at, AVG(r.rating)
  FROM subjects s
  LEFT JOIN reviews r ON r.subject_id = s.id";

impl RawSubject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      created_at:     row.get(2)?,
      average_rating: row.get(3)?,
    })
  }

  pub fn into_summary(self) -> Result<SubjectSummary> {
    let subject = Subject {
      id:         self.id,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    };
    Ok(SubjectSummary::from_raw_average(subject, self.average_rating))
  }
}

/// A `reviews` row.
pub struct RawReview {
  pub id:         i64,
  pub rating:     i64,
  pub comment:    String,
  pub created_at: String,
  pub subject_id: i64,
}

pub const REVIEW_SELECT: &str =
  "SELECT id, rating, comment, created_at, subject_id FROM reviews";

impl RawReview {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      rating:     row.get(1)?,
      comment:    row.get(2)?,
      created_at: row.get(3)?,
      subject_id: row.get(4)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      id:         self.id,
      rating:     Rating::try_from(self.rating)
        .map_err(|_| Error::CorruptRating(self.rating))?,
      comment:    self.comment,
      created_at: decode_dt(&self.created_at)?,
      subject_id: self.subject_id,
    })
  }
}
