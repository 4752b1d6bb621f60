//! Reviews: immutable star ratings with an optional short comment.
//!
//! Client input arrives as a loosely typed [`ReviewSubmission`] and is turned
//! into a [`NewReview`] by [`ReviewSubmission::validate`], which applies the
//! checks in a fixed order so callers always see the same error for the same
//! input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, secret::SecretAnswer};

/// Longest comment accepted, counted in Unicode scalar values.
pub const MAX_COMMENT_CHARS: usize = 280;

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A star rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn get(self) -> u8 { self.0 }

  /// Interpret a JSON value the way form-driven clients send ratings:
  /// integers, integral floats, and strings holding an integer.
  pub fn from_json(value: &Value) -> Result<Self> {
    let n = match value {
      Value::Null => return Err(Error::RatingRequired),
      Value::Number(n) => match (n.as_i64(), n.as_f64()) {
        (Some(i), _) => i,
        (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => f as i64,
        _ => return Err(Error::InvalidRating),
      },
      Value::String(s) => s.trim().parse::<i64>().map_err(|_| Error::InvalidRating)?,
      _ => return Err(Error::InvalidRating),
    };
    Self::try_from(n)
  }
}

impl TryFrom<i64> for Rating {
  type Error = Error;

  fn try_from(n: i64) -> Result<Self> {
    if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&n) {
      Ok(Self(n as u8))
    } else {
      Err(Error::InvalidRating)
    }
  }
}

impl From<Rating> for u8 {
  fn from(r: Rating) -> u8 { r.0 }
}

impl<'de> Deserialize<'de> for Rating {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let n = i64::deserialize(d)?;
    Rating::try_from(n).map_err(serde::de::Error::custom)
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id:         i64,
  pub rating:     Rating,
  /// Trimmed; empty when the reviewer left no comment.
  pub comment:    String,
  pub created_at: DateTime<Utc>,
  pub subject_id: i64,
}

/// A validated review ready to be persisted. `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
  pub subject_id: i64,
  pub rating:     Rating,
  pub comment:    String,
}

impl NewReview {
  pub fn new(subject_id: i64, rating: Rating) -> Self {
    Self { subject_id, rating, comment: String::new() }
  }

  pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
    self.comment = comment.into();
    self
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// The JSON body of a review submission, before validation.
///
/// Every field is kept as raw JSON so that its type is only judged at its
/// own step of [`validate`](Self::validate).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewSubmission {
  pub rating:        Value,
  pub comment:       Value,
  pub secret_answer: Value,
}

impl ReviewSubmission {
  /// Parse a raw request body. An empty body, non-JSON, a non-object, and
  /// `{}` all count as missing.
  pub fn from_body(body: &[u8]) -> Result<Self> {
    let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
      return Err(Error::MissingBody);
    };
    if fields.is_empty() {
      return Err(Error::MissingBody);
    }
    let mut take = |key: &str| fields.remove(key).unwrap_or_default();
    Ok(Self {
      rating:        take("rating"),
      comment:       take("comment"),
      secret_answer: take("secret_answer"),
    })
  }

  /// Validate against `secret` and produce a [`NewReview`] for `subject_id`.
  ///
  /// Order: secret presence, secret correctness, rating, comment.
  pub fn validate(self, subject_id: i64, secret: &SecretAnswer) -> Result<NewReview> {
    match &self.secret_answer {
      Value::Null => secret.verify(None)?,
      Value::String(answer) => secret.verify(Some(answer.as_str()))?,
      // Present, but no string can equal it.
      _ => return Err(Error::IncorrectSecret),
    }
    let rating = Rating::from_json(&self.rating)?;
    let comment = match &self.comment {
      Value::Null => validate_comment(None)?,
      Value::String(text) => validate_comment(Some(text.as_str()))?,
      _ => return Err(Error::InvalidComment),
    };
    Ok(NewReview { subject_id, rating, comment })
  }
}

/// Trim a comment and enforce [`MAX_COMMENT_CHARS`].
pub fn validate_comment(raw: Option<&str>) -> Result<String> {
  let comment = raw.unwrap_or_default().trim();
  if comment.chars().count() > MAX_COMMENT_CHARS {
    return Err(Error::CommentTooLong);
  }
  Ok(comment.to_owned())
}
