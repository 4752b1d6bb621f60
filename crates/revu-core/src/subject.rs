//! Subjects: the named entities that reviews are attached to.
//!
//! A subject row holds only identity metadata. Its average rating is derived
//! from its reviews on every read and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub id:         i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// A subject bundled with its derived average rating.
///
/// Serialises flat: `{id, name, created_at, average_rating}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
  #[serde(flatten)]
  pub subject:        Subject,
  /// Mean of all review ratings rounded to one decimal; `None` if the
  /// subject has no reviews.
  pub average_rating: Option<f64>,
}

impl SubjectSummary {
  /// Build a summary from the raw `AVG(rating)` a store computed.
  pub fn from_raw_average(subject: Subject, raw_average: Option<f64>) -> Self {
    Self { subject, average_rating: raw_average.map(round_to_tenth) }
  }
}

/// Outcome of [`ReviewStore::create_subject`](crate::store::ReviewStore::create_subject).
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectCreation {
  Created(SubjectSummary),
  /// A subject with this exact name was already present.
  Exists(SubjectSummary),
}

/// Parameters for [`ReviewStore::search_subjects`](crate::store::ReviewStore::search_subjects).
#[derive(Debug, Clone, Default)]
pub struct SubjectQuery {
  /// Case-insensitive substring filter over subject names.
  pub search: Option<String>,
}

impl SubjectQuery {
  pub fn new(search: impl Into<String>) -> Self {
    Self { search: Some(search.into()) }
  }

  /// The lower-cased, trimmed needle, or `None` when every subject matches.
  pub fn needle(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase)
  }

  pub fn matches(&self, name: &str) -> bool {
    match self.needle() {
      Some(needle) => name.to_lowercase().contains(&needle),
      None => true,
    }
  }
}

/// Validate a subject name as submitted by a client and return it trimmed.
pub fn normalize_name(raw: Option<&str>) -> Result<String> {
  let raw = match raw {
    Some(s) if !s.is_empty() => s,
    _ => return Err(Error::NameRequired),
  };
  let name = raw.trim();
  if name.is_empty() {
    return Err(Error::NameEmpty);
  }
  Ok(name.to_owned())
}

/// Round to one decimal place, sending exact ties to the even digit
/// (`4.25` becomes `4.2`, `4.35` becomes `4.4`).
pub fn round_to_tenth(value: f64) -> f64 { (value * 10.0).round_ties_even() / 10.0 }
