//! The shared secret answer that gates review submission.
//!
//! This is a spam deterrent, not authentication: one process-wide string,
//! compared after trimming and lower-casing both sides.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::{Error, Result};

/// A normalised secret answer.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretAnswer(String);

impl SecretAnswer {
  pub fn new(answer: &str) -> Self { Self(normalize(answer)) }

  /// Check a submitted answer.
  ///
  /// Absent and blank answers are a validation failure; anything else that
  /// differs after normalisation is [`Error::IncorrectSecret`].
  pub fn verify(&self, submitted: Option<&str>) -> Result<()> {
    let submitted = submitted.map(normalize).unwrap_or_default();
    if submitted.is_empty() {
      return Err(Error::SecretRequired);
    }
    if submitted != self.0 {
      return Err(Error::IncorrectSecret);
    }
    Ok(())
  }
}

fn normalize(answer: &str) -> String { answer.trim().to_lowercase() }

impl fmt::Debug for SecretAnswer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SecretAnswer(..)")
  }
}

impl<'de> Deserialize<'de> for SecretAnswer {
  fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let raw = String::deserialize(d)?;
    Ok(Self::new(&raw))
  }
}
