//! Error types for `revu-core`.
//!
//! Every variant is a client mistake; the display strings are the messages
//! returned to API callers verbatim.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Subject name is required")]
  NameRequired,

  #[error("Subject name cannot be empty")]
  NameEmpty,

  #[error("Request body is missing")]
  MissingBody,

  #[error("Security answer is required")]
  SecretRequired,

  #[error("Incorrect security answer. Review not submitted.")]
  IncorrectSecret,

  #[error("Rating is required")]
  RatingRequired,

  #[error("Rating must be an integer between 1 and 5")]
  InvalidRating,

  #[error("Comment must be a string")]
  InvalidComment,

  #[error("Comment cannot exceed 280 characters")]
  CommentTooLong,
}

impl Error {
  /// `true` for the one failure that is about who is asking rather than
  /// what they sent.
  pub fn is_auth(&self) -> bool { matches!(self, Self::IncorrectSecret) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
