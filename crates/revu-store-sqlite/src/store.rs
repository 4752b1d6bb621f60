//! [`SqliteStore`]: the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};

use revu_core::{
  review::{NewReview, Review},
  store::ReviewStore,
  subject::{SubjectCreation, SubjectQuery, SubjectSummary},
};

use crate::{
  Result,
  encode::{self, REVIEW_SELECT, RawReview, RawSubject, SUBJECT_SUMMARY_SELECT, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Revu review store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Query helpers (run on the connection thread) ────────────────────────────

enum RawCreation {
  Created(RawSubject),
  Exists(RawSubject),
}

fn subject_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<RawSubject>> {
  conn
    .query_row(
      &format!("{SUBJECT_SUMMARY_SELECT} WHERE s.name = ?1 GROUP BY s.id"),
      rusqlite::params![name],
      RawSubject::from_row,
    )
    .optional()
}

fn subject_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM subjects WHERE id = ?1",
        rusqlite::params![id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = crate::Error;

  async fn initialize(&self) -> Result<()> { self.init_schema().await }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn create_subject(&self, name: String) -> Result<SubjectCreation> {
    let at_str = encode_dt(encode::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The UNIQUE index is the only duplicate check, so a name committed
        // by another connection is caught the same way as one of ours.
        let inserted = tx.execute(
          "INSERT INTO subjects (name, created_at) VALUES (?1, ?2)",
          rusqlite::params![name, at_str],
        );

        match inserted {
          Ok(_) => {
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(RawCreation::Created(RawSubject {
              id,
              name,
              created_at: at_str,
              average_rating: None,
            }))
          }
          Err(e) if is_unique_violation(&e) => {
            let existing = subject_by_name(&tx, &name)?
              .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            Ok(RawCreation::Exists(existing))
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match raw {
      RawCreation::Created(raw) => {
        let summary = raw.into_summary()?;
        tracing::debug!(id = summary.subject.id, "inserted subject");
        Ok(SubjectCreation::Created(summary))
      }
      RawCreation::Exists(raw) => Ok(SubjectCreation::Exists(raw.into_summary()?)),
    }
  }

  async fn get_subject(&self, id: i64) -> Result<Option<SubjectSummary>> {
    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SUBJECT_SUMMARY_SELECT} WHERE s.id = ?1 GROUP BY s.id"),
              rusqlite::params![id],
              RawSubject::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubject::into_summary).transpose()
  }

  async fn search_subjects(&self, query: &SubjectQuery) -> Result<Vec<SubjectSummary>> {
    // SQLite's LIKE only folds ASCII, so the name filter runs here instead.
    let raws: Vec<RawSubject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "{SUBJECT_SUMMARY_SELECT} GROUP BY s.id ORDER BY s.name ASC"
        ))?;
        let rows = stmt
          .query_map([], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .filter(|raw| query.matches(&raw.name))
      .map(RawSubject::into_summary)
      .collect()
  }

  async fn delete_subject(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM subjects WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn add_review(&self, input: NewReview) -> Result<Option<Review>> {
    let at_str     = encode_dt(encode::now());
    let subject_id = input.subject_id;
    let rating     = i64::from(input.rating.get());
    let comment    = input.comment;

    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !subject_exists(&tx, subject_id)? {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO reviews (rating, comment, created_at, subject_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![rating, comment, at_str, subject_id],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Some(RawReview {
          id,
          rating,
          comment,
          created_at: at_str,
          subject_id,
        }))
      })
      .await?;

    raw.map(RawReview::into_review).transpose()
  }

  async fn list_reviews(&self, subject_id: i64) -> Result<Option<Vec<Review>>> {
    let raws: Option<Vec<RawReview>> = self
      .conn
      .call(move |conn| {
        if !subject_exists(conn, subject_id)? {
          return Ok(None);
        }

        let mut stmt = conn.prepare(&format!(
          "{REVIEW_SELECT} WHERE subject_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![subject_id], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(rows))
      })
      .await?;

    raws
      .map(|raws| {
        raws
          .into_iter()
          .map(RawReview::into_review)
          .collect::<Result<Vec<_>>>()
      })
      .transpose()
  }
}
