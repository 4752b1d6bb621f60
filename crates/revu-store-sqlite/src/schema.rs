//! SQL schema for the Revu SQLite store.
//!
//! Executed at connection startup and by `ReviewStore::initialize`.
//! `PRAGMA foreign_keys` is per-connection, so it must run on every open for
//! the cascade to take effect.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS subjects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE CHECK (length(name) > 0),
    created_at  TEXT NOT NULL      -- RFC 3339 UTC, fixed microsecond width
);

-- Reviews are never updated; they go away only with their subject.
CREATE TABLE IF NOT EXISTS reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment     TEXT NOT NULL DEFAULT '' CHECK (length(comment) <= 280),
    created_at  TEXT NOT NULL,
    subject_id  INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS reviews_subject_idx ON reviews(subject_id, created_at);

PRAGMA user_version = 1;
";
