//! SQL schema for the student store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// There is deliberately no UNIQUE constraint on `email`: dedup is the import
/// pipeline's job, not the schema's.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS students (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at     TEXT NOT NULL,   -- RFC 3339 UTC
    name           TEXT NOT NULL,
    branch         TEXT NOT NULL,
    batch          TEXT NOT NULL,
    semester       INTEGER NOT NULL,
    specialization TEXT NOT NULL,
    cgpa           REAL NOT NULL,
    email          TEXT NOT NULL,
    document       TEXT NOT NULL    -- full StudentRecord as JSON
);

CREATE INDEX IF NOT EXISTS students_email_idx      ON students(email);
CREATE INDEX IF NOT EXISTS students_name_batch_idx ON students(name, batch);
CREATE INDEX IF NOT EXISTS students_cgpa_idx       ON students(cgpa);
CREATE INDEX IF NOT EXISTS students_branch_idx     ON students(branch);

PRAGMA user_version = 1;
";
