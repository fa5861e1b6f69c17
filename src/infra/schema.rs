//! SQL DDL for the signup store.

/// Applied on every connection; SQLite leaves foreign keys off by default.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS activity (
    name TEXT PRIMARY KEY,
    description TEXT NULL,
    schedule TEXT NULL,
    max_participants INTEGER NULL
        CHECK (max_participants IS NULL OR max_participants BETWEEN 0 AND 4294967295)
);

CREATE TABLE IF NOT EXISTS participant (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    activity_name TEXT NOT NULL REFERENCES activity(name)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_participant_activity_email
    ON participant(activity_name, email);
"#;
