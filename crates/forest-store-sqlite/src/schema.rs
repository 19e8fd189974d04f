//! SQL schema for the forest plot store.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version`; there are no migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS forest_plots (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    location    TEXT NOT NULL,
    survey_date TEXT,            -- YYYY-MM-DD or NULL
    notes       TEXT
);

CREATE TABLE IF NOT EXISTS rangers (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);

-- plot_id has no foreign key: under the retain policy assignments outlive
-- their plot.
CREATE TABLE IF NOT EXISTS assignments (
    ranger_id       INTEGER NOT NULL REFERENCES rangers(id),
    plot_id         INTEGER NOT NULL,
    assignment_date TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    PRIMARY KEY (ranger_id, plot_id)
);

CREATE INDEX IF NOT EXISTS forest_plots_survey_idx ON forest_plots(survey_date);
CREATE INDEX IF NOT EXISTS assignments_plot_idx    ON assignments(plot_id);

PRAGMA user_version = 1;
";
