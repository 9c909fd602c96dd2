//! SQL schema for the Hearth SQLite store.
//!
//! Applied at connection startup when `PRAGMA user_version` is behind
//! [`SCHEMA_VERSION`]; a database written by a newer build is refused.

/// Schema version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids monotonic across deletes, so a deleted id is
/// never handed out again and `0` is never assigned.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS family_members (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL DEFAULT '',
    last_name    TEXT NOT NULL DEFAULT '',
    age          TEXT NOT NULL DEFAULT '',
    relationship TEXT NOT NULL DEFAULT ''
);
";
