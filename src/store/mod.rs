//! SQLite Storage
//! Mission: Persist users, courses, materials and enrollments
//!
//! - Foreign keys enforced, cascading from users and courses
//! - UNIQUE(student_id, course_id) is the authoritative enrollment guard
//! - One connection behind a mutex; callers never hold it across awaits

mod courses;
mod enrollments;
mod materials;
mod users;

use anyhow::{Context, Result};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{ffi, Connection};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const SCHEMA_SQL: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('student', 'instructor', 'admin')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    instructor_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    price REAL NOT NULL DEFAULT 0,
    category TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS materials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    file_url TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS enrollments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    enrolled_at TEXT NOT NULL,
    UNIQUE (student_id, course_id)
);

CREATE INDEX IF NOT EXISTS idx_courses_instructor ON courses(instructor_id);
CREATE INDEX IF NOT EXISTS idx_materials_course ON materials(course_id);
CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course_id);
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            if code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE {
                return StoreError::UniqueViolation;
            }
        }
        StoreError::Sqlite(err)
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage handle shared by every use case
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and apply the schema
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;
        let db = Self::init(conn)?;
        info!("📚 Database initialized at: {}", db_path);
        Ok(db)
    }

    /// Private in-memory database, used by tests
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}
