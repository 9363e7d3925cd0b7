use super::{Database, StoreResult};
use crate::models::Enrollment;
use chrono::Utc;
use rusqlite::params;

impl Database {
    pub fn count_enrollment(&self, student_id: i64, course_id: i64) -> StoreResult<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM enrollments WHERE student_id = ?1 AND course_id = ?2",
            params![student_id, course_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Fails with `StoreError::UniqueViolation` when the pair already exists
    pub fn insert_enrollment(&self, student_id: i64, course_id: i64) -> StoreResult<Enrollment> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO enrollments (student_id, course_id, enrolled_at) VALUES (?1, ?2, ?3)",
            params![student_id, course_id, now],
        )?;

        Ok(Enrollment {
            id: conn.last_insert_rowid(),
            student_id,
            course_id,
            enrolled_at: now,
        })
    }
}
