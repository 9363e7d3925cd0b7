use super::{on_unique, rules};
use crate::auth::models::{Identity, UserRole};
use crate::errors::{AppError, AppResult};
use crate::models::{Course, Enrollment};
use crate::store::Database;
use std::sync::Arc;
use tracing::info;

pub struct EnrollmentUseCase {
    db: Arc<Database>,
}

impl EnrollmentUseCase {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Enroll the calling student. The pre-check and the schema constraint
    /// both surface a duplicate as `AlreadyEnrolled`.
    pub fn enroll(&self, student: Identity, course_id: i64) -> AppResult<Enrollment> {
        if student.role != UserRole::Student {
            return Err(AppError::Forbidden);
        }
        rules::ensure_course_exists(&self.db, course_id)?;
        rules::ensure_not_enrolled(&self.db, student.user_id, course_id)?;

        let enrollment = self
            .db
            .insert_enrollment(student.user_id, course_id)
            .map_err(on_unique(AppError::AlreadyEnrolled))?;

        info!("🎓 Student {} enrolled in course {}", student.user_id, course_id);
        Ok(enrollment)
    }

    pub fn enrolled_courses(&self, student: Identity) -> AppResult<Vec<Course>> {
        Ok(self.db.list_courses_for_student(student.user_id)?)
    }
}
