//! Authorization Rules
//! Mission: Cross-entity invariants checked before any mutating write
//!
//! These run inside the use case regardless of what the access gate already
//! decided. Existence and uniqueness checks here are advisory; the schema
//! constraints remain the final word under concurrency.

use crate::auth::{models::UserRole, password::PasswordHasher};
use crate::errors::{AppError, AppResult};
use crate::models::{Course, User};
use crate::store::Database;
use tracing::warn;

/// Course create/update: the referenced instructor must be a stored user.
pub fn ensure_instructor_exists(db: &Database, instructor_id: i64) -> AppResult<User> {
    db.find_user_by_id(instructor_id)?
        .ok_or(AppError::InstructorNotFound)
}

/// Material access and enrollment: the course must exist.
pub fn ensure_course_exists(db: &Database, course_id: i64) -> AppResult<Course> {
    db.find_course_by_id(course_id)?
        .ok_or(AppError::CourseNotFound)
}

/// User update: a supplied role must equal the stored one.
pub fn ensure_role_unchanged(stored: UserRole, requested: Option<UserRole>) -> AppResult<()> {
    match requested {
        Some(role) if role != stored => Err(AppError::RoleChangeForbidden),
        _ => Ok(()),
    }
}

/// Registration: only students sign themselves up. No role means student.
pub fn ensure_self_registration_role(requested: Option<UserRole>) -> AppResult<UserRole> {
    match requested.unwrap_or(UserRole::Student) {
        UserRole::Student => Ok(UserRole::Student),
        _ => Err(AppError::RegistrationRoleForbidden),
    }
}

pub fn ensure_not_enrolled(db: &Database, student_id: i64, course_id: i64) -> AppResult<()> {
    if db.count_enrollment(student_id, course_id)? > 0 {
        return Err(AppError::AlreadyEnrolled);
    }
    Ok(())
}

/// Login: the presented password must verify against the stored hash.
///
/// A mismatch is `InvalidCredentials`; an unreadable stored hash is internal.
pub fn ensure_password(hasher: &PasswordHasher, user: &User, plaintext: &str) -> AppResult<()> {
    if hasher.verify(&user.password_hash, plaintext)? {
        Ok(())
    } else {
        warn!("❌ Failed login attempt for user {}", user.id);
        Err(AppError::InvalidCredentials)
    }
}
