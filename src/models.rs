use crate::auth::models::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User row about to be inserted (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Partial update of a user. `role`, when present, must equal the stored role.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// A course owned by an instructor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub instructor_id: i64,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a course's instructor; never carries the password hash.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstructorSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Course listing entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseWithInstructor {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: InstructorSummary,
}

/// Single course read: instructor plus the course's materials
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: InstructorSummary,
    pub materials: Vec<Material>,
}

/// Course create/update body
#[derive(Debug, Clone, Deserialize)]
pub struct CoursePayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instructor_id: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
}

/// Learning material attached to a course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

/// Material create/update body
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialPayload {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_url: String,
}

/// A student's enrollment in a course; (student_id, course_id) is unique
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
}
