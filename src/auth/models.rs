//! Authentication Models
//! Mission: Define identity, role and credential payloads

use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[serde(rename = "student")]
    Student, // Enrolls in courses, reads materials
    #[serde(rename = "instructor")]
    Instructor, // Writes courses and materials
    #[serde(rename = "admin")]
    Admin, // User administration
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Student, UserRole::Instructor, UserRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        }
    }

    /// Exact match on the canonical lowercase literal.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserRole::Student),
            "instructor" => Some(UserRole::Instructor),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated subject, attached to the request once the access gate passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub role: UserRole,
}

impl Identity {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn of(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    pub role: UserRole,
    pub iat: i64, // issued at (unix seconds)
    pub exp: i64, // expires at (unix seconds)
    pub iss: String,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id, self.role)
    }
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Self-service registration body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub expires_in: i64, // seconds until expiration
    pub role: UserRole,
    pub user: User,
}
