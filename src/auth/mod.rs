//! Authentication Module
//! Mission: Credential hashing, JWT identity tokens and the role-based access gate

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::JwtHandler;
pub use middleware::{access_gate, AccessGate};
pub use models::{Identity, UserRole};
pub use password::PasswordHasher;
