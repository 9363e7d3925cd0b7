//! Registration and login
//! Mission: Turn credentials into a signed identity token

use super::{rules, users::UserUseCase};
use crate::auth::{
    jwt::{IssuedToken, JwtHandler},
    models::{Identity, LoginRequest, RegisterRequest},
    password::PasswordHasher,
};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AuthUseCase {
    users: Arc<UserUseCase>,
    hasher: PasswordHasher,
    jwt: Arc<JwtHandler>,
}

impl AuthUseCase {
    pub fn new(users: Arc<UserUseCase>, hasher: PasswordHasher, jwt: Arc<JwtHandler>) -> Self {
        Self { users, hasher, jwt }
    }

    /// Self-service sign-up, limited to the student role.
    pub fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let role = rules::ensure_self_registration_role(req.role)?;
        self.users
            .create_user(&req.name, &req.email, &req.password, role)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn login(&self, req: LoginRequest) -> AppResult<(IssuedToken, User)> {
        let email = req.email.trim();
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }

        let user = match self.users.get_by_email(email)? {
            Some(user) => user,
            None => {
                warn!("❌ Login attempt for unknown account");
                return Err(AppError::InvalidCredentials);
            }
        };

        rules::ensure_password(&self.hasher, &user, &req.password)?;

        let issued = self.jwt.issue(Identity::of(&user))?;
        info!("✅ Login successful: user {} ({})", user.id, user.role);

        Ok((issued, user))
    }
}
