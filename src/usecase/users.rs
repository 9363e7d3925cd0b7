use super::{on_unique, required, rules};
use crate::auth::{
    models::{Identity, UserRole},
    password::PasswordHasher,
};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, UpdateUserRequest, User};
use crate::store::Database;
use std::sync::Arc;
use tracing::info;

/// User administration and account creation
pub struct UserUseCase {
    db: Arc<Database>,
    hasher: PasswordHasher,
}

impl UserUseCase {
    pub fn new(db: Arc<Database>, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    /// Hash the password and store a new account. Role policy is the caller's job.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let name = required("name", name)?;
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .db
            .insert_user(&NewUser {
                name: name.to_string(),
                email,
                password_hash,
                role,
            })
            .map_err(on_unique(AppError::EmailTaken))?;

        info!("👤 Created user {} ({})", user.id, user.role);
        Ok(user)
    }

    pub fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.db.find_user_by_email(&email.trim().to_lowercase())?)
    }

    pub fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.db.list_users()?)
    }

    /// Admins read anyone; everybody else reads only themselves.
    pub fn get(&self, requester: Identity, id: i64) -> AppResult<User> {
        if requester.role != UserRole::Admin && requester.user_id != id {
            return Err(AppError::Forbidden);
        }
        self.db.find_user_by_id(id)?.ok_or(AppError::UserNotFound)
    }

    pub fn update(&self, id: i64, req: UpdateUserRequest) -> AppResult<User> {
        let mut user = self.db.find_user_by_id(id)?.ok_or(AppError::UserNotFound)?;
        rules::ensure_role_unchanged(user.role, req.role)?;

        if let Some(name) = req.name.as_deref() {
            user.name = required("name", name)?.to_string();
        }
        if let Some(email) = req.email.as_deref() {
            user.email = normalize_email(email)?;
        }
        // An empty password keeps the stored hash
        if let Some(password) = req.password.as_deref().filter(|p| !p.is_empty()) {
            user.password_hash = self.hasher.hash(password)?;
        }

        let updated = self
            .db
            .update_user(&user)
            .map_err(on_unique(AppError::EmailTaken))?
            .ok_or(AppError::UserNotFound)?;

        info!("👤 Updated user {}", updated.id);
        Ok(updated)
    }

    pub fn delete(&self, requester: Identity, id: i64) -> AppResult<()> {
        if requester.user_id == id {
            return Err(AppError::CannotDeleteSelf);
        }
        if !self.db.delete_user(id)? {
            return Err(AppError::UserNotFound);
        }
        info!("🗑️ User {} deleted by admin {}", id, requester.user_id);
        Ok(())
    }

    /// Create the bootstrap admin unless one already exists.
    ///
    /// Returns the new account, or `None` when an admin was already present.
    pub fn ensure_admin(&self, name: &str, email: &str, password: &str) -> AppResult<Option<User>> {
        if self.db.count_users_with_role(UserRole::Admin)? > 0 {
            return Ok(None);
        }
        let admin = self.create_user(name, email, password, UserRole::Admin)?;
        info!("🔑 Bootstrap admin created: {}", admin.email);
        Ok(Some(admin))
    }
}

/// Emails are stored and looked up trimmed and lowercased.
fn normalize_email(email: &str) -> AppResult<String> {
    Ok(required("email", email)?.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::fixtures;

    fn use_case() -> UserUseCase {
        UserUseCase::new(fixtures::db(), fixtures::hasher())
    }

    #[test]
    fn test_create_user_hashes_password() {
        let users = use_case();
        let user = users
            .create_user("Ana", " ana@example.com ", "s3cret", UserRole::Student)
            .unwrap();

        assert_eq!(user.email, "ana@example.com");
        assert_ne!(user.password_hash, "s3cret");
        assert!(fixtures::hasher().verify(&user.password_hash, "s3cret").unwrap());
    }

    #[test]
    fn test_create_user_validates_input() {
        let users = use_case();
        assert!(matches!(
            users.create_user("Ana", "", "pw", UserRole::Student),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            users.create_user("Ana", "ana@example.com", "", UserRole::Student),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let users = use_case();
        users
            .create_user("Ana", "ana@example.com", "pw", UserRole::Student)
            .unwrap();
        assert!(matches!(
            users.create_user("Other", "ana@example.com", "pw", UserRole::Student),
            Err(AppError::EmailTaken)
        ));
    }

    #[test]
    fn test_email_is_case_insensitive() {
        let users = use_case();
        let ana = users
            .create_user("Ana", "Ana@Example.COM", "pw", UserRole::Student)
            .unwrap();
        assert_eq!(ana.email, "ana@example.com");

        let found = users.get_by_email(" ANA@example.com ").unwrap().unwrap();
        assert_eq!(found.id, ana.id);

        assert!(matches!(
            users.create_user("Imposter", "ana@EXAMPLE.com", "pw", UserRole::Student),
            Err(AppError::EmailTaken)
        ));

        let bo = users
            .create_user("Bo", "bo@example.com", "pw", UserRole::Student)
            .unwrap();
        let renamed = users
            .update(
                bo.id,
                UpdateUserRequest {
                    email: Some("Bo.New@Example.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.email, "bo.new@example.com");
        assert!(matches!(
            users.update(
                bo.id,
                UpdateUserRequest {
                    email: Some("ANA@example.com".to_string()),
                    ..Default::default()
                },
            ),
            Err(AppError::EmailTaken)
        ));
    }

    #[test]
    fn test_role_change_rejected_and_user_unchanged() {
        let users = use_case();
        let student = users
            .create_user("Sam", "sam@example.com", "pw", UserRole::Student)
            .unwrap();

        let result = users.update(
            student.id,
            UpdateUserRequest {
                name: Some("Sam the Instructor".to_string()),
                role: Some(UserRole::Instructor),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::RoleChangeForbidden)));

        let admin = Identity::new(0, UserRole::Admin);
        let stored = users.get(admin, student.id).unwrap();
        assert_eq!(stored.name, "Sam");
        assert_eq!(stored.role, UserRole::Student);
    }

    #[test]
    fn test_update_rehashes_only_non_empty_password() {
        let users = use_case();
        let user = users
            .create_user("Sam", "sam@example.com", "old-pw", UserRole::Student)
            .unwrap();

        let kept = users
            .update(
                user.id,
                UpdateUserRequest {
                    name: Some("Samuel".to_string()),
                    password: Some(String::new()),
                    role: Some(UserRole::Student),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(kept.name, "Samuel");
        assert_eq!(kept.password_hash, user.password_hash);

        let changed = users
            .update(
                user.id,
                UpdateUserRequest {
                    password: Some("new-pw".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(fixtures::hasher().verify(&changed.password_hash, "new-pw").unwrap());
    }

    #[test]
    fn test_update_missing_user() {
        let users = use_case();
        assert!(matches!(
            users.update(77, UpdateUserRequest::default()),
            Err(AppError::UserNotFound)
        ));
    }

    #[test]
    fn test_non_admin_reads_only_self() {
        let users = use_case();
        let sam = users
            .create_user("Sam", "sam@example.com", "pw", UserRole::Student)
            .unwrap();
        let ines = users
            .create_user("Ines", "ines@example.com", "pw", UserRole::Instructor)
            .unwrap();

        assert_eq!(users.get(Identity::of(&sam), sam.id).unwrap().id, sam.id);
        assert!(matches!(
            users.get(Identity::of(&sam), ines.id),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            users.get(Identity::new(1, UserRole::Admin), 999),
            Err(AppError::UserNotFound)
        ));
    }

    #[test]
    fn test_admin_cannot_delete_self() {
        let users = use_case();
        let admin = users
            .create_user("Root", "root@example.com", "pw", UserRole::Admin)
            .unwrap();
        let sam = users
            .create_user("Sam", "sam@example.com", "pw", UserRole::Student)
            .unwrap();

        assert!(matches!(
            users.delete(Identity::of(&admin), admin.id),
            Err(AppError::CannotDeleteSelf)
        ));
        users.delete(Identity::of(&admin), sam.id).unwrap();
        assert!(matches!(
            users.delete(Identity::of(&admin), sam.id),
            Err(AppError::UserNotFound)
        ));
    }

    #[test]
    fn test_ensure_admin_runs_once() {
        let users = use_case();
        let first = users
            .ensure_admin("Admin", "admin@example.com", "pw")
            .unwrap();
        assert_eq!(first.map(|u| u.role), Some(UserRole::Admin));

        let second = users
            .ensure_admin("Admin", "admin2@example.com", "pw")
            .unwrap();
        assert!(second.is_none());
        assert_eq!(users.list().unwrap().len(), 1);
    }
}
