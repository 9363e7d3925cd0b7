//! Use Cases
//! Mission: Apply authorization rules before every persistence call
//!
//! Handlers hand typed input to a use case; the use case consults `rules`
//! and only then touches the store. Rule failures travel back unchanged.

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod materials;
pub mod rules;
pub mod users;

pub use auth::AuthUseCase;
pub use courses::CourseUseCase;
pub use enrollments::EnrollmentUseCase;
pub use materials::MaterialUseCase;
pub use users::UserUseCase;

use crate::errors::AppError;
use crate::store::StoreError;

/// Map a unique-constraint violation to `conflict`; anything else stays internal.
pub(crate) fn on_unique(conflict: AppError) -> impl FnOnce(StoreError) -> AppError {
    move |err| match err {
        StoreError::UniqueViolation => conflict,
        other => other.into(),
    }
}

/// Trimmed value of a required text field.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(value)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_unique_maps_only_unique_violations() {
        let mapped = on_unique(AppError::EmailTaken)(StoreError::UniqueViolation);
        assert!(matches!(mapped, AppError::EmailTaken));

        let other = StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        let mapped = on_unique(AppError::EmailTaken)(other);
        assert!(matches!(mapped, AppError::Internal(_)));
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("email", "  a@b.io ").unwrap(), "a@b.io");
        assert!(matches!(
            required("email", "   "),
            Err(AppError::Validation(msg)) if msg == "email is required"
        ));
    }
}
