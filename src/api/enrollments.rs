use super::{parse_id, ApiResponse, AppState};
use crate::auth::models::Identity;
use crate::errors::AppResult;
use crate::models::{Course, Enrollment};
use axum::extract::{Path, State};

/// POST /api/courses/:id/enroll (student). The student is always the caller.
pub async fn enroll(
    State(state): State<AppState>,
    identity: Identity,
    Path(course_id): Path<String>,
) -> AppResult<ApiResponse<Enrollment>> {
    let course_id = parse_id(&course_id, "course")?;
    let enrollment = state.enrollments.enroll(identity, course_id)?;
    Ok(ApiResponse::created("Enrolled successfully", enrollment))
}

/// GET /api/me/courses (student)
pub async fn my_courses(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<ApiResponse<Vec<Course>>> {
    let courses = state.enrollments.enrolled_courses(identity)?;
    Ok(ApiResponse::ok("Enrolled courses retrieved successfully", courses))
}
