use super::{parse_id, ApiJson, ApiResponse, AppState};
use crate::errors::AppResult;
use crate::models::{Course, CourseDetail, CoursePayload, CourseWithInstructor};
use axum::extract::{Path, State};

pub async fn list_courses(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CourseWithInstructor>>> {
    let courses = state.courses.list()?;
    Ok(ApiResponse::ok("Courses retrieved successfully", courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CourseDetail>> {
    let course = state.courses.get(parse_id(&id, "course")?)?;
    Ok(ApiResponse::ok("Course retrieved successfully", course))
}

pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CoursePayload>,
) -> AppResult<ApiResponse<Course>> {
    let course = state.courses.create(payload)?;
    Ok(ApiResponse::created("Course created successfully", course))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CoursePayload>,
) -> AppResult<ApiResponse<Course>> {
    let course = state.courses.update(parse_id(&id, "course")?, payload)?;
    Ok(ApiResponse::ok("Course updated successfully", course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.courses.delete(parse_id(&id, "course")?)?;
    Ok(ApiResponse::ok("Course deleted successfully", ()))
}
