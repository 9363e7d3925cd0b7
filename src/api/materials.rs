use super::{parse_id, ApiJson, ApiResponse, AppState};
use crate::errors::AppResult;
use crate::models::{Material, MaterialPayload};
use axum::extract::{Path, State};

fn material_path((course_id, material_id): (String, String)) -> AppResult<(i64, i64)> {
    Ok((
        parse_id(&course_id, "course")?,
        parse_id(&material_id, "material")?,
    ))
}

pub async fn list_materials(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> AppResult<ApiResponse<Vec<Material>>> {
    let materials = state.materials.list(parse_id(&course_id, "course")?)?;
    Ok(ApiResponse::ok("Materials retrieved successfully", materials))
}

pub async fn get_material(
    State(state): State<AppState>,
    Path(ids): Path<(String, String)>,
) -> AppResult<ApiResponse<Material>> {
    let (course_id, material_id) = material_path(ids)?;
    let material = state.materials.get(course_id, material_id)?;
    Ok(ApiResponse::ok("Material retrieved successfully", material))
}

pub async fn create_material(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    ApiJson(payload): ApiJson<MaterialPayload>,
) -> AppResult<ApiResponse<Material>> {
    let material = state
        .materials
        .create(parse_id(&course_id, "course")?, payload)?;
    Ok(ApiResponse::created("Material created successfully", material))
}

pub async fn update_material(
    State(state): State<AppState>,
    Path(ids): Path<(String, String)>,
    ApiJson(payload): ApiJson<MaterialPayload>,
) -> AppResult<ApiResponse<Material>> {
    let (course_id, material_id) = material_path(ids)?;
    let material = state.materials.update(course_id, material_id, payload)?;
    Ok(ApiResponse::ok("Material updated successfully", material))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(ids): Path<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    let (course_id, material_id) = material_path(ids)?;
    state.materials.delete(course_id, material_id)?;
    Ok(ApiResponse::ok("Material deleted successfully", ()))
}
