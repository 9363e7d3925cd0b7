use super::{required, rules};
use crate::errors::{AppError, AppResult};
use crate::models::{Material, MaterialPayload};
use crate::store::Database;
use std::sync::Arc;
use tracing::info;

/// Course materials; every operation first resolves the parent course.
pub struct MaterialUseCase {
    db: Arc<Database>,
}

impl MaterialUseCase {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(&self, course_id: i64, mut payload: MaterialPayload) -> AppResult<Material> {
        payload.title = required("title", &payload.title)?.to_string();
        rules::ensure_course_exists(&self.db, course_id)?;

        let material = self.db.insert_material(course_id, &payload)?;
        info!("📄 Material {} added to course {}", material.id, course_id);
        Ok(material)
    }

    pub fn list(&self, course_id: i64) -> AppResult<Vec<Material>> {
        rules::ensure_course_exists(&self.db, course_id)?;
        Ok(self.db.list_materials(course_id)?)
    }

    pub fn get(&self, course_id: i64, material_id: i64) -> AppResult<Material> {
        rules::ensure_course_exists(&self.db, course_id)?;
        self.db
            .find_material(course_id, material_id)?
            .ok_or(AppError::MaterialNotFound)
    }

    pub fn update(
        &self,
        course_id: i64,
        material_id: i64,
        mut payload: MaterialPayload,
    ) -> AppResult<Material> {
        payload.title = required("title", &payload.title)?.to_string();
        rules::ensure_course_exists(&self.db, course_id)?;

        self.db
            .update_material(course_id, material_id, &payload)?
            .ok_or(AppError::MaterialNotFound)
    }

    pub fn delete(&self, course_id: i64, material_id: i64) -> AppResult<()> {
        rules::ensure_course_exists(&self.db, course_id)?;
        if !self.db.delete_material(course_id, material_id)? {
            return Err(AppError::MaterialNotFound);
        }
        info!("🗑️ Material {} removed from course {}", material_id, course_id);
        Ok(())
    }
}
