use super::{on_unique, required, rules};
use crate::errors::{AppError, AppResult};
use crate::models::{Course, CourseDetail, CoursePayload, CourseWithInstructor};
use crate::store::Database;
use std::sync::Arc;
use tracing::info;

pub struct CourseUseCase {
    db: Arc<Database>,
}

impl CourseUseCase {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(&self, payload: CoursePayload) -> AppResult<Course> {
        let payload = validate(payload)?;
        rules::ensure_instructor_exists(&self.db, payload.instructor_id)?;

        let course = self
            .db
            .insert_course(&payload)
            .map_err(on_unique(AppError::CourseTitleTaken))?;

        info!(
            "📘 Course {} '{}' created for instructor {}",
            course.id, course.title, course.instructor_id
        );
        Ok(course)
    }

    pub fn update(&self, id: i64, payload: CoursePayload) -> AppResult<Course> {
        let payload = validate(payload)?;
        rules::ensure_course_exists(&self.db, id)?;
        rules::ensure_instructor_exists(&self.db, payload.instructor_id)?;

        let course = self
            .db
            .update_course(id, &payload)
            .map_err(on_unique(AppError::CourseTitleTaken))?
            .ok_or(AppError::CourseNotFound)?;

        info!("📘 Course {} updated", course.id);
        Ok(course)
    }

    /// Course with its instructor and materials.
    pub fn get(&self, id: i64) -> AppResult<CourseDetail> {
        let CourseWithInstructor { course, instructor } = self
            .db
            .find_course_with_instructor(id)?
            .ok_or(AppError::CourseNotFound)?;
        let materials = self.db.list_materials(course.id)?;
        Ok(CourseDetail {
            course,
            instructor,
            materials,
        })
    }

    pub fn list(&self) -> AppResult<Vec<CourseWithInstructor>> {
        Ok(self.db.list_courses()?)
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        if !self.db.delete_course(id)? {
            return Err(AppError::CourseNotFound);
        }
        info!("🗑️ Course {} deleted", id);
        Ok(())
    }
}

fn validate(mut payload: CoursePayload) -> AppResult<CoursePayload> {
    payload.title = required("title", &payload.title)?.to_string();
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::validation("price must be a non-negative number"));
    }
    Ok(payload)
}
