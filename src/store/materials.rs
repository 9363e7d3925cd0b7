use super::{Database, StoreResult};
use crate::models::{Material, MaterialPayload};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

const MATERIAL_COLUMNS: &str = "id, course_id, title, content, file_url, created_at";

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get(0)?,
        course_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        file_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    pub fn insert_material(&self, course_id: i64, payload: &MaterialPayload) -> StoreResult<Material> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO materials (course_id, title, content, file_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![course_id, payload.title, payload.content, payload.file_url, now],
        )?;

        Ok(Material {
            id: conn.last_insert_rowid(),
            course_id,
            title: payload.title.clone(),
            content: payload.content.clone(),
            file_url: payload.file_url.clone(),
            created_at: now,
        })
    }

    /// Lookup scoped to the course; a material from another course is not found
    pub fn find_material(&self, course_id: i64, material_id: i64) -> StoreResult<Option<Material>> {
        let conn = self.conn();
        let material = conn
            .query_row(
                &format!(
                    "SELECT {} FROM materials WHERE id = ?1 AND course_id = ?2",
                    MATERIAL_COLUMNS
                ),
                params![material_id, course_id],
                material_from_row,
            )
            .optional()?;
        Ok(material)
    }

    pub fn list_materials(&self, course_id: i64) -> StoreResult<Vec<Material>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM materials WHERE course_id = ?1 ORDER BY id",
            MATERIAL_COLUMNS
        ))?;
        let materials = stmt
            .query_map(params![course_id], material_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(materials)
    }

    pub fn update_material(
        &self,
        course_id: i64,
        material_id: i64,
        payload: &MaterialPayload,
    ) -> StoreResult<Option<Material>> {
        let rows_affected = self.conn().execute(
            "UPDATE materials SET title = ?1, content = ?2, file_url = ?3
             WHERE id = ?4 AND course_id = ?5",
            params![
                payload.title,
                payload.content,
                payload.file_url,
                material_id,
                course_id
            ],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }
        self.find_material(course_id, material_id)
    }

    pub fn delete_material(&self, course_id: i64, material_id: i64) -> StoreResult<bool> {
        let rows_affected = self.conn().execute(
            "DELETE FROM materials WHERE id = ?1 AND course_id = ?2",
            params![material_id, course_id],
        )?;
        Ok(rows_affected > 0)
    }
}
