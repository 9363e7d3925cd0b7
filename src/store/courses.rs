use super::{Database, StoreResult};
use crate::models::{Course, CoursePayload, CourseWithInstructor, InstructorSummary};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

const COURSE_COLUMNS: &str =
    "c.id, c.title, c.description, c.instructor_id, c.price, c.category, c.created_at, c.updated_at";

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        instructor_id: row.get(3)?,
        price: row.get(4)?,
        category: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Course columns followed by the instructor's public fields (indexes 8..=11).
const COURSE_WITH_INSTRUCTOR_SQL: &str = "SELECT c.id, c.title, c.description, c.instructor_id, c.price, c.category,
        c.created_at, c.updated_at, u.id, u.name, u.email, u.role
     FROM courses c
     JOIN users u ON u.id = c.instructor_id";

fn course_with_instructor_from_row(row: &Row<'_>) -> rusqlite::Result<CourseWithInstructor> {
    Ok(CourseWithInstructor {
        course: course_from_row(row)?,
        instructor: InstructorSummary {
            id: row.get(8)?,
            name: row.get(9)?,
            email: row.get(10)?,
            role: row.get(11)?,
        },
    })
}

impl Database {
    pub fn insert_course(&self, payload: &CoursePayload) -> StoreResult<Course> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO courses (title, description, instructor_id, price, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                payload.title,
                payload.description,
                payload.instructor_id,
                payload.price,
                payload.category,
                now,
                now,
            ],
        )?;

        Ok(Course {
            id: conn.last_insert_rowid(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            instructor_id: payload.instructor_id,
            price: payload.price,
            category: payload.category.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn find_course_by_id(&self, id: i64) -> StoreResult<Option<Course>> {
        let conn = self.conn();
        let course = conn
            .query_row(
                &format!("SELECT {} FROM courses c WHERE c.id = ?1", COURSE_COLUMNS),
                params![id],
                course_from_row,
            )
            .optional()?;
        Ok(course)
    }

    pub fn find_course_with_instructor(&self, id: i64) -> StoreResult<Option<CourseWithInstructor>> {
        let conn = self.conn();
        let course = conn
            .query_row(
                &format!("{} WHERE c.id = ?1", COURSE_WITH_INSTRUCTOR_SQL),
                params![id],
                course_with_instructor_from_row,
            )
            .optional()?;
        Ok(course)
    }

    pub fn list_courses(&self) -> StoreResult<Vec<CourseWithInstructor>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{} ORDER BY c.id", COURSE_WITH_INSTRUCTOR_SQL))?;
        let courses = stmt
            .query_map([], course_with_instructor_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    /// Courses the given student holds an enrollment for
    pub fn list_courses_for_student(&self, student_id: i64) -> StoreResult<Vec<Course>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM courses c
             JOIN enrollments e ON e.course_id = c.id
             WHERE e.student_id = ?1
             ORDER BY e.enrolled_at, c.id",
            COURSE_COLUMNS
        ))?;
        let courses = stmt
            .query_map(params![student_id], course_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    pub fn update_course(&self, id: i64, payload: &CoursePayload) -> StoreResult<Option<Course>> {
        let rows_affected = self.conn().execute(
            "UPDATE courses
             SET title = ?1, description = ?2, instructor_id = ?3, price = ?4, category = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                payload.title,
                payload.description,
                payload.instructor_id,
                payload.price,
                payload.category,
                Utc::now(),
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }
        self.find_course_by_id(id)
    }

    pub fn delete_course(&self, id: i64) -> StoreResult<bool> {
        let rows_affected = self
            .conn()
            .execute("DELETE FROM courses WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}
