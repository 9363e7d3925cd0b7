use super::{Database, StoreResult};
use crate::auth::models::UserRole;
use crate::models::{NewUser, User};
use chrono::Utc;
use rusqlite::{
    params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
    OptionalExtension, Row,
};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

impl ToSql for UserRole {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UserRole {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        UserRole::parse(raw).ok_or_else(|| FromSqlError::Other(format!("unknown role '{}'", raw).into()))
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl Database {
    pub fn insert_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new_user.name,
                new_user.email,
                new_user.password_hash,
                new_user.role,
                now,
                now,
            ],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let conn = self.conn();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                params![email],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Writes name, email and password hash. The role column is never touched here.
    pub fn update_user(&self, user: &User) -> StoreResult<Option<User>> {
        let now = Utc::now();
        let rows_affected = self.conn().execute(
            "UPDATE users SET name = ?1, email = ?2, password_hash = ?3, updated_at = ?4
             WHERE id = ?5",
            params![user.name, user.email, user.password_hash, now, user.id],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }
        self.find_user_by_id(user.id)
    }

    pub fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let rows_affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    pub fn count_users_with_role(&self, role: UserRole) -> StoreResult<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE role = ?1",
            params![role],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role,
        }
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let db = Database::in_memory().unwrap();
        let created = db
            .insert_user(&new_user("ana@example.com", UserRole::Instructor))
            .unwrap();
        assert!(created.id > 0);

        let by_id = db.find_user_by_id(created.id).unwrap().unwrap();
        assert_eq!(by_id.email, "ana@example.com");
        assert_eq!(by_id.role, UserRole::Instructor);

        let by_email = db.find_user_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(db.find_user_by_id(999).unwrap().is_none());
        assert!(db.find_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_unique_violation() {
        let db = Database::in_memory().unwrap();
        db.insert_user(&new_user("dup@example.com", UserRole::Student))
            .unwrap();

        let err = db
            .insert_user(&new_user("dup@example.com", UserRole::Student))
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[test]
    fn test_email_column_ignores_case() {
        let db = Database::in_memory().unwrap();
        let created = db
            .insert_user(&new_user("mixed@example.com", UserRole::Student))
            .unwrap();

        let found = db.find_user_by_email("MIXED@Example.com").unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let err = db
            .insert_user(&new_user("Mixed@EXAMPLE.com", UserRole::Student))
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[test]
    fn test_update_user_keeps_role() {
        let db = Database::in_memory().unwrap();
        let mut user = db
            .insert_user(&new_user("bo@example.com", UserRole::Student))
            .unwrap();

        user.name = "Bo Renamed".to_string();
        user.role = UserRole::Admin;
        let updated = db.update_user(&user).unwrap().unwrap();

        assert_eq!(updated.name, "Bo Renamed");
        assert_eq!(updated.role, UserRole::Student);
    }

    #[test]
    fn test_list_and_delete_users() {
        let db = Database::in_memory().unwrap();
        let a = db
            .insert_user(&new_user("a@example.com", UserRole::Student))
            .unwrap();
        db.insert_user(&new_user("b@example.com", UserRole::Admin))
            .unwrap();

        assert_eq!(db.list_users().unwrap().len(), 2);
        assert_eq!(db.count_users_with_role(UserRole::Admin).unwrap(), 1);

        assert!(db.delete_user(a.id).unwrap());
        assert!(!db.delete_user(a.id).unwrap());
        assert_eq!(db.list_users().unwrap().len(), 1);
    }
}
