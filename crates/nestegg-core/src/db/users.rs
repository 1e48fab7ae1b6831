//! User operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewUser, User};

/// Email of the user created for single-user local setups
pub const DEFAULT_USER_EMAIL: &str = "me@localhost.local";

const USER_COLUMNS: &str = "id, email, first_name, last_name, created_at, updated_at";

impl Database {
    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let created_at: String = row.get(4)?;
        let updated_at: String = row.get(5)?;
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            created_at: parse_datetime(&created_at),
            updated_at: parse_datetime(&updated_at),
        })
    }

    /// Create a user, rejecting duplicate emails
    pub fn create_user(&self, user: &NewUser) -> Result<i64> {
        user.validate()?;
        let email = user.email.trim().to_lowercase();

        if self.get_user_by_email(&email)?.is_some() {
            return Err(Error::Validation(format!(
                "User with email {} already exists",
                email
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (email, first_name, last_name) VALUES (?, ?, ?)",
            params![email, user.first_name.trim(), user.last_name.trim()],
        )?;
        let id = conn.last_insert_rowid();

        info!("Created user {} ({})", id, email);
        Ok(id)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![email.trim().to_lowercase()],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Return the first user, creating a local one when the table is empty
    pub fn ensure_default_user(&self) -> Result<User> {
        if let Some(user) = self.list_users()?.into_iter().next() {
            return Ok(user);
        }

        let id = self.create_user(&NewUser {
            email: DEFAULT_USER_EMAIL.to_string(),
            first_name: "Local".to_string(),
            last_name: "User".to_string(),
        })?;

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }
}
