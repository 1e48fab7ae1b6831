//! Category operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{optional_decimal_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    Category, NewCategory, TransactionType, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON,
};

const CATEGORY_COLUMNS: &str = "id, user_id, name, type, color, icon, budget_limit, created_at";

impl Database {
    fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
        let type_str: String = row.get(3)?;
        let created_at: String = row.get(7)?;
        Ok(Category {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            category_type: type_str.parse().unwrap_or(TransactionType::Expense),
            color: row.get(4)?,
            icon: row.get(5)?,
            budget_limit: optional_decimal_column(row, 6)?,
            created_at: parse_datetime(&created_at),
        })
    }

    /// Create a category for a user
    pub fn create_category(&self, user_id: i64, category: &NewCategory) -> Result<i64> {
        category.validate()?;
        let name = category.name.trim();

        let conn = self.conn()?;
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM categories WHERE user_id = ? AND type = ? AND name = ?",
                params![user_id, category.category_type.as_str(), name],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(Error::Validation(format!(
                "Category {} already exists",
                name
            )));
        }

        conn.execute(
            r#"
            INSERT INTO categories (user_id, name, type, color, icon, budget_limit)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                name,
                category.category_type.as_str(),
                category.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR),
                category.icon.as_deref().unwrap_or(DEFAULT_CATEGORY_ICON),
                category.budget_limit.map(|b| b.to_string()),
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!("Created {} category {} for user {}", category.category_type, name, user_id);
        Ok(id)
    }

    /// List a user's categories, optionally only one type
    pub fn list_categories(
        &self,
        user_id: i64,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM categories
            WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
            ORDER BY type DESC, name
            "#,
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map(
                params![user_id, category_type.map(|t| t.as_str())],
                Self::row_to_category,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get one of a user's categories by ID
    pub fn get_category(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                &format!(
                    "SELECT {} FROM categories WHERE id = ? AND user_id = ?",
                    CATEGORY_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    /// Delete a category. Returns false if the user has no such category.
    ///
    /// Transactions keep their category name; it is stored as text.
    pub fn delete_category(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM categories WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted > 0 {
            info!("Deleted category {} for user {}", id, user_id);
        }
        Ok(deleted > 0)
    }

    /// Seed the built-in income and expense categories (idempotent)
    pub fn seed_default_categories(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;

        let defaults = [
            ("salary", TransactionType::Income, "💼"),
            ("freelance", TransactionType::Income, "💻"),
            ("investment", TransactionType::Income, "📈"),
            ("business", TransactionType::Income, "🏢"),
            ("rental", TransactionType::Income, "🏠"),
            ("other_income", TransactionType::Income, "💰"),
            ("food", TransactionType::Expense, "🍕"),
            ("transport", TransactionType::Expense, "🚗"),
            ("utilities", TransactionType::Expense, "🏠"),
            ("entertainment", TransactionType::Expense, "🎬"),
            ("healthcare", TransactionType::Expense, "🏥"),
            ("shopping", TransactionType::Expense, "🛍️"),
            ("education", TransactionType::Expense, "📚"),
            ("other_expense", TransactionType::Expense, "💸"),
        ];

        let mut created = 0;
        for (name, category_type, icon) in &defaults {
            created += conn.execute(
                r#"
                INSERT OR IGNORE INTO categories (user_id, name, type, color, icon)
                VALUES (?, ?, ?, ?, ?)
                "#,
                params![user_id, name, category_type.as_str(), DEFAULT_CATEGORY_COLOR, icon],
            )?;
        }

        if created > 0 {
            info!("Seeded {} default categories for user {}", created, user_id);
        }
        Ok(created)
    }
}
