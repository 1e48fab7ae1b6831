//! Goal operations

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{
    add_amount, date_to_sql, decimal_column, optional_date_column, parse_datetime, sum_decimals,
    Database,
};
use crate::error::{Error, Result};
use crate::models::{Goal, NewGoal};

const GOAL_COLUMNS: &str =
    "id, user_id, name, description, target_amount, target_date, completed, created_at, updated_at";

impl Database {
    /// Map a goal row; `current_saved` is filled in by the caller
    fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
        let created_at: String = row.get(7)?;
        let updated_at: String = row.get(8)?;
        Ok(Goal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            target_amount: decimal_column(row, 4)?,
            target_date: optional_date_column(row, 5)?,
            completed: row.get(6)?,
            current_saved: Decimal::ZERO,
            created_at: parse_datetime(&created_at),
            updated_at: parse_datetime(&updated_at),
        })
    }

    /// Create a goal for a user
    pub fn create_goal(&self, user_id: i64, goal: &NewGoal) -> Result<i64> {
        goal.validate()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, name, description, target_amount, target_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.name.trim(),
                goal.description.as_deref(),
                goal.target_amount.to_string(),
                goal.target_date.map(date_to_sql),
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!(
            "Created goal {} ({} of {}) for user {}",
            id,
            goal.name.trim(),
            goal.target_amount,
            user_id
        );
        Ok(id)
    }

    /// Get one of a user's goals, with its saved amount
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let goal = {
            let conn = self.conn()?;
            conn.query_row(
                &format!(
                    "SELECT {} FROM goals WHERE id = ? AND user_id = ?",
                    GOAL_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_goal,
            )
            .optional()?
        };

        match goal {
            Some(mut goal) => {
                goal.current_saved = self.goal_saved_amount(goal.id)?;
                Ok(Some(goal))
            }
            None => Ok(None),
        }
    }

    /// List all of a user's goals, newest first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        self.query_goals(user_id, false)
    }

    /// List a user's goals that are not yet completed
    pub fn list_active_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        self.query_goals(user_id, true)
    }

    fn query_goals(&self, user_id: i64, active_only: bool) -> Result<Vec<Goal>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM goals
            WHERE user_id = ?1 AND (?2 = 0 OR completed = 0)
            ORDER BY created_at DESC, id DESC
            "#,
            GOAL_COLUMNS
        ))?;
        let mut goals = stmt
            .query_map(params![user_id, active_only], Self::row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Saved amounts for all of the user's goals in one pass
        let mut stmt = conn.prepare(
            r#"
            SELECT t.goal_id, t.amount
            FROM transactions t
            JOIN goals g ON g.id = t.goal_id
            WHERE g.user_id = ?
            "#,
        )?;
        let mut saved: HashMap<i64, Decimal> = HashMap::new();
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, i64>(0)?, decimal_column(row, 1)?))
        })?;
        for row in rows {
            let (goal_id, amount) = row?;
            let total = saved.entry(goal_id).or_insert(Decimal::ZERO);
            *total = add_amount(*total, amount)?;
        }

        for goal in &mut goals {
            goal.current_saved = saved.get(&goal.id).copied().unwrap_or(Decimal::ZERO);
        }

        Ok(goals)
    }

    /// Delete a goal. Linked transactions are kept and unlinked.
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted > 0 {
            info!("Deleted goal {} for user {}", id, user_id);
        }
        Ok(deleted > 0)
    }

    /// Sum of the amounts of all transactions linked to a goal
    pub fn goal_saved_amount(&self, goal_id: i64) -> Result<Decimal> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT amount FROM transactions WHERE goal_id = ?")?;
        let amounts = stmt
            .query_map(params![goal_id], |row| decimal_column(row, 0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        sum_decimals(amounts)
    }

    /// Mark a goal completed once its saved amount reaches the target
    ///
    /// Returns the goal's completion state afterwards. Completion is never
    /// reverted here.
    pub fn refresh_goal_completion(&self, goal_id: i64) -> Result<bool> {
        let (target, completed) = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT target_amount, completed FROM goals WHERE id = ?",
                params![goal_id],
                |row| Ok((decimal_column(row, 0)?, row.get::<_, bool>(1)?)),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Goal {} not found", goal_id)))?
        };

        if completed {
            return Ok(true);
        }

        let saved = self.goal_saved_amount(goal_id)?;
        debug!("Goal {} saved {} of {}", goal_id, saved, target);
        if saved < target {
            return Ok(false);
        }

        let conn = self.conn()?;
        conn.execute(
            "UPDATE goals SET completed = 1, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![goal_id],
        )?;
        info!("Goal {} reached its target of {}", goal_id, target);
        Ok(true)
    }
}
