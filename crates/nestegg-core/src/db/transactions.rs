//! Transaction operations and period aggregates

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;
use tracing::info;

use super::{
    add_amount, date_column, date_to_sql, decimal_column, optional_decimal_column, parse_datetime,
    sum_decimals, Database,
};
use crate::error::{Error, Result};
use crate::goals::SpendingCategory;
use crate::models::{NewTransaction, Transaction, TransactionType};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, type, amount, category, description, date, eco_impact, goal_id, created_at";

impl Database {
    fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
        let type_str: String = row.get(2)?;
        let created_at: String = row.get(9)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            transaction_type: type_str.parse().unwrap_or(TransactionType::Expense),
            amount: decimal_column(row, 3)?,
            category: row.get(4)?,
            description: row.get(5)?,
            date: date_column(row, 6)?,
            eco_impact: optional_decimal_column(row, 7)?,
            goal_id: row.get(8)?,
            created_at: parse_datetime(&created_at),
        })
    }

    /// Insert a transaction for a user
    ///
    /// A linked goal must belong to the same user. Linking re-checks whether
    /// the goal is now complete.
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        tx.validate()?;

        if let Some(goal_id) = tx.goal_id {
            if self.get_goal(user_id, goal_id)?.is_none() {
                return Err(Error::NotFound(format!("Goal {} not found", goal_id)));
            }
        }

        let id = {
            let conn = self.conn()?;
            conn.execute(
                r#"
                INSERT INTO transactions
                    (user_id, type, amount, category, description, date, eco_impact, goal_id)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    tx.transaction_type.as_str(),
                    tx.amount.to_string(),
                    tx.category.trim(),
                    tx.description.as_deref(),
                    date_to_sql(tx.date),
                    tx.eco_impact.map(|e| e.to_string()),
                    tx.goal_id,
                ],
            )?;
            conn.last_insert_rowid()
        };

        info!(
            "Recorded {} {} in {} for user {}",
            tx.transaction_type, tx.amount, tx.category, user_id
        );

        if let Some(goal_id) = tx.goal_id {
            self.refresh_goal_completion(goal_id)?;
        }

        Ok(id)
    }

    /// Get one of a user's transactions by ID
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let transaction = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
                    TRANSACTION_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(transaction)
    }

    /// List a user's most recent transactions
    pub fn list_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, limit], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Delete a transaction. Returns false if the user has no such transaction.
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted > 0 {
            info!("Deleted transaction {} for user {}", id, user_id);
        }
        Ok(deleted > 0)
    }

    /// Total income and expenses between two dates (inclusive)
    pub fn period_totals(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Decimal, Decimal)> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT type, amount
            FROM transactions
            WHERE user_id = ? AND date >= ? AND date <= ?
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![user_id, date_to_sql(start), date_to_sql(end)],
                |row| {
                    let type_str: String = row.get(0)?;
                    Ok((type_str, decimal_column(row, 1)?))
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let (income, expenses): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .partition(|(t, _)| t == TransactionType::Income.as_str());

        Ok((
            sum_decimals(income.into_iter().map(|(_, a)| a))?,
            sum_decimals(expenses.into_iter().map(|(_, a)| a))?,
        ))
    }

    /// Expense totals per category between two dates (inclusive)
    ///
    /// Ranked by total descending, ties broken by category name.
    pub fn spending_by_category(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> Result<Vec<SpendingCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, amount
            FROM transactions
            WHERE user_id = ? AND type = 'expense' AND date >= ? AND date <= ?
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![user_id, date_to_sql(start), date_to_sql(end)],
                |row| Ok((row.get::<_, String>(0)?, decimal_column(row, 1)?)),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for (category, amount) in rows {
            let total = totals.entry(category).or_insert(Decimal::ZERO);
            *total = add_amount(*total, amount)?;
        }

        let mut ranked: Vec<SpendingCategory> = totals
            .into_iter()
            .map(|(category, amount)| SpendingCategory::new(category, amount))
            .collect();
        ranked.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        ranked.truncate(limit);

        Ok(ranked)
    }
}
