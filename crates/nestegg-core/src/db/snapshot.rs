//! Goal snapshot assembly
//!
//! Averages a trailing window of whole calendar months into the monthly
//! figures the recommendation engine works with.

use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::goals::{GoalSnapshot, SpendingCategory};

/// Trailing range of transactions that feeds a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWindow {
    /// Last day included
    pub as_of: NaiveDate,
    /// Number of calendar months, counting the month of `as_of`
    pub months: u32,
    /// How many expense categories to report
    pub top_n: usize,
}

impl Default for SnapshotWindow {
    fn default() -> Self {
        Self {
            as_of: Utc::now().date_naive(),
            months: 3,
            top_n: 3,
        }
    }
}

impl SnapshotWindow {
    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = date;
        self
    }

    /// First and last day covered, inclusive
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        if self.months == 0 {
            return Err(Error::Validation(
                "Snapshot window must cover at least one month".to_string(),
            ));
        }

        let start = self
            .as_of
            .with_day(1)
            .and_then(|first| first.checked_sub_months(Months::new(self.months - 1)))
            .ok_or_else(|| Error::Validation(format!("Window start out of range: {:?}", self)))?;

        Ok((start, self.as_of))
    }

    /// Spread a window total over its months, rounded to cents
    fn monthly(&self, total: Decimal) -> Decimal {
        (total / Decimal::from(self.months)).round_dp(2)
    }
}

impl Database {
    /// Build the engine input for one of a user's goals
    pub fn goal_snapshot(
        &self,
        user_id: i64,
        goal_id: i64,
        window: &SnapshotWindow,
    ) -> Result<GoalSnapshot> {
        let goal = self
            .get_goal(user_id, goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {} not found", goal_id)))?;

        let (start, end) = window.date_range()?;
        let (income, expenses) = self.period_totals(user_id, start, end)?;
        let top_spending_categories = self
            .spending_by_category(user_id, start, end, window.top_n)?
            .into_iter()
            .map(|c| SpendingCategory::new(c.category, window.monthly(c.amount)))
            .collect();

        let snapshot = GoalSnapshot {
            monthly_income: window.monthly(income),
            monthly_expenses: window.monthly(expenses),
            top_spending_categories,
            goal_amount: goal.target_amount,
            current_saved: goal.current_saved,
        };

        debug!(
            "Snapshot for goal {} over {}..={}: income {} expenses {} saved {}",
            goal_id,
            start,
            end,
            snapshot.monthly_income,
            snapshot.monthly_expenses,
            snapshot.current_saved
        );

        Ok(snapshot)
    }
}
