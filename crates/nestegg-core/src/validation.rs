//! Input validation for records entering the database
//!
//! Mirrors the rules the entry forms enforce: amounts with at most two
//! decimals, ISO dates, non-empty names and a minimum goal target.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::goals::GoalSnapshot;
use crate::models::{NewCategory, NewGoal, NewTransaction, NewUser};

/// Smallest accepted goal target
pub const MIN_GOAL_AMOUNT: Decimal = Decimal::ONE;

/// Largest goal target (12 digits, 2 decimals)
pub const MAX_GOAL_AMOUNT: Decimal = dec!(9999999999.99);

/// Largest transaction amount or budget limit (10 digits, 2 decimals)
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

/// Largest eco impact score (8 digits, 3 decimals)
pub const MAX_ECO_IMPACT: Decimal = dec!(99999.999);

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("valid regex"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"))
}

/// Parse a positive amount written with at most two decimals ("150", "19.99")
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let input = input.trim();
    if !amount_re().is_match(input) {
        return Err(Error::Validation(format!("Invalid amount: {}", input)));
    }

    let amount: Decimal = input
        .parse()
        .map_err(|_| Error::Validation(format!("Invalid amount: {}", input)))?;
    if amount <= Decimal::ZERO {
        return Err(Error::Validation("Amount must be positive".to_string()));
    }

    Ok(amount)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if !date_re().is_match(input) {
        return Err(Error::Validation(format!(
            "Invalid date format (YYYY-MM-DD): {}",
            input
        )));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("Invalid date: {}", input)))
}

/// Parse a goal deadline, either a plain date or a full RFC 3339 timestamp
pub fn parse_target_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.date_naive());
    }
    parse_date(input)
}

/// Amount as sent by clients: either a decimal string or a JSON number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(Decimal),
}

impl AmountInput {
    pub fn to_amount(&self) -> Result<Decimal> {
        match self {
            AmountInput::Text(s) => parse_amount(s),
            AmountInput::Number(n) if *n > Decimal::ZERO => Ok(*n),
            AmountInput::Number(_) => Err(Error::Validation("Amount must be positive".to_string())),
        }
    }
}

fn require_at_most(value: Decimal, max: Decimal, what: &str) -> Result<()> {
    if value > max {
        return Err(Error::Validation(format!("{} cannot exceed {}", what, max)));
    }
    Ok(())
}

fn require_non_empty(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(message.to_string()));
    }
    Ok(())
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation("Amount must be positive".to_string()));
        }
        require_at_most(self.amount, MAX_AMOUNT, "Amount")?;
        require_non_empty(&self.category, "Category is required")?;
        if let Some(eco) = self.eco_impact {
            if eco < Decimal::ZERO {
                return Err(Error::Validation(
                    "Eco impact cannot be negative".to_string(),
                ));
            }
            require_at_most(eco, MAX_ECO_IMPACT, "Eco impact")?;
        }
        Ok(())
    }
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "Goal name is required")?;
        if self.target_amount < MIN_GOAL_AMOUNT {
            return Err(Error::Validation(format!(
                "Target amount must be at least {}",
                MIN_GOAL_AMOUNT
            )));
        }
        require_at_most(self.target_amount, MAX_GOAL_AMOUNT, "Target amount")?;
        Ok(())
    }
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.name, "Category name is required")?;
        if self.icon.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(Error::Validation("Category icon cannot be empty".to_string()));
        }
        if let Some(limit) = self.budget_limit {
            if limit < Decimal::ZERO {
                return Err(Error::Validation(
                    "Budget limit cannot be negative".to_string(),
                ));
            }
            require_at_most(limit, MAX_AMOUNT, "Budget limit")?;
        }
        Ok(())
    }
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if !email_re().is_match(self.email.trim()) {
            return Err(Error::Validation(format!(
                "Invalid email format: {}",
                self.email
            )));
        }
        require_non_empty(&self.first_name, "First name is required")?;
        require_non_empty(&self.last_name, "Last name is required")?;
        Ok(())
    }
}

impl GoalSnapshot {
    /// Reject snapshots the engine should never see
    pub fn validate(&self) -> Result<()> {
        if self.monthly_income < Decimal::ZERO || self.monthly_expenses < Decimal::ZERO {
            return Err(Error::Validation(
                "Monthly income and expenses cannot be negative".to_string(),
            ));
        }
        if self.goal_amount <= Decimal::ZERO {
            return Err(Error::Validation("Goal amount must be positive".to_string()));
        }
        if self.current_saved < Decimal::ZERO {
            return Err(Error::Validation(
                "Saved amount cannot be negative".to_string(),
            ));
        }
        if let Some(c) = self
            .top_spending_categories
            .iter()
            .find(|c| c.amount < Decimal::ZERO || c.category.trim().is_empty())
        {
            return Err(Error::Validation(format!(
                "Invalid spending category: {:?} {}",
                c.category, c.amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("150").unwrap(), dec!(150));
        assert_eq!(parse_amount(" 19.99 ").unwrap(), dec!(19.99));
        assert_eq!(parse_amount("0.5").unwrap(), dec!(0.5));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(parse_amount("1.999").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("0.00").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_target_date_accepts_timestamps() {
        assert_eq!(
            parse_target_date("2025-12-31T21:00:00.000Z").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
        assert_eq!(
            parse_target_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_amount_input() {
        let text: AmountInput = serde_json::from_str("\"42.50\"").unwrap();
        assert_eq!(text.to_amount().unwrap(), dec!(42.50));

        let number: AmountInput = serde_json::from_str("42").unwrap();
        assert_eq!(number.to_amount().unwrap(), dec!(42));

        let negative: AmountInput = serde_json::from_str("-1").unwrap();
        assert!(negative.to_amount().is_err());
    }

    #[test]
    fn test_goal_validation() {
        let mut goal = NewGoal {
            name: "Vacation".to_string(),
            description: None,
            target_amount: dec!(1),
            target_date: None,
        };
        assert!(goal.validate().is_ok());

        goal.target_amount = dec!(0.99);
        assert!(goal.validate().is_err());

        goal.target_amount = dec!(100);
        goal.name = "   ".to_string();
        assert!(goal.validate().is_err());
    }

    #[test]
    fn test_transaction_validation() {
        let tx = NewTransaction {
            transaction_type: TransactionType::Expense,
            amount: dec!(10),
            category: "".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            eco_impact: None,
            goal_id: None,
        };
        let err = tx.validate().unwrap_err();
        assert!(err.to_string().contains("Category is required"));
    }

    #[test]
    fn test_amount_limits() {
        let mut tx = NewTransaction {
            transaction_type: TransactionType::Income,
            amount: MAX_AMOUNT,
            category: "salary".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            eco_impact: Some(MAX_ECO_IMPACT),
            goal_id: None,
        };
        assert!(tx.validate().is_ok());

        tx.eco_impact = Some(dec!(100000));
        assert!(tx.validate().is_err());

        tx.eco_impact = None;
        tx.amount = parse_amount("50000000000000000000000000000").unwrap();
        let err = tx.validate().unwrap_err();
        assert!(err.to_string().contains("Amount cannot exceed 99999999.99"));

        let goal = NewGoal {
            name: "House".to_string(),
            description: None,
            target_amount: MAX_GOAL_AMOUNT + dec!(0.01),
            target_date: None,
        };
        assert!(goal.validate().is_err());

        let category = NewCategory {
            name: "Rent".to_string(),
            category_type: TransactionType::Expense,
            color: None,
            icon: None,
            budget_limit: Some(MAX_AMOUNT + dec!(0.01)),
        };
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_user_validation() {
        let user = NewUser {
            email: "not-an-email".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        assert!(user.validate().is_err());

        let user = NewUser {
            email: "ada@example.com".to_string(),
            ..user
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_category_validation() {
        let category = NewCategory {
            name: "Pets".to_string(),
            category_type: TransactionType::Expense,
            color: None,
            icon: Some(" ".to_string()),
            budget_limit: None,
        };
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_snapshot_validation() {
        let snapshot = GoalSnapshot {
            monthly_income: dec!(50000),
            monthly_expenses: dec!(45000),
            top_spending_categories: vec![crate::goals::SpendingCategory::new("food", dec!(15000))],
            goal_amount: dec!(100000),
            current_saved: dec!(20000),
        };
        assert!(snapshot.validate().is_ok());

        let negative_income = GoalSnapshot {
            monthly_income: dec!(-1),
            ..snapshot.clone()
        };
        assert!(negative_income.validate().is_err());

        let zero_goal = GoalSnapshot {
            goal_amount: Decimal::ZERO,
            ..snapshot.clone()
        };
        assert!(zero_goal.validate().is_err());

        let bad_category = GoalSnapshot {
            top_spending_categories: vec![crate::goals::SpendingCategory::new("food", dec!(-5))],
            ..snapshot
        };
        assert!(bad_category.validate().is_err());
    }
}
