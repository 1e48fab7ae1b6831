//! Domain models for Nestegg

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::GoalProgress;

/// Default color for new categories
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366F1";

/// Default icon for new categories
pub const DEFAULT_CATEGORY_ICON: &str = "💰";

/// A person tracking their finances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Direction of money flow, shared by transactions and categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-defined income or expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub color: String,
    pub icon: String,
    /// Optional monthly spending cap
    pub budget_limit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub budget_limit: Option<Decimal>,
}

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Always positive; direction comes from `transaction_type`
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// Estimated environmental impact score
    pub eco_impact: Option<Decimal>,
    /// Goal this transaction contributes to
    pub goal_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub eco_impact: Option<Decimal>,
    pub goal_id: Option<i64>,
}

/// A savings target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub completed: bool,
    /// Sum of transactions linked to this goal
    pub current_saved: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn progress(&self) -> GoalProgress {
        GoalProgress::new(self.target_amount, self.current_saved)
    }
}

/// Data for creating a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount: Decimal,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}
