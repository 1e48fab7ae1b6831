//! Core types for the recommendation engine

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the caller-ranked spending list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingCategory {
    pub category: String,
    /// Monthly amount spent in this category
    pub amount: Decimal,
}

impl SpendingCategory {
    pub fn new(category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Point-in-time financial inputs for one goal
///
/// Amounts are monthly figures. `current_saved` may exceed `goal_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    /// Top spending categories in the order the caller ranked them
    #[serde(default)]
    pub top_spending_categories: Vec<SpendingCategory>,
    pub goal_amount: Decimal,
    #[serde(default)]
    pub current_saved: Decimal,
}

impl GoalSnapshot {
    /// Income minus expenses (negative when overspending), saturating at the decimal range
    pub fn monthly_savings(&self) -> Decimal {
        self.monthly_income.saturating_sub(self.monthly_expenses)
    }

    /// Amount still missing to reach the goal (zero or negative once met)
    pub fn remaining_amount(&self) -> Decimal {
        self.goal_amount.saturating_sub(self.current_saved)
    }
}

/// Projected months until a goal is reached
///
/// `Unreachable` orders after every finite horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "snake_case")]
pub enum Horizon {
    #[serde(rename = "reachable")]
    Months(u64),
    Unreachable,
}

impl Horizon {
    /// Months needed to cover `remaining` at `monthly_rate`, rounding partial months up
    pub fn project(remaining: Decimal, monthly_rate: Decimal) -> Self {
        if remaining <= Decimal::ZERO {
            return Horizon::Months(0);
        }
        if monthly_rate <= Decimal::ZERO {
            return Horizon::Unreachable;
        }

        remaining
            .checked_div(monthly_rate)
            .and_then(|months| months.ceil().to_u64())
            .map(Horizon::Months)
            .unwrap_or(Horizon::Unreachable)
    }

    pub fn months(&self) -> Option<u64> {
        match self {
            Horizon::Months(m) => Some(*m),
            Horizon::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Horizon::Months(_))
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Months(m) => write!(f, "{} months", m),
            Horizon::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Kind of recommendation, drives how the caller presents it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Savings,
    Income,
    Lifestyle,
    Warning,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Savings => "savings",
            RecommendationKind::Income => "income",
            RecommendationKind::Lifestyle => "lifestyle",
            RecommendationKind::Warning => "warning",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "savings" => Ok(RecommendationKind::Savings),
            "income" => Ok(RecommendationKind::Income),
            "lifestyle" => Ok(RecommendationKind::Lifestyle),
            "warning" => Ok(RecommendationKind::Warning),
            _ => Err(format!("Unknown recommendation kind: {}", s)),
        }
    }
}

/// A single piece of advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    /// Monthly amount this advice would free up, when it implies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<Decimal>,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            potential_savings: None,
        }
    }

    /// Attach the implied monthly saving
    pub fn with_potential_savings(mut self, amount: Decimal) -> Self {
        self.potential_savings = Some(amount);
        self
    }
}

/// Figures behind the recommendations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub monthly_savings: Decimal,
    pub remaining_amount: Decimal,
    /// Monthly amount freed by cutting every supplied category
    pub potential_savings: Decimal,
    pub months_without_changes: Horizon,
    pub months_with_savings: Horizon,
}

/// Highlight shown when the suggested cuts bring the goal closer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Acceleration {
    /// Goal is reached `months_saved` months earlier
    Sooner {
        months_saved: u64,
        months_with_savings: u64,
    },
    /// Goal was out of reach and becomes reachable
    NowReachable { months_with_savings: u64 },
}

impl Acceleration {
    /// Present only when `with_savings` is finite and strictly shorter than `without_changes`
    pub fn between(without_changes: Horizon, with_savings: Horizon) -> Option<Self> {
        let with = with_savings.months()?;
        if with_savings >= without_changes {
            return None;
        }

        Some(match without_changes {
            Horizon::Months(without) => Acceleration::Sooner {
                months_saved: without - with,
                months_with_savings: with,
            },
            Horizon::Unreachable => Acceleration::NowReachable {
                months_with_savings: with,
            },
        })
    }

    /// Months gained, if the baseline horizon was finite
    pub fn months_saved(&self) -> Option<u64> {
        match self {
            Acceleration::Sooner { months_saved, .. } => Some(*months_saved),
            Acceleration::NowReachable { .. } => None,
        }
    }
}

/// Engine output: ordered advice plus the projection it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    /// Display order, not sorted by magnitude
    pub recommendations: Vec<Recommendation>,
    pub projection: Projection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<Acceleration>,
}

impl RecommendationSet {
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter()
    }

    /// Records of a given kind, in display order
    pub fn of_kind(&self, kind: RecommendationKind) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter(move |r| r.kind == kind)
    }
}
