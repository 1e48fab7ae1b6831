//! Goal progress figures for list views

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::whole_units;

/// How far a goal has come
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub saved: Decimal,
    pub target: Decimal,
    /// Amount still missing, never negative
    pub remaining: Decimal,
    /// Whole percent of the target saved, can exceed 100
    pub percent_complete: Decimal,
    /// `percent_complete` capped at 100 for progress bars
    pub bar_percent: Decimal,
}

impl GoalProgress {
    pub fn new(target: Decimal, saved: Decimal) -> Self {
        let percent_complete = if target > Decimal::ZERO {
            saved
                .checked_div(target)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(whole_units)
                .unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };

        Self {
            saved,
            target,
            remaining: target.saturating_sub(saved).max(Decimal::ZERO),
            percent_complete,
            bar_percent: percent_complete.min(Decimal::ONE_HUNDRED),
        }
    }

    pub fn is_reached(&self) -> bool {
        self.saved >= self.target
    }
}
