//! Recommendation engine - projects goal horizons and builds advice

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::policy::RecommendationPolicy;
use super::types::{
    Acceleration, GoalSnapshot, Horizon, Projection, Recommendation, RecommendationKind,
    RecommendationSet,
};

/// Round to the nearest whole currency unit for display (halves round up)
pub fn whole_units(amount: Decimal) -> Decimal {
    // Near Decimal::MAX there is no fractional part left to round
    amount.checked_add(dec!(0.5)).unwrap_or(amount).floor()
}

/// Stateless engine turning a [`GoalSnapshot`] into a [`RecommendationSet`]
///
/// Holds only its policy, so a single instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    policy: RecommendationPolicy,
}

impl RecommendationEngine {
    /// Create an engine with the built-in policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with an explicit policy
    pub fn with_policy(policy: RecommendationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    fn category_saving(&self, amount: Decimal) -> Decimal {
        amount.saturating_mul(self.policy.reduction_rate)
    }

    /// Project horizons without building advice text
    pub fn project(&self, snapshot: &GoalSnapshot) -> Projection {
        let monthly_savings = snapshot.monthly_savings();
        let remaining_amount = snapshot.remaining_amount();

        // Saturating so extreme inputs degrade the horizon instead of panicking
        let potential_savings = snapshot
            .top_spending_categories
            .iter()
            .map(|c| self.category_saving(c.amount))
            .fold(Decimal::ZERO, Decimal::saturating_add);

        Projection {
            monthly_savings,
            remaining_amount,
            potential_savings,
            months_without_changes: Horizon::project(remaining_amount, monthly_savings),
            months_with_savings: Horizon::project(
                remaining_amount,
                monthly_savings.saturating_add(potential_savings),
            ),
        }
    }

    /// Compute the full recommendation set. Never fails.
    pub fn compute(&self, snapshot: &GoalSnapshot) -> RecommendationSet {
        let projection = self.project(snapshot);
        let currency = self.policy.currency.as_str();

        let mut recommendations = Vec::with_capacity(
            4 + self.policy.max_lifestyle + self.policy.illustrative.len(),
        );

        recommendations.push(Recommendation::new(
            RecommendationKind::Savings,
            "Monthly savings",
            format!(
                "You set aside {}{} a month at your current income and expenses.",
                whole_units(projection.monthly_savings),
                currency
            ),
        ));

        recommendations.push(Recommendation::new(
            RecommendationKind::Income,
            "Grow your income",
            "Consider a side job or investing to increase your monthly income.",
        ));

        let percent = self.policy.reduction_percent();
        for category in snapshot
            .top_spending_categories
            .iter()
            .take(self.policy.max_lifestyle)
        {
            let saving = self.category_saving(category.amount);
            recommendations.push(
                Recommendation::new(
                    RecommendationKind::Lifestyle,
                    format!("Save on {}", category.category),
                    format!(
                        "Cut {} spending by {}% and keep {}{} a month.",
                        category.category,
                        percent,
                        whole_units(saving),
                        currency
                    ),
                )
                .with_potential_savings(saving),
            );
        }

        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "Time to goal",
            horizon_message(projection.months_without_changes),
        ));

        recommendations.extend(
            self.policy
                .illustrative
                .iter()
                .map(|i| i.to_recommendation(currency)),
        );

        let acceleration = Acceleration::between(
            projection.months_without_changes,
            projection.months_with_savings,
        );

        tracing::debug!(
            monthly_savings = %projection.monthly_savings,
            remaining = %projection.remaining_amount,
            without_changes = %projection.months_without_changes,
            with_savings = %projection.months_with_savings,
            count = recommendations.len(),
            "Goal recommendations computed"
        );

        RecommendationSet {
            recommendations,
            projection,
            acceleration,
        }
    }
}

fn horizon_message(horizon: Horizon) -> String {
    match horizon {
        Horizon::Unreachable => "At your current spending the goal will not be reached. \
            Increase income or reduce expenses."
            .to_string(),
        Horizon::Months(0) => "The goal is already reached: 0 months to go.".to_string(),
        Horizon::Months(months) => format!(
            "At your current savings rate the goal will be reached in {} months.",
            months
        ),
    }
}

/// Human-readable highlight for an acceleration fact
pub fn acceleration_message(acceleration: &Acceleration) -> String {
    match acceleration {
        Acceleration::Sooner { months_saved, .. } => format!(
            "With a few changes you can reach the goal {} months sooner!",
            months_saved
        ),
        Acceleration::NowReachable {
            months_with_savings,
        } => format!(
            "With a few changes the goal becomes reachable in {} months!",
            months_with_savings
        ),
    }
}
