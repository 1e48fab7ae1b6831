//! Recommendation policy
//!
//! Tunable constants for the recommendation engine: the reduction share applied
//! to top spending categories, how many categories get their own advice, the
//! currency symbol used in text, and the fixed illustrative advice.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (CLI `--policy`), when it exists
//! 2. Override in data dir (~/.local/share/nestegg/config/recommendations.toml)
//! 3. Embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Recommendation, RecommendationKind};
use crate::error::{Error, Result};

/// Embedded default policy (compiled into binary)
const DEFAULT_POLICY: &str = include_str!("../../../../config/recommendations.toml");

/// Placeholder replaced with the currency symbol in illustrative descriptions
const CURRENCY_PLACEHOLDER: &str = "{currency}";

/// Fixed advice that is not derived from the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustrativeRecommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub potential_savings: Option<Decimal>,
}

impl IllustrativeRecommendation {
    /// Render into a recommendation, filling in the currency symbol
    pub fn to_recommendation(&self, currency: &str) -> Recommendation {
        let rec = Recommendation::new(
            self.kind,
            self.title.clone(),
            self.description.replace(CURRENCY_PLACEHOLDER, currency),
        );
        match self.potential_savings {
            Some(amount) => rec.with_potential_savings(amount),
            None => rec,
        }
    }
}

/// Policy constants for the recommendation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPolicy {
    /// Currency symbol appended to amounts in text
    pub currency: String,
    /// Fraction of each category's spending suggested as a cut (0..=1)
    pub reduction_rate: Decimal,
    /// Maximum number of per-category lifestyle records
    pub max_lifestyle: usize,
    /// Advice appended unconditionally after the computed records
    pub illustrative: Vec<IllustrativeRecommendation>,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            currency: "₽".to_string(),
            reduction_rate: dec!(0.30),
            max_lifestyle: 3,
            illustrative: vec![
                IllustrativeRecommendation {
                    kind: RecommendationKind::Savings,
                    title: "Eco-friendly savings".to_string(),
                    description: "Ride a bicycle instead of driving and save up to 5000{currency} a month on fuel.".to_string(),
                    potential_savings: Some(dec!(5000)),
                },
                IllustrativeRecommendation {
                    kind: RecommendationKind::Lifestyle,
                    title: "Eco-friendly shopping".to_string(),
                    description: "Buy local seasonal produce: it is cheaper and greener.".to_string(),
                    potential_savings: Some(dec!(2000)),
                },
            ],
        }
    }
}

impl RecommendationPolicy {
    /// Load using the standard resolution order
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let content = match resolve_policy_path(explicit_path) {
            Some(path) => {
                debug!(path = %path.display(), "Loading recommendation policy");
                fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?
            }
            None => DEFAULT_POLICY.to_string(),
        };

        parse_policy(&content)
    }

    /// Parse a policy from TOML content, layered over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_policy(content)
    }

    /// Reduction rate as a whole percentage for text (0.30 -> 30)
    pub fn reduction_percent(&self) -> Decimal {
        (self.reduction_rate * Decimal::ONE_HUNDRED).normalize()
    }
}

/// Default policy override path
pub fn default_policy_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| {
        d.join("nestegg")
            .join("config")
            .join("recommendations.toml")
    })
}

fn resolve_policy_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!(
            path = %path.display(),
            "Policy file not found, falling back to defaults"
        );
    }

    default_policy_path().filter(|p| p.exists())
}

/// Raw policy structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawPolicyFile {
    policy: Option<RawPolicy>,
    illustrative: Option<Vec<IllustrativeRecommendation>>,
}

#[derive(Debug, Deserialize)]
struct RawPolicy {
    currency: Option<String>,
    reduction_rate: Option<Decimal>,
    max_lifestyle: Option<usize>,
}

fn parse_policy(content: &str) -> Result<RecommendationPolicy> {
    let raw: RawPolicyFile = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid policy TOML: {}", e)))?;

    let mut policy = RecommendationPolicy::default();

    if let Some(p) = raw.policy {
        if let Some(currency) = p.currency {
            policy.currency = currency;
        }
        if let Some(rate) = p.reduction_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(Error::Config(format!(
                    "reduction_rate must be between 0 and 1, got {}",
                    rate
                )));
            }
            policy.reduction_rate = rate;
        }
        if let Some(max) = p.max_lifestyle {
            policy.max_lifestyle = max;
        }
    }

    if let Some(illustrative) = raw.illustrative {
        if let Some(bad) = illustrative
            .iter()
            .find(|i| i.potential_savings.is_some_and(|s| s < Decimal::ZERO))
        {
            return Err(Error::Config(format!(
                "Illustrative recommendation '{}' has negative potential savings",
                bad.title
            )));
        }
        policy.illustrative = illustrative;
    }

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_policy_matches_default() {
        let policy = parse_policy(DEFAULT_POLICY).unwrap();
        assert_eq!(policy, RecommendationPolicy::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let policy = RecommendationPolicy::from_toml(
            r#"
            [policy]
            currency = "$"
            max_lifestyle = 5
            "#,
        )
        .unwrap();

        assert_eq!(policy.currency, "$");
        assert_eq!(policy.max_lifestyle, 5);
        assert_eq!(policy.reduction_rate, dec!(0.30));
        assert_eq!(policy.illustrative.len(), 2);
    }

    #[test]
    fn test_illustrative_list_replaced() {
        let policy = RecommendationPolicy::from_toml(
            r#"
            [[illustrative]]
            kind = "income"
            title = "Sell unused items"
            description = "Declutter and sell what you no longer need."
            "#,
        )
        .unwrap();

        assert_eq!(policy.illustrative.len(), 1);
        assert_eq!(policy.illustrative[0].kind, RecommendationKind::Income);
        assert!(policy.illustrative[0].potential_savings.is_none());
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let err = RecommendationPolicy::from_toml("[policy]\nreduction_rate = \"1.5\"").unwrap_err();
        assert!(err.to_string().contains("reduction_rate"));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        assert!(RecommendationPolicy::from_toml("[policy").is_err());
    }

    #[test]
    fn test_reduction_percent() {
        assert_eq!(RecommendationPolicy::default().reduction_percent(), dec!(30));
    }

    #[test]
    fn test_illustrative_currency_placeholder() {
        let policy = RecommendationPolicy::default();
        let rec = policy.illustrative[0].to_recommendation("$");
        assert!(rec.description.contains("5000$"));
        assert_eq!(rec.potential_savings, Some(dec!(5000)));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[policy]\nreduction_rate = \"0.25\"").unwrap();

        let policy = RecommendationPolicy::load(Some(file.path())).unwrap();
        assert_eq!(policy.reduction_rate, dec!(0.25));
        assert_eq!(policy.reduction_percent(), dec!(25));
    }
}
