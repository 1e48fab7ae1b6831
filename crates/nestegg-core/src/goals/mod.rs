//! Goal Advice - savings horizons and recommendations
//!
//! Turns a goal's financial snapshot into a projected time-to-goal and an
//! ordered list of suggestions. The engine is pure: no I/O, no retained state,
//! safe to share between request handlers.
//!
//! ## Pieces
//!
//! - **Engine** - projects horizons and builds the recommendation list
//! - **Policy** - reduction rate, lifestyle limit and fixed advice (TOML)
//! - **Progress** - percent complete for list views
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nestegg_core::goals::{RecommendationEngine, SnapshotWindow};
//!
//! let engine = RecommendationEngine::new();
//! let snapshot = db.goal_snapshot(goal_id, &SnapshotWindow::default())?;
//! let advice = engine.compute(&snapshot);
//! ```

pub mod engine;
pub mod policy;
pub mod progress;
pub mod types;

pub use engine::{acceleration_message, whole_units, RecommendationEngine};
pub use policy::{default_policy_path, IllustrativeRecommendation, RecommendationPolicy};
pub use progress::GoalProgress;
pub use types::{
    Acceleration, GoalSnapshot, Horizon, Projection, Recommendation, RecommendationKind,
    RecommendationSet, SpendingCategory,
};

pub use crate::db::SnapshotWindow;
