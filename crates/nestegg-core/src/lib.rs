//! Nestegg Core Library
//!
//! Shared functionality for the Nestegg savings goal tracker:
//! - Database access and migrations
//! - Input validation for transactions, goals, categories and users
//! - Goal progress and the recommendation engine
//! - Recommendation policy loaded from TOML

pub mod db;
pub mod error;
pub mod goals;
pub mod models;
pub mod validation;

pub use db::{Database, SnapshotWindow};
pub use error::{Error, Result};
pub use goals::{
    Acceleration, GoalProgress, GoalSnapshot, Horizon, Recommendation, RecommendationEngine,
    RecommendationKind, RecommendationPolicy, RecommendationSet,
};
