//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_engine)
//! - `users` - User listing and creation
//! - `transactions` - Transaction commands (list, add, delete)
//! - `categories` - Category commands (list, add, delete)
//! - `goals` - Goal commands (list, add, delete, advise)
//! - `serve` - Web server command

pub mod categories;
pub mod core;
pub mod goals;
pub mod serve;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use categories::*;
pub use core::*;
pub use goals::*;
pub use serve::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
