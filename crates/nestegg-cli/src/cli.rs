//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nestegg - Track savings goals and get advice on reaching them
#[derive(Parser)]
#[command(name = "nestegg")]
#[command(about = "Personal savings goal tracker with recommendations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "nestegg.db", global = true)]
    pub db: PathBuf,

    /// User to act as
    #[arg(long, default_value = "1", global = true)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Recommendation policy file (TOML)
    ///
    /// Defaults to <data dir>/nestegg/config/recommendations.toml if present,
    /// otherwise the built-in policy.
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database, default user and categories
    Init,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// List or record transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage income and expense categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage savings goals and get advice
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with the web UI to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Add a user
    Add {
        /// Email address
        email: String,

        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record a transaction
    Add {
        /// income or expense
        #[arg(value_name = "TYPE")]
        kind: String,

        /// Amount, e.g. 1500 or 19.99
        amount: String,

        /// Category name
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long)]
        description: Option<String>,

        /// Goal this money goes towards
        #[arg(long)]
        goal: Option<i64>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories
    List {
        /// Only income or expense categories
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
    },

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// income or expense
        #[arg(long = "type", value_name = "TYPE", default_value = "expense")]
        kind: String,

        /// Hex color, e.g. #22c55e
        #[arg(long)]
        color: Option<String>,

        /// Emoji icon
        #[arg(long)]
        icon: Option<String>,

        /// Monthly budget limit
        #[arg(long)]
        budget: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with progress
    List {
        /// Hide completed goals
        #[arg(long)]
        active: bool,
    },

    /// Add a goal
    Add {
        /// Goal name
        name: String,

        /// Target amount
        amount: String,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a goal (its transactions are kept)
    Delete {
        /// Goal ID
        id: i64,
    },

    /// Show recommendations for reaching a goal
    Advise {
        /// Goal ID
        id: i64,

        /// Months of history to average
        #[arg(long, default_value = "3")]
        months: u32,

        /// Number of spending categories to consider
        #[arg(long, default_value = "3")]
        top: usize,
    },
}
