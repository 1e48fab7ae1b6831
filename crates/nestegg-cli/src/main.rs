//! Nestegg CLI - Savings goals with advice
//!
//! Usage:
//!   nestegg init                          Initialize database
//!   nestegg transactions add expense 250 food
//!   nestegg goals add "Vacation" 100000
//!   nestegg goals advise 1                Show recommendations
//!   nestegg serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    email,
                    first_name,
                    last_name,
                }) => commands::cmd_users_add(&db, &email, &first_name, &last_name),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_transactions_list(&db, cli.user, 20),
                Some(TransactionsAction::List { limit }) => {
                    commands::cmd_transactions_list(&db, cli.user, limit)
                }
                Some(TransactionsAction::Add {
                    kind,
                    amount,
                    category,
                    date,
                    description,
                    goal,
                }) => commands::cmd_transactions_add(
                    &db,
                    cli.user,
                    &commands::AddTransaction {
                        kind: &kind,
                        amount: &amount,
                        category: &category,
                        date: date.as_deref(),
                        description: description.as_deref(),
                        goal,
                    },
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, cli.user, id)
                }
            }
        }
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_categories_list(&db, cli.user, None),
                Some(CategoriesAction::List { kind }) => {
                    commands::cmd_categories_list(&db, cli.user, kind.as_deref())
                }
                Some(CategoriesAction::Add {
                    name,
                    kind,
                    color,
                    icon,
                    budget,
                }) => commands::cmd_categories_add(
                    &db,
                    cli.user,
                    &name,
                    &kind,
                    color,
                    icon,
                    budget.as_deref(),
                ),
                Some(CategoriesAction::Delete { id }) => {
                    commands::cmd_categories_delete(&db, cli.user, id)
                }
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_goals_list(&db, cli.user, false),
                Some(GoalsAction::List { active }) => {
                    commands::cmd_goals_list(&db, cli.user, active)
                }
                Some(GoalsAction::Add {
                    name,
                    amount,
                    date,
                    description,
                }) => commands::cmd_goals_add(
                    &db,
                    cli.user,
                    &name,
                    &amount,
                    date.as_deref(),
                    description.as_deref(),
                ),
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, cli.user, id),
                Some(GoalsAction::Advise { id, months, top }) => {
                    let engine = commands::load_engine(cli.policy.as_deref())?;
                    commands::cmd_goals_advise(&db, &engine, cli.user, id, months, top)
                }
            }
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                cli.user,
                cli.policy.as_deref(),
                &host,
                port,
                static_dir.as_deref(),
            )
            .await
        }
    }
}
