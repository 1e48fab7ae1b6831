//! Transaction command implementations

use anyhow::{Context, Result};
use nestegg_core::models::{NewTransaction, TransactionType};
use nestegg_core::validation::{parse_amount, parse_date};
use nestegg_core::Database;

use super::truncate;

/// Arguments of `nestegg transactions add`
pub struct AddTransaction<'a> {
    pub kind: &'a str,
    pub amount: &'a str,
    pub category: &'a str,
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
    pub goal: Option<i64>,
}

pub fn cmd_transactions_list(db: &Database, user_id: i64, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(user_id, limit.max(1))?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  nestegg transactions add expense 250 food");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.transaction_type {
            TransactionType::Expense => format!("\x1b[31m-{}\x1b[0m", tx.amount), // Red
            TransactionType::Income => format!("\x1b[32m+{}\x1b[0m", tx.amount),  // Green
        };
        let goal = tx.goal_id.map(|g| format!(" 🎯{}", g)).unwrap_or_default();

        println!(
            "   [{}] {} │ {:>20} │ {:<14} │ {}{}",
            tx.id,
            tx.date,
            amount_str,
            truncate(&tx.category, 14),
            truncate(tx.description.as_deref().unwrap_or(""), 30),
            goal
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(db: &Database, user_id: i64, args: &AddTransaction<'_>) -> Result<()> {
    let transaction_type: TransactionType = args
        .kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let amount = parse_amount(args.amount)?;
    let date = match args.date {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };

    let id = db
        .insert_transaction(
            user_id,
            &NewTransaction {
                transaction_type,
                amount,
                category: args.category.to_string(),
                description: args.description.map(String::from),
                date,
                eco_impact: None,
                goal_id: args.goal,
            },
        )
        .context("Failed to record transaction")?;

    println!(
        "✅ Recorded {} of {} in {} (id {})",
        transaction_type, amount, args.category, id
    );

    if let Some(goal_id) = args.goal {
        if let Some(goal) = db.get_goal(user_id, goal_id)? {
            let progress = goal.progress();
            println!(
                "   🎯 {}: {} of {} ({}%)",
                goal.name, progress.saved, progress.target, progress.percent_complete
            );
            if goal.completed {
                println!("   🎉 Goal reached!");
            }
        }
    }

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_transaction(user_id, id)? {
        anyhow::bail!("Transaction {} not found", id);
    }
    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}
