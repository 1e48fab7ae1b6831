//! Category command implementations

use anyhow::Result;
use nestegg_core::models::{NewCategory, TransactionType};
use nestegg_core::validation::parse_amount;
use nestegg_core::Database;

fn parse_type(kind: &str) -> Result<TransactionType> {
    kind.parse().map_err(|e: String| anyhow::anyhow!(e))
}

pub fn cmd_categories_list(db: &Database, user_id: i64, kind: Option<&str>) -> Result<()> {
    let category_type = kind.map(parse_type).transpose()?;
    let categories = db.list_categories(user_id, category_type)?;

    if categories.is_empty() {
        println!("No categories. Run 'nestegg init' to add the defaults.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────────────────────");

    for category in categories {
        let budget = category
            .budget_limit
            .map(|b| format!(" (budget {}/mo)", b))
            .unwrap_or_default();
        println!(
            "   [{}] {} {:<16} {}{}",
            category.id, category.icon, category.name, category.category_type, budget
        );
    }

    Ok(())
}

pub fn cmd_categories_add(
    db: &Database,
    user_id: i64,
    name: &str,
    kind: &str,
    color: Option<String>,
    icon: Option<String>,
    budget: Option<&str>,
) -> Result<()> {
    let category = NewCategory {
        name: name.to_string(),
        category_type: parse_type(kind)?,
        color,
        icon,
        budget_limit: budget.map(parse_amount).transpose()?,
    };

    let id = db.create_category(user_id, &category)?;
    println!("✅ Created {} category '{}' (id {})", category.category_type, name, id);
    Ok(())
}

pub fn cmd_categories_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_category(user_id, id)? {
        anyhow::bail!("Category {} not found", id);
    }
    println!("🗑️  Deleted category {}", id);
    Ok(())
}
