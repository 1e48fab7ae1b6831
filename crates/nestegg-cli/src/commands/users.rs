//! User command implementations

use anyhow::Result;
use nestegg_core::models::NewUser;
use nestegg_core::Database;

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Run 'nestegg init' to create one.");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────");
    for user in users {
        println!("   [{}] {} <{}>", user.id, user.display_name(), user.email);
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, email: &str, first_name: &str, last_name: &str) -> Result<()> {
    let id = db.create_user(&NewUser {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    })?;
    db.seed_default_categories(id)?;

    println!("✅ Created user {} (id {})", email, id);
    println!("   Use --user {} to act as this user", id);
    Ok(())
}
