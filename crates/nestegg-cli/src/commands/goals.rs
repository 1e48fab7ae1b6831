//! Goal command implementations

use std::fmt::Write as _;

use anyhow::{Context, Result};
use nestegg_core::goals::{acceleration_message, whole_units};
use nestegg_core::models::{Goal, NewGoal};
use nestegg_core::validation::{parse_amount, parse_target_date};
use nestegg_core::{
    Database, RecommendationEngine, RecommendationKind, RecommendationSet, SnapshotWindow,
};

use super::truncate;

/// Width of the progress bar in characters
const BAR_WIDTH: usize = 20;

fn progress_bar(percent: rust_decimal::Decimal) -> String {
    use rust_decimal::prelude::ToPrimitive;

    let filled = (percent.to_usize().unwrap_or(0) * BAR_WIDTH / 100).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn print_goal(goal: &Goal) {
    let progress = goal.progress();
    let status = if goal.completed { "✅" } else { "🎯" };
    let deadline = goal
        .target_date
        .map(|d| format!(" by {}", d))
        .unwrap_or_default();

    println!(
        "   [{}] {} {}{}",
        goal.id,
        status,
        truncate(&goal.name, 30),
        deadline
    );
    println!(
        "       {} {}% │ {} of {} │ {} to go",
        progress_bar(progress.bar_percent),
        progress.percent_complete,
        progress.saved,
        progress.target,
        progress.remaining
    );
}

pub fn cmd_goals_list(db: &Database, user_id: i64, active_only: bool) -> Result<()> {
    let goals = if active_only {
        db.list_active_goals(user_id)?
    } else {
        db.list_goals(user_id)?
    };

    if goals.is_empty() {
        println!("No goals yet. Add one with:");
        println!("  nestegg goals add \"Vacation\" 100000");
        return Ok(());
    }

    println!();
    println!("🥚 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in &goals {
        print_goal(goal);
    }

    Ok(())
}

pub fn cmd_goals_add(
    db: &Database,
    user_id: i64,
    name: &str,
    amount: &str,
    date: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    let goal = NewGoal {
        name: name.to_string(),
        description: description.map(String::from),
        target_amount: parse_amount(amount)?,
        target_date: date.map(parse_target_date).transpose()?,
    };

    let id = db.create_goal(user_id, &goal)?;
    println!("✅ Created goal '{}' for {} (id {})", name, goal.target_amount, id);
    println!("   Get advice with: nestegg goals advise {}", id);
    Ok(())
}

pub fn cmd_goals_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_goal(user_id, id)? {
        anyhow::bail!("Goal {} not found", id);
    }
    println!("🗑️  Deleted goal {} (its transactions were kept)", id);
    Ok(())
}

pub fn cmd_goals_advise(
    db: &Database,
    engine: &RecommendationEngine,
    user_id: i64,
    id: i64,
    months: u32,
    top: usize,
) -> Result<()> {
    let goal = db
        .get_goal(user_id, id)?
        .ok_or_else(|| anyhow::anyhow!("Goal {} not found", id))?;

    let window = SnapshotWindow::default().with_months(months).with_top_n(top);
    let snapshot = db
        .goal_snapshot(user_id, id, &window)
        .context("Failed to assemble goal snapshot")?;
    let advice = engine.compute(&snapshot);

    println!();
    print_goal(&goal);
    println!(
        "       Averaged over the last {} month(s): income {} │ expenses {}",
        months, snapshot.monthly_income, snapshot.monthly_expenses
    );
    print!("{}", render_advice(&advice, &engine.policy().currency));

    Ok(())
}

fn kind_icon(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::Savings => "💰",
        RecommendationKind::Income => "📈",
        RecommendationKind::Lifestyle => "🌱",
        RecommendationKind::Warning => "⏳",
    }
}

/// Render a recommendation set as terminal text
pub fn render_advice(advice: &RecommendationSet, currency: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "💡 Recommendations");
    let _ = writeln!(
        out,
        "   ─────────────────────────────────────────────────────────────"
    );

    for rec in advice.iter() {
        let _ = writeln!(out, "   {} {}", kind_icon(rec.kind), rec.title);
        let _ = writeln!(out, "      {}", rec.description);
        if let Some(savings) = rec.potential_savings {
            let _ = writeln!(
                out,
                "      Potential savings: +{}{}/mo",
                whole_units(savings),
                currency
            );
        }
    }

    if let Some(acceleration) = &advice.acceleration {
        let _ = writeln!(out);
        let _ = writeln!(out, "   🎉 {}", acceleration_message(acceleration));
    }

    out
}
