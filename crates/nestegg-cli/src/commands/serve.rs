//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::{load_engine, open_db};

pub async fn cmd_serve(
    db_path: &Path,
    user_id: i64,
    policy_path: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Nestegg web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   User: {}", user_id);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = nestegg_server::ServerConfig::from_env(user_id);
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            nestegg_server::ALLOWED_ORIGINS_ENV
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;
    let engine = load_engine(policy_path)?;

    let static_dir = static_dir
        .map(|d| d.to_str().context("Static directory path is not valid UTF-8"))
        .transpose()?;

    nestegg_server::serve_with_config(db, host, port, static_dir, config, engine).await
}
