use anyhow::Context;
use tracing::info;

use garajhub_db::{Database, DbConfig};
use garajhub_types::pagination;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garajhub=debug,garajhub_db=debug".into()),
        )
        .init();

    // Config
    let config = DbConfig::from_env();

    // Init database; creates the file and schema on first run
    let db = Database::from_config(&config)
        .with_context(|| format!("opening store at {}", config.path.display()))?;

    let stats = db.get_statistics().context("reading statistics")?;
    info!(
        total_users = stats.total_users,
        total_startups = stats.total_startups,
        pending = stats.pending_startups,
        active = stats.active_startups,
        completed = stats.completed_startups,
        rejected = stats.rejected_startups,
        "GarajHub store ready"
    );

    let pending = db.get_pending_startups(1, pagination::PENDING_PER_PAGE)?;
    if !pending.is_empty() {
        info!(
            "{} startup(s) awaiting review, {} page(s)",
            pending.total,
            pending.page_count(pagination::PENDING_PER_PAGE)
        );
    }

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
