use tracing::info;

use flock_db::DbConfig;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flock_init=debug,flock_db=debug".into()),
        )
        .init();

    // Config
    let config = DbConfig::from_env()?;
    info!("Initializing social database at {}", config.path.display());

    flock_db::initialize(&config)?;

    Ok(())
}
