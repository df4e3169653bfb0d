//! fieldreg engine - prints the repaired location hierarchy as JSON.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldreg_engine::infrastructure::config::AppConfig;
use fieldreg_engine::infrastructure::sqlite::{self, SqliteRepositories};
use fieldreg_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldreg_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(database_url = %config.database_url, "Starting fieldreg engine");

    let pool = sqlite::connect(&config).await?;
    sqlite::ensure_schema(&pool).await?;

    let app = App::new(SqliteRepositories::new(pool));
    let mut session = app.session();

    let forest = session.locations.forest().await?;
    tracing::info!(
        locations = forest.len(),
        roots = forest.roots().len(),
        repairs = forest.repairs().len(),
        "Location hierarchy loaded"
    );

    println!("{}", serde_json::to_string_pretty(forest.roots())?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
