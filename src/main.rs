use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkauth::config::Config;
use linkauth::db::{AppState, create_pool, migrations::run_migrations};
use linkauth::handlers;
use linkauth::licensing;
use linkauth::models::IssueLicense;

#[derive(Parser, Debug)]
#[command(name = "linkauth")]
#[command(about = "License key authentication service")]
struct Cli {
    /// Delete the database on exit (dev mode only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,

    /// Issue a key for this owner and exit instead of starting the server
    #[arg(long)]
    issue_owner: Option<String>,

    /// Validity of the issued key in days (omit for a key that never expires)
    #[arg(long, requires = "issue_owner")]
    issue_days: Option<i64>,

    /// Lock the issued key to the first HWID that uses it
    #[arg(long, requires = "issue_owner")]
    issue_hwid_locked: bool,
}

fn issue_from_cli(state: &AppState, cli: &Cli, owner: &str) -> Result<(), String> {
    let conn = state.db.get().map_err(|e| e.to_string())?;
    let license = licensing::issue(
        &conn,
        &IssueLicense {
            owner: owner.to_string(),
            duration_days: cli.issue_days,
            hwid_locked: cli.issue_hwid_locked,
            features: Vec::new(),
        },
    )
    .map_err(|e| e.to_string())?;

    println!("{}", license.key);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkauth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let db_pool = create_pool(&config.database_path, config.pool_size, config.busy_timeout)
        .expect("Failed to create database pool");

    // Back up if needed, then bring the schema up to date
    {
        let conn = db_pool.get().expect("Failed to get connection");
        let applied = run_migrations(
            &conn,
            &config.database_path,
            config.migration_backup_count,
        )
        .expect("Failed to migrate database");
        if applied > 0 {
            tracing::info!("Applied {} schema version(s)", applied);
        }
    }

    let state = AppState { db: db_pool };

    if let Some(owner) = cli.issue_owner.as_deref() {
        if let Err(e) = issue_from_cli(&state, &cli, owner) {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let app = handlers::app(state, config.rate_limit);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && config.dev_mode;
    if cli.ephemeral && !config.dev_mode {
        tracing::warn!("--ephemeral ignored: not in dev mode (set LINKAUTH_ENV=dev)");
    }
    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    }

    tracing::info!("LinkAuth server listening on {}", addr);

    // Connect info gives the rate limiter and ClientIp a peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    if cleanup_on_exit {
        let db_path = &config.database_path;
        if let Err(e) = std::fs::remove_file(db_path) {
            tracing::warn!("Failed to remove {}: {}", db_path, e);
        } else {
            tracing::info!("Removed {}", db_path);
        }
        let _ = std::fs::remove_file(format!("{}-wal", db_path));
        let _ = std::fs::remove_file(format!("{}-shm", db_path));
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
