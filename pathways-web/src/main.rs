//! pathways-web - Career pathways canvas service
//!
//! Serves the JSON API behind the canvas UI: Google login, pathway selection,
//! per-user checklist progress and admin catalog editing.
//!
//! Settings resolve as CLI/ENV (`PATHWAYS_*`) > TOML file > defaults.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pathways_common::config::{ConfigOverrides, ServiceConfig, TomlConfig, DEFAULT_LOG_LEVEL};
use pathways_common::db::seed::seed_if_empty;
use pathways_common::db::{init_database, SqliteCatalog};
use pathways_common::AdminsFile;
use pathways_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for pathways-web
#[derive(Parser, Debug)]
#[command(name = "pathways-web")]
#[command(about = "Career pathways canvas web service")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/pathways-canvas/config.toml)
    #[arg(short, long, env = "PATHWAYS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the HTTP listener on
    #[arg(long, env = "PATHWAYS_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PATHWAYS_PORT")]
    port: Option<u16>,

    /// Folder holding the database and admins file
    #[arg(long, env = "PATHWAYS_DATA_FOLDER")]
    data_folder: Option<PathBuf>,

    #[arg(long, env = "PATHWAYS_DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Admin allow-list, one email per line
    #[arg(long, env = "PATHWAYS_ADMINS_FILE")]
    admins_file: Option<PathBuf>,

    #[arg(long, env = "PATHWAYS_SESSION_TTL_HOURS")]
    session_ttl_hours: Option<i64>,

    /// Mark cookies Secure (serve behind HTTPS)
    #[arg(long, env = "PATHWAYS_SECURE_COOKIES")]
    secure_cookies: Option<bool>,

    /// Insert the default catalog when it is empty
    #[arg(long, env = "PATHWAYS_SEED_DEFAULTS")]
    seed_defaults: Option<bool>,

    /// Log filter, e.g. `info` or `pathways_web=debug` (RUST_LOG wins when set)
    #[arg(long, env = "PATHWAYS_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long, env = "PATHWAYS_GOOGLE_CLIENT_ID")]
    google_client_id: Option<String>,

    #[arg(long, env = "PATHWAYS_GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    google_client_secret: Option<String>,

    /// Public URL of `/auth/google/callback`
    #[arg(long, env = "PATHWAYS_GOOGLE_CALLBACK_URL")]
    google_callback_url: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind_address.clone(),
            port: self.port,
            data_folder: self.data_folder.clone(),
            database_path: self.database_path.clone(),
            admins_file: self.admins_file.clone(),
            session_ttl_hours: self.session_ttl_hours,
            secure_cookies: self.secure_cookies,
            seed_defaults: self.seed_defaults,
            log_level: self.log_level.clone(),
            google_client_id: self.google_client_id.clone(),
            google_client_secret: self.google_client_secret.clone(),
            google_callback_url: self.google_callback_url.clone(),
        }
    }
}

/// RUST_LOG if set, else `level`
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Start on the CLI/ENV level; the TOML level is applied once the file is read
    let initial_level = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    let (filter, filter_handle) = reload::Layer::new(log_filter(initial_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any database delay
    info!(
        "Starting Pathways Canvas (pathways-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let file = TomlConfig::load_or_default(args.config.as_deref())?;
    let config = ServiceConfig::resolve(&args.overrides(), &file)?;
    if config.log_level != initial_level {
        if let Err(e) = filter_handle.reload(log_filter(&config.log_level)) {
            warn!("Failed to apply log level '{}': {}", config.log_level, e);
        }
    }

    info!("Data folder: {}", config.data_folder.display());
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open database")?;
    info!("✓ Database ready");

    if config.seed_defaults {
        let inserted = seed_if_empty(&SqliteCatalog::new(pool.clone()))
            .await
            .context("Failed to seed default catalog")?;
        if inserted > 0 {
            info!("✓ Seeded {} default pathways", inserted);
        }
    }

    if !config.admins_file.exists() {
        warn!(
            "Admins file {} not found; no account has admin access until it is created",
            config.admins_file.display()
        );
    }
    let admins = Arc::new(AdminsFile::new(config.admins_file.clone()));

    let mut state = AppState::new(pool, admins)
        .with_session_ttl_hours(config.session_ttl_hours)
        .with_secure_cookies(config.secure_cookies);
    match config.google.clone() {
        Some(google) => {
            info!("Google login enabled (callback {})", google.callback_url);
            state = state.with_google(google);
        }
        None => warn!("Google login not configured; /auth/google answers 503"),
    }

    match state.sessions.purge_expired().await {
        Ok(0) => {}
        Ok(n) => info!("Removed {} expired sessions", n),
        Err(e) => warn!("Could not purge expired sessions: {}", e),
    }

    let app = build_router(state);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("pathways-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
