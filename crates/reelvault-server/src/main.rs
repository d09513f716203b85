use std::{env, sync::Arc};

use reelvault_db_postgres::{
    PostgresMovieRepository, PostgresRatingRepository, create_pool, migrations,
};
use reelvault_server::cache::MovieCache;
use reelvault_server::config::loader::load_config;
use reelvault_server::state::AppState;
use reelvault_server::{ServerBuilder, observability};
use reelvault_auth::{AuthState, JwtService};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From REELVAULT_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (reelvault.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (REELVAULT_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    observability::init_tracing();

    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    observability::apply_logging_level(&cfg.logging.level);

    // Database pool and schema
    let pool = match create_pool(&cfg.storage.postgres).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Database connection failed: {e}");
            std::process::exit(2);
        }
    };

    if cfg.storage.postgres.run_migrations {
        if let Err(e) = migrations::run(&pool).await {
            eprintln!("Database migration failed: {e}");
            std::process::exit(2);
        }
    }

    let movies = Arc::new(PostgresMovieRepository::new(pool.clone()));
    let ratings = Arc::new(PostgresRatingRepository::new(pool));

    // Auth
    let jwt = JwtService::new(&cfg.auth.jwt_secret, &cfg.auth.issuer, &cfg.auth.audience);
    let mut auth = AuthState::new(Arc::new(jwt), cfg.auth.service_user_id);
    if let Some(api_key) = &cfg.auth.api_key {
        auth = auth.with_api_key(api_key);
    }

    let cache = Arc::new(MovieCache::new(cfg.cache_ttl(), cfg.cache.enabled));

    let state = AppState::new(movies, ratings, cache, auth);

    let server = ServerBuilder::new(state).with_config(cfg).build();
    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: REELVAULT_CONFIG
/// 3. Default: reelvault.toml
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    if let Ok(path) = env::var("REELVAULT_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    ("reelvault.toml".to_string(), ConfigSource::Default)
}
