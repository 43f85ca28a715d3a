/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables (after `dotenv` has populated them from `.env`) and the
 * optional PostgreSQL connection.
 *
 * # Variables
 *
 * | variable       | default                     | meaning                                 |
 * |----------------|-----------------------------|-----------------------------------------|
 * | `DATABASE_URL` | unset                       | PostgreSQL URL; unset uses memory store |
 * | `JWT_SECRET`   | development fallback        | HS256 signing secret                    |
 * | `SERVER_PORT`  | `5000`                      | listen port                             |
 * | `UPLOAD_DIR`   | `./uploads`                 | attachment root, served at `/uploads`   |
 * | `PUBLIC_URL`   | `http://localhost:<port>`   | base of attachment URLs                 |
 * | `CLIENT_URL`   | unset (any origin)          | allowed CORS origin                     |
 *
 * # Error Handling
 *
 * Database errors are logged but do not prevent server startup. If the
 * database cannot be reached the server continues on the in-memory store.
 */

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::store::{MemoryStore, PgStore, Store};
use crate::shared::ConfigError;

const DEV_JWT_SECRET: &str = "taskcollab-dev-secret-change-me";

/// Settings read from the environment at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub public_url: String,
    pub client_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            port: 5000,
            upload_dir: PathBuf::from("./uploads"),
            public_url: "http://localhost:5000".to_string(),
            client_url: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => 5000,
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set. Using an insecure development secret.");
            DEV_JWT_SECRET.to_string()
        });

        let public_url = get("PUBLIC_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();
        if !(public_url.starts_with("http://") || public_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(public_url));
        }

        Ok(Self {
            database_url: get("DATABASE_URL"),
            jwt_secret,
            port,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            public_url,
            client_url: get("CLIENT_URL"),
        })
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if `database_url` is `None` or the connection fails
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Data will be kept in memory only.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory store.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Pick the store implementation for this configuration
pub async fn load_store(config: &ServerConfig) -> Arc<dyn Store> {
    match load_database(config.database_url.as_deref()).await {
        Some(pool) => Arc::new(PgStore::new(pool)),
        None => Arc::new(MemoryStore::new()),
    }
}
