use crate::auth::jwt::JwtConfig;

/// Which storage engine backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// In-process memory, optionally seeded from a JSON file. Not persisted.
    Memory,
}

impl BackendKind {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Storage engine (default: PostgreSQL).
    pub backend: BackendKind,
    /// JSON file of hospital ward records loaded into the memory backend.
    pub seed_file: Option<String>,
    /// Interval of the orphaned-favorite cleanup job; `0` disables it.
    pub favorite_cleanup_interval_secs: u64,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `HOST`                           | `0.0.0.0`               |
    /// | `PORT`                           | `3000`                  |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                    |
    /// | `BEDWATCH_BACKEND`               | `postgres`              |
    /// | `BEDWATCH_SEED_FILE`             | unset                   |
    /// | `FAVORITE_CLEANUP_INTERVAL_SECS` | `3600`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend = std::env::var("BEDWATCH_BACKEND")
            .map(|v| {
                BackendKind::from_env_value(&v)
                    .unwrap_or_else(|| panic!("BEDWATCH_BACKEND must be 'postgres' or 'memory', got '{v}'"))
            })
            .unwrap_or(BackendKind::Postgres);

        let seed_file = std::env::var("BEDWATCH_SEED_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let favorite_cleanup_interval_secs: u64 = std::env::var("FAVORITE_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("FAVORITE_CLEANUP_INTERVAL_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend,
            seed_file,
            favorite_cleanup_interval_secs,
            jwt,
        }
    }
}
