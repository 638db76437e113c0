//! Application configuration loaded from environment variables.

use std::env;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "sqlite://reporthub.db?mode=rwc";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 10_485_760; // 10MB per report
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_DB_MIN_CONNECTIONS: u32 = 1;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SeaORM connection URL (`sqlite://...` or `postgres://...`)
    pub url: String,
    /// Upper bound of the connection pool
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Settings for a single-connection database at `url`.
    ///
    /// In-memory SQLite databases are per connection, so tests must not pool them.
    pub fn single(url: impl Into<String>) -> Self {
        DatabaseConfig {
            url: url.into(),
            max_connections: 1,
            min_connections: 1,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Maximum report upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
    /// Extra origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default
    /// and only RUST_ENV is required. In production mode the database URL must
    /// be set explicitly.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `RHUB_HOST`: Server host (default: 127.0.0.1)
    /// - `RHUB_PORT`: Server port (default: 8080)
    /// - `RHUB_DATABASE_URL`: SeaORM connection URL (default: local SQLite file)
    /// - `RHUB_DB_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `RHUB_DB_MIN_CONNECTIONS`: Idle connections (default: 1)
    /// - `RHUB_MAX_UPLOAD_SIZE`: Max report size in bytes (default: 10MB)
    /// - `RHUB_CORS_ORIGINS`: Comma-separated extra allowed origins
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("RHUB_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("RHUB_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("RHUB_PORT must be a valid port number"))?;

        let url = env::var("RHUB_DATABASE_URL")
            .unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string());

        let max_connections = env::var("RHUB_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| defaults::DEV_DB_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("RHUB_DB_MAX_CONNECTIONS must be a valid number")
            })?;

        let min_connections = env::var("RHUB_DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| defaults::DEV_DB_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("RHUB_DB_MIN_CONNECTIONS must be a valid number")
            })?;

        let max_upload_size = env::var("RHUB_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("RHUB_MAX_UPLOAD_SIZE must be a valid number"))?;

        let cors_origins = env::var("RHUB_CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let config = Config {
            environment,
            host,
            port,
            database: DatabaseConfig {
                url,
                max_connections,
                min_connections,
            },
            max_upload_size,
            cors_origins,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges, and in production that development defaults are not used.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.max_connections == 0 {
            errors.push("RHUB_DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.database.min_connections > self.database.max_connections {
            errors.push(
                "RHUB_DB_MIN_CONNECTIONS must not exceed RHUB_DB_MAX_CONNECTIONS".to_string(),
            );
        }

        if self.max_upload_size == 0 {
            errors.push("RHUB_MAX_UPLOAD_SIZE must be greater than zero".to_string());
        }

        if self.environment.is_production() && self.database.url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "RHUB_DATABASE_URL is using development default '{}'. Set a production database URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}
