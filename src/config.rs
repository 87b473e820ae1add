//! Application configuration loaded from environment variables.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "file:data/internship.db";
    pub const DEV_DATA_DIR: &str = "data/uploads";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 10_485_760; // 10MB per uploaded file
    pub const ALLOWED_EXTENSIONS: &str = "png,jpg,jpeg,pdf";
    pub const PRINT_ROLL_START: u32 = 37;
    pub const PRINT_ROLL_END: u32 = 54;
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

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL (SQLite file, `file:path` format)
    pub database_url: String,
    /// Root directory for uploaded files (holds diaries/ and certificates/)
    pub data_dir: PathBuf,
    /// Allowed upload extensions, lowercase
    pub allowed_extensions: HashSet<String>,
    /// First roll number included in printable views (inclusive)
    pub print_roll_start: u32,
    /// Last roll number included in printable views (inclusive)
    pub print_roll_end: u32,
    /// Maximum size of a single uploaded file in bytes
    pub max_upload_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) all variables have
    /// defaults; only RUST_ENV is required. In production mode the server
    /// refuses to start with the development DATABASE_URL or data dir.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `REG_HOST`: Server host (default: 127.0.0.1)
    /// - `REG_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: SQLite URL, `file:path` (default: file:data/internship.db)
    /// - `REG_DATA_DIR`: Upload root directory (default: data/uploads)
    /// - `REG_ALLOWED_EXTENSIONS`: Comma-separated list (default: png,jpg,jpeg,pdf)
    /// - `REG_PRINT_ROLL_START`: First roll on printable rosters (default: 37)
    /// - `REG_PRINT_ROLL_END`: Last roll on printable rosters (default: 54)
    /// - `REG_MAX_UPLOAD_SIZE`: Max upload size in bytes (default: 10MB)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("REG_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("REG_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("REG_PORT must be a valid port number"))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string());

        let data_dir = PathBuf::from(
            env::var("REG_DATA_DIR").unwrap_or_else(|_| defaults::DEV_DATA_DIR.to_string()),
        );

        let allowed_extensions = parse_extension_list(
            &env::var("REG_ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| defaults::ALLOWED_EXTENSIONS.to_string()),
        )?;

        let print_roll_start = env::var("REG_PRINT_ROLL_START")
            .unwrap_or_else(|_| defaults::PRINT_ROLL_START.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("REG_PRINT_ROLL_START must be a number"))?;

        let print_roll_end = env::var("REG_PRINT_ROLL_END")
            .unwrap_or_else(|_| defaults::PRINT_ROLL_END.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("REG_PRINT_ROLL_END must be a number"))?;

        if print_roll_start > print_roll_end {
            return Err(ConfigError::InvalidValue(
                "REG_PRINT_ROLL_START must not exceed REG_PRINT_ROLL_END",
            ));
        }

        let max_upload_size = env::var("REG_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("REG_MAX_UPLOAD_SIZE must be a valid number"))?;

        let config = Config {
            environment,
            host,
            port,
            database_url,
            data_dir,
            allowed_extensions,
            print_roll_start,
            print_roll_end,
            max_upload_size,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production database path.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.data_dir == PathBuf::from(defaults::DEV_DATA_DIR) {
            errors.push(format!(
                "REG_DATA_DIR is using development default '{}'. Set a production upload directory.",
                defaults::DEV_DATA_DIR
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
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

    /// Roll strings included in the printable roster views, in ascending
    /// numeric order ("37".."54" with default configuration).
    pub fn print_rolls(&self) -> Vec<String> {
        (self.print_roll_start..=self.print_roll_end)
            .map(|n| n.to_string())
            .collect()
    }
}

/// Parse a comma-separated extension list into a lowercase set.
fn parse_extension_list(raw: &str) -> Result<HashSet<String>, ConfigError> {
    let set: HashSet<String> = raw
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    if set.is_empty() {
        return Err(ConfigError::InvalidValue(
            "REG_ALLOWED_EXTENSIONS must list at least one extension",
        ));
    }

    Ok(set)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
