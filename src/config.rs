use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 5000;
const CONFIG_DIR: &str = "config";
const DEV_DEFAULT_JWT_SECRET: &str =
    "development_only_secret_key_never_use_outside_local_testing_environments";

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// JWT signing secret (minimum 32 characters).
    #[validate(length(min = 32))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds.
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,

    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment ("development" or "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging).
    #[serde(default)]
    pub log_json: bool,

    /// CORS: comma-separated list of allowed origins; empty means permissive
    /// (development only).
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Seed a default admin account and starter catalog when the store is
    /// empty at startup.
    #[serde(default = "default_true")]
    pub seed_on_start: bool,

    /// Initial admin password used by the seeder.
    #[serde(default = "default_admin_password")]
    pub seed_admin_password: String,
}

fn default_jwt_expiration() -> u64 {
    86_400
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_true() -> bool {
    true
}
fn default_admin_password() -> String {
    "admin123".to_string()
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Loads configuration from `config/{default,ENV}.toml` plus `APP__`-prefixed
/// environment variables.
///
/// The JWT secret has no production default; outside development it must be
/// provided explicitly.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("environment", run_env.clone())?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let mut config = config;
    if config.get_string("jwt_secret").is_err() {
        if run_env == DEFAULT_ENV {
            info!("jwt_secret not configured; using the development default");
            config = Config::builder()
                .add_source(config)
                .set_override("jwt_secret", DEV_DEFAULT_JWT_SECRET)?
                .build()?;
        } else {
            return Err(ConfigError::NotFound("jwt_secret".to_string()).into());
        }
    }

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

/// Initializes the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("cafepos_api={},tower_http=info", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    let filter = EnvFilter::new(filter_directive);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
