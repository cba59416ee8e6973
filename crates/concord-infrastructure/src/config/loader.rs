//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::{AppConfig, DatabaseConfig, LockConfig, LoggingConfig, TransactionConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use concord_application::ports::registry::{list_databases, list_lock_stores};
use concord_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `CONCORD_LOCK__PROVIDER`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Double underscore separates nested keys (e.g., CONCORD_DATABASE__URL)
        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Reload configuration from the same sources
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .io_context(format!("Failed to create config directory {}", parent.display()))?;
        }

        std::fs::write(path.as_ref(), toml_string).with_context(|| {
            format!("Failed to write config file {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Field-level bounds (non-zero intervals, TTL and transaction timeout, pool
/// size) come from the `validator` derives; the cross-field rules and
/// provider names are checked here.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| Error::config_with_source(format!("Invalid configuration: {e}"), e))?;

    validate_logging_config(&config.logging)?;
    validate_lock_config(&config.lock)?;
    validate_database_config(&config.database)?;
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

fn validate_lock_config(config: &LockConfig) -> Result<()> {
    if config.renewal_interval() >= config.default_ttl() {
        return Err(Error::config(format!(
            "Lock renewal interval ({}ms) must be shorter than the default TTL ({}s)",
            config.renewal_interval_ms, config.default_ttl_secs
        )));
    }

    let available: Vec<&str> = list_lock_stores().into_iter().map(|(name, _)| name).collect();
    if !available.contains(&config.provider.as_str()) {
        return Err(Error::config(format!(
            "Unknown lock store provider '{}'. Available providers: {available:?}",
            config.provider
        )));
    }
    Ok(())
}

fn validate_database_config(config: &DatabaseConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }
    if config.url.trim().is_empty() {
        return Err(Error::config(
            "Database URL cannot be empty when the database is enabled",
        ));
    }
    if config.min_idle > config.max_connections {
        return Err(Error::config(format!(
            "Database min_idle ({}) cannot exceed max_connections ({})",
            config.min_idle, config.max_connections
        )));
    }

    let available: Vec<&str> = list_databases().into_iter().map(|(name, _)| name).collect();
    if !available.contains(&config.provider.as_str()) {
        return Err(Error::config(format!(
            "Unknown database provider '{}'. Available providers: {available:?}",
            config.provider
        )));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set lease lock configuration
    pub fn with_lock(mut self, lock: LockConfig) -> Self {
        self.config.lock = lock;
        self
    }

    /// Select the lock store provider and its URI
    pub fn with_lock_provider<S: Into<String>>(mut self, provider: S, url: Option<String>) -> Self {
        self.config.lock.provider = provider.into();
        self.config.lock.url = url;
        self
    }

    /// Set database configuration
    pub fn with_database(mut self, database: DatabaseConfig) -> Self {
        self.config.database = database;
        self
    }

    /// Set transaction configuration
    pub fn with_transaction(mut self, transaction: TransactionConfig) -> Self {
        self.config.transaction = transaction;
        self
    }

    /// Build the configuration without validating it
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Build the configuration, applying the loader's validation
    pub fn build_validated(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
