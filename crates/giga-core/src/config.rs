//! Configuration management for the Giga Token platform
//!
//! Values come from an optional `config.{toml,json,yaml}` file and from
//! `GIGA_`-prefixed environment variables, where a double underscore
//! separates nesting levels (`GIGA_SERVER__PORT`,
//! `GIGA_PAGINATION__MAX_PAGE_SIZE`). Anything left unset keeps its default.

use crate::pager::DEFAULT_ITEMS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Pagination defaults for listing endpoints
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size used when a request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_page_size() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

const fn default_max_page_size() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from `config.*` in the working directory and the
    /// environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or fails
    /// validation.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Path::new("config"), false)
    }

    /// Load configuration from a specific file plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a value cannot be
    /// parsed, or the result fails validation.
    pub fn load_from(path: &Path, required: bool) -> crate::Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix("GIGA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        tracing::debug!(
            source = %path.display(),
            port = config.server.port,
            default_page_size = config.pagination.default_page_size,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Check the values for internal consistency
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] naming the first bad value.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::Configuration {
                message: "server.port must be non-zero".to_string(),
            });
        }
        if self.pagination.default_page_size == 0 {
            return Err(crate::Error::Configuration {
                message: "pagination.default_page_size must be at least 1".to_string(),
            });
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(crate::Error::Configuration {
                message: format!(
                    "pagination.default_page_size ({}) exceeds pagination.max_page_size ({})",
                    self.pagination.default_page_size, self.pagination.max_page_size
                ),
            });
        }
        Ok(())
    }
}
