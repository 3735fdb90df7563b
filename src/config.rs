use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::formats::DateOrder;
use crate::utils::{get_env_with_prefix, parse_env};

/// Settings shared by every schema a [`TypeBuilder`](crate::TypeBuilder) makes
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TypesConfig {
    /// How `a/b/YYYY` dates are read
    #[serde(default)]
    pub date_order: DateOrder,
    /// Upper bound on ObjectString payloads, checked before JSON parsing
    #[serde(default)]
    pub max_object_string_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

impl TypesConfig {
    /// Defaults overridden by `TIDEWAY_`-prefixed environment variables
    pub fn from_env() -> Self {
        TypesConfigBuilder::new().from_env().config
    }
}

/// Builder for [`TypesConfig`] with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct TypesConfigBuilder {
    config: TypesConfig,
}

impl TypesConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TypesConfig::default(),
        }
    }

    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.config.date_order = order;
        self
    }

    pub fn with_max_object_string_bytes(mut self, max: usize) -> Self {
        self.config.max_object_string_bytes = Some(max);
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load settings from environment variables with the TIDEWAY_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(order) = parse_env("TYPES_DATE_ORDER") {
            self.config.date_order = order;
        }
        if let Some(max) = parse_env("TYPES_OBJECT_STRING_MAX_BYTES") {
            self.config.max_object_string_bytes = Some(max);
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidOption`] for an unknown log level or a
    /// zero ObjectString size limit.
    pub fn build(self) -> crate::Result<TypesConfig> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(TypesError::invalid_option(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        if self.config.max_object_string_bytes == Some(0) {
            return Err(TypesError::invalid_option(
                "ObjectString size limit must be greater than 0",
            ));
        }

        Ok(self.config)
    }
}

impl Default for TypesConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
