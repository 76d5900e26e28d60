//! Paginator configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default label for log events.
pub const DEFAULT_NAME: &str = "paginate";

/// Default primary key field.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Configuration fixed once per collection.
///
/// Loadable from TOML; every key is optional:
///
/// ```
/// use keyset_page::PaginatorConfig;
///
/// let config = PaginatorConfig::from_toml_str(
///     r#"
///     name = "posts"
///     primary_key_field = "post_id"
///     max_limit = 100
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.primary_key_field, "post_id");
/// assert_eq!(config.max_limit, Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct PaginatorConfig {
    /// Label attached to log events for this collection.
    pub name: String,
    /// Unique key used as the default pagination field and as tie-break.
    pub primary_key_field: String,
    /// Upper bound on a request's `limit`. `None` is unbounded.
    pub max_limit: Option<usize>,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            primary_key_field: DEFAULT_PRIMARY_KEY.to_string(),
            max_limit: None,
        }
    }
}

impl PaginatorConfig {
    /// Set the log label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the primary key field.
    #[must_use]
    pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key_field = field.into();
        self
    }

    /// Set the maximum page size.
    #[must_use]
    pub fn with_max_limit(mut self, max: usize) -> Self {
        self.max_limit = Some(max);
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_key_field.is_empty() {
            return Err(ConfigError::InvalidPrimaryKey);
        }
        if self.max_limit == Some(0) {
            return Err(ConfigError::InvalidMaxLimit);
        }
        Ok(())
    }
}

/// Invalid paginator configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The primary key field name was empty.
    #[error("primary key field name must not be empty")]
    InvalidPrimaryKey,
    /// `max_limit` was zero.
    #[error("max_limit must be a positive integer")]
    InvalidMaxLimit,
    /// The TOML document could not be parsed.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PaginatorConfig::default();
        assert_eq!(config.name, "paginate");
        assert_eq!(config.primary_key_field, "id");
        assert_eq!(config.max_limit, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PaginatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, PaginatorConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PaginatorConfig::from_toml_str("method_name = \"list\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            PaginatorConfig::from_toml_str("primary_key_field = \"\""),
            Err(ConfigError::InvalidPrimaryKey)
        ));
        assert!(matches!(
            PaginatorConfig::from_toml_str("max_limit = 0"),
            Err(ConfigError::InvalidMaxLimit)
        ));
    }

    #[test]
    fn test_builder() {
        let config = PaginatorConfig::default()
            .with_name("users")
            .with_primary_key("user_id")
            .with_max_limit(50);
        assert_eq!(config.name, "users");
        assert_eq!(config.primary_key_field, "user_id");
        assert_eq!(config.max_limit, Some(50));
    }
}
