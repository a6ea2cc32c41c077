use crate::ConfigError;
use serde::Deserialize;

/// Lifetime of the account schema cache.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// A fresh cache for every decoded trace. Never serves a stale schema.
    #[default]
    Invocation,
    /// One block-indexed cache shared by every decode call of a pipeline.
    Shared,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Env: CHRONOS_CACHE_SCOPE
    /// Valid values: invocation, shared
    /// Default: invocation
    pub scope: CacheScope,

    /// Maximum number of accounts a shared cache retains. Ignored for
    /// `invocation` scope.
    ///
    /// Env: CHRONOS_CACHE_CAPACITY
    /// Default: 1024
    pub capacity: usize,
}

impl CacheConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scope == CacheScope::Shared && self.capacity == 0 {
            return Err(ConfigError::ValidateError(
                "Shared cache capacity cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            scope: CacheScope::default(),
            capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_config() {
        let config = CacheConfig::default();
        assert_eq!(config.scope, CacheScope::Invocation);
        assert_eq!(config.capacity, 1024);
    }

    #[test]
    fn test_zero_capacity_rejected_for_shared_scope() {
        let config = CacheConfig {
            scope: CacheScope::Shared,
            capacity: 0,
        };
        assert!(config.validate().is_err());

        let config = CacheConfig {
            scope: CacheScope::Invocation,
            capacity: 0,
        };
        assert!(config.validate().is_ok());
    }
}
