use crate::ConfigError;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Schema resolutions allowed in flight at once for a single trace
    ///
    /// Env: CHRONOS_RESOLVER_MAX_CONCURRENT
    /// Default: 8
    pub max_concurrent: usize,
}

impl ResolverConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent == 0 {
            return Err(ConfigError::ValidateError(
                "Resolver concurrency cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_concurrent: 8 }
    }
}
