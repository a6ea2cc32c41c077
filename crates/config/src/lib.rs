mod args;
mod cache;
mod error;
mod log;
mod resolver;
mod schema;

pub use args::{Args, Command};
pub use cache::{CacheConfig, CacheScope};
pub use error::ConfigError;
pub use log::LogConfig;
pub use resolver::ResolverConfig;
pub use schema::SchemaConfig;

use serde::Deserialize;
use std::path::Path;

/// Flat view of every `CHRONOS_*` variable, as envy sees it.
#[derive(Debug, Default, Deserialize)]
struct EnvVars {
    log_level: Option<String>,
    log_json: Option<bool>,
    log_strip_ansi: Option<bool>,
    log_write: Option<bool>,
    log_write_path: Option<String>,
    log_write_max_file_size: Option<u64>,
    log_write_max_files: Option<usize>,
    cache_scope: Option<CacheScope>,
    cache_capacity: Option<usize>,
    resolver_max_concurrent: Option<usize>,
    base_schema_path: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    pub log: LogConfig,
    pub cache: CacheConfig,
    pub resolver: ResolverConfig,
    pub schema: SchemaConfig,
}

impl DecoderConfig {
    pub const ENV_PREFIX: &'static str = "CHRONOS_";

    pub fn from_env() -> Result<Self, ConfigError> {
        let vars = envy::prefixed(Self::ENV_PREFIX).from_env::<EnvVars>()?;
        Self::from_vars(vars)
    }

    /// Loads `path` into the process environment (existing variables win),
    /// then reads the configuration from it.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            dotenv::from_path(path).map_err(|source| ConfigError::EnvFile {
                path: path.display().to_string(),
                source,
            })?;
        }
        Self::from_env()
    }

    /// Reads the configuration from explicit `(name, value)` pairs instead of
    /// the process environment.
    pub fn from_pairs<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars = envy::prefixed(Self::ENV_PREFIX).from_iter::<_, EnvVars>(vars)?;
        Self::from_vars(vars)
    }

    fn from_vars(vars: EnvVars) -> Result<Self, ConfigError> {
        let log_defaults = LogConfig::default();
        let cache_defaults = CacheConfig::default();
        let resolver_defaults = ResolverConfig::default();

        let config = Self {
            log: LogConfig {
                level: vars.log_level.unwrap_or(log_defaults.level),
                json: vars.log_json.unwrap_or(log_defaults.json),
                strip_ansi: vars.log_strip_ansi.unwrap_or(log_defaults.strip_ansi),
                write: vars.log_write.unwrap_or(log_defaults.write),
                write_path: vars.log_write_path.unwrap_or(log_defaults.write_path),
                write_max_file_size: vars
                    .log_write_max_file_size
                    .unwrap_or(log_defaults.write_max_file_size),
                write_max_files: vars
                    .log_write_max_files
                    .unwrap_or(log_defaults.write_max_files),
            },
            cache: CacheConfig {
                scope: vars.cache_scope.unwrap_or(cache_defaults.scope),
                capacity: vars.cache_capacity.unwrap_or(cache_defaults.capacity),
            },
            resolver: ResolverConfig {
                max_concurrent: vars
                    .resolver_max_concurrent
                    .unwrap_or(resolver_defaults.max_concurrent),
            },
            schema: SchemaConfig {
                base_schema_path: vars.base_schema_path,
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.log.validate()?;
        self.cache.validate()?;
        self.resolver.validate()?;
        Ok(())
    }
}
