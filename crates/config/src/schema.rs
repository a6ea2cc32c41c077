#[derive(Debug, Clone, Default)]
pub struct SchemaConfig {
    /// Path to a base schema document replacing the embedded state-history
    /// schema
    ///
    /// Env: CHRONOS_BASE_SCHEMA_PATH
    /// Default: unset
    pub base_schema_path: Option<String>,
}
