// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Turns raw trace bytes into a fully decoded trace.
//!
//! The outer trace is decoded against the base schema first. Every account
//! referenced by an action is then resolved once, concurrently, and after all
//! resolutions have settled each action payload is decoded against its
//! account's schema. Payloads that cannot be decoded keep their raw bytes.

use crate::cache::SchemaCache;
use crate::codec::{BinaryCursor, BinaryDecoder, DecodeError, VariantRegistry};
use crate::resolver::{AccountSchema, ResolveError, Resolution, SchemaResolver};
use crate::schema::SchemaModel;
use crate::store::{SchemaStore, StoreError, TraceStore};
use crate::types::trace::{collect_actions, for_each_action_mut};
use crate::types::{ActionRef, DecodedTraceResult, DecodedValue, RawTrace, TraceKey};
use crate::utils::join_with_concurrency;
use config::{CacheConfig, CacheScope, DecoderConfig, ResolverConfig};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Type of the outer trace in the base schema.
pub const TRANSACTION_TRACE_TYPE: &str = "transaction_trace";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid transaction trace: {0}")]
    Trace(#[from] DecodeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub cache_scope: CacheScope,
    /// Accounts retained by a shared cache.
    pub cache_capacity: usize,
    /// Schema resolutions in flight at once for one trace.
    pub max_concurrent: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let cache = CacheConfig::default();
        Self {
            cache_scope: cache.scope,
            cache_capacity: cache.capacity,
            max_concurrent: ResolverConfig::default().max_concurrent,
        }
    }
}

impl From<&DecoderConfig> for PipelineOptions {
    fn from(config: &DecoderConfig) -> Self {
        Self {
            cache_scope: config.cache.scope,
            cache_capacity: config.cache.capacity,
            max_concurrent: config.resolver.max_concurrent,
        }
    }
}

/// Counters for one decoded trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Distinct accounts referenced by the trace's actions.
    pub accounts: usize,
    /// Accounts that resolved to a usable schema.
    pub accounts_resolved: usize,
    pub actions_attempted: usize,
    pub actions_decoded: usize,
}

pub struct TraceDecodePipeline<S> {
    base: Arc<SchemaModel>,
    variants: Arc<VariantRegistry>,
    resolver: SchemaResolver<S>,
    /// Cache kept across calls. `None` gives every call its own cache.
    shared_cache: Option<Arc<SchemaCache<S>>>,
    max_concurrent: usize,
}

impl<S: SchemaStore> TraceDecodePipeline<S> {
    pub fn new(store: Arc<S>, base: SchemaModel, options: PipelineOptions) -> Self {
        let resolver = SchemaResolver::new(store);
        let shared_cache = match options.cache_scope {
            CacheScope::Invocation => None,
            CacheScope::Shared => Some(Arc::new(SchemaCache::bounded(
                resolver.clone(),
                options.cache_capacity,
            ))),
        };

        Self {
            base: Arc::new(base),
            variants: Arc::new(VariantRegistry::state_history()),
            resolver,
            shared_cache,
            max_concurrent: options.max_concurrent,
        }
    }

    /// Replaces the variant registry used for traces and payloads.
    pub fn with_variants(mut self, variants: VariantRegistry) -> Self {
        self.variants = Arc::new(variants);
        self
    }

    pub fn base_schema(&self) -> &SchemaModel {
        &self.base
    }

    pub fn shared_cache(&self) -> Option<&Arc<SchemaCache<S>>> {
        self.shared_cache.as_ref()
    }

    pub async fn decode_trace(&self, raw: &RawTrace) -> Result<DecodedTraceResult, PipelineError> {
        self.decode_trace_with_summary(raw)
            .await
            .map(|(result, _)| result)
    }

    pub async fn decode_trace_with_summary(
        &self,
        raw: &RawTrace,
    ) -> Result<(DecodedTraceResult, DecodeSummary), PipelineError> {
        let decoder = BinaryDecoder::new(&self.base, &self.variants);
        let mut trace =
            decoder.decode_exact(TRANSACTION_TRACE_TYPE, &mut BinaryCursor::new(&raw.data))?;

        let accounts: BTreeSet<String> = collect_actions(&trace)
            .into_iter()
            .map(|action| action.account)
            .collect();

        let invocation_cache;
        let cache = match &self.shared_cache {
            Some(cache) => cache.as_ref(),
            None => {
                invocation_cache = SchemaCache::new(self.resolver.clone());
                &invocation_cache
            }
        };
        let schemas = self.resolve_accounts(cache, &accounts, raw.block_num).await?;

        let mut summary = DecodeSummary {
            accounts: accounts.len(),
            accounts_resolved: schemas.len(),
            ..Default::default()
        };
        for_each_action_mut(&mut trace, &mut |act: &mut DecodedValue| {
            let Some(action) = ActionRef::from_action(act) else {
                return;
            };
            summary.actions_attempted += 1;
            let Some(schema) = schemas.get(&action.account) else {
                return;
            };
            match decode_action(schema, &self.variants, &action) {
                Ok(payload) => {
                    if let Some(data) = act.field_mut("data") {
                        *data = payload;
                        summary.actions_decoded += 1;
                    }
                }
                Err(e) => tracing::warn!(
                    account = %action.account,
                    action = %action.action_name,
                    error = %e,
                    "Leaving action payload undecoded"
                ),
            }
        });

        tracing::debug!(
            block_num = raw.block_num,
            accounts = summary.accounts,
            accounts_resolved = summary.accounts_resolved,
            actions = summary.actions_attempted,
            decoded = summary.actions_decoded,
            "Decoded trace"
        );

        Ok((
            DecodedTraceResult {
                block_num: raw.block_num,
                block_time: raw.block_time,
                trace,
            },
            summary,
        ))
    }

    /// Resolves every account, waiting for all resolutions before returning.
    /// Only accounts with a usable schema are present in the result.
    async fn resolve_accounts(
        &self,
        cache: &SchemaCache<S>,
        accounts: &BTreeSet<String>,
        block_num: u32,
    ) -> Result<HashMap<String, Arc<AccountSchema>>, PipelineError> {
        tracing::debug!(
            accounts = accounts.len(),
            block_num,
            "Resolving account schemas"
        );

        let results = join_with_concurrency(
            self.max_concurrent,
            accounts.iter().map(|account| async move {
                (account, cache.get_or_resolve(account, block_num).await)
            }),
        )
        .await;

        let mut schemas = HashMap::new();
        let mut first_error = None;
        for (account, result) in results {
            match result {
                Ok(Resolution::Found(schema)) => {
                    schemas.insert(account.clone(), schema);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(account = %account, error = %e, "Schema resolution failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(schemas),
        }
    }
}

impl<S: SchemaStore + TraceStore> TraceDecodePipeline<S> {
    /// Loads a trace from the store and decodes it.
    pub async fn fetch_and_decode(
        &self,
        key: &TraceKey,
    ) -> Result<DecodedTraceResult, PipelineError> {
        let raw = self.resolver.store().raw_trace(key).await?;
        self.decode_trace(&raw).await
    }
}

fn decode_action(
    schema: &AccountSchema,
    variants: &VariantRegistry,
    action: &ActionRef,
) -> Result<DecodedValue, DecodeError> {
    let type_name = schema.model.action_type(&action.action_name);
    BinaryDecoder::new(&schema.model, variants)
        .decode_exact(type_name, &mut BinaryCursor::new(&action.raw_data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = DecoderConfig {
            cache: CacheConfig {
                scope: CacheScope::Shared,
                capacity: 16,
            },
            resolver: ResolverConfig { max_concurrent: 2 },
            ..Default::default()
        };

        let options = PipelineOptions::from(&config);
        assert_eq!(options.cache_scope, CacheScope::Shared);
        assert_eq!(options.cache_capacity, 16);
        assert_eq!(options.max_concurrent, 2);
    }

    #[test]
    fn test_default_options_use_invocation_cache() {
        let options = PipelineOptions::default();
        assert_eq!(options.cache_scope, CacheScope::Invocation);
        assert_eq!(options.cache_capacity, 1024);
        assert_eq!(options.max_concurrent, 8);
    }

    #[test]
    fn test_cache_scope_selects_shared_cache() {
        let store = Arc::new(crate::store::MemoryStore::new());
        let base = crate::schema::state_history_schema().unwrap();

        let pipeline =
            TraceDecodePipeline::new(store.clone(), base.clone(), PipelineOptions::default());
        assert!(pipeline.shared_cache().is_none());

        let shared = PipelineOptions {
            cache_scope: CacheScope::Shared,
            ..Default::default()
        };
        let pipeline = TraceDecodePipeline::new(store, base, shared);
        assert!(pipeline.shared_cache().is_some());
    }
}
