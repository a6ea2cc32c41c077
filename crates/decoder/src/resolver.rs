// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Point lookups of account schemas against the store.

use crate::schema::{SchemaError, SchemaModel};
use crate::store::{SchemaStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Schema lookup for {account} at block {block_num} failed: {source}")]
    Store {
        account: String,
        block_num: u32,
        #[source]
        source: StoreError,
    },
}

/// A parsed schema together with where it came from.
#[derive(Debug)]
pub struct AccountSchema {
    pub account: String,
    /// Block in which the account published this schema.
    pub published_at: u32,
    pub model: SchemaModel,
}

#[derive(Debug, Clone)]
pub enum Resolution {
    Found(Arc<AccountSchema>),
    /// The account published a schema at `published_at` that could not be
    /// parsed. Its actions stay undecoded, same as `NotFound`.
    Invalid { published_at: u32, reason: String },
    NotFound,
}

impl Resolution {
    pub fn schema(&self) -> Option<&Arc<AccountSchema>> {
        match self {
            Resolution::Found(schema) => Some(schema),
            _ => None,
        }
    }

    /// Publication block of the schema this resolution is based on, if any.
    pub fn published_at(&self) -> Option<u32> {
        match self {
            Resolution::Found(schema) => Some(schema.published_at),
            Resolution::Invalid { published_at, .. } => Some(*published_at),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

pub struct SchemaResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for SchemaResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SchemaStore> SchemaResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Most recent schema published by `account` at or before `block_num`.
    pub async fn resolve(&self, account: &str, block_num: u32) -> Result<Resolution, ResolveError> {
        let blob = self
            .store
            .account_schema(account, block_num)
            .await
            .map_err(|source| ResolveError::Store {
                account: account.to_string(),
                block_num,
                source,
            })?;

        let Some(blob) = blob else {
            tracing::debug!(account, block_num, "No schema published");
            return Ok(Resolution::NotFound);
        };

        match SchemaModel::from_blob(&blob.data) {
            Ok(model) => {
                tracing::debug!(
                    account,
                    block_num,
                    published_at = blob.block_num,
                    structs = model.structs().len(),
                    "Resolved account schema"
                );
                Ok(Resolution::Found(Arc::new(AccountSchema {
                    account: account.to_string(),
                    published_at: blob.block_num,
                    model,
                })))
            }
            Err(e) => Ok(invalid(account, blob.block_num, e)),
        }
    }
}

fn invalid(account: &str, published_at: u32, error: SchemaError) -> Resolution {
    tracing::warn!(
        account,
        published_at,
        error = %error,
        "Account schema could not be parsed"
    );
    Resolution::Invalid {
        published_at,
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const TOKEN_SCHEMA: &str = r#"{
        "version": "eosio::abi/1.1",
        "structs": [
            {"name": "transfer", "base": "", "fields": [
                {"name": "from", "type": "name"},
                {"name": "to", "type": "name"},
                {"name": "quantity", "type": "asset"},
                {"name": "memo", "type": "string"}
            ]}
        ],
        "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}]
    }"#;

    #[tokio::test]
    async fn test_resolve_found() {
        let store = Arc::new(MemoryStore::new());
        store.publish_schema("eosio.token", 5, TOKEN_SCHEMA);
        let resolver = SchemaResolver::new(store);

        let resolution = resolver.resolve("eosio.token", 10).await.unwrap();
        let schema = resolution.schema().unwrap();
        assert_eq!(schema.account, "eosio.token");
        assert_eq!(schema.published_at, 5);
        assert!(schema.model.get_struct("transfer").is_some());
    }

    #[tokio::test]
    async fn test_resolve_not_found_is_not_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.publish_schema("eosio.token", 5, TOKEN_SCHEMA);
        let resolver = SchemaResolver::new(store);

        assert!(matches!(
            resolver.resolve("eosio.token", 4).await.unwrap(),
            Resolution::NotFound
        ));
        assert!(matches!(
            resolver.resolve("newaccount", 4).await.unwrap(),
            Resolution::NotFound
        ));
    }

    #[tokio::test]
    async fn test_resolve_invalid_schema() {
        let store = Arc::new(MemoryStore::new());
        store.publish_schema("broken", 3, "{\"structs\": 12}");
        let resolver = SchemaResolver::new(store);

        let resolution = resolver.resolve("broken", 10).await.unwrap();
        assert!(matches!(resolution, Resolution::Invalid { published_at: 3, .. }));
        assert!(resolution.schema().is_none());
    }

    #[tokio::test]
    async fn test_resolve_store_failure() {
        let store = Arc::new(MemoryStore::new());
        store.fail_account("eosio");
        let resolver = SchemaResolver::new(store);

        let err = resolver.resolve("eosio", 1).await.unwrap_err();
        assert!(matches!(err, ResolveError::Store { block_num: 1, .. }));
    }
}
