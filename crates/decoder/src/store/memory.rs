// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-process store, mainly for tests and fixtures.

use super::{SchemaBlob, SchemaStore, StoreError, TraceStore};
use crate::types::{RawTrace, TraceKey};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MemoryStore {
    traces: RwLock<HashMap<TraceKey, RawTrace>>,
    /// account -> publication block -> schema bytes
    schemas: RwLock<HashMap<String, BTreeMap<u32, Vec<u8>>>>,
    failing_accounts: RwLock<HashSet<String>>,
    schema_lookups: AtomicUsize,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every schema lookup, so concurrent callers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert_trace(&self, key: TraceKey, trace: RawTrace) {
        if let Ok(mut traces) = self.traces.write() {
            traces.insert(key, trace);
        }
    }

    pub fn publish_schema(&self, account: &str, block_num: u32, data: impl Into<Vec<u8>>) {
        if let Ok(mut schemas) = self.schemas.write() {
            schemas
                .entry(account.to_string())
                .or_default()
                .insert(block_num, data.into());
        }
    }

    /// Makes schema lookups for `account` fail with a backend error.
    pub fn fail_account(&self, account: &str) {
        if let Ok(mut failing) = self.failing_accounts.write() {
            failing.insert(account.to_string());
        }
    }

    /// Number of schema lookups served so far.
    pub fn schema_lookups(&self) -> usize {
        self.schema_lookups.load(Ordering::SeqCst)
    }

    fn lookup_schema(
        &self,
        account: &str,
        block_num: u32,
    ) -> Result<Option<SchemaBlob>, StoreError> {
        let failing = self
            .failing_accounts
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .contains(account);
        if failing {
            return Err(StoreError::Backend(format!(
                "schema lookup for {} failed",
                account
            )));
        }

        let schemas = self
            .schemas
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(schemas.get(account).and_then(|history| {
            history
                .range(..=block_num)
                .next_back()
                .map(|(published, data)| SchemaBlob {
                    block_num: *published,
                    data: data.clone(),
                })
        }))
    }
}

impl SchemaStore for MemoryStore {
    async fn account_schema(
        &self,
        account: &str,
        block_num: u32,
    ) -> Result<Option<SchemaBlob>, StoreError> {
        self.schema_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.lookup_schema(account, block_num)
    }
}

impl TraceStore for MemoryStore {
    async fn raw_trace(&self, key: &TraceKey) -> Result<RawTrace, StoreError> {
        let traces = self
            .traces
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        traces
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::TraceNotFound(key.clone()))
    }
}
