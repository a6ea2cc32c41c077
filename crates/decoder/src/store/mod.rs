// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interfaces to the trace store.
//!
//! The store itself (its query language, connection handling and retries)
//! lives outside this crate; the decoder only needs the two lookups below.

pub mod directory;
pub mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use crate::types::{RawTrace, TraceKey};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Trace not found: {0}")]
    TraceNotFound(TraceKey),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A schema document as stored, with the block it was published in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBlob {
    pub block_num: u32,
    pub data: Vec<u8>,
}

pub trait SchemaStore: Send + Sync + 'static {
    /// The most recent schema `account` published at or before `block_num`,
    /// or `None` when there is none.
    fn account_schema(
        &self,
        account: &str,
        block_num: u32,
    ) -> impl Future<Output = Result<Option<SchemaBlob>, StoreError>> + Send;
}

pub trait TraceStore: Send + Sync + 'static {
    fn raw_trace(
        &self,
        key: &TraceKey,
    ) -> impl Future<Output = Result<RawTrace, StoreError>> + Send;
}
