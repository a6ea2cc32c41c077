// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Schema documents and the in-memory [`SchemaModel`] the decoder runs on.

pub mod document;
pub mod model;

pub use document::{ActionDef, FieldDef, SchemaDocument, StructDef, TableDef, TypeDef, VariantDef};
pub use model::{SchemaModel, TypeShape};

use crate::codec::DecodeError;
use thiserror::Error;

/// The state-history schema describing `transaction_trace`.
pub const STATE_HISTORY_SCHEMA: &str = include_str!("state_history_abi.json");

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid binary schema: {0}")]
    Binary(#[from] DecodeError),

    #[error("Type '{type_name}' referenced by '{referenced_by}' does not resolve")]
    UnresolvedType {
        referenced_by: String,
        type_name: String,
    },

    #[error("Type alias cycle through '{0}'")]
    AliasCycle(String),

    #[error("Struct '{0}' inherits from itself")]
    BaseCycle(String),

    #[error("Struct '{name}' has base '{base}' which is not a struct")]
    InvalidBase { name: String, base: String },

    #[error("Duplicate definition of '{0}'")]
    Duplicate(String),
}

/// Parses the fixed schema used for the outer trace shape.
pub fn load_base_schema(document: &str) -> Result<SchemaModel, SchemaError> {
    SchemaModel::from_json(document)
}

/// The embedded state-history schema.
pub fn state_history_schema() -> Result<SchemaModel, SchemaError> {
    load_base_schema(STATE_HISTORY_SCHEMA)
}
