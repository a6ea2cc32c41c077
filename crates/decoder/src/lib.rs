// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod cache;
pub mod codec;
pub mod logging;
pub mod pipeline;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod types;
pub mod utils;

pub use cache::SchemaCache;
pub use codec::{BinaryCursor, BinaryDecoder, BinaryEncoder, DecodeError, VariantRegistry};
pub use pipeline::{DecodeSummary, PipelineError, PipelineOptions, TraceDecodePipeline};
pub use resolver::{AccountSchema, Resolution, SchemaResolver};
pub use schema::{SchemaModel, load_base_schema};
pub use types::{DecodedTraceResult, DecodedValue, RawTrace, TraceKey};
