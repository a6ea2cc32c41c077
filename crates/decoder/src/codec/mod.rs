// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Schema-driven binary codec.
//!
//! - `cursor` - byte reader and writer
//! - `primitives` - built-in wire types
//! - `decode` - [`BinaryDecoder`], bytes to [`crate::types::DecodedValue`]
//! - `encode` - [`BinaryEncoder`], the inverse
//! - `variants` - [`VariantRegistry`]

pub mod cursor;
pub mod decode;
pub mod encode;
pub mod primitives;
pub mod variants;

pub use cursor::{BinaryCursor, BinaryWriter};
pub use decode::{BinaryDecoder, MAX_DEPTH, node_limit};
pub use encode::BinaryEncoder;
pub use primitives::Primitive;
pub use variants::{STATE_HISTORY_WRAPPERS, VariantBehavior, VariantRegistry};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("unknown type")]
    UnknownType,

    #[error("variant tag {tag} out of range for {members} members")]
    VariantTagOutOfRange { tag: u32, members: usize },

    #[error("varuint32 overflow")]
    VarintOverflow,

    #[error("invalid presence flag {0}")]
    InvalidPresenceFlag(u8),

    #[error("invalid bool {0}")]
    InvalidBool(u8),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("unknown key type {0}")]
    UnknownKeyType(u32),

    #[error("nesting deeper than {0}")]
    DepthLimitExceeded(usize),

    #[error("{0} trailing bytes")]
    TrailingBytes(usize),

    #[error("decoded value exceeds {0} nodes")]
    NodeLimitExceeded(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode '{type_name}' at offset {offset}: {kind}")]
pub struct DecodeError {
    pub offset: usize,
    pub type_name: String,
    pub kind: DecodeErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeErrorKind {
    #[error("unknown type")]
    UnknownType,

    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value out of range")]
    OutOfRange,

    #[error("expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("invalid asset '{0}'")]
    InvalidAsset(String),

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("'{0}' is not a member of this variant")]
    UnknownVariantMember(String),

    #[error("no unwrapped member matches the value")]
    NoMatchingMember,

    #[error("nesting deeper than {0}")]
    DepthLimitExceeded(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to encode '{type_name}': {kind}")]
pub struct EncodeError {
    pub type_name: String,
    pub kind: EncodeErrorKind,
}
