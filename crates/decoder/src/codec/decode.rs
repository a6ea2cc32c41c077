// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive, schema-interpreted binary decoder.
//!
//! Wire rules:
//! - structs: base fields first, then own fields, in declared order
//! - `T[]`: `varuint32` count, then the elements
//! - `T?`: one presence byte (0 or 1), then the value when present
//! - `T$`: the value, or absent when the input is exhausted
//! - variants: `varuint32` tag indexing the member list, then the member

use super::cursor::BinaryCursor;
use super::primitives::Primitive;
use super::variants::VariantRegistry;
use super::{DecodeError, DecodeErrorKind};
use crate::schema::{SchemaModel, StructDef, TypeShape};
use crate::types::DecodedValue;

/// Nesting limit for a single decode call.
pub const MAX_DEPTH: usize = 128;

/// Values a decode call may produce regardless of input size.
pub const NODE_BASE_ALLOWANCE: usize = 4096;

/// Additional values allowed per input byte.
pub const NODES_PER_INPUT_BYTE: usize = 64;

/// Upper bound on the values decoded from `input_len` bytes. Elements that
/// read no bytes (empty structs, absent `$` extensions) would otherwise let
/// a sequence count alone size the result.
pub fn node_limit(input_len: usize) -> usize {
    input_len
        .saturating_mul(NODES_PER_INPUT_BYTE)
        .saturating_add(NODE_BASE_ALLOWANCE)
}

/// Per-call decode state.
struct Budget {
    limit: usize,
    used: usize,
}

impl Budget {
    fn charge(&mut self, offset: usize, type_name: &str) -> Result<(), DecodeError> {
        if self.used >= self.limit {
            return Err(error(
                offset,
                type_name,
                DecodeErrorKind::NodeLimitExceeded(self.limit),
            ));
        }
        self.used += 1;
        Ok(())
    }
}

pub struct BinaryDecoder<'a> {
    model: &'a SchemaModel,
    variants: &'a VariantRegistry,
    node_limit: Option<usize>,
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(model: &'a SchemaModel, variants: &'a VariantRegistry) -> Self {
        Self {
            model,
            variants,
            node_limit: None,
        }
    }

    /// Replaces the input-relative [`node_limit`] with a fixed one.
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Decodes one `type_name` value starting at the cursor position. On
    /// failure the cursor is left wherever the failing read stopped.
    pub fn decode(
        &self,
        type_name: &str,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<DecodedValue, DecodeError> {
        let mut budget = Budget {
            limit: self
                .node_limit
                .unwrap_or_else(|| node_limit(cursor.remaining())),
            used: 0,
        };
        self.decode_value(type_name, cursor, 0, &mut budget)
    }

    /// Like [`Self::decode`], but fails unless the value ends the input.
    pub fn decode_exact(
        &self,
        type_name: &str,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<DecodedValue, DecodeError> {
        let value = self.decode(type_name, cursor)?;
        if !cursor.is_empty() {
            return Err(DecodeError {
                offset: cursor.position(),
                type_name: type_name.to_string(),
                kind: DecodeErrorKind::TrailingBytes(cursor.remaining()),
            });
        }
        Ok(value)
    }

    fn decode_value(
        &self,
        type_name: &str,
        cursor: &mut BinaryCursor<'_>,
        depth: usize,
        budget: &mut Budget,
    ) -> Result<DecodedValue, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(error(
                cursor.position(),
                type_name,
                DecodeErrorKind::DepthLimitExceeded(MAX_DEPTH),
            ));
        }
        budget.charge(cursor.position(), type_name)?;

        match TypeShape::of(type_name) {
            TypeShape::Sequence(inner) => {
                let start = cursor.position();
                let len = cursor
                    .read_varuint32()
                    .map_err(|kind| error(start, type_name, kind))? as usize;
                let mut items = Vec::with_capacity(len.min(cursor.remaining()));
                for _ in 0..len {
                    items.push(self.decode_value(inner, cursor, depth + 1, budget)?);
                }
                Ok(DecodedValue::Sequence(items))
            }
            TypeShape::Optional(inner) => {
                let start = cursor.position();
                match cursor.read_u8().map_err(|kind| error(start, type_name, kind))? {
                    0 => Ok(DecodedValue::Null),
                    1 => self.decode_value(inner, cursor, depth + 1, budget),
                    flag => Err(error(
                        start,
                        type_name,
                        DecodeErrorKind::InvalidPresenceFlag(flag),
                    )),
                }
            }
            TypeShape::Extension(inner) => {
                if cursor.is_empty() {
                    Ok(DecodedValue::Null)
                } else {
                    self.decode_value(inner, cursor, depth + 1, budget)
                }
            }
            TypeShape::Plain(name) => self.decode_plain(name, cursor, depth, budget),
        }
    }

    fn decode_plain(
        &self,
        name: &str,
        cursor: &mut BinaryCursor<'_>,
        depth: usize,
        budget: &mut Budget,
    ) -> Result<DecodedValue, DecodeError> {
        if let Some(target) = self.model.alias(name) {
            return self.decode_value(target, cursor, depth + 1, budget);
        }

        if let Some(primitive) = Primitive::from_name(name) {
            let start = cursor.position();
            return primitive
                .decode(cursor)
                .map_err(|kind| error(start, name, kind));
        }

        if let Some(def) = self.model.get_struct(name) {
            let mut fields = Vec::with_capacity(def.fields.len());
            self.decode_fields(def, cursor, depth, budget, &mut fields)?;
            return Ok(DecodedValue::Record(fields));
        }

        if let Some(members) = self.model.get_variant(name) {
            let start = cursor.position();
            let tag = cursor
                .read_varuint32()
                .map_err(|kind| error(start, name, kind))?;
            let member = members.get(tag as usize).ok_or_else(|| {
                error(
                    start,
                    name,
                    DecodeErrorKind::VariantTagOutOfRange {
                        tag,
                        members: members.len(),
                    },
                )
            })?;
            let inner = self.decode_value(member, cursor, depth + 1, budget)?;
            return Ok(self.variants.resolve(member, inner));
        }

        Err(error(cursor.position(), name, DecodeErrorKind::UnknownType))
    }

    fn decode_fields(
        &self,
        def: &StructDef,
        cursor: &mut BinaryCursor<'_>,
        depth: usize,
        budget: &mut Budget,
        out: &mut Vec<(String, DecodedValue)>,
    ) -> Result<(), DecodeError> {
        if depth > MAX_DEPTH {
            return Err(error(
                cursor.position(),
                &def.name,
                DecodeErrorKind::DepthLimitExceeded(MAX_DEPTH),
            ));
        }
        if !def.base.is_empty() {
            let base = self
                .model
                .get_struct(&def.base)
                .ok_or_else(|| error(cursor.position(), &def.base, DecodeErrorKind::UnknownType))?;
            self.decode_fields(base, cursor, depth + 1, budget, out)?;
        }
        for field in &def.fields {
            let value = self.decode_value(&field.type_name, cursor, depth + 1, budget)?;
            out.push((field.name.clone(), value));
        }
        Ok(())
    }
}

fn error(offset: usize, type_name: &str, kind: DecodeErrorKind) -> DecodeError {
    DecodeError {
        offset,
        type_name: type_name.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "version": "eosio::abi/1.1",
        "types": [{"new_type_name": "account_name", "type": "name"}],
        "structs": [
            {"name": "base_rec", "fields": [{"name": "id", "type": "uint8"}]},
            {"name": "child_rec", "base": "base_rec", "fields": [{"name": "label", "type": "string"}]},
            {"name": "holder", "fields": [
                {"name": "owner", "type": "account_name"},
                {"name": "tags", "type": "string[]"},
                {"name": "note", "type": "string?"},
                {"name": "extra", "type": "uint32$"}
            ]},
            {"name": "pair_v0", "fields": [{"name": "a", "type": "uint8"}]},
            {"name": "pair_v1", "fields": [{"name": "a", "type": "uint8"}, {"name": "b", "type": "uint8"}]},
            {"name": "node", "fields": [{"name": "next", "type": "node?"}]},
            {"name": "empty", "fields": []},
            {"name": "empties", "fields": [{"name": "items", "type": "empty[]"}]},
            {"name": "late", "fields": [{"name": "items", "type": "uint8$[]"}]}
        ],
        "variants": [{"name": "pair", "types": ["pair_v0", "pair_v1"]}]
    }"#;

    fn model() -> SchemaModel {
        SchemaModel::from_json(SCHEMA).unwrap()
    }

    fn decode(type_name: &str, bytes: &[u8]) -> Result<DecodedValue, DecodeError> {
        let model = model();
        let registry = VariantRegistry::empty();
        BinaryDecoder::new(&model, &registry).decode_exact(type_name, &mut BinaryCursor::new(bytes))
    }

    #[test]
    fn test_struct_base_fields_first() {
        let value = decode("child_rec", &[7, 2, b'h', b'i']).unwrap();
        assert_eq!(value.field_names(), vec!["id", "label"]);
        assert_eq!(value.field("id"), Some(&DecodedValue::UInt(7)));
        assert_eq!(value.field("label"), Some(&DecodedValue::from("hi")));
    }

    #[test]
    fn test_sequence_optional_and_extension() {
        let mut bytes = 6138663577826885632u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[2, 1, b'a', 1, b'b']);
        bytes.extend_from_slice(&[1, 2, b'o', b'k']);

        let value = decode("holder", &bytes).unwrap();
        assert_eq!(value.field("owner"), Some(&DecodedValue::from("eosio")));
        assert_eq!(
            value.field("tags"),
            Some(&DecodedValue::Sequence(vec!["a".into(), "b".into()]))
        );
        assert_eq!(value.field("note"), Some(&DecodedValue::from("ok")));
        assert_eq!(value.field("extra"), Some(&DecodedValue::Null));

        bytes.extend_from_slice(&9u32.to_le_bytes());
        let value = decode("holder", &bytes).unwrap();
        assert_eq!(value.field("extra"), Some(&DecodedValue::UInt(9)));
    }

    #[test]
    fn test_absent_optional() {
        let mut bytes = 0u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0]);
        let value = decode("holder", &bytes).unwrap();
        assert_eq!(value.field("owner"), Some(&DecodedValue::from("")));
        assert_eq!(value.field("note"), Some(&DecodedValue::Null));
    }

    #[test]
    fn test_invalid_presence_flag() {
        let mut bytes = 0u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0, 2]);
        let err = decode("holder", &bytes).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidPresenceFlag(2));
        assert_eq!(err.offset, 9);
        assert_eq!(err.type_name, "string?");
    }

    #[test]
    fn test_variant_tag_selects_member() {
        let value = decode("pair", &[1, 3, 4]).unwrap();
        assert_eq!(
            value,
            DecodedValue::tagged(
                "pair_v1",
                DecodedValue::record([("a", DecodedValue::UInt(3)), ("b", DecodedValue::UInt(4))])
            )
        );
    }

    #[test]
    fn test_variant_tag_out_of_range() {
        for tag in [2u8, 3, 127] {
            let err = decode("pair", &[tag, 0, 0]).unwrap_err();
            assert_eq!(
                err.kind,
                DecodeErrorKind::VariantTagOutOfRange {
                    tag: u32::from(tag),
                    members: 2
                }
            );
            assert_eq!(err.offset, 0);
            assert_eq!(err.type_name, "pair");
        }
    }

    #[test]
    fn test_registered_member_is_unwrapped() {
        let model = model();
        let mut registry = VariantRegistry::empty();
        registry.register("pair_v0", crate::codec::VariantBehavior::Unwrap);
        let decoder = BinaryDecoder::new(&model, &registry);

        let value = decoder.decode("pair", &mut BinaryCursor::new(&[0, 5])).unwrap();
        assert_eq!(value, DecodedValue::record([("a", DecodedValue::UInt(5))]));
    }

    #[test]
    fn test_unknown_type() {
        let err = decode("missing_type", &[0]).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnknownType);
        assert_eq!(err.type_name, "missing_type");
    }

    #[test]
    fn test_every_truncation_fails() {
        let bytes = [7u8, 5, b'h', b'e', b'l', b'l', b'o'];
        assert!(decode("child_rec", &bytes).is_ok());
        for len in 0..bytes.len() {
            let err = decode("child_rec", &bytes[..len]).unwrap_err();
            assert!(
                matches!(err.kind, DecodeErrorKind::UnexpectedEof { .. }),
                "prefix {} gave {:?}",
                len,
                err
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected_by_decode_exact() {
        let err = decode("pair_v0", &[1, 2]).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TrailingBytes(1));
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_decode_leaves_cursor_after_value() {
        let model = model();
        let registry = VariantRegistry::empty();
        let decoder = BinaryDecoder::new(&model, &registry);
        let mut cursor = BinaryCursor::new(&[1, 2]);
        decoder.decode("pair_v0", &mut cursor).unwrap();
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let bytes = vec![1u8; MAX_DEPTH + 10];
        let err = decode("node", &bytes).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::DepthLimitExceeded(MAX_DEPTH));
    }

    fn varuint32(mut value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                out.push(byte);
                return out;
            }
            out.push(byte | 0x80);
        }
    }

    #[test]
    fn test_zero_width_elements_hit_node_limit() {
        let bytes = varuint32(50_000_000);
        let err = decode("empties", &bytes).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::NodeLimitExceeded(node_limit(bytes.len()))
        );
        assert_eq!(err.type_name, "empty");

        // Absent extensions read nothing either.
        let err = decode("late", &varuint32(u32::MAX)).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::NodeLimitExceeded(_)));
    }

    #[test]
    fn test_small_zero_width_sequences_decode() {
        let value = decode("empties", &[3]).unwrap();
        assert_eq!(
            value.field("items").and_then(|v| v.as_sequence()).map(<[_]>::len),
            Some(3)
        );
    }

    #[test]
    fn test_fixed_node_limit() {
        let model = model();
        let registry = VariantRegistry::empty();
        let decoder = BinaryDecoder::new(&model, &registry).with_node_limit(4);

        let mut bytes = 0u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[1, 1, b'a', 0]);
        let err = decoder
            .decode_exact("holder", &mut BinaryCursor::new(&bytes))
            .unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::NodeLimitExceeded(4));

        // holder, owner and its alias target, tags, one tag, note, extra
        let decoder = BinaryDecoder::new(&model, &registry).with_node_limit(7);
        assert!(decoder
            .decode_exact("holder", &mut BinaryCursor::new(&bytes))
            .is_ok());
    }
}
