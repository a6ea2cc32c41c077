// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference encoder: the inverse of [`super::BinaryDecoder`].
//!
//! Used to build fixtures and binary schema documents. Variant values that
//! were unwrapped on decode carry no member name, so the encoder tries each
//! unwrapped member in declaration order and keeps the first that encodes.

use super::cursor::BinaryWriter;
use super::decode::MAX_DEPTH;
use super::primitives::Primitive;
use super::variants::{VariantBehavior, VariantRegistry};
use super::{EncodeError, EncodeErrorKind};
use crate::schema::{SchemaModel, StructDef, TypeShape};
use crate::types::DecodedValue;

pub struct BinaryEncoder<'a> {
    model: &'a SchemaModel,
    variants: &'a VariantRegistry,
}

impl<'a> BinaryEncoder<'a> {
    pub fn new(model: &'a SchemaModel, variants: &'a VariantRegistry) -> Self {
        Self { model, variants }
    }

    pub fn encode(&self, type_name: &str, value: &DecodedValue) -> Result<Vec<u8>, EncodeError> {
        let mut writer = BinaryWriter::with_capacity(64);
        self.encode_value(type_name, value, &mut writer, 0)?;
        Ok(writer.finish())
    }

    fn encode_value(
        &self,
        type_name: &str,
        value: &DecodedValue,
        writer: &mut BinaryWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if depth > MAX_DEPTH {
            return Err(error(type_name, EncodeErrorKind::DepthLimitExceeded(MAX_DEPTH)));
        }

        match TypeShape::of(type_name) {
            TypeShape::Sequence(inner) => {
                let items = value.as_sequence().ok_or_else(|| {
                    error(
                        type_name,
                        EncodeErrorKind::Mismatch {
                            expected: "sequence",
                            found: value.kind(),
                        },
                    )
                })?;
                let len = u32::try_from(items.len())
                    .map_err(|_| error(type_name, EncodeErrorKind::OutOfRange))?;
                writer.write_varuint32(len);
                for item in items {
                    self.encode_value(inner, item, writer, depth + 1)?;
                }
                Ok(())
            }
            TypeShape::Optional(inner) => {
                if value.is_null() {
                    writer.write_u8(0);
                    Ok(())
                } else {
                    writer.write_u8(1);
                    self.encode_value(inner, value, writer, depth + 1)
                }
            }
            TypeShape::Extension(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    self.encode_value(inner, value, writer, depth + 1)
                }
            }
            TypeShape::Plain(name) => self.encode_plain(name, value, writer, depth),
        }
    }

    fn encode_plain(
        &self,
        name: &str,
        value: &DecodedValue,
        writer: &mut BinaryWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if let Some(target) = self.model.alias(name) {
            return self.encode_value(target, value, writer, depth + 1);
        }

        if let Some(primitive) = Primitive::from_name(name) {
            return primitive
                .encode(value, writer)
                .map_err(|kind| error(name, kind));
        }

        if let Some(def) = self.model.get_struct(name) {
            if !matches!(value, DecodedValue::Record(_)) {
                return Err(error(
                    name,
                    EncodeErrorKind::Mismatch {
                        expected: "record",
                        found: value.kind(),
                    },
                ));
            }
            return self.encode_fields(def, value, writer, depth);
        }

        if let Some(members) = self.model.get_variant(name) {
            return self.encode_variant(name, members, value, writer, depth);
        }

        Err(error(name, EncodeErrorKind::UnknownType))
    }

    fn encode_fields(
        &self,
        def: &StructDef,
        value: &DecodedValue,
        writer: &mut BinaryWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if !def.base.is_empty() {
            let base = self
                .model
                .get_struct(&def.base)
                .ok_or_else(|| error(&def.base, EncodeErrorKind::UnknownType))?;
            self.encode_fields(base, value, writer, depth + 1)?;
        }
        for field in &def.fields {
            match value.field(&field.name) {
                Some(field_value) => {
                    self.encode_value(&field.type_name, field_value, writer, depth + 1)?
                }
                // A missing trailing extension field is the same as an absent one.
                None if field.type_name.ends_with('$') => {}
                None => {
                    return Err(error(
                        &def.name,
                        EncodeErrorKind::MissingField(field.name.clone()),
                    ));
                }
            }
        }
        Ok(())
    }

    fn encode_variant(
        &self,
        name: &str,
        members: &[String],
        value: &DecodedValue,
        writer: &mut BinaryWriter,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if let DecodedValue::Tagged { member, value } = value
            && self.variants.behavior(member) == VariantBehavior::Tagged
        {
            let tag = members
                .iter()
                .position(|m| m == member)
                .ok_or_else(|| error(name, EncodeErrorKind::UnknownVariantMember(member.clone())))?;
            writer.write_varuint32(tag as u32);
            return self.encode_value(member, value, writer, depth + 1);
        }

        for (tag, member) in members.iter().enumerate() {
            if self.variants.behavior(member) != VariantBehavior::Unwrap {
                continue;
            }
            let mut attempt = BinaryWriter::new();
            attempt.write_varuint32(tag as u32);
            if self
                .encode_value(member, value, &mut attempt, depth + 1)
                .is_ok()
            {
                writer.write_bytes(&attempt.finish());
                return Ok(());
            }
        }

        Err(error(name, EncodeErrorKind::NoMatchingMember))
    }
}

fn error(type_name: &str, kind: EncodeErrorKind) -> EncodeError {
    EncodeError {
        type_name: type_name.to_string(),
        kind,
    }
}
