// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! The decoded value tree.
//!
//! Every decode call returns a fresh [`DecodedValue`] tree owned by the
//! caller. The tree is closed: a node is a primitive, a sequence, a record
//! with ordered named fields, or a tagged variant member.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    /// An absent optional or binary extension.
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Int128(i128),
    UInt128(u128),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Sequence(Vec<DecodedValue>),
    /// Fields in wire order.
    Record(Vec<(String, DecodedValue)>),
    /// A variant member that is not unwrapped by the variant registry.
    Tagged {
        member: String,
        value: Box<DecodedValue>,
    },
}

impl DecodedValue {
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Null => "null",
            DecodedValue::Bool(_) => "bool",
            DecodedValue::Int(_) => "int",
            DecodedValue::UInt(_) => "uint",
            DecodedValue::Int128(_) => "int128",
            DecodedValue::UInt128(_) => "uint128",
            DecodedValue::Float(_) => "float",
            DecodedValue::String(_) => "string",
            DecodedValue::Bytes(_) => "bytes",
            DecodedValue::Timestamp(_) => "timestamp",
            DecodedValue::Sequence(_) => "sequence",
            DecodedValue::Record(_) => "record",
            DecodedValue::Tagged { .. } => "tagged",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DecodedValue::Null)
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut DecodedValue> {
        match self {
            DecodedValue::Record(fields) => fields
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Field names of a record, in wire order.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            DecodedValue::Record(fields) => fields.iter().map(|(n, _)| n.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DecodedValue::UInt(v) => Some(*v),
            DecodedValue::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodedValue::Int(v) => Some(*v),
            DecodedValue::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<DecodedValue>> {
        match self {
            DecodedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Builds a record from `(name, value)` pairs, keeping their order.
    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, DecodedValue)>,
        S: Into<String>,
    {
        DecodedValue::Record(fields.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    pub fn tagged(member: impl Into<String>, value: DecodedValue) -> Self {
        DecodedValue::Tagged {
            member: member.into(),
            value: Box::new(value),
        }
    }
}

impl From<&str> for DecodedValue {
    fn from(value: &str) -> Self {
        DecodedValue::String(value.to_string())
    }
}

impl From<String> for DecodedValue {
    fn from(value: String) -> Self {
        DecodedValue::String(value)
    }
}

impl From<bool> for DecodedValue {
    fn from(value: bool) -> Self {
        DecodedValue::Bool(value)
    }
}

impl From<u64> for DecodedValue {
    fn from(value: u64) -> Self {
        DecodedValue::UInt(value)
    }
}

impl From<i64> for DecodedValue {
    fn from(value: i64) -> Self {
        DecodedValue::Int(value)
    }
}

impl From<Vec<u8>> for DecodedValue {
    fn from(value: Vec<u8>) -> Self {
        DecodedValue::Bytes(value)
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Null => serializer.serialize_none(),
            DecodedValue::Bool(v) => serializer.serialize_bool(*v),
            DecodedValue::Int(v) => serializer.serialize_i64(*v),
            DecodedValue::UInt(v) => serializer.serialize_u64(*v),
            // Convert large numbers to strings to preserve precision
            DecodedValue::Int128(v) => serializer.serialize_str(&v.to_string()),
            DecodedValue::UInt128(v) => serializer.serialize_str(&v.to_string()),
            DecodedValue::Float(v) => serializer.serialize_f64(*v),
            DecodedValue::String(v) => serializer.serialize_str(v),
            DecodedValue::Bytes(v) => serializer.serialize_str(&hex::encode(v)),
            DecodedValue::Timestamp(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            DecodedValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DecodedValue::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            DecodedValue::Tagged { member, value } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(member)?;
                seq.serialize_element(value.as_ref())?;
                seq.end()
            }
        }
    }
}
