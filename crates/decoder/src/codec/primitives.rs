// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in wire types and their text forms (account names, symbols,
//! assets, chain timestamps).

use super::cursor::{BinaryCursor, BinaryWriter};
use super::{DecodeErrorKind, EncodeErrorKind};
use crate::types::DecodedValue;
use chrono::{DateTime, Utc};

const NAME_CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";
const NAME_MAX_LEN: usize = 13;

/// Milliseconds between the Unix epoch and 2000-01-01T00:00:00Z, the origin
/// of `block_timestamp_type`.
const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;
const BLOCK_INTERVAL_MS: i64 = 500;

const MAX_ASSET_PRECISION: u8 = 18;
const SYMBOL_CODE_MAX_LEN: usize = 7;

const K1_R1_KEY_LEN: usize = 33;
const K1_R1_SIGNATURE_LEN: usize = 65;
const KEY_TYPE_WA: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int128,
    Uint128,
    VarInt32,
    VarUint32,
    Float32,
    Float64,
    Float128,
    TimePoint,
    TimePointSec,
    BlockTimestamp,
    Name,
    Bytes,
    String,
    Checksum160,
    Checksum256,
    Checksum512,
    PublicKey,
    Signature,
    Symbol,
    SymbolCode,
    Asset,
    ExtendedAsset,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "bool" => Primitive::Bool,
            "int8" => Primitive::Int8,
            "uint8" => Primitive::Uint8,
            "int16" => Primitive::Int16,
            "uint16" => Primitive::Uint16,
            "int32" => Primitive::Int32,
            "uint32" => Primitive::Uint32,
            "int64" => Primitive::Int64,
            "uint64" => Primitive::Uint64,
            "int128" => Primitive::Int128,
            "uint128" => Primitive::Uint128,
            "varint32" => Primitive::VarInt32,
            "varuint32" => Primitive::VarUint32,
            "float32" => Primitive::Float32,
            "float64" => Primitive::Float64,
            "float128" => Primitive::Float128,
            "time_point" => Primitive::TimePoint,
            "time_point_sec" => Primitive::TimePointSec,
            "block_timestamp_type" => Primitive::BlockTimestamp,
            "name" => Primitive::Name,
            "bytes" => Primitive::Bytes,
            "string" => Primitive::String,
            "checksum160" => Primitive::Checksum160,
            "checksum256" => Primitive::Checksum256,
            "checksum512" => Primitive::Checksum512,
            "public_key" => Primitive::PublicKey,
            "signature" => Primitive::Signature,
            "symbol" => Primitive::Symbol,
            "symbol_code" => Primitive::SymbolCode,
            "asset" => Primitive::Asset,
            "extended_asset" => Primitive::ExtendedAsset,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn decode(self, cursor: &mut BinaryCursor<'_>) -> Result<DecodedValue, DecodeErrorKind> {
        let value = match self {
            Primitive::Bool => match cursor.read_u8()? {
                0 => DecodedValue::Bool(false),
                1 => DecodedValue::Bool(true),
                other => return Err(DecodeErrorKind::InvalidBool(other)),
            },
            Primitive::Int8 => DecodedValue::Int(i64::from(cursor.read_u8()? as i8)),
            Primitive::Uint8 => DecodedValue::UInt(u64::from(cursor.read_u8()?)),
            Primitive::Int16 => DecodedValue::Int(i64::from(cursor.read_u16()? as i16)),
            Primitive::Uint16 => DecodedValue::UInt(u64::from(cursor.read_u16()?)),
            Primitive::Int32 => DecodedValue::Int(i64::from(cursor.read_u32()? as i32)),
            Primitive::Uint32 => DecodedValue::UInt(u64::from(cursor.read_u32()?)),
            Primitive::Int64 => DecodedValue::Int(cursor.read_i64()?),
            Primitive::Uint64 => DecodedValue::UInt(cursor.read_u64()?),
            Primitive::Int128 => DecodedValue::Int128(cursor.read_u128()? as i128),
            Primitive::Uint128 => DecodedValue::UInt128(cursor.read_u128()?),
            Primitive::VarInt32 => DecodedValue::Int(i64::from(cursor.read_varint32()?)),
            Primitive::VarUint32 => DecodedValue::UInt(u64::from(cursor.read_varuint32()?)),
            Primitive::Float32 => {
                DecodedValue::Float(f64::from(f32::from_le_bytes(cursor.read_array()?)))
            }
            Primitive::Float64 => DecodedValue::Float(f64::from_le_bytes(cursor.read_array()?)),
            Primitive::Float128 => DecodedValue::Bytes(cursor.read_bytes(16)?.to_vec()),
            Primitive::TimePoint => {
                let micros = cursor.read_i64()?;
                DecodedValue::Timestamp(
                    DateTime::from_timestamp_micros(micros)
                        .ok_or(DecodeErrorKind::InvalidTimestamp(micros))?,
                )
            }
            Primitive::TimePointSec => {
                let secs = i64::from(cursor.read_u32()?);
                DecodedValue::Timestamp(
                    DateTime::from_timestamp(secs, 0)
                        .ok_or(DecodeErrorKind::InvalidTimestamp(secs))?,
                )
            }
            Primitive::BlockTimestamp => {
                let slot = i64::from(cursor.read_u32()?);
                DecodedValue::Timestamp(block_timestamp_to_datetime(slot)?)
            }
            Primitive::Name => DecodedValue::String(name_to_string(cursor.read_u64()?)),
            Primitive::Bytes => DecodedValue::Bytes(cursor.read_length_prefixed()?.to_vec()),
            Primitive::String => DecodedValue::String(
                String::from_utf8_lossy(cursor.read_length_prefixed()?).into_owned(),
            ),
            Primitive::Checksum160 => DecodedValue::Bytes(cursor.read_bytes(20)?.to_vec()),
            Primitive::Checksum256 => DecodedValue::Bytes(cursor.read_bytes(32)?.to_vec()),
            Primitive::Checksum512 => DecodedValue::Bytes(cursor.read_bytes(64)?.to_vec()),
            Primitive::PublicKey => DecodedValue::Bytes(read_public_key(cursor)?),
            Primitive::Signature => DecodedValue::Bytes(read_signature(cursor)?),
            Primitive::Symbol => DecodedValue::String(format_symbol(cursor.read_u64()?)?),
            Primitive::SymbolCode => DecodedValue::String(format_symbol_code(cursor.read_u64()?)?),
            Primitive::Asset => DecodedValue::String(read_asset(cursor)?),
            Primitive::ExtendedAsset => {
                let quantity = read_asset(cursor)?;
                let contract = name_to_string(cursor.read_u64()?);
                DecodedValue::record([
                    ("quantity", DecodedValue::String(quantity)),
                    ("contract", DecodedValue::String(contract)),
                ])
            }
        };
        Ok(value)
    }

    pub fn encode(
        self,
        value: &DecodedValue,
        writer: &mut BinaryWriter,
    ) -> Result<(), EncodeErrorKind> {
        match self {
            Primitive::Bool => writer.write_u8(u8::from(expect_bool(value)?)),
            Primitive::Int8 => writer.write_bytes(&int_in::<i8>(value)?.to_le_bytes()),
            Primitive::Uint8 => writer.write_u8(uint_in::<u8>(value)?),
            Primitive::Int16 => writer.write_bytes(&int_in::<i16>(value)?.to_le_bytes()),
            Primitive::Uint16 => writer.write_bytes(&uint_in::<u16>(value)?.to_le_bytes()),
            Primitive::Int32 => writer.write_bytes(&int_in::<i32>(value)?.to_le_bytes()),
            Primitive::Uint32 => writer.write_bytes(&uint_in::<u32>(value)?.to_le_bytes()),
            Primitive::Int64 => writer.write_bytes(&int_in::<i64>(value)?.to_le_bytes()),
            Primitive::Uint64 => writer.write_bytes(&uint_in::<u64>(value)?.to_le_bytes()),
            Primitive::Int128 => match value {
                DecodedValue::Int128(v) => writer.write_bytes(&v.to_le_bytes()),
                other => writer.write_bytes(&i128::from(int_in::<i64>(other)?).to_le_bytes()),
            },
            Primitive::Uint128 => match value {
                DecodedValue::UInt128(v) => writer.write_bytes(&v.to_le_bytes()),
                other => writer.write_bytes(&u128::from(uint_in::<u64>(other)?).to_le_bytes()),
            },
            Primitive::VarInt32 => writer.write_varint32(int_in::<i32>(value)?),
            Primitive::VarUint32 => writer.write_varuint32(uint_in::<u32>(value)?),
            Primitive::Float32 => writer.write_bytes(&(expect_float(value)? as f32).to_le_bytes()),
            Primitive::Float64 => writer.write_bytes(&expect_float(value)?.to_le_bytes()),
            Primitive::Float128 => writer.write_bytes(expect_fixed_bytes(value, 16)?),
            Primitive::TimePoint => {
                writer.write_bytes(&expect_timestamp(value)?.timestamp_micros().to_le_bytes())
            }
            Primitive::TimePointSec => {
                let secs = u32::try_from(expect_timestamp(value)?.timestamp())
                    .map_err(|_| EncodeErrorKind::OutOfRange)?;
                writer.write_bytes(&secs.to_le_bytes());
            }
            Primitive::BlockTimestamp => {
                let slot = datetime_to_block_timestamp(expect_timestamp(value)?)?;
                writer.write_bytes(&slot.to_le_bytes());
            }
            Primitive::Name => writer.write_bytes(&encode_name(value)?.to_le_bytes()),
            Primitive::Bytes => writer.write_length_prefixed(expect_bytes(value)?)?,
            Primitive::String => writer.write_length_prefixed(expect_str(value)?.as_bytes())?,
            Primitive::Checksum160 => writer.write_bytes(expect_fixed_bytes(value, 20)?),
            Primitive::Checksum256 => writer.write_bytes(expect_fixed_bytes(value, 32)?),
            Primitive::Checksum512 => writer.write_bytes(expect_fixed_bytes(value, 64)?),
            // Keys and signatures are carried in their serialized form.
            Primitive::PublicKey | Primitive::Signature => writer.write_bytes(expect_bytes(value)?),
            Primitive::Symbol => {
                let text = expect_str(value)?;
                let raw = parse_symbol(text)
                    .ok_or_else(|| EncodeErrorKind::InvalidSymbol(text.to_string()))?;
                writer.write_bytes(&raw.to_le_bytes());
            }
            Primitive::SymbolCode => {
                let text = expect_str(value)?;
                let raw = parse_symbol_code(text)
                    .ok_or_else(|| EncodeErrorKind::InvalidSymbol(text.to_string()))?;
                writer.write_bytes(&raw.to_le_bytes());
            }
            Primitive::Asset => write_asset(expect_str(value)?, writer)?,
            Primitive::ExtendedAsset => {
                let quantity = value
                    .field("quantity")
                    .ok_or_else(|| EncodeErrorKind::MissingField("quantity".to_string()))?;
                let contract = value
                    .field("contract")
                    .ok_or_else(|| EncodeErrorKind::MissingField("contract".to_string()))?;
                write_asset(expect_str(quantity)?, writer)?;
                writer.write_bytes(&encode_name(contract)?.to_le_bytes());
            }
        }
        Ok(())
    }
}

/// Renders a 64-bit account name, e.g. `eosio.token`.
pub fn name_to_string(value: u64) -> String {
    let mut chars = [b'.'; NAME_MAX_LEN];
    let mut tmp = value;
    for i in 0..NAME_MAX_LEN {
        let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
        chars[NAME_MAX_LEN - 1 - i] = NAME_CHARMAP[(tmp & mask) as usize];
        tmp >>= shift;
    }
    let text: String = chars.iter().map(|c| *c as char).collect();
    text.trim_end_matches('.').to_string()
}

/// Packs an account name. Returns `None` for characters outside
/// `.1-5a-z`, names longer than 13 characters, or a 13th character past `j`.
pub fn string_to_name(text: &str) -> Option<u64> {
    if text.len() > NAME_MAX_LEN {
        return None;
    }
    let mut value = 0u64;
    for (i, c) in text.bytes().enumerate() {
        let symbol = name_char_value(c)?;
        if i < NAME_MAX_LEN - 1 {
            value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
        } else {
            if symbol > 0x0f {
                return None;
            }
            value |= symbol;
        }
    }
    Some(value)
}

fn name_char_value(c: u8) -> Option<u64> {
    match c {
        b'.' => Some(0),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        _ => None,
    }
}

/// `4,EOS` from the packed symbol (precision in the low byte).
pub fn format_symbol(raw: u64) -> Result<String, DecodeErrorKind> {
    let precision = (raw & 0xff) as u8;
    if precision > MAX_ASSET_PRECISION {
        return Err(DecodeErrorKind::InvalidSymbol(format!(
            "precision {} exceeds {}",
            precision, MAX_ASSET_PRECISION
        )));
    }
    Ok(format!("{},{}", precision, format_symbol_code(raw >> 8)?))
}

pub fn format_symbol_code(raw: u64) -> Result<String, DecodeErrorKind> {
    let code: String = raw
        .to_le_bytes()
        .iter()
        .take_while(|b| **b != 0)
        .map(|b| *b as char)
        .collect();
    if code.is_empty()
        || code.len() > SYMBOL_CODE_MAX_LEN
        || !code.chars().all(|c| c.is_ascii_uppercase())
        || raw >> (8 * code.len()) != 0
    {
        return Err(DecodeErrorKind::InvalidSymbol(format!("{:#x}", raw)));
    }
    Ok(code)
}

pub fn parse_symbol_code(code: &str) -> Option<u64> {
    if code.is_empty()
        || code.len() > SYMBOL_CODE_MAX_LEN
        || !code.chars().all(|c| c.is_ascii_uppercase())
    {
        return None;
    }
    Some(
        code.bytes()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | (u64::from(b) << (8 * i))),
    )
}

pub fn parse_symbol(text: &str) -> Option<u64> {
    let (precision, code) = text.split_once(',')?;
    let precision: u8 = precision.parse().ok()?;
    if precision > MAX_ASSET_PRECISION {
        return None;
    }
    Some((parse_symbol_code(code)? << 8) | u64::from(precision))
}

fn read_asset(cursor: &mut BinaryCursor<'_>) -> Result<String, DecodeErrorKind> {
    let amount = cursor.read_i64()?;
    let symbol = cursor.read_u64()?;
    let precision = (symbol & 0xff) as u8;
    // Validates precision and code.
    format_symbol(symbol)?;
    let code = format_symbol_code(symbol >> 8)?;
    Ok(format_asset(amount, precision, &code))
}

/// `1.0000 EOS` from an amount in the smallest unit.
pub fn format_asset(amount: i64, precision: u8, code: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    if precision == 0 {
        return format!("{}{} {}", sign, abs, code);
    }
    let scale = 10u64.pow(u32::from(precision));
    format!(
        "{}{}.{:0width$} {}",
        sign,
        abs / scale,
        abs % scale,
        code,
        width = precision as usize
    )
}

/// Parses `1.0000 EOS` into `(amount, symbol)`.
pub fn parse_asset(text: &str) -> Option<(i64, u64)> {
    let (amount, code) = text.trim().split_once(' ')?;
    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() || !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let precision = u8::try_from(frac.len()).ok()?;
    if precision > MAX_ASSET_PRECISION {
        return None;
    }
    let magnitude: i64 = format!("{}{}", whole, frac).parse().ok()?;
    let amount = if negative { -magnitude } else { magnitude };
    let symbol = (parse_symbol_code(code)? << 8) | u64::from(precision);
    Some((amount, symbol))
}

fn write_asset(text: &str, writer: &mut BinaryWriter) -> Result<(), EncodeErrorKind> {
    let (amount, symbol) =
        parse_asset(text).ok_or_else(|| EncodeErrorKind::InvalidAsset(text.to_string()))?;
    writer.write_bytes(&amount.to_le_bytes());
    writer.write_bytes(&symbol.to_le_bytes());
    Ok(())
}

fn block_timestamp_to_datetime(slot: i64) -> Result<DateTime<Utc>, DecodeErrorKind> {
    DateTime::from_timestamp_millis(slot * BLOCK_INTERVAL_MS + BLOCK_TIMESTAMP_EPOCH_MS)
        .ok_or(DecodeErrorKind::InvalidTimestamp(slot))
}

fn datetime_to_block_timestamp(at: &DateTime<Utc>) -> Result<u32, EncodeErrorKind> {
    let since_epoch = at.timestamp_millis() - BLOCK_TIMESTAMP_EPOCH_MS;
    if since_epoch < 0 || since_epoch % BLOCK_INTERVAL_MS != 0 {
        return Err(EncodeErrorKind::OutOfRange);
    }
    u32::try_from(since_epoch / BLOCK_INTERVAL_MS).map_err(|_| EncodeErrorKind::OutOfRange)
}

/// Public key: `varuint32` key type, 33 key bytes; WebAuthn keys add a user
/// presence byte and a relying-party id string.
fn read_public_key(cursor: &mut BinaryCursor<'_>) -> Result<Vec<u8>, DecodeErrorKind> {
    let start = cursor.position();
    let key_type = cursor.read_varuint32()?;
    cursor.read_bytes(K1_R1_KEY_LEN)?;
    match key_type {
        0 | 1 => {}
        KEY_TYPE_WA => {
            cursor.read_u8()?;
            cursor.read_length_prefixed()?;
        }
        other => return Err(DecodeErrorKind::UnknownKeyType(other)),
    }
    Ok(cursor.consumed_since(start).to_vec())
}

/// Signature: `varuint32` key type, 65 signature bytes; WebAuthn signatures
/// add authenticator data and client JSON.
fn read_signature(cursor: &mut BinaryCursor<'_>) -> Result<Vec<u8>, DecodeErrorKind> {
    let start = cursor.position();
    let key_type = cursor.read_varuint32()?;
    cursor.read_bytes(K1_R1_SIGNATURE_LEN)?;
    match key_type {
        0 | 1 => {}
        KEY_TYPE_WA => {
            cursor.read_length_prefixed()?;
            cursor.read_length_prefixed()?;
        }
        other => return Err(DecodeErrorKind::UnknownKeyType(other)),
    }
    Ok(cursor.consumed_since(start).to_vec())
}

fn mismatch(expected: &'static str, found: &DecodedValue) -> EncodeErrorKind {
    EncodeErrorKind::Mismatch {
        expected,
        found: found.kind(),
    }
}

fn expect_bool(value: &DecodedValue) -> Result<bool, EncodeErrorKind> {
    match value {
        DecodedValue::Bool(v) => Ok(*v),
        other => Err(mismatch("bool", other)),
    }
}

fn int_in<T: TryFrom<i64>>(value: &DecodedValue) -> Result<T, EncodeErrorKind> {
    let raw = match value {
        DecodedValue::Int(v) => *v,
        DecodedValue::UInt(v) => i64::try_from(*v).map_err(|_| EncodeErrorKind::OutOfRange)?,
        other => return Err(mismatch("int", other)),
    };
    T::try_from(raw).map_err(|_| EncodeErrorKind::OutOfRange)
}

fn uint_in<T: TryFrom<u64>>(value: &DecodedValue) -> Result<T, EncodeErrorKind> {
    let raw = match value {
        DecodedValue::UInt(v) => *v,
        DecodedValue::Int(v) => u64::try_from(*v).map_err(|_| EncodeErrorKind::OutOfRange)?,
        other => return Err(mismatch("uint", other)),
    };
    T::try_from(raw).map_err(|_| EncodeErrorKind::OutOfRange)
}

fn expect_float(value: &DecodedValue) -> Result<f64, EncodeErrorKind> {
    match value {
        DecodedValue::Float(v) => Ok(*v),
        other => Err(mismatch("float", other)),
    }
}

fn expect_str(value: &DecodedValue) -> Result<&str, EncodeErrorKind> {
    value.as_str().ok_or_else(|| mismatch("string", value))
}

fn expect_bytes(value: &DecodedValue) -> Result<&[u8], EncodeErrorKind> {
    value.as_bytes().ok_or_else(|| mismatch("bytes", value))
}

fn expect_fixed_bytes(value: &DecodedValue, len: usize) -> Result<&[u8], EncodeErrorKind> {
    let bytes = expect_bytes(value)?;
    if bytes.len() != len {
        return Err(EncodeErrorKind::InvalidLength {
            expected: len,
            found: bytes.len(),
        });
    }
    Ok(bytes)
}

fn expect_timestamp(value: &DecodedValue) -> Result<&DateTime<Utc>, EncodeErrorKind> {
    match value {
        DecodedValue::Timestamp(v) => Ok(v),
        other => Err(mismatch("timestamp", other)),
    }
}

fn encode_name(value: &DecodedValue) -> Result<u64, EncodeErrorKind> {
    let text = expect_str(value)?;
    string_to_name(text).ok_or_else(|| EncodeErrorKind::InvalidName(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_known_values() {
        assert_eq!(name_to_string(0), "");
        assert_eq!(name_to_string(6138663577826885632), "eosio");
        assert_eq!(string_to_name("eosio"), Some(6138663577826885632));
        assert_eq!(string_to_name("eosio.token"), Some(6138663591592764928));
        assert_eq!(name_to_string(6138663591592764928), "eosio.token");
    }

    #[test]
    fn test_name_thirteenth_character() {
        let raw = string_to_name("zzzzzzzzzzzzj").unwrap();
        assert_eq!(name_to_string(raw), "zzzzzzzzzzzzj");
        assert_eq!(string_to_name("zzzzzzzzzzzzk"), None);
        assert_eq!(string_to_name("toolongnamexyz"), None);
        assert_eq!(string_to_name("Upper"), None);
    }

    #[test]
    fn test_symbol_and_asset_text() {
        let symbol = parse_symbol("4,EOS").unwrap();
        assert_eq!(symbol, 0x534f4504);
        assert_eq!(format_symbol(symbol).unwrap(), "4,EOS");
        assert_eq!(format_asset(10000, 4, "EOS"), "1.0000 EOS");
        assert_eq!(format_asset(-5, 4, "EOS"), "-0.0005 EOS");
        assert_eq!(format_asset(42, 0, "NFT"), "42 NFT");
        assert_eq!(parse_asset("1.0000 EOS"), Some((10000, symbol)));
        assert_eq!(parse_asset("-0.0005 EOS"), Some((-5, symbol)));
        assert_eq!(parse_asset("1.0 eos"), None);
        assert_eq!(parse_asset("abc EOS"), None);
    }

    #[test]
    fn test_invalid_symbol_rejected() {
        // precision 19
        assert!(format_symbol(0x534f4513).is_err());
        // lowercase code
        assert!(format_symbol_code(u64::from(b'e')).is_err());
        assert!(format_symbol_code(0).is_err());
    }

    #[test]
    fn test_decode_asset() {
        let mut bytes = 10000i64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0x534f4504u64.to_le_bytes());
        let mut cursor = BinaryCursor::new(&bytes);
        assert_eq!(
            Primitive::Asset.decode(&mut cursor).unwrap(),
            DecodedValue::from("1.0000 EOS")
        );
    }

    #[test]
    fn test_block_timestamp() {
        let mut cursor = BinaryCursor::new(&[2, 0, 0, 0]);
        let value = Primitive::BlockTimestamp.decode(&mut cursor).unwrap();
        assert_eq!(
            value,
            DecodedValue::Timestamp(DateTime::from_timestamp(946684801, 0).unwrap())
        );

        let mut writer = BinaryWriter::new();
        Primitive::BlockTimestamp.encode(&value, &mut writer).unwrap();
        assert_eq!(writer.finish(), vec![2, 0, 0, 0]);
    }

    #[test]
    fn test_public_key_k1_and_unknown_type() {
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&[7u8; 33]);
        let mut cursor = BinaryCursor::new(&bytes);
        assert_eq!(
            Primitive::PublicKey.decode(&mut cursor).unwrap(),
            DecodedValue::Bytes(bytes.clone())
        );

        let mut bytes = vec![9u8];
        bytes.extend_from_slice(&[7u8; 33]);
        let mut cursor = BinaryCursor::new(&bytes);
        assert_eq!(
            Primitive::PublicKey.decode(&mut cursor),
            Err(DecodeErrorKind::UnknownKeyType(9))
        );
    }

    #[test]
    fn test_bool_strict() {
        let mut cursor = BinaryCursor::new(&[2]);
        assert_eq!(
            Primitive::Bool.decode(&mut cursor),
            Err(DecodeErrorKind::InvalidBool(2))
        );
    }

    #[test]
    fn test_encode_range_checks() {
        let mut writer = BinaryWriter::new();
        assert_eq!(
            Primitive::Uint8.encode(&DecodedValue::UInt(256), &mut writer),
            Err(EncodeErrorKind::OutOfRange)
        );
        assert!(matches!(
            Primitive::Name.encode(&DecodedValue::Bool(true), &mut writer),
            Err(EncodeErrorKind::Mismatch { expected: "string", .. })
        ));
        assert!(writer.is_empty());
    }
}
