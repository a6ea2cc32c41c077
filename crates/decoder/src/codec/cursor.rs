// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Forward-only reader and append-only writer for the wire format.
//!
//! Fixed-width integers are little-endian. `varuint32` is base-128 with a
//! continuation bit, at most five bytes; `varint32` is its zig-zag form.

use super::DecodeErrorKind;

/// Longest encoding of a `varuint32`.
const VARUINT32_MAX_BYTES: usize = 5;

#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed since `start`, which must be an earlier position.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeErrorKind> {
        if len > self.remaining() {
            return Err(DecodeErrorKind::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeErrorKind> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeErrorKind> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeErrorKind> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeErrorKind> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeErrorKind> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeErrorKind> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, DecodeErrorKind> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    pub fn read_varuint32(&mut self) -> Result<u32, DecodeErrorKind> {
        let mut result: u64 = 0;
        for i in 0..VARUINT32_MAX_BYTES {
            let byte = self.read_u8()?;
            result |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return u32::try_from(result).map_err(|_| DecodeErrorKind::VarintOverflow);
            }
        }
        Err(DecodeErrorKind::VarintOverflow)
    }

    pub fn read_varint32(&mut self) -> Result<i32, DecodeErrorKind> {
        let raw = self.read_varuint32()?;
        Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
    }

    /// A `varuint32` length followed by that many bytes.
    pub fn read_length_prefixed(&mut self) -> Result<&'a [u8], DecodeErrorKind> {
        let len = self.read_varuint32()? as usize;
        self.read_bytes(len)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_varuint32(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    pub fn write_varint32(&mut self, value: i32) {
        self.write_varuint32(((value << 1) ^ (value >> 31)) as u32);
    }

    pub fn write_length_prefixed(&mut self, bytes: &[u8]) -> Result<(), super::EncodeErrorKind> {
        let len = u32::try_from(bytes.len()).map_err(|_| super::EncodeErrorKind::OutOfRange)?;
        self.write_varuint32(len);
        self.write_bytes(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varuint32_known_encodings() {
        let cases: [(u32, &[u8]); 5] = [
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (300, &[0xac, 0x02]),
            (u32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
        ];
        for (value, bytes) in cases {
            let mut writer = BinaryWriter::new();
            writer.write_varuint32(value);
            assert_eq!(writer.finish(), bytes, "encoding {}", value);

            let mut cursor = BinaryCursor::new(bytes);
            assert_eq!(cursor.read_varuint32().unwrap(), value);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn test_varuint32_overflow() {
        let mut cursor = BinaryCursor::new(&[0xff, 0xff, 0xff, 0xff, 0x1f]);
        assert_eq!(cursor.read_varuint32(), Err(DecodeErrorKind::VarintOverflow));

        let mut cursor = BinaryCursor::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(cursor.read_varuint32(), Err(DecodeErrorKind::VarintOverflow));
    }

    #[test]
    fn test_varuint32_truncated() {
        let mut cursor = BinaryCursor::new(&[0x80]);
        assert!(matches!(
            cursor.read_varuint32(),
            Err(DecodeErrorKind::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_varint32_zigzag() {
        for value in [0, -1, 1, -64, 64, i32::MIN, i32::MAX] {
            let mut writer = BinaryWriter::new();
            writer.write_varint32(value);
            let bytes = writer.finish();
            assert_eq!(BinaryCursor::new(&bytes).read_varint32().unwrap(), value);
        }
        assert_eq!(BinaryCursor::new(&[0x01]).read_varint32().unwrap(), -1);
        assert_eq!(BinaryCursor::new(&[0x02]).read_varint32().unwrap(), 1);
    }

    #[test]
    fn test_read_bytes_does_not_advance_on_failure() {
        let mut cursor = BinaryCursor::new(&[1, 2, 3]);
        assert_eq!(cursor.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(
            cursor.read_bytes(2),
            Err(DecodeErrorKind::UnexpectedEof {
                needed: 2,
                remaining: 1
            })
        );
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_fixed_width_little_endian() {
        let mut cursor = BinaryCursor::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(cursor.read_u16().unwrap(), 0x0201);
        assert_eq!(cursor.read_u32().unwrap(), 0x06050403);
        assert_eq!(cursor.consumed_since(2), &[0x03, 0x04, 0x05, 0x06]);
    }
}
