//! Wire field types and codecs.
//!
//! Fields use the Minecraft-style wire encoding: big-endian scalars,
//! VarInts carrying seven bits per byte with a continuation bit, VarInt
//! length-prefixed UTF-8 strings, and block positions packed into one u64.

use bytes::{Buf, BufMut, BytesMut};
use serde_json::Value;

use crate::{RemapError, Result};

/// Wire type tags for packet fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Boolean,
    Byte,
    UnsignedByte,
    Short,
    Int,
    Long,
    Float,
    Double,
    VarInt,
    String,
    Component,
    Position,
}

impl FieldType {
    /// Decode one field of this type from the buffer.
    pub fn read(self, buf: &mut BytesMut) -> Result<FieldValue> {
        Ok(match self {
            Self::Boolean => FieldValue::Boolean(read_bool(buf)?),
            Self::Byte => FieldValue::Byte(read_byte(buf)?),
            Self::UnsignedByte => FieldValue::UnsignedByte(read_unsigned_byte(buf)?),
            Self::Short => FieldValue::Short(read_short(buf)?),
            Self::Int => FieldValue::Int(read_int(buf)?),
            Self::Long => FieldValue::Long(read_long(buf)?),
            Self::Float => FieldValue::Float(read_float(buf)?),
            Self::Double => FieldValue::Double(read_double(buf)?),
            Self::VarInt => FieldValue::VarInt(read_var_int(buf)?),
            Self::String => FieldValue::String(read_string(buf)?),
            Self::Component => FieldValue::Component(read_component(buf)?),
            Self::Position => FieldValue::Position(read_position(buf)?),
        })
    }
}

/// Block coordinates packed into a single u64 on the wire:
/// 26 bits x, 12 bits y, 26 bits z, all two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// A decoded packet field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    Byte(i8),
    UnsignedByte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    VarInt(i32),
    String(String),
    Component(Value),
    Position(BlockPos),
}

impl FieldValue {
    /// The wire type this value encodes as.
    pub fn kind(&self) -> FieldType {
        match self {
            Self::Boolean(_) => FieldType::Boolean,
            Self::Byte(_) => FieldType::Byte,
            Self::UnsignedByte(_) => FieldType::UnsignedByte,
            Self::Short(_) => FieldType::Short,
            Self::Int(_) => FieldType::Int,
            Self::Long(_) => FieldType::Long,
            Self::Float(_) => FieldType::Float,
            Self::Double(_) => FieldType::Double,
            Self::VarInt(_) => FieldType::VarInt,
            Self::String(_) => FieldType::String,
            Self::Component(_) => FieldType::Component,
            Self::Position(_) => FieldType::Position,
        }
    }

    /// Encode this value in its wire format.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Self::Boolean(v) => buf.put_u8(u8::from(*v)),
            Self::Byte(v) => buf.put_i8(*v),
            Self::UnsignedByte(v) => buf.put_u8(*v),
            Self::Short(v) => buf.put_i16(*v),
            Self::Int(v) => buf.put_i32(*v),
            Self::Long(v) => buf.put_i64(*v),
            Self::Float(v) => buf.put_f32(*v),
            Self::Double(v) => buf.put_f64(*v),
            Self::VarInt(v) => write_var_int(buf, *v),
            Self::String(v) => write_string(buf, v),
            Self::Component(v) => write_string(buf, &v.to_string()),
            Self::Position(v) => write_position(buf, *v),
        }
    }

    pub fn as_var_int(&self) -> Result<i32> {
        match self {
            Self::VarInt(v) => Ok(*v),
            other => Err(mismatch(FieldType::VarInt, other)),
        }
    }

    pub fn as_unsigned_byte(&self) -> Result<u8> {
        match self {
            Self::UnsignedByte(v) => Ok(*v),
            other => Err(mismatch(FieldType::UnsignedByte, other)),
        }
    }

    pub fn as_byte(&self) -> Result<i8> {
        match self {
            Self::Byte(v) => Ok(*v),
            other => Err(mismatch(FieldType::Byte, other)),
        }
    }

    pub fn as_float(&self) -> Result<f32> {
        match self {
            Self::Float(v) => Ok(*v),
            other => Err(mismatch(FieldType::Float, other)),
        }
    }

    pub fn as_string(&self) -> Result<&str> {
        match self {
            Self::String(v) => Ok(v),
            other => Err(mismatch(FieldType::String, other)),
        }
    }

    pub fn as_component(&self) -> Result<&Value> {
        match self {
            Self::Component(v) => Ok(v),
            other => Err(mismatch(FieldType::Component, other)),
        }
    }

    pub fn as_position(&self) -> Result<BlockPos> {
        match self {
            Self::Position(v) => Ok(*v),
            other => Err(mismatch(FieldType::Position, other)),
        }
    }
}

fn mismatch(expected: FieldType, actual: &FieldValue) -> RemapError {
    RemapError::TypeMismatch {
        expected,
        actual: actual.kind(),
    }
}

/// Read a Boolean (1 byte, zero is false)
#[inline]
pub fn read_bool(buf: &mut BytesMut) -> Result<bool> {
    if buf.remaining() < 1 {
        return Err(RemapError::ShortRead(FieldType::Boolean));
    }
    Ok(buf.get_u8() != 0)
}

/// Read a Byte (1 byte, signed)
#[inline]
pub fn read_byte(buf: &mut BytesMut) -> Result<i8> {
    if buf.remaining() < 1 {
        return Err(RemapError::ShortRead(FieldType::Byte));
    }
    Ok(buf.get_i8())
}

/// Read an UnsignedByte (1 byte)
#[inline]
pub fn read_unsigned_byte(buf: &mut BytesMut) -> Result<u8> {
    if buf.remaining() < 1 {
        return Err(RemapError::ShortRead(FieldType::UnsignedByte));
    }
    Ok(buf.get_u8())
}

/// Read a Short (2 bytes, big-endian)
#[inline]
pub fn read_short(buf: &mut BytesMut) -> Result<i16> {
    if buf.remaining() < 2 {
        return Err(RemapError::ShortRead(FieldType::Short));
    }
    Ok(buf.get_i16())
}

/// Read an Int (4 bytes, big-endian)
#[inline]
pub fn read_int(buf: &mut BytesMut) -> Result<i32> {
    if buf.remaining() < 4 {
        return Err(RemapError::ShortRead(FieldType::Int));
    }
    Ok(buf.get_i32())
}

/// Read a Long (8 bytes, big-endian)
#[inline]
pub fn read_long(buf: &mut BytesMut) -> Result<i64> {
    if buf.remaining() < 8 {
        return Err(RemapError::ShortRead(FieldType::Long));
    }
    Ok(buf.get_i64())
}

/// Read a Float (4 bytes, big-endian IEEE 754)
#[inline]
pub fn read_float(buf: &mut BytesMut) -> Result<f32> {
    if buf.remaining() < 4 {
        return Err(RemapError::ShortRead(FieldType::Float));
    }
    Ok(buf.get_f32())
}

/// Read a Double (8 bytes, big-endian IEEE 754)
#[inline]
pub fn read_double(buf: &mut BytesMut) -> Result<f64> {
    if buf.remaining() < 8 {
        return Err(RemapError::ShortRead(FieldType::Double));
    }
    Ok(buf.get_f64())
}

/// Read a VarInt (1-5 bytes)
///
/// # Format
/// - Each byte carries 7 value bits, least significant group first
/// - The high bit is the continuation flag
/// - Five bytes at most; a fifth byte with the flag set is an error
#[inline]
pub fn read_var_int(buf: &mut BytesMut) -> Result<i32> {
    let mut value: i32 = 0;
    let mut shift = 0;
    loop {
        if buf.remaining() < 1 {
            return Err(RemapError::ShortRead(FieldType::VarInt));
        }
        let byte = buf.get_u8();
        value |= i32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 35 {
            return Err(RemapError::VarIntTooLong);
        }
    }
}

/// Write a VarInt
#[inline]
pub fn write_var_int(buf: &mut BytesMut, val: i32) {
    let mut raw = val as u32;
    loop {
        if raw & !0x7F == 0 {
            buf.put_u8(raw as u8);
            return;
        }
        buf.put_u8((raw as u8 & 0x7F) | 0x80);
        raw >>= 7;
    }
}

/// Read a String (VarInt byte length, then UTF-8 bytes)
#[inline]
pub fn read_string(buf: &mut BytesMut) -> Result<String> {
    let len = read_var_int(buf)?;
    if len < 0 {
        return Err(RemapError::InvalidData(format!(
            "negative string length: {len}"
        )));
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(RemapError::ShortRead(FieldType::String));
    }
    let bytes = buf.copy_to_bytes(len);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| RemapError::InvalidData(format!("Invalid UTF-8: {e}")))
}

/// Write a String
#[inline]
pub fn write_string(buf: &mut BytesMut, val: &str) {
    write_var_int(buf, val.len() as i32);
    buf.put_slice(val.as_bytes());
}

/// Read a Component (a String holding JSON chat text)
#[inline]
pub fn read_component(buf: &mut BytesMut) -> Result<Value> {
    let text = read_string(buf)?;
    serde_json::from_str(&text)
        .map_err(|e| RemapError::InvalidData(format!("Invalid component JSON: {e}")))
}

/// Read a Position (8 bytes)
///
/// # Format
/// - Bits 38-63: x (26 bits, signed)
/// - Bits 26-37: y (12 bits, signed)
/// - Bits 0-25: z (26 bits, signed)
#[inline]
pub fn read_position(buf: &mut BytesMut) -> Result<BlockPos> {
    if buf.remaining() < 8 {
        return Err(RemapError::ShortRead(FieldType::Position));
    }
    let packed = buf.get_u64();

    let mut x = ((packed >> 38) & 0x3FF_FFFF) as i64;
    let mut y = ((packed >> 26) & 0xFFF) as i64;
    let mut z = (packed & 0x3FF_FFFF) as i64;
    if x >= 1 << 25 {
        x -= 1 << 26;
    }
    if y >= 1 << 11 {
        y -= 1 << 12;
    }
    if z >= 1 << 25 {
        z -= 1 << 26;
    }

    Ok(BlockPos {
        x: x as i32,
        y: y as i32,
        z: z as i32,
    })
}

/// Write a Position
#[inline]
pub fn write_position(buf: &mut BytesMut, pos: BlockPos) {
    let packed = ((pos.x as u64 & 0x3FF_FFFF) << 38)
        | ((pos.y as u64 & 0xFFF) << 26)
        | (pos.z as u64 & 0x3FF_FFFF);
    buf.put_u64(packed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_var_int_roundtrip() {
        let test_cases = vec![0i32, 1, 127, 128, 300, 25565, 2097151, i32::MAX, -1, i32::MIN];

        for val in test_cases {
            let mut buf = BytesMut::new();
            write_var_int(&mut buf, val);
            let decoded = read_var_int(&mut buf).unwrap();
            assert_eq!(val, decoded, "Failed for {}", val);
            assert_eq!(buf.remaining(), 0);
        }
    }

    #[test]
    fn test_var_int_encoding_matches_wire() {
        let mut buf = BytesMut::new();
        write_var_int(&mut buf, 300);
        assert_eq!(&buf[..], &[0xAC, 0x02]);

        let mut buf = BytesMut::new();
        write_var_int(&mut buf, 0);
        assert_eq!(&buf[..], &[0x00]);

        // Negative values always take the full five bytes.
        let mut buf = BytesMut::new();
        write_var_int(&mut buf, -1);
        assert_eq!(&buf[..], &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_var_int_overlong_rejected() {
        let mut buf = BytesMut::from(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01][..]);
        assert!(matches!(
            read_var_int(&mut buf),
            Err(RemapError::VarIntTooLong)
        ));
    }

    #[test]
    fn test_var_int_truncated() {
        let mut buf = BytesMut::from(&[0x80][..]);
        assert!(matches!(
            read_var_int(&mut buf),
            Err(RemapError::ShortRead(FieldType::VarInt))
        ));
    }

    #[test]
    fn test_string_roundtrip() {
        let test_cases = vec!["", "chat", "Zürich ⚡", "a longer line of chat text"];

        for val in test_cases {
            let mut buf = BytesMut::new();
            write_string(&mut buf, val);
            let decoded = read_string(&mut buf).unwrap();
            assert_eq!(val, decoded, "Failed for {}", val);
        }
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let mut buf = BytesMut::new();
        write_var_int(&mut buf, 2);
        buf.put_slice(&[0xC3, 0x28]);
        assert!(matches!(
            read_string(&mut buf),
            Err(RemapError::InvalidData(_))
        ));
    }

    #[test]
    fn test_string_truncated_body() {
        let mut buf = BytesMut::new();
        write_var_int(&mut buf, 10);
        buf.put_slice(b"abc");
        assert!(matches!(
            read_string(&mut buf),
            Err(RemapError::ShortRead(FieldType::String))
        ));
    }

    #[test]
    fn test_component_roundtrip() {
        let component = json!({ "text": "hello", "color": "red" });
        let mut buf = BytesMut::new();
        FieldValue::Component(component.clone()).encode(&mut buf);
        let decoded = read_component(&mut buf).unwrap();
        assert_eq!(decoded, component);
    }

    #[test]
    fn test_position_roundtrip() {
        let test_cases = vec![
            BlockPos { x: 0, y: 0, z: 0 },
            BlockPos { x: 100, y: 64, z: -100 },
            BlockPos { x: -33554432, y: -2048, z: 33554431 },
            BlockPos { x: 33554431, y: 2047, z: -33554432 },
        ];

        for pos in test_cases {
            let mut buf = BytesMut::new();
            write_position(&mut buf, pos);
            let decoded = read_position(&mut buf).unwrap();
            assert_eq!(pos, decoded, "Failed for {:?}", pos);
        }
    }

    #[test]
    fn test_read_dispatch_matches_kind() {
        let values = vec![
            FieldValue::Boolean(true),
            FieldValue::Byte(-5),
            FieldValue::UnsignedByte(200),
            FieldValue::Short(-1234),
            FieldValue::Int(123456),
            FieldValue::Long(-9876543210),
            FieldValue::Float(1.5),
            FieldValue::Double(-2.25),
            FieldValue::VarInt(300),
            FieldValue::String("abc".into()),
            FieldValue::Component(json!({ "text": "x" })),
            FieldValue::Position(BlockPos { x: 1, y: 2, z: 3 }),
        ];

        for value in values {
            let mut buf = BytesMut::new();
            value.encode(&mut buf);
            let decoded = value.kind().read(&mut buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(buf.remaining(), 0);
        }
    }

    #[test]
    fn test_scalar_truncation_reports_type() {
        let mut buf = BytesMut::from(&[0x00, 0x01][..]);
        assert!(matches!(
            read_double(&mut buf),
            Err(RemapError::ShortRead(FieldType::Double))
        ));
    }
}
