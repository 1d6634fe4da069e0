use bytes::{BufMut, BytesMut};

use crate::codec::ARRAY_TAG;

/// The closed set of value kinds a command schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    /// Length-prefixed byte array. Only valid as a result.
    Bytes,
}

impl ValueKind {
    /// Width in bytes of a scalar kind, `None` for [`ValueKind::Bytes`].
    pub const fn width(self) -> Option<usize> {
        match self {
            ValueKind::I8 | ValueKind::U8 => Some(1),
            ValueKind::I16 | ValueKind::U16 => Some(2),
            ValueKind::I32 | ValueKind::U32 => Some(4),
            ValueKind::Bytes => None,
        }
    }

    /// The tag byte that precedes a value of this kind on the wire.
    ///
    /// Signedness is not carried on the wire; `I8` and `U8` share a tag.
    pub const fn wire_tag(self) -> u8 {
        match self.width() {
            Some(width) => width as u8,
            None => ARRAY_TAG,
        }
    }

    pub const fn is_scalar(self) -> bool {
        self.width().is_some()
    }
}

/// A scalar argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::I8(_) => ValueKind::I8,
            Value::U8(_) => ValueKind::U8,
            Value::I16(_) => ValueKind::I16,
            Value::U16(_) => ValueKind::U16,
            Value::I32(_) => ValueKind::I32,
            Value::U32(_) => ValueKind::U32,
        }
    }

    /// Write the tag and little-endian value.
    pub(crate) fn put(&self, dst: &mut BytesMut) {
        dst.put_u8(self.kind().wire_tag());
        match *self {
            Value::I8(v) => dst.put_i8(v),
            Value::U8(v) => dst.put_u8(v),
            Value::I16(v) => dst.put_i16_le(v),
            Value::U16(v) => dst.put_u16_le(v),
            Value::I32(v) => dst.put_i32_le(v),
            Value::U32(v) => dst.put_u32_le(v),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from!(i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32, u32 => U32);

/// A decoded result value. Byte arrays borrow from the reply buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultValue<'a> {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    Bytes(&'a [u8]),
}

impl<'a> ResultValue<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ResultValue::I8(_) => ValueKind::I8,
            ResultValue::U8(_) => ValueKind::U8,
            ResultValue::I16(_) => ValueKind::I16,
            ResultValue::U16(_) => ValueKind::U16,
            ResultValue::I32(_) => ValueKind::I32,
            ResultValue::U32(_) => ValueKind::U32,
            ResultValue::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Widen any scalar to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ResultValue::I8(v) => Some(v.into()),
            ResultValue::U8(v) => Some(v.into()),
            ResultValue::I16(v) => Some(v.into()),
            ResultValue::U16(v) => Some(v.into()),
            ResultValue::I32(v) => Some(v.into()),
            ResultValue::U32(v) => Some(v.into()),
            ResultValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            ResultValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub(crate) fn put(&self, dst: &mut BytesMut) {
        dst.put_u8(self.kind().wire_tag());
        match *self {
            ResultValue::I8(v) => dst.put_i8(v),
            ResultValue::U8(v) => dst.put_u8(v),
            ResultValue::I16(v) => dst.put_i16_le(v),
            ResultValue::U16(v) => dst.put_u16_le(v),
            ResultValue::I32(v) => dst.put_i32_le(v),
            ResultValue::U32(v) => dst.put_u32_le(v),
            ResultValue::Bytes(bytes) => {
                dst.put_u32_le(bytes.len() as u32);
                dst.put_slice(bytes);
            }
        }
    }
}
