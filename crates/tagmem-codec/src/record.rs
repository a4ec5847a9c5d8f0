//! Record byte layouts.
//!
//! ```text
//! empty     [i8 sentinel]
//! boolean   [u8 0|1]
//! string    [u32 utf8 bytes][u32 utf16 units][utf8 ...]
//! number    [u32 width][u32 flags][width bytes]
//! bigint    [8 bytes, i64 or u64]
//! view      [element bytes ...]
//! extern    [u32 type tag][u32 kind tag][u32 index][u32 0]
//! ```
//!
//! All integers are little-endian. The layout alone does not say which
//! of these a record is, nor whether an integer payload is signed; that
//! travels alongside as a [`RecordShape`].

use tagmem_core::ElementKind;
use tagmem_pointer::{Flavor, TypedPointer};
use tagmem_region::Region;

use crate::error::CodecError;
use crate::externref::MarkerId;
use crate::number::{narrow_bigint, narrow_number, widen, NumberFlags};
use crate::value::{TypedArray, Value};

/// One-byte records standing for an empty value of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum EmptyKind {
    /// `undefined`.
    Undefined = -1,
    /// `null`.
    Null = -2,
    /// The number zero.
    Number = -3,
    /// The empty string.
    String = -4,
    /// The big integer zero.
    BigInt = -5,
}

impl EmptyKind {
    /// The sentinel byte.
    pub const fn byte(self) -> u8 {
        self as i8 as u8
    }
}

/// What a record's bytes mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordShape {
    /// Always the `undefined` sentinel.
    Undefined,
    /// Always the `null` sentinel.
    Null,
    /// One byte, 0 or 1.
    Boolean,
    /// A number record of the given payload kind, or the zero sentinel.
    Number(ElementKind),
    /// A string record, or the empty-string sentinel.
    String,
    /// A big integer of the given kind, or the zero sentinel.
    BigInt(ElementKind),
    /// A symbol description as a string record.
    Symbol,
    /// Raw elements of a typed-array view.
    View(ElementKind),
    /// A byte copy of a pointer's block.
    Pointer(ElementKind, Flavor),
    /// An external reference record.
    Extern(MarkerId),
}

/// Encoded bytes with their shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// How to read `bytes`.
    pub shape: RecordShape,
    /// The record as it is stored in the region.
    pub bytes: Vec<u8>,
}

impl Record {
    fn empty(kind: EmptyKind, shape: RecordShape) -> Self {
        Self {
            shape,
            bytes: vec![kind.byte()],
        }
    }

    /// Stored length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the record has no bytes. Only a view of no elements
    /// produces one, and the allocator rejects it.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether this is a one-byte sentinel record.
    pub fn is_sentinel(&self) -> bool {
        sentinel(self.shape, &self.bytes).is_some()
    }
}

/// Encode a value to its record.
///
/// `region` is read only for pointer values, whose block is copied.
///
/// # Errors
///
/// - [`CodecError::UnsupportedKind`] for host objects, which become
///   references rather than records.
/// - [`CodecError::EncodingRange`] for integers wider than 64 bits.
pub fn encode_record(value: &Value, region: &Region) -> Result<Record, CodecError> {
    match value {
        Value::Undefined => Ok(Record::empty(EmptyKind::Undefined, RecordShape::Undefined)),
        Value::Null => Ok(Record::empty(EmptyKind::Null, RecordShape::Null)),
        Value::Boolean(b) => Ok(Record {
            shape: RecordShape::Boolean,
            bytes: vec![*b as u8],
        }),
        Value::Number(n) => encode_number(*n),
        Value::String(s) => Ok(encode_string(s, RecordShape::String)),
        Value::BigInt(n) => encode_bigint(*n),
        Value::Symbol(description) => Ok(encode_string(
            description.as_deref().unwrap_or(""),
            RecordShape::Symbol,
        )),
        Value::View(view) => Ok(Record {
            shape: RecordShape::View(view.kind()),
            bytes: view.as_bytes().to_vec(),
        }),
        Value::Pointer(pointer) => encode_pointer(pointer, region),
        Value::Object(_) => Err(CodecError::UnsupportedKind {
            kind: "host object",
        }),
    }
}

fn encode_number(value: f64) -> Result<Record, CodecError> {
    if value == 0.0 {
        return Ok(Record::empty(
            EmptyKind::Number,
            RecordShape::Number(ElementKind::U8),
        ));
    }
    let (kind, payload) = narrow_number(value)?;
    let mut bytes = Vec::with_capacity(8 + payload.len());
    bytes.extend_from_slice(&kind.bytes_per_element().to_le_bytes());
    bytes.extend_from_slice(&NumberFlags::of(value).bits().to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(Record {
        shape: RecordShape::Number(kind),
        bytes,
    })
}

fn encode_string(text: &str, shape: RecordShape) -> Record {
    if text.is_empty() {
        return Record::empty(EmptyKind::String, shape);
    }
    let utf8 = text.as_bytes();
    let units = text.encode_utf16().count() as u32;
    let mut bytes = Vec::with_capacity(8 + utf8.len());
    bytes.extend_from_slice(&(utf8.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&units.to_le_bytes());
    bytes.extend_from_slice(utf8);
    Record { shape, bytes }
}

fn encode_bigint(value: i128) -> Result<Record, CodecError> {
    if value == 0 {
        return Ok(Record::empty(
            EmptyKind::BigInt,
            RecordShape::BigInt(ElementKind::U64),
        ));
    }
    let (kind, payload) = narrow_bigint(value)?;
    Ok(Record {
        shape: RecordShape::BigInt(kind),
        bytes: payload.to_vec(),
    })
}

fn encode_pointer(pointer: &TypedPointer, region: &Region) -> Result<Record, CodecError> {
    Ok(Record {
        shape: RecordShape::Pointer(pointer.kind, pointer.flavor),
        bytes: pointer.pointer.to_bytes(region)?,
    })
}

/// The empty value a one-byte record stands for, if it is a sentinel
/// valid for `shape`.
fn sentinel(shape: RecordShape, bytes: &[u8]) -> Option<Value> {
    let [byte] = bytes else {
        return None;
    };
    let expect = |kind: EmptyKind, value: Value| (*byte == kind.byte()).then_some(value);
    match shape {
        RecordShape::Undefined => expect(EmptyKind::Undefined, Value::Undefined),
        RecordShape::Null => expect(EmptyKind::Null, Value::Null),
        RecordShape::Number(_) => expect(EmptyKind::Number, Value::Number(0.0)),
        RecordShape::String => expect(EmptyKind::String, Value::String(String::new())),
        RecordShape::Symbol => expect(EmptyKind::String, Value::Symbol(None)),
        RecordShape::BigInt(_) => expect(EmptyKind::BigInt, Value::BigInt(0)),
        RecordShape::Boolean
        | RecordShape::View(_)
        | RecordShape::Pointer(..)
        | RecordShape::Extern(_) => None,
    }
}

/// Decode record bytes of a shape that stands on its own.
///
/// Sentinels are recognised before any layout is parsed.
///
/// # Errors
///
/// - [`CodecError::MalformedRecord`] when the bytes do not fit the shape.
/// - [`CodecError::UnsupportedKind`] for pointer and extern shapes, which
///   need a context to resolve.
pub fn decode_record(shape: RecordShape, bytes: &[u8]) -> Result<Value, CodecError> {
    if let Some(value) = sentinel(shape, bytes) {
        return Ok(value);
    }
    match shape {
        RecordShape::Undefined | RecordShape::Null => Err(CodecError::malformed(format!(
            "{shape:?} record must be its one-byte sentinel"
        ))),
        RecordShape::Boolean => match bytes {
            [0] => Ok(Value::Boolean(false)),
            [1] => Ok(Value::Boolean(true)),
            _ => Err(CodecError::malformed("boolean record must be 0 or 1")),
        },
        RecordShape::Number(kind) => decode_number(kind, bytes),
        RecordShape::String => decode_string(bytes).map(Value::String),
        RecordShape::Symbol => decode_string(bytes).map(|s| Value::Symbol(Some(s))),
        RecordShape::BigInt(kind) => decode_bigint(kind, bytes),
        RecordShape::View(kind) => TypedArray::from_bytes(kind, bytes.to_vec())
            .map(Value::View)
            .ok_or_else(|| {
                CodecError::malformed(format!(
                    "{} bytes is not a whole number of {kind} elements",
                    bytes.len()
                ))
            }),
        RecordShape::Pointer(..) => Err(CodecError::UnsupportedKind {
            kind: "pointer copy",
        }),
        RecordShape::Extern(_) => Err(CodecError::UnsupportedKind {
            kind: "external reference",
        }),
    }
}

fn split_u32(bytes: &[u8]) -> Option<(u32, &[u8])> {
    let (head, rest) = bytes.split_first_chunk::<4>()?;
    Some((u32::from_le_bytes(*head), rest))
}

fn decode_number(kind: ElementKind, bytes: &[u8]) -> Result<Value, CodecError> {
    let (width, rest) =
        split_u32(bytes).ok_or_else(|| CodecError::malformed("number record too short"))?;
    let (_flags, payload) =
        split_u32(rest).ok_or_else(|| CodecError::malformed("number record too short"))?;
    if width != kind.bytes_per_element() || payload.len() != width as usize {
        return Err(CodecError::malformed(format!(
            "number record of width {width} with {} payload bytes for {kind}",
            payload.len()
        )));
    }
    widen(kind, payload)
        .map(Value::Number)
        .ok_or_else(|| CodecError::malformed(format!("{kind} is not a number kind")))
}

fn decode_string(bytes: &[u8]) -> Result<String, CodecError> {
    let (byte_length, rest) =
        split_u32(bytes).ok_or_else(|| CodecError::malformed("string record too short"))?;
    let (units, utf8) =
        split_u32(rest).ok_or_else(|| CodecError::malformed("string record too short"))?;
    if utf8.len() != byte_length as usize {
        return Err(CodecError::malformed(format!(
            "string header says {byte_length} bytes, record holds {}",
            utf8.len()
        )));
    }
    let text = std::str::from_utf8(utf8)
        .map_err(|e| CodecError::malformed(format!("string is not utf-8: {e}")))?;
    let counted = text.encode_utf16().count();
    if counted != units as usize {
        return Err(CodecError::malformed(format!(
            "string header says {units} utf-16 units, text has {counted}"
        )));
    }
    Ok(text.to_owned())
}

fn decode_bigint(kind: ElementKind, bytes: &[u8]) -> Result<Value, CodecError> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| CodecError::malformed("bigint record must be 8 bytes"))?;
    match kind {
        ElementKind::I64 => Ok(Value::BigInt(i64::from_le_bytes(raw).into())),
        ElementKind::U64 => Ok(Value::BigInt(u64::from_le_bytes(raw).into())),
        other => Err(CodecError::malformed(format!("{other} is not a bigint kind"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmem_pointer::{Values, U16, U8};

    fn region() -> Region {
        Region::with_capacity(4096).unwrap()
    }

    fn encode(value: Value) -> Record {
        encode_record(&value, &region()).unwrap()
    }

    fn round_trip(value: Value) -> Value {
        let record = encode(value);
        decode_record(record.shape, &record.bytes).unwrap()
    }

    #[test]
    fn empties_are_single_signed_bytes() {
        assert_eq!(encode(Value::Undefined).bytes, vec![0xFF]);
        assert_eq!(encode(Value::Null).bytes, vec![0xFE]);
        assert_eq!(encode(Value::Number(0.0)).bytes, vec![0xFD]);
        assert_eq!(encode(Value::from("")).bytes, vec![0xFC]);
        assert_eq!(encode(Value::BigInt(0)).bytes, vec![0xFB]);
        assert!(encode(Value::Number(-0.0)).is_sentinel());
    }

    #[test]
    fn booleans_are_one_byte() {
        assert_eq!(encode(Value::from(true)).bytes, vec![1]);
        assert_eq!(encode(Value::from(false)).bytes, vec![0]);
        assert_eq!(round_trip(Value::from(false)), Value::from(false));
    }

    #[test]
    fn number_layout() {
        let record = encode(Value::Number(255.0));
        assert_eq!(record.shape, RecordShape::Number(ElementKind::U8));
        assert_eq!(&record.bytes[..4], &1u32.to_le_bytes());
        assert_eq!(&record.bytes[4..8], &[0, 1, 1, 1]);
        assert_eq!(&record.bytes[8..], &[255]);

        let record = encode(Value::Number(256.0));
        assert_eq!(record.shape, RecordShape::Number(ElementKind::U16));
        assert_eq!(record.len(), 10);

        let record = encode(Value::Number(-129.0));
        assert_eq!(record.shape, RecordShape::Number(ElementKind::I16));
    }

    #[test]
    fn numbers_round_trip() {
        for n in [1.0, -1.0, 255.0, -129.0, 70_000.0, -3e9, 0.5, 0.1, f64::INFINITY] {
            assert_eq!(round_trip(Value::Number(n)), Value::Number(n), "{n}");
        }
        assert_eq!(round_trip(Value::Number(0.0)), Value::Number(0.0));
    }

    #[test]
    fn nan_keeps_full_layout() {
        let record = encode(Value::Number(f64::NAN));
        assert_eq!(record.shape, RecordShape::Number(ElementKind::F64));
        assert_eq!(record.bytes[4], 1);
        match decode_record(record.shape, &record.bytes).unwrap() {
            Value::Number(n) => assert!(n.is_nan()),
            other => panic!("decoded {other:?}"),
        }
    }

    #[test]
    fn integer_too_wide_fails() {
        let err = encode_record(&Value::Number(1e20), &region()).unwrap_err();
        assert!(matches!(err, CodecError::EncodingRange { .. }));
    }

    #[test]
    fn string_layout_counts_both_units() {
        let record = encode(Value::from("h\u{e9}\u{1F600}"));
        // 1 + 2 + 4 utf-8 bytes; 1 + 1 + 2 utf-16 units.
        assert_eq!(&record.bytes[..4], &7u32.to_le_bytes());
        assert_eq!(&record.bytes[4..8], &4u32.to_le_bytes());
        assert_eq!(round_trip(Value::from("h\u{e9}\u{1F600}")), Value::from("h\u{e9}\u{1F600}"));
        assert_eq!(round_trip(Value::from("")), Value::from(""));
    }

    #[test]
    fn bigints_pick_signedness() {
        assert_eq!(encode(Value::BigInt(-2)).shape, RecordShape::BigInt(ElementKind::I64));
        assert_eq!(encode(Value::BigInt(2)).bytes, 2u64.to_le_bytes().to_vec());
        let max = i128::from(u64::MAX);
        assert_eq!(round_trip(Value::BigInt(max)), Value::BigInt(max));
        assert_eq!(round_trip(Value::BigInt(0)), Value::BigInt(0));
        assert!(encode_record(&Value::BigInt(max + 1), &region()).is_err());
    }

    #[test]
    fn symbols_encode_their_description() {
        let record = encode(Value::Symbol(Some("tag".into())));
        assert_eq!(record.bytes, encode(Value::from("tag")).bytes);
        assert_eq!(record.shape, RecordShape::Symbol);
        assert_eq!(round_trip(Value::Symbol(None)), Value::Symbol(None));
    }

    #[test]
    fn views_copy_raw_elements() {
        let view = TypedArray::of::<U16>(&[1, 0x0203]);
        let record = encode(Value::from(view.clone()));
        assert_eq!(record.bytes, vec![1, 0, 3, 2]);
        assert_eq!(round_trip(Value::from(view.clone())), Value::from(view));
    }

    #[test]
    fn one_byte_view_is_not_a_sentinel() {
        let view = TypedArray::of::<U8>(&[EmptyKind::Undefined.byte()]);
        let record = encode(Value::from(view.clone()));
        assert!(!record.is_sentinel());
        assert_eq!(decode_record(record.shape, &record.bytes).unwrap(), Value::from(view));
    }

    #[test]
    fn pointers_copy_their_block() {
        let r = region();
        let values = Values::<U8>::from_slice(&r, &[9, 8, 7]).unwrap();
        let record = encode_record(&Value::from(values.erase()), &r).unwrap();
        assert_eq!(record.bytes, vec![9, 8, 7]);
        assert_eq!(record.shape, RecordShape::Pointer(ElementKind::U8, Flavor::Values));
    }

    #[test]
    fn malformed_records_are_rejected() {
        let bad = [
            (RecordShape::Number(ElementKind::U16), vec![2, 0, 0, 0, 0, 0, 0, 0, 1]),
            (RecordShape::String, vec![5, 0, 0, 0, 1, 0, 0, 0, b'a']),
            (RecordShape::String, vec![1, 0, 0, 0, 1, 0, 0, 0, 0xFF]),
            (RecordShape::Boolean, vec![2]),
            (RecordShape::Null, vec![0xFF]),
            (RecordShape::BigInt(ElementKind::U64), vec![1, 2, 3]),
        ];
        for (shape, bytes) in bad {
            assert!(
                matches!(decode_record(shape, &bytes), Err(CodecError::MalformedRecord { .. })),
                "{shape:?} {bytes:?}"
            );
        }
    }

    #[test]
    fn objects_have_no_record() {
        use crate::host::PlainObject;
        let object = Value::from(PlainObject::new("Map").into_ref());
        assert!(matches!(
            encode_record(&object, &region()),
            Err(CodecError::UnsupportedKind { .. })
        ));
    }
}
