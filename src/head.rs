//! Single-item header decoding.
//!
//! A CBOR item starts with one initial byte: the top three bits select the
//! major type, the low five bits carry either a literal argument (0..=23), the
//! width of a big-endian argument that follows (24..=27), a reserved value
//! (28..=30), or the indefinite-length marker (31).

use half::f16;

use crate::wire;
use crate::ErrorCode;

/// The shape of a decoded item, without its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Major type 0.
    PositiveInt,
    /// Major type 1; the argument `n` encodes the value `-1 - n`.
    NegativeInt,
    /// Major type 2 with a definite length.
    ByteString,
    /// Major type 3 with a definite length.
    TextString,
    /// Major type 4 with a definite element count.
    Array,
    /// Major type 5 with a definite pair count.
    Map,
    /// Major type 6.
    Tag,
    /// Major type 7 simple value (false, true, null, undefined, or unassigned).
    Simple,
    /// Major type 7 half- or single-precision float.
    Float32,
    /// Major type 7 double-precision float.
    Float64,
    /// Terminal error state.
    Error,
    /// The `0xff` break marker.
    IndefiniteBreak,
    /// Major type 2, indefinite length.
    IndefiniteByteString,
    /// Major type 3, indefinite length.
    IndefiniteTextString,
    /// Major type 4, indefinite length.
    IndefiniteArray,
    /// Major type 5, indefinite length.
    IndefiniteMap,
}

/// A decoded header: the item's [`Kind`] together with the argument that is
/// meaningful for that kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Head {
    /// Unsigned integer value.
    PositiveInt(u64),
    /// Negative integer argument `n`, representing `-1 - n`.
    NegativeInt(u64),
    /// Byte-string payload length.
    ByteString(u64),
    /// Text-string payload length in bytes.
    TextString(u64),
    /// Array element count.
    Array(u64),
    /// Map pair count.
    Map(u64),
    /// Tag number.
    Tag(u64),
    /// Simple-value code.
    Simple(u8),
    /// Half-precision values are widened losslessly to `f32`.
    Float32(f32),
    /// Double-precision value.
    Float64(f64),
    /// Why decoding or traversal failed.
    Error(ErrorCode),
    /// Break marker.
    IndefiniteBreak,
    /// Indefinite-length byte string (chunks follow).
    IndefiniteByteString,
    /// Indefinite-length text string (chunks follow).
    IndefiniteTextString,
    /// Indefinite-length array.
    IndefiniteArray,
    /// Indefinite-length map.
    IndefiniteMap,
}

impl Head {
    /// Returns the kind of this header.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::PositiveInt(_) => Kind::PositiveInt,
            Self::NegativeInt(_) => Kind::NegativeInt,
            Self::ByteString(_) => Kind::ByteString,
            Self::TextString(_) => Kind::TextString,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
            Self::Tag(_) => Kind::Tag,
            Self::Simple(_) => Kind::Simple,
            Self::Float32(_) => Kind::Float32,
            Self::Float64(_) => Kind::Float64,
            Self::Error(_) => Kind::Error,
            Self::IndefiniteBreak => Kind::IndefiniteBreak,
            Self::IndefiniteByteString => Kind::IndefiniteByteString,
            Self::IndefiniteTextString => Kind::IndefiniteTextString,
            Self::IndefiniteArray => Kind::IndefiniteArray,
            Self::IndefiniteMap => Kind::IndefiniteMap,
        }
    }

    /// Returns the raw integer argument.
    ///
    /// Floats report their IEEE bit pattern (half floats as the bits of the
    /// widened `f32`). Indefinite-length kinds and the break marker have no
    /// argument and report `0`; errors report their numeric code.
    #[must_use]
    pub fn argument(&self) -> u64 {
        match *self {
            Self::PositiveInt(v)
            | Self::NegativeInt(v)
            | Self::ByteString(v)
            | Self::TextString(v)
            | Self::Array(v)
            | Self::Map(v)
            | Self::Tag(v) => v,
            Self::Simple(v) => u64::from(v),
            Self::Error(code) => u64::from(code.code()),
            Self::Float32(v) => u64::from(v.to_bits()),
            Self::Float64(v) => v.to_bits(),
            Self::IndefiniteBreak
            | Self::IndefiniteByteString
            | Self::IndefiniteTextString
            | Self::IndefiniteArray
            | Self::IndefiniteMap => 0,
        }
    }
}

/// Decodes exactly one header starting at `start`.
///
/// Returns the header and the position just past the header bytes (the
/// payload start). No payload or child is inspected.
pub(crate) fn decode_head(data: &[u8], start: usize) -> Result<(Head, usize), ErrorCode> {
    let mut pos = start;
    let ib = wire::read_u8(data, &mut pos)?;
    let major = ib >> 5;
    let ai = ib & 0x1f;

    if ai == 31 {
        let head = match major {
            2 => Head::IndefiniteByteString,
            3 => Head::IndefiniteTextString,
            4 => Head::IndefiniteArray,
            5 => Head::IndefiniteMap,
            7 => Head::IndefiniteBreak,
            _ => return Err(ErrorCode::InvalidAdditionalInfo),
        };
        return Ok((head, pos));
    }

    if major == 7 {
        let head = match ai {
            25 => Head::Float32(f16::from_bits(wire::read_be_u16(data, &mut pos)?).to_f32()),
            26 => Head::Float32(f32::from_bits(wire::read_be_u32(data, &mut pos)?)),
            27 => Head::Float64(f64::from_bits(wire::read_be_u64(data, &mut pos)?)),
            _ => {
                let v = wire::read_arg(data, &mut pos, ai)?;
                Head::Simple(u8::try_from(v).map_err(|_| ErrorCode::ShouldBeImpossible)?)
            }
        };
        return Ok((head, pos));
    }

    let arg = wire::read_arg(data, &mut pos, ai)?;
    let head = match major {
        0 => Head::PositiveInt(arg),
        1 => Head::NegativeInt(arg),
        2 => Head::ByteString(arg),
        3 => Head::TextString(arg),
        4 => Head::Array(arg),
        5 => Head::Map(arg),
        6 => Head::Tag(arg),
        _ => return Err(ErrorCode::ShouldBeImpossible),
    };
    Ok((head, pos))
}
