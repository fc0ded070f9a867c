//! RFC 8746 typed arrays.
//!
//! Tags 64..87 mark a byte string as a packed run of fixed-width numbers. The
//! low five bits of `tag - 64` are laid out as `f s e l l`: `f` selects float
//! elements, `s` signed integers, `e` little-endian byte order, and `ll` the
//! element width.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use num_traits::AsPrimitive;

use crate::trace::trace_event;
use crate::{CborError, ErrorCode};

/// First tag number of the RFC 8746 typed-array block.
pub const TYPED_ARRAY_TAG_MIN: u64 = 64;
/// One past the last typed-array tag this crate recognises.
pub const TYPED_ARRAY_TAG_END: u64 = 87;

/// Byte order of typed-array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl Endian {
    /// The byte order of the target platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;
    /// The byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;
}

/// Element type of a typed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `u8`, tag 64.
    Uint8,
    /// `u8` with clamped arithmetic semantics, tag 68.
    Uint8Clamped,
    /// `i8`, tag 72.
    Sint8,
    /// `u16`.
    Uint16,
    /// `i16`.
    Sint16,
    /// `u32`.
    Uint32,
    /// `i32`.
    Sint32,
    /// `u64`.
    Uint64,
    /// `i64`.
    Sint64,
    /// IEEE half precision. Recognised but not decodable.
    Float16,
    /// IEEE single precision.
    Float32,
    /// IEEE double precision.
    Float64,
    /// IEEE quadruple precision. Recognised but not decodable.
    Float128,
}

impl ElementType {
    /// Width of one element in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Uint8 | Self::Uint8Clamped | Self::Sint8 => 1,
            Self::Uint16 | Self::Sint16 | Self::Float16 => 2,
            Self::Uint32 | Self::Sint32 | Self::Float32 => 4,
            Self::Uint64 | Self::Sint64 | Self::Float64 => 8,
            Self::Float128 => 16,
        }
    }

    /// Whether elements are IEEE floats.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            Self::Float16 | Self::Float32 | Self::Float64 | Self::Float128
        )
    }

    /// Whether elements are two's-complement signed integers.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Sint8 | Self::Sint16 | Self::Sint32 | Self::Sint64)
    }

    const fn is_decodable(self) -> bool {
        !matches!(self, Self::Float16 | Self::Float128)
    }
}

/// A decoded typed-array tag: element type plus declared byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedArrayTag {
    element: ElementType,
    endian: Endian,
}

impl TypedArrayTag {
    /// Builds a tag description. Byte order is irrelevant for one-byte
    /// elements and is normalised to big-endian for them.
    #[must_use]
    pub const fn new(element: ElementType, endian: Endian) -> Self {
        let endian = if element.width() == 1 {
            Endian::Big
        } else {
            endian
        };
        Self { element, endian }
    }

    /// Interprets a tag number in `64..87`.
    #[must_use]
    pub const fn from_tag(tag: u64) -> Option<Self> {
        if tag < TYPED_ARRAY_TAG_MIN || tag >= TYPED_ARRAY_TAG_END {
            return None;
        }
        let bits = tag - TYPED_ARRAY_TAG_MIN;
        let float = bits & 0x10 != 0;
        let signed = bits & 0x08 != 0;
        let little = bits & 0x04 != 0;
        let ll = bits & 0x03;
        let element = match (float, signed, ll) {
            (false, false, 0) if little => ElementType::Uint8Clamped,
            (false, false, 0) => ElementType::Uint8,
            (false, false, 1) => ElementType::Uint16,
            (false, false, 2) => ElementType::Uint32,
            (false, false, 3) => ElementType::Uint64,
            (false, true, 0) => ElementType::Sint8,
            (false, true, 1) => ElementType::Sint16,
            (false, true, 2) => ElementType::Sint32,
            (false, true, _) => ElementType::Sint64,
            (true, _, 0) => ElementType::Float16,
            (true, _, 1) => ElementType::Float32,
            (true, _, 2) => ElementType::Float64,
            _ => ElementType::Float128,
        };
        let endian = if little { Endian::Little } else { Endian::Big };
        Some(Self::new(element, endian))
    }

    /// The tag number that encodes this description.
    #[must_use]
    pub const fn tag(self) -> u64 {
        let (float, signed, ll) = match self.element {
            ElementType::Uint8Clamped => return TYPED_ARRAY_TAG_MIN + 4,
            ElementType::Uint8 => (0, 0, 0),
            ElementType::Uint16 => (0, 0, 1),
            ElementType::Uint32 => (0, 0, 2),
            ElementType::Uint64 => (0, 0, 3),
            ElementType::Sint8 => (0, 1, 0),
            ElementType::Sint16 => (0, 1, 1),
            ElementType::Sint32 => (0, 1, 2),
            ElementType::Sint64 => (0, 1, 3),
            ElementType::Float16 => (1, 0, 0),
            ElementType::Float32 => (1, 0, 1),
            ElementType::Float64 => (1, 0, 2),
            ElementType::Float128 => (1, 0, 3),
        };
        let little = match self.endian {
            Endian::Little => 1,
            Endian::Big => 0,
        };
        TYPED_ARRAY_TAG_MIN + (float << 4) + (signed << 3) + (little << 2) + ll
    }

    /// Element type.
    #[must_use]
    pub const fn element_type(self) -> ElementType {
        self.element
    }

    /// Declared byte order.
    #[must_use]
    pub const fn endian(self) -> Endian {
        self.endian
    }

    /// Bytes per element.
    #[must_use]
    pub const fn stride(self) -> usize {
        self.element.width()
    }
}

/// Numeric types a typed array can be read into.
///
/// Conversions follow `as` semantics: integers are widened or truncated and
/// floats saturate when narrowed to an integer type.
pub trait ReadTarget: Copy + 'static {
    /// Converts an unsigned element.
    fn from_u64(v: u64) -> Self;
    /// Converts a signed element.
    fn from_i64(v: i64) -> Self;
    /// Converts a single-precision element.
    fn from_f32(v: f32) -> Self;
    /// Converts a double-precision element.
    fn from_f64(v: f64) -> Self;
}

impl<T> ReadTarget for T
where
    T: Copy + 'static,
    u64: AsPrimitive<T>,
    i64: AsPrimitive<T>,
    f32: AsPrimitive<T>,
    f64: AsPrimitive<T>,
{
    fn from_u64(v: u64) -> Self {
        v.as_()
    }

    fn from_i64(v: i64) -> Self {
        v.as_()
    }

    fn from_f32(v: f32) -> Self {
        v.as_()
    }

    fn from_f64(v: f64) -> Self {
        v.as_()
    }
}

/// A borrowed typed-array payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedArray<'a> {
    tag: TypedArrayTag,
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> TypedArray<'a> {
    /// Views `bytes` as elements described by `tag`.
    #[must_use]
    pub const fn new(tag: TypedArrayTag, bytes: &'a [u8]) -> Self {
        Self::at(tag, bytes, 0)
    }

    pub(crate) const fn at(tag: TypedArrayTag, bytes: &'a [u8], offset: usize) -> Self {
        Self { tag, bytes, offset }
    }

    /// The tag description.
    #[must_use]
    pub const fn tag(&self) -> TypedArrayTag {
        self.tag
    }

    /// The raw payload.
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of whole elements in the payload. Trailing bytes that do not
    /// fill an element are ignored.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len() / self.tag.stride()
    }

    /// Returns `true` if the payload holds no whole element.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies elements starting at element index `offset` into `target`,
    /// converting each to `T`.
    ///
    /// Copies `min(target.len(), len() - offset)` elements and returns that
    /// count; an `offset` past the end copies nothing.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedElementType` for half- and quad-precision float
    /// arrays.
    pub fn read<T: ReadTarget>(&self, target: &mut [T], offset: usize) -> Result<usize, CborError> {
        let element = self.tag.element_type();
        if !element.is_decodable() {
            trace_event!(
                offset = self.offset,
                element = ?element,
                "typed-array element type cannot be decoded"
            );
            return Err(CborError::decode(
                ErrorCode::UnsupportedElementType,
                self.offset,
            ));
        }

        let stride = self.tag.stride();
        let count = target.len().min(self.len().saturating_sub(offset));
        let elements = self.bytes.chunks_exact(stride).skip(offset);
        for (slot, raw) in target[..count].iter_mut().zip(elements) {
            *slot = decode_element(element, assemble(raw, self.tag.endian()));
        }
        Ok(count)
    }

    /// Reads every element into a new vector.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    #[cfg(feature = "alloc")]
    pub fn to_vec<T: ReadTarget + Default>(&self) -> Result<Vec<T>, CborError> {
        let mut out = Vec::new();
        crate::alloc_util::try_reserve(&mut out, self.len())
            .map_err(|code| CborError::decode(code, self.offset))?;
        out.resize(self.len(), T::default());
        self.read(&mut out, 0)?;
        Ok(out)
    }
}

fn assemble(raw: &[u8], endian: Endian) -> u64 {
    let push = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    match endian {
        Endian::Big => raw.iter().fold(0, push),
        Endian::Little => raw.iter().rev().fold(0, push),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn decode_element<T: ReadTarget>(element: ElementType, raw: u64) -> T {
    match element {
        ElementType::Sint8 => T::from_i64(i64::from(raw as u8 as i8)),
        ElementType::Sint16 => T::from_i64(i64::from(raw as u16 as i16)),
        ElementType::Sint32 => T::from_i64(i64::from(raw as u32 as i32)),
        ElementType::Sint64 => T::from_i64(raw as i64),
        ElementType::Float32 => T::from_f32(f32::from_bits(raw as u32)),
        ElementType::Float64 => T::from_f64(f64::from_bits(raw)),
        _ => T::from_u64(raw),
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Numeric types the encoder can write as a typed array.
pub trait ArrayElement: Copy + sealed::Sealed {
    /// Element type this Rust type maps to.
    const ELEMENT_TYPE: ElementType;
    /// Fixed-size byte representation.
    type Bytes: AsRef<[u8]>;
    /// Serialises one element in the given byte order.
    fn to_bytes(self, endian: Endian) -> Self::Bytes;
}

macro_rules! array_element {
    ($($ty:ty => $element:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl ArrayElement for $ty {
                const ELEMENT_TYPE: ElementType = ElementType::$element;
                type Bytes = [u8; core::mem::size_of::<$ty>()];

                fn to_bytes(self, endian: Endian) -> Self::Bytes {
                    match endian {
                        Endian::Big => self.to_be_bytes(),
                        Endian::Little => self.to_le_bytes(),
                    }
                }
            }
        )*
    };
}

array_element! {
    u8 => Uint8,
    i8 => Sint8,
    u16 => Uint16,
    i16 => Sint16,
    u32 => Uint32,
    i32 => Sint32,
    u64 => Uint64,
    i64 => Sint64,
    f32 => Float32,
    f64 => Float64,
}
