//! Streaming CBOR encoder over an append-only byte sink.
//!
//! Integer, length and tag arguments always use the shortest head that can
//! hold them. The encoder keeps no nesting state: every `open_*` call must be
//! balanced by the caller, with [`Encoder::close`] for indefinite-length forms.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::trace::trace_event;
use crate::typed_array::{ArrayElement, Endian, TypedArrayTag};
use crate::{CborError, ErrorCode};

const MAJOR_UINT: u8 = 0;
const MAJOR_NINT: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const MAJOR_SIMPLE: u8 = 7;

const INDEFINITE: u8 = 31;
const BREAK: u8 = 0xff;

/// An append-only byte destination.
pub trait Sink {
    /// Appends `bytes`. A failed write must leave the sink unchanged.
    ///
    /// # Errors
    ///
    /// Returns an encode error when the sink cannot hold the bytes.
    fn write(&mut self, bytes: &[u8]) -> Result<(), CborError>;

    /// Appends one byte.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    fn write_u8(&mut self, byte: u8) -> Result<(), CborError> {
        self.write(&[byte])
    }

    /// Number of bytes written so far.
    fn position(&self) -> usize;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        (**self).write(bytes)
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), CborError> {
        (**self).write_u8(byte)
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}

#[cfg(feature = "alloc")]
impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        crate::alloc_util::try_reserve(self, bytes.len())
            .map_err(|code| CborError::encode(code, self.len()))?;
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), CborError> {
        if self.len() == self.capacity() {
            crate::alloc_util::try_reserve(self, 1)
                .map_err(|code| CborError::encode(code, self.len()))?;
        }
        self.push(byte);
        Ok(())
    }

    fn position(&self) -> usize {
        self.len()
    }
}

/// A sink writing into a caller-provided fixed buffer.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    /// Wraps `buf`; writing starts at its first byte.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// The bytes written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Bytes of space left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }
}

impl Sink for SliceSink<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        if bytes.len() > self.remaining() {
            return Err(CborError::encode(ErrorCode::BufferFull, self.len));
        }
        let end = self.len + bytes.len();
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    fn position(&self) -> usize {
        self.len
    }
}

fn err_at<S: Sink>(sink: &S, code: ErrorCode) -> CborError {
    CborError::encode(code, sink.position())
}

fn encode_major_uint<S: Sink>(sink: &mut S, major: u8, value: u64) -> Result<(), CborError> {
    debug_assert!(major <= 7);
    if let Ok(v8) = u8::try_from(value) {
        if v8 < 24 {
            return sink.write_u8((major << 5) | v8);
        }
        return sink.write(&[(major << 5) | 24, v8]);
    }
    if let Ok(v16) = u16::try_from(value) {
        let [a, b] = v16.to_be_bytes();
        return sink.write(&[(major << 5) | 25, a, b]);
    }
    if let Ok(v32) = u32::try_from(value) {
        let mut buf = [0u8; 5];
        buf[0] = (major << 5) | 26;
        buf[1..].copy_from_slice(&v32.to_be_bytes());
        return sink.write(&buf);
    }
    let mut buf = [0u8; 9];
    buf[0] = (major << 5) | 27;
    buf[1..].copy_from_slice(&value.to_be_bytes());
    sink.write(&buf)
}

fn encode_major_len<S: Sink>(sink: &mut S, major: u8, len: usize) -> Result<(), CborError> {
    let len = u64::try_from(len).map_err(|_| err_at(sink, ErrorCode::LengthOverflow))?;
    encode_major_uint(sink, major, len)
}

/// Writes CBOR items to a [`Sink`].
///
/// ```
/// use cbor_cursor::{Cursor, Encoder};
///
/// let mut enc = Encoder::new(Vec::new());
/// enc.open_array(2)?;
/// enc.uint(1000)?;
/// enc.text("a")?;
/// let bytes = enc.into_inner();
/// assert_eq!(bytes, [0x82, 0x19, 0x03, 0xe8, 0x61, 0x61]);
/// assert_eq!(Cursor::new(&bytes).len(), Some(2));
/// # Ok::<(), cbor_cursor::CborError>(())
/// ```
#[derive(Debug, Default)]
pub struct Encoder<S> {
    sink: S,
}

impl<S: Sink> Encoder<S> {
    /// Wraps a sink.
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Returns the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Borrows the sink.
    pub const fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Mutably borrows the sink.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Bytes written to the sink so far.
    pub fn position(&self) -> usize {
        self.sink.position()
    }

    /// Writes an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn uint(&mut self, v: u64) -> Result<(), CborError> {
        encode_major_uint(&mut self.sink, MAJOR_UINT, v)
    }

    /// Writes a signed integer, choosing major type 0 or 1 by sign.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn int(&mut self, v: i64) -> Result<(), CborError> {
        if v >= 0 {
            self.uint(v.unsigned_abs())
        } else {
            self.negative(v.unsigned_abs() - 1)
        }
    }

    /// Writes the negative integer `-1 - n`, covering the full range down
    /// to `-2^64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn negative(&mut self, n: u64) -> Result<(), CborError> {
        encode_major_uint(&mut self.sink, MAJOR_NINT, n)
    }

    /// Writes a tag head; the tagged value must follow.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn tag(&mut self, tag: u64) -> Result<(), CborError> {
        encode_major_uint(&mut self.sink, MAJOR_TAG, tag)
    }

    /// Writes `false` or `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn bool(&mut self, v: bool) -> Result<(), CborError> {
        self.sink.write_u8(if v { 0xf5 } else { 0xf4 })
    }

    /// Writes `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn null(&mut self) -> Result<(), CborError> {
        self.sink.write_u8(0xf6)
    }

    /// Writes `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn undefined(&mut self) -> Result<(), CborError> {
        self.sink.write_u8(0xf7)
    }

    /// Writes a simple value.
    ///
    /// # Errors
    ///
    /// Values 24..=31 have no valid encoding and are rejected with
    /// `InvalidValue`. Otherwise, returns an error if the sink rejects the
    /// write.
    pub fn simple(&mut self, v: u8) -> Result<(), CborError> {
        if (24..32).contains(&v) {
            trace_event!(value = v, "simple value has no valid encoding");
            return Err(err_at(&self.sink, ErrorCode::InvalidValue));
        }
        encode_major_uint(&mut self.sink, MAJOR_SIMPLE, u64::from(v))
    }

    /// Writes a single-precision float (`0xfa` + 4 big-endian bytes).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn float32(&mut self, v: f32) -> Result<(), CborError> {
        let mut buf = [0u8; 5];
        buf[0] = 0xfa;
        buf[1..].copy_from_slice(&v.to_bits().to_be_bytes());
        self.sink.write(&buf)
    }

    /// Writes a double-precision float (`0xfb` + 8 big-endian bytes).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn float64(&mut self, v: f64) -> Result<(), CborError> {
        let mut buf = [0u8; 9];
        buf[0] = 0xfb;
        buf[1..].copy_from_slice(&v.to_bits().to_be_bytes());
        self.sink.write(&buf)
    }

    /// Writes a definite-length byte string.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn bytes(&mut self, b: &[u8]) -> Result<(), CborError> {
        encode_major_len(&mut self.sink, MAJOR_BYTES, b.len())?;
        self.sink.write(b)
    }

    /// Writes a definite-length text string.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn text(&mut self, s: &str) -> Result<(), CborError> {
        encode_major_len(&mut self.sink, MAJOR_TEXT, s.len())?;
        self.sink.write(s.as_bytes())
    }

    /// Opens a definite-length array of `len` elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn open_array(&mut self, len: usize) -> Result<(), CborError> {
        encode_major_len(&mut self.sink, MAJOR_ARRAY, len)
    }

    /// Opens a definite-length map of `len` key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn open_map(&mut self, len: usize) -> Result<(), CborError> {
        encode_major_len(&mut self.sink, MAJOR_MAP, len)
    }

    /// Opens an indefinite-length array; finish with [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn open_indefinite_array(&mut self) -> Result<(), CborError> {
        self.sink.write_u8((MAJOR_ARRAY << 5) | INDEFINITE)
    }

    /// Opens an indefinite-length map; finish with [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn open_indefinite_map(&mut self) -> Result<(), CborError> {
        self.sink.write_u8((MAJOR_MAP << 5) | INDEFINITE)
    }

    /// Opens an indefinite-length byte string. Write definite byte-string
    /// chunks with [`bytes`](Self::bytes), then [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn open_bytes(&mut self) -> Result<(), CborError> {
        self.sink.write_u8((MAJOR_BYTES << 5) | INDEFINITE)
    }

    /// Opens an indefinite-length text string. Write definite text-string
    /// chunks with [`text`](Self::text), then [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn open_text(&mut self) -> Result<(), CborError> {
        self.sink.write_u8((MAJOR_TEXT << 5) | INDEFINITE)
    }

    /// Writes the break marker that ends an indefinite-length item.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn close(&mut self) -> Result<(), CborError> {
        self.sink.write_u8(BREAK)
    }

    /// Splices already-encoded bytes, such as [`Cursor::raw`](crate::Cursor::raw),
    /// into the output unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn raw(&mut self, encoded: &[u8]) -> Result<(), CborError> {
        self.sink.write(encoded)
    }

    /// Writes an RFC 8746 typed array: the typed-array tag for `T` and
    /// `endian`, then a byte string of the packed elements.
    ///
    /// # Errors
    ///
    /// Returns `LengthOverflow` if the payload size does not fit in `usize`.
    /// Otherwise, returns an error if the sink rejects the write.
    pub fn typed_array<T: ArrayElement>(
        &mut self,
        values: &[T],
        endian: Endian,
    ) -> Result<(), CborError> {
        let tag = TypedArrayTag::new(T::ELEMENT_TYPE, endian);
        let len = values
            .len()
            .checked_mul(tag.stride())
            .ok_or_else(|| err_at(&self.sink, ErrorCode::LengthOverflow))?;
        self.tag(tag.tag())?;
        encode_major_len(&mut self.sink, MAJOR_BYTES, len)?;
        for v in values {
            self.sink.write(v.to_bytes(endian).as_ref())?;
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl Encoder<Vec<u8>> {
    /// An encoder over a `Vec<u8>` with `capacity` bytes reserved up front.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self::new(buf)
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.sink
    }

    /// Consumes the encoder and returns the bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.sink
    }
}
