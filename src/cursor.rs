//! Zero-copy cursors over encoded CBOR.
//!
//! A [`Cursor`] is an immutable snapshot of one decoded header inside a
//! borrowed buffer. Traversal never mutates a cursor: [`Cursor::next`] and
//! [`Cursor::enter`] return new cursors, and any failure is folded into the
//! returned cursor as an error state that every later traversal call passes
//! through unchanged.

use core::fmt;

use crate::head::{decode_head, Head, Kind};
use crate::trace::trace_event;
use crate::{utf8, wire, CborError, DecodeLimits, ErrorCode};

/// A borrowed view of one CBOR item header within a byte buffer.
///
/// The cursor records where the item starts, where its payload (or first
/// child) starts, and the decoded [`Head`]. It never owns the bytes and cannot
/// outlive the buffer it was created from.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    start: usize,
    payload: usize,
    head: Head,
    limits: DecodeLimits,
}

impl<'a> Cursor<'a> {
    /// Decodes the header at the start of `data` with default limits.
    ///
    /// An empty buffer yields a cursor in the `EndOfData` error state.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_limits(data, DecodeLimits::default())
    }

    /// Decodes the header at the start of `data` with explicit limits.
    ///
    /// The limits are inherited by every cursor derived from this one.
    #[must_use]
    pub fn with_limits(data: &'a [u8], limits: DecodeLimits) -> Self {
        Self::at(data, 0, limits)
    }

    pub(crate) fn at(data: &'a [u8], start: usize, limits: DecodeLimits) -> Self {
        match decode_head(data, start) {
            Ok((head, payload)) => Self {
                data,
                start,
                payload,
                head,
                limits,
            },
            Err(code) => Self::failed(data, start, code, limits),
        }
    }

    fn failed(data: &'a [u8], start: usize, code: ErrorCode, limits: DecodeLimits) -> Self {
        let start = start.min(data.len());
        Self {
            data,
            start,
            payload: start,
            head: Head::Error(code),
            limits,
        }
    }

    /// Returns an error cursor positioned at this item's header.
    pub(crate) fn fail(&self, code: ErrorCode) -> Self {
        trace_event!(offset = self.start, code = ?code, "cbor cursor entered error state");
        Self::failed(self.data, self.start, code, self.limits)
    }

    /// The decoded header.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> Head {
        self.head
    }

    /// The kind of the decoded item.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.head.kind()
    }

    /// The raw integer argument of the header.
    ///
    /// See [`Head::argument`] for the per-kind interpretation.
    #[inline]
    #[must_use]
    pub fn value(&self) -> u64 {
        self.head.argument()
    }

    /// The full buffer this cursor borrows.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Byte offset of the item's header.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.start
    }

    /// Byte offset just past the header (payload or first child).
    #[inline]
    #[must_use]
    pub const fn payload_offset(&self) -> usize {
        self.payload
    }

    /// Number of bytes the header occupies.
    #[inline]
    #[must_use]
    pub const fn header_len(&self) -> usize {
        self.payload - self.start
    }

    /// The limits this cursor (and every cursor derived from it) enforces.
    #[inline]
    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Returns the error code if this cursor is in the error state.
    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<ErrorCode> {
        match self.head {
            Head::Error(code) => Some(code),
            _ => None,
        }
    }

    /// Returns the error, with its byte offset, if this cursor is in the error state.
    #[must_use]
    pub const fn to_error(&self) -> Option<CborError> {
        match self.head {
            Head::Error(code) => Some(CborError::decode(code, self.start)),
            _ => None,
        }
    }

    /// Returns `true` if this cursor is in the error state.
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.head, Head::Error(_))
    }

    /// Returns `true` if traversal has run off the end of the buffer.
    #[inline]
    #[must_use]
    pub const fn at_end(&self) -> bool {
        matches!(self.head, Head::Error(ErrorCode::EndOfData))
    }

    /// Clean end of input: a header read attempted exactly at the buffer end.
    fn is_clean_end(&self) -> bool {
        self.at_end() && self.start == self.data.len()
    }

    // ----- traversal -------------------------------------------------------

    /// Decodes the header that directly follows this one, without looking at
    /// the payload.
    pub(crate) fn next_basic(&self) -> Self {
        if self.is_error() {
            return *self;
        }
        Self::at(self.data, self.payload, self.limits)
    }

    /// Returns a cursor positioned immediately after this entire value:
    /// header, payload and all nested children.
    ///
    /// Error cursors are returned unchanged.
    #[must_use]
    pub fn next(&self) -> Self {
        self.skip(0)
    }

    /// Applies [`next`](Self::next) `count` times.
    #[must_use]
    pub fn next_n(&self, count: usize) -> Self {
        let mut item = *self;
        for _ in 0..count {
            if item.is_error() {
                break;
            }
            item = item.next();
        }
        item
    }

    /// Returns a cursor at the first child of an array, map, tag or
    /// indefinite-length string.
    ///
    /// For scalars and definite strings, which have no children, this is the
    /// same as [`next`](Self::next). Error cursors are returned unchanged.
    #[must_use]
    pub fn enter(&self) -> Self {
        match self.head {
            Head::Array(_)
            | Head::Map(_)
            | Head::Tag(_)
            | Head::IndefiniteArray
            | Head::IndefiniteMap
            | Head::IndefiniteByteString
            | Head::IndefiniteTextString => self.next_basic(),
            Head::Error(_) => *self,
            _ => self.next(),
        }
    }

    /// Skips forward, value by value, until a break marker is found and
    /// returns the cursor just past it.
    ///
    /// Call this on a cursor inside an indefinite-length container to leave
    /// the container without inspecting the remaining children.
    #[must_use]
    pub fn next_exit(&self) -> Self {
        let mut item = *self;
        while !item.is_error() && !item.is_exit() {
            item = item.next();
        }
        item.next_basic()
    }

    pub(crate) fn ensure_depth(&self, depth: usize) -> Result<(), Self> {
        if depth >= self.limits.max_depth {
            trace_event!(
                offset = self.start,
                max_depth = self.limits.max_depth,
                "cbor nesting depth limit exceeded"
            );
            return Err(self.fail(ErrorCode::DepthLimitExceeded));
        }
        Ok(())
    }

    /// Propagates a child's error state out of a container.
    ///
    /// Running cleanly off the end of the buffer while children are still
    /// expected means the container itself is truncated, which is reported
    /// at the container's header.
    pub(crate) fn truncated(&self, item: Self) -> Self {
        if item.is_clean_end() {
            self.fail(ErrorCode::EndOfData)
        } else {
            item
        }
    }

    fn skip(&self, depth: usize) -> Self {
        match self.head {
            Head::PositiveInt(_)
            | Head::NegativeInt(_)
            | Head::Simple(_)
            | Head::Float32(_)
            | Head::Float64(_)
            | Head::IndefiniteBreak => self.next_basic(),
            Head::ByteString(len) | Head::TextString(len) => {
                match wire::skip(self.data, self.payload, len) {
                    Ok(end) => Self::at(self.data, end, self.limits),
                    Err(code) => self.fail(code),
                }
            }
            Head::Array(count) => self.skip_definite(count, false, depth),
            Head::Map(count) => self.skip_definite(count, true, depth),
            Head::IndefiniteByteString => self.skip_chunks(Kind::ByteString),
            Head::IndefiniteTextString => self.skip_chunks(Kind::TextString),
            Head::IndefiniteArray => self.skip_until_break(false, depth),
            Head::IndefiniteMap => self.skip_until_break(true, depth),
            Head::Tag(_) => {
                if let Err(e) = self.ensure_depth(depth) {
                    return e;
                }
                let mut inner = self.next_basic();
                while matches!(inner.head, Head::Tag(_)) {
                    inner = inner.next_basic();
                }
                if inner.is_error() {
                    return self.truncated(inner);
                }
                inner.skip(depth + 1)
            }
            Head::Error(_) => *self,
        }
    }

    fn skip_definite(&self, count: u64, pairs: bool, depth: usize) -> Self {
        if let Err(e) = self.ensure_depth(depth) {
            return e;
        }
        let per_entry = if pairs { 2 } else { 1 };
        let mut item = self.next_basic();
        for _ in 0..count {
            for _ in 0..per_entry {
                if item.is_error() {
                    return self.truncated(item);
                }
                item = item.skip(depth + 1);
            }
        }
        item
    }

    fn skip_until_break(&self, pairs: bool, depth: usize) -> Self {
        if let Err(e) = self.ensure_depth(depth) {
            return e;
        }
        let mut item = self.next_basic();
        loop {
            if item.is_error() {
                return self.truncated(item);
            }
            if item.is_exit() {
                return item.next_basic();
            }
            item = item.skip(depth + 1);
            if pairs {
                if item.is_error() {
                    return self.truncated(item);
                }
                if item.is_exit() {
                    return item.fail(ErrorCode::InvalidValue);
                }
                item = item.skip(depth + 1);
            }
        }
    }

    fn skip_chunks(&self, chunk_kind: Kind) -> Self {
        let mut chunk = self.next_basic();
        loop {
            if chunk.is_error() {
                return self.truncated(chunk);
            }
            if chunk.is_exit() {
                return chunk.next_basic();
            }
            if chunk.kind() != chunk_kind {
                trace_event!(
                    offset = chunk.start,
                    kind = ?chunk.kind(),
                    "indefinite-length string chunk has the wrong major type"
                );
                return self.fail(ErrorCode::InconsistentIndefinite);
            }
            chunk = chunk.next();
        }
    }

    /// The encoded bytes of this entire value, from its header through its
    /// last nested child.
    ///
    /// Returns `None` for error cursors and for values whose end cannot be
    /// found because the encoding is malformed or truncated.
    #[must_use]
    pub fn raw(&self) -> Option<&'a [u8]> {
        if self.is_error() {
            return None;
        }
        let after = self.next();
        if !after.is_error() || after.is_clean_end() {
            Some(&self.data[self.start..after.start])
        } else {
            None
        }
    }

    /// SHA-256 of [`raw`](Self::raw).
    #[cfg(feature = "sha2")]
    #[must_use]
    pub fn sha256(&self) -> Option<[u8; 32]> {
        use sha2::{Digest, Sha256};

        self.raw().map(|raw| Sha256::digest(raw).into())
    }

    // ----- predicates ------------------------------------------------------

    /// Major type 0 or 1.
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self.head, Head::PositiveInt(_) | Head::NegativeInt(_))
    }

    /// Half, single or double precision float.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self.head, Head::Float32(_) | Head::Float64(_))
    }

    /// Any simple value, including booleans, null and undefined.
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        matches!(self.head, Head::Simple(_))
    }

    /// Simple value `false` or `true`.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self.head, Head::Simple(20 | 21))
    }

    /// Simple value `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.head, Head::Simple(22))
    }

    /// Simple value `undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self.head, Head::Simple(23))
    }

    /// Definite or indefinite byte string.
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self.head, Head::ByteString(_) | Head::IndefiniteByteString)
    }

    /// Definite or indefinite text string.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.head, Head::TextString(_) | Head::IndefiniteTextString)
    }

    /// Definite or indefinite array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.head, Head::Array(_) | Head::IndefiniteArray)
    }

    /// Definite or indefinite map.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.head, Head::Map(_) | Head::IndefiniteMap)
    }

    /// Semantic tag header.
    #[must_use]
    pub const fn is_tagged(&self) -> bool {
        matches!(self.head, Head::Tag(_))
    }

    /// The break marker that closes an indefinite-length item.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self.head, Head::IndefiniteBreak)
    }

    /// `false` for the four indefinite-length kinds.
    #[must_use]
    pub const fn has_length(&self) -> bool {
        !matches!(
            self.head,
            Head::IndefiniteByteString
                | Head::IndefiniteTextString
                | Head::IndefiniteArray
                | Head::IndefiniteMap
        )
    }

    // ----- explicit conversions -------------------------------------------

    /// Unsigned integer value.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self.head {
            Head::PositiveInt(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value, if it fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.head {
            Head::PositiveInt(v) => i64::try_from(v).ok(),
            Head::NegativeInt(n) => i64::try_from(n).ok().map(|n| -1 - n),
            _ => None,
        }
    }

    /// Integer value over the full CBOR range `-2^64 ..= 2^64 - 1`.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self.head {
            Head::PositiveInt(v) => Some(i128::from(v)),
            Head::NegativeInt(n) => Some(-1 - i128::from(n)),
            _ => None,
        }
    }

    /// Unsigned integer value, if it fits in `u32`.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_u64().and_then(|v| u32::try_from(v).ok())
    }

    /// Unsigned integer value, if it fits in `u16`.
    #[must_use]
    pub fn as_u16(&self) -> Option<u16> {
        self.as_u64().and_then(|v| u16::try_from(v).ok())
    }

    /// Unsigned integer value, if it fits in `u8`.
    #[must_use]
    pub fn as_u8(&self) -> Option<u8> {
        self.as_u64().and_then(|v| u8::try_from(v).ok())
    }

    /// Unsigned integer value, if it fits in `usize`.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        self.as_u64().and_then(|v| usize::try_from(v).ok())
    }

    /// Integer value, if it fits in `i32`.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    /// Integer value, if it fits in `i16`.
    #[must_use]
    pub fn as_i16(&self) -> Option<i16> {
        self.as_i64().and_then(|v| i16::try_from(v).ok())
    }

    /// Integer value, if it fits in `i8`.
    #[must_use]
    pub fn as_i8(&self) -> Option<i8> {
        self.as_i64().and_then(|v| i8::try_from(v).ok())
    }

    /// Float value, widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.head {
            Head::Float32(v) => Some(f64::from(v)),
            Head::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// Float value as `f32`; double-precision values are rounded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_f32(&self) -> Option<f32> {
        match self.head {
            Head::Float32(v) => Some(v),
            Head::Float64(v) => Some(v as f32),
            _ => None,
        }
    }

    /// Boolean value of simple values 20/21.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self.head {
            Head::Simple(20) => Some(false),
            Head::Simple(21) => Some(true),
            _ => None,
        }
    }

    /// Simple-value code.
    #[must_use]
    pub const fn simple(&self) -> Option<u8> {
        match self.head {
            Head::Simple(v) => Some(v),
            _ => None,
        }
    }

    /// Tag number of a tag header.
    #[must_use]
    pub const fn tag_number(&self) -> Option<u64> {
        match self.head {
            Head::Tag(v) => Some(v),
            _ => None,
        }
    }

    /// Definite length: payload bytes for strings, elements for arrays,
    /// pairs for maps.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.head {
            Head::ByteString(n) | Head::TextString(n) | Head::Array(n) | Head::Map(n) => {
                usize::try_from(n).ok()
            }
            _ => None,
        }
    }

    /// Returns `true` for a definite string or container of length zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Payload of a definite byte or text string.
    ///
    /// Returns `None` for other kinds and when the declared length runs past
    /// the end of the buffer.
    #[must_use]
    pub fn bytes(&self) -> Option<&'a [u8]> {
        match self.head {
            Head::ByteString(len) | Head::TextString(len) => {
                let end = wire::skip(self.data, self.payload, len).ok()?;
                Some(&self.data[self.payload..end])
            }
            _ => None,
        }
    }

    /// Payload of a definite text string, if it is valid UTF-8.
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        match self.head {
            Head::TextString(_) => self.bytes().and_then(utf8::validate),
            _ => None,
        }
    }
}

impl Default for Cursor<'_> {
    /// A cursor that was never decoded.
    fn default() -> Self {
        Self::failed(&[], 0, ErrorCode::NotInitialised, DecodeLimits::default())
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.start)
            .field("payload_offset", &self.payload)
            .field("head", &self.head)
            .finish()
    }
}
