//! Tag-resolving cursor.

use crate::head::{Head, Kind};
use crate::iter::MapSide;
use crate::typed_array::{TypedArray, TypedArrayTag};
use crate::{Cursor, DecodeLimits, ErrorCode};

/// Forwards read-only accessors to the resolved cursor.
macro_rules! forward_to_cursor {
    ($($name:ident -> $ret:ty;)*) => {
        $(
            #[doc = concat!("Forwards to [`Cursor::", stringify!($name), "`] on the tagged value.")]
            #[must_use]
            pub fn $name(&self) -> $ret {
                self.cursor.$name()
            }
        )*
    };
}

/// A [`Cursor`] that looks through stacked semantic tags.
///
/// Every `TaggedCursor` is positioned on the value the tags wrap. The run of
/// tags in front of it is remembered by offset and count only; individual tag
/// numbers are re-read from the buffer by [`tag`](Self::tag).
///
/// ```
/// use cbor_cursor::{Kind, TaggedCursor};
///
/// // 1(2(h'00'))
/// let item = TaggedCursor::new(&[0xc1, 0xc2, 0x41, 0x00]);
/// assert_eq!(item.kind(), Kind::ByteString);
/// assert_eq!(item.tag_count(), 2);
/// assert_eq!(item.tag(1), Some(2));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaggedCursor<'a> {
    cursor: Cursor<'a>,
    tag_start: usize,
    tag_count: usize,
    typed_array: Option<TypedArrayTag>,
}

impl<'a> TaggedCursor<'a> {
    /// Decodes the value at the start of `data`, consuming any leading tags.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::resolve(Cursor::new(data))
    }

    /// Like [`new`](Self::new), with explicit limits.
    #[must_use]
    pub fn with_limits(data: &'a [u8], limits: DecodeLimits) -> Self {
        Self::resolve(Cursor::with_limits(data, limits))
    }

    /// Consumes the run of tags `cursor` is positioned on, if any.
    ///
    /// A run longer than the depth limit leaves the cursor in the
    /// `DepthLimitExceeded` state at the start of the run.
    #[must_use]
    pub fn resolve(cursor: Cursor<'a>) -> Self {
        let tag_start = cursor.offset();
        let mut inner = cursor;
        let mut tag_count = 0usize;
        let mut typed_array = None;
        while let Head::Tag(number) = inner.head() {
            if tag_count >= cursor.limits().max_depth {
                inner = cursor.fail(ErrorCode::DepthLimitExceeded);
                break;
            }
            if let Some(tag) = TypedArrayTag::from_tag(number) {
                typed_array = Some(tag);
            }
            tag_count += 1;
            inner = cursor.truncated(inner.enter());
        }
        Self {
            cursor: inner,
            tag_start,
            tag_count,
            typed_array,
        }
    }

    /// The underlying cursor, positioned on the tagged value.
    #[must_use]
    pub const fn cursor(&self) -> Cursor<'a> {
        self.cursor
    }

    /// Kind of the tagged value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.cursor.kind()
    }

    /// Error code, if the cursor is in the error state.
    #[must_use]
    pub const fn error(&self) -> Option<ErrorCode> {
        self.cursor.error()
    }

    forward_to_cursor! {
        value -> u64;
        offset -> usize;
        is_error -> bool;
        at_end -> bool;
        is_int -> bool;
        is_float -> bool;
        is_simple -> bool;
        is_bool -> bool;
        is_null -> bool;
        is_undefined -> bool;
        is_bytes -> bool;
        is_text -> bool;
        is_array -> bool;
        is_map -> bool;
        is_exit -> bool;
        has_length -> bool;
        as_u64 -> Option<u64>;
        as_i64 -> Option<i64>;
        as_i128 -> Option<i128>;
        as_usize -> Option<usize>;
        as_f64 -> Option<f64>;
        as_f32 -> Option<f32>;
        as_bool -> Option<bool>;
        simple -> Option<u8>;
        len -> Option<usize>;
        is_empty -> bool;
        bytes -> Option<&'a [u8]>;
        text -> Option<&'a str>;
        raw -> Option<&'a [u8]>;
    }

    /// Number of tags in front of the value.
    #[must_use]
    pub const fn tag_count(&self) -> usize {
        self.tag_count
    }

    /// Byte offset of the first tag, or of the value when there are none.
    #[must_use]
    pub const fn tag_offset(&self) -> usize {
        self.tag_start
    }

    /// The `index`-th tag number, outermost first.
    ///
    /// Walks the run from its start, so the cost grows with `index`.
    #[must_use]
    pub fn tag(&self, index: usize) -> Option<u64> {
        if index >= self.tag_count {
            return None;
        }
        let mut walker = Cursor::at(self.cursor.data(), self.tag_start, self.cursor.limits());
        for _ in 0..index {
            walker = walker.enter();
        }
        walker.tag_number()
    }

    /// The innermost typed-array tag in the run, if any.
    #[must_use]
    pub const fn typed_array_tag(&self) -> Option<TypedArrayTag> {
        self.typed_array
    }

    /// Views the value as an RFC 8746 typed array.
    ///
    /// Requires a typed-array tag in the run and a definite byte string whose
    /// payload lies within the buffer.
    #[must_use]
    pub fn typed_array(&self) -> Option<TypedArray<'a>> {
        let tag = self.typed_array?;
        if self.cursor.kind() != Kind::ByteString {
            return None;
        }
        let bytes = self.cursor.bytes()?;
        Some(TypedArray::at(tag, bytes, self.cursor.payload_offset()))
    }

    /// Advances past the whole value, then resolves tags in front of the
    /// next one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::resolve(self.cursor.next())
    }

    /// Descends into the value; see [`Cursor::enter`].
    #[must_use]
    pub fn enter(&self) -> Self {
        Self::resolve(self.cursor.enter())
    }

    /// Skips to just past the enclosing break marker; see [`Cursor::next_exit`].
    #[must_use]
    pub fn next_exit(&self) -> Self {
        Self::resolve(self.cursor.next_exit())
    }

    /// [`Cursor::for_each`] with each child resolved through its tags.
    pub fn for_each<F>(&self, visit: F) -> Self
    where
        F: FnMut(TaggedCursor<'a>, usize),
    {
        self.for_each_with(MapSide::Values, visit)
    }

    /// [`Cursor::for_each_with`] with each child resolved through its tags.
    pub fn for_each_with<F>(&self, side: MapSide, mut visit: F) -> Self
    where
        F: FnMut(TaggedCursor<'a>, usize),
    {
        Self::resolve(
            self.cursor
                .for_each_with(side, |item, i| visit(Self::resolve(item), i)),
        )
    }

    /// [`Cursor::for_each_pair`] with keys and values resolved through their
    /// tags.
    pub fn for_each_pair<F>(&self, mut visit: F) -> Self
    where
        F: FnMut(TaggedCursor<'a>, TaggedCursor<'a>),
    {
        Self::resolve(
            self.cursor
                .for_each_pair(|k, v| visit(Self::resolve(k), Self::resolve(v))),
        )
    }
}

impl<'a> From<Cursor<'a>> for TaggedCursor<'a> {
    fn from(cursor: Cursor<'a>) -> Self {
        Self::resolve(cursor)
    }
}

impl Default for TaggedCursor<'_> {
    fn default() -> Self {
        Self::resolve(Cursor::default())
    }
}
