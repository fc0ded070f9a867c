//! # cbor-cursor
//!
//! Zero-copy CBOR (RFC 8949) decoding through immutable cursors, plus a
//! sink-generic encoder, with RFC 8746 typed-array support in both
//! directions.
//!
//! ## Decoding
//!
//! A [`Cursor`] describes one item header inside a borrowed buffer. Moving
//! around never allocates and never mutates: [`Cursor::next`] returns the
//! cursor after the whole value, [`Cursor::enter`] the cursor at its first
//! child, and [`Cursor::for_each`] / [`Cursor::for_each_pair`] visit the
//! children of arrays, maps and indefinite-length strings.
//!
//! Malformed input never panics. A failure turns the returned cursor into an
//! error cursor, and every further traversal call hands the same error back,
//! so a chain of steps can be checked once at the end:
//!
//! ```
//! use cbor_cursor::{Cursor, ErrorCode};
//!
//! // [1, [2, 3]] with the inner array cut short
//! let item = Cursor::new(&[0x82, 0x01, 0x82, 0x02]);
//! let after = item.enter().next().next();
//! assert_eq!(after.error(), Some(ErrorCode::EndOfData));
//! ```
//!
//! [`TaggedCursor`] looks through stacked tags and recognises typed arrays:
//!
//! ```
//! use cbor_cursor::TaggedCursor;
//!
//! // 85(h'db0f4940 0050c347'): two little-endian f32 values
//! let bytes = [0xd8, 0x55, 0x48, 0xdb, 0x0f, 0x49, 0x40, 0x00, 0x50, 0xc3, 0x47];
//! let array = TaggedCursor::new(&bytes).typed_array().unwrap();
//! let mut out = [0f32; 2];
//! assert_eq!(array.read(&mut out, 0), Ok(2));
//! assert_eq!(out[1], 100_000.0);
//! ```
//!
//! ## Encoding
//!
//! [`Encoder`] writes to any [`Sink`]: a `Vec<u8>` (with `alloc`), a fixed
//! [`SliceSink`], or a user type. Heads are always the shortest form.
//!
//! ## Limits
//!
//! Skipping nested values recurses once per container or tag. Each cursor
//! carries [`DecodeLimits`]; exceeding `max_depth` yields
//! [`ErrorCode::DepthLimitExceeded`] instead of exhausting the stack.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`] and [`ErrorCode`].
//! - `alloc` *(default)*: `Vec<u8>` as an encoder sink and [`TypedArray::to_vec`].
//! - `tracing` *(default)*: emits `tracing` events on error-producing paths.
//! - `sha2`: SHA-256 of a value's encoded bytes via `Cursor::sha256`.
//! - `simdutf8`: SIMD-accelerated UTF-8 validation for [`Cursor::text`].
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible. Decoding needs neither `std` nor `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod alloc_util;
mod cursor;
mod encode;
mod error;
mod head;
mod iter;
mod limits;
mod tagged;
mod trace;
mod typed_array;
mod utf8;
mod wire;

pub use crate::cursor::Cursor;
pub use crate::encode::{Encoder, SliceSink, Sink};
pub use crate::error::{CborError, CborErrorKind, ErrorCode};
pub use crate::head::{Head, Kind};
pub use crate::iter::MapSide;
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_DEPTH};
pub use crate::tagged::TaggedCursor;
pub use crate::typed_array::{
    ArrayElement, ElementType, Endian, ReadTarget, TypedArray, TypedArrayTag,
    TYPED_ARRAY_TAG_END, TYPED_ARRAY_TAG_MIN,
};
