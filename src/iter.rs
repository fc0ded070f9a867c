//! Visitor-driven iteration over arrays, maps and indefinite string chunks.

use crate::head::{Head, Kind};
use crate::trace::trace_event;
use crate::{Cursor, ErrorCode};

/// Which half of each map entry [`Cursor::for_each_with`] hands to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapSide {
    /// Visit each key.
    Keys,
    /// Visit each value.
    #[default]
    Values,
}

impl<'a> Cursor<'a> {
    /// Calls `visit(child, index)` for every element of an array, every chunk
    /// of an indefinite-length string, or every value of a map.
    ///
    /// Returns the cursor just past the whole container. Non-container kinds
    /// yield a `MethodTypeMismatch` error; error cursors are returned
    /// unchanged.
    pub fn for_each<F>(&self, visit: F) -> Self
    where
        F: FnMut(Cursor<'a>, usize),
    {
        self.for_each_with(MapSide::Values, visit)
    }

    /// Like [`for_each`](Self::for_each), choosing whether map keys or map
    /// values are visited. `index` counts pairs, not items.
    pub fn for_each_with<F>(&self, side: MapSide, mut visit: F) -> Self
    where
        F: FnMut(Cursor<'a>, usize),
    {
        match self.head() {
            Head::Error(_) => *self,
            Head::Array(count) => self.visit_definite(count, |item, i| {
                visit(item, i);
                item.next()
            }),
            Head::IndefiniteArray => self.visit_until_break(|item, i| {
                visit(item, i);
                item.next()
            }),
            Head::IndefiniteByteString => self.visit_chunks(Kind::ByteString, visit),
            Head::IndefiniteTextString => self.visit_chunks(Kind::TextString, visit),
            Head::Map(count) => self.visit_definite(count, |key, i| {
                self.visit_entry(key, false, |k, v| match side {
                    MapSide::Keys => visit(k, i),
                    MapSide::Values => visit(v, i),
                })
            }),
            Head::IndefiniteMap => self.visit_until_break(|key, i| {
                self.visit_entry(key, true, |k, v| match side {
                    MapSide::Keys => visit(k, i),
                    MapSide::Values => visit(v, i),
                })
            }),
            _ => self.fail(ErrorCode::MethodTypeMismatch),
        }
    }

    /// Calls `visit(key, value)` for every entry of a definite or indefinite
    /// map, in encoded order.
    ///
    /// Returns the cursor just past the map. Non-map kinds yield a
    /// `MethodTypeMismatch` error; a break in place of a value in an
    /// indefinite map yields `InvalidValue`.
    pub fn for_each_pair<F>(&self, mut visit: F) -> Self
    where
        F: FnMut(Cursor<'a>, Cursor<'a>),
    {
        match self.head() {
            Head::Error(_) => *self,
            Head::Map(count) => {
                self.visit_definite(count, |key, _| self.visit_entry(key, false, &mut visit))
            }
            Head::IndefiniteMap => {
                self.visit_until_break(|key, _| self.visit_entry(key, true, &mut visit))
            }
            _ => self.fail(ErrorCode::MethodTypeMismatch),
        }
    }

    /// Steps over `count` children; `step` consumes one logical entry and
    /// returns the cursor after it.
    fn visit_definite<F>(&self, count: u64, mut step: F) -> Self
    where
        F: FnMut(Cursor<'a>, usize) -> Cursor<'a>,
    {
        if let Err(e) = self.ensure_depth(0) {
            return e;
        }
        let mut item = self.next_basic();
        let mut index = 0usize;
        for _ in 0..count {
            if item.is_error() {
                return self.truncated(item);
            }
            item = step(item, index);
            index += 1;
        }
        item
    }

    fn visit_until_break<F>(&self, mut step: F) -> Self
    where
        F: FnMut(Cursor<'a>, usize) -> Cursor<'a>,
    {
        if let Err(e) = self.ensure_depth(0) {
            return e;
        }
        let mut item = self.next_basic();
        let mut index = 0usize;
        loop {
            if item.is_error() {
                return self.truncated(item);
            }
            if item.is_exit() {
                return item.next_basic();
            }
            item = step(item, index);
            index += 1;
        }
    }

    fn visit_chunks<F>(&self, chunk_kind: Kind, mut visit: F) -> Self
    where
        F: FnMut(Cursor<'a>, usize),
    {
        self.visit_until_break(|chunk, i| {
            if chunk.kind() != chunk_kind {
                trace_event!(
                    offset = chunk.offset(),
                    kind = ?chunk.kind(),
                    "indefinite-length string chunk has the wrong major type"
                );
                return self.fail(ErrorCode::InvalidValue);
            }
            visit(chunk, i);
            chunk.next()
        })
    }

    /// Resolves one map entry starting at `key` and returns the cursor after
    /// its value, or the error that stopped it.
    ///
    /// Inside an indefinite map a break in the value slot ends the map with
    /// an unpaired key. A definite map hands it to the visitor like any item.
    fn visit_entry<F>(&self, key: Cursor<'a>, until_break: bool, mut visit: F) -> Cursor<'a>
    where
        F: FnMut(Cursor<'a>, Cursor<'a>),
    {
        let value = key.next();
        if value.is_error() {
            return self.truncated(value);
        }
        if until_break && value.is_exit() {
            return value.fail(ErrorCode::InvalidValue);
        }
        visit(key, value);
        value.next()
    }
}
