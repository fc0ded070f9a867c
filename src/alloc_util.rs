use alloc::vec::Vec;
use core::alloc::Layout;

use crate::ErrorCode;

/// Reserves room for `additional` more elements without aborting on failure.
///
/// Overflowing the length or the allocation layout is `LengthOverflow`; the
/// allocator refusing is `AllocationFailed`.
#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize) -> Result<(), ErrorCode> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or(ErrorCode::LengthOverflow)?;
    if needed <= v.capacity() {
        return Ok(());
    }
    Layout::array::<T>(needed).map_err(|_| ErrorCode::LengthOverflow)?;
    v.try_reserve(additional)
        .map_err(|_| ErrorCode::AllocationFailed)
}
