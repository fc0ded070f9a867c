use crate::ErrorCode;

pub fn read_u8(data: &[u8], pos: &mut usize) -> Result<u8, ErrorCode> {
    let b = *data.get(*pos).ok_or(ErrorCode::EndOfData)?;
    *pos += 1;
    Ok(b)
}

pub fn read_exact<'a>(data: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], ErrorCode> {
    let end = pos.checked_add(n).ok_or(ErrorCode::EndOfData)?;
    if end > data.len() {
        return Err(ErrorCode::EndOfData);
    }
    let s = &data[*pos..end];
    *pos = end;
    Ok(s)
}

pub fn read_be_u16(data: &[u8], pos: &mut usize) -> Result<u16, ErrorCode> {
    let s = read_exact(data, pos, 2)?;
    Ok(u16::from_be_bytes([s[0], s[1]]))
}

pub fn read_be_u32(data: &[u8], pos: &mut usize) -> Result<u32, ErrorCode> {
    let s = read_exact(data, pos, 4)?;
    Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
}

pub fn read_be_u64(data: &[u8], pos: &mut usize) -> Result<u64, ErrorCode> {
    let s = read_exact(data, pos, 8)?;
    Ok(u64::from_be_bytes([
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
    ]))
}

/// Reads the argument selected by additional-info values 0..=27.
///
/// Every extension byte is bounds-checked against `data`; a head truncated
/// anywhere inside its 1/2/4/8 follow-on bytes is `EndOfData`.
pub fn read_arg(data: &[u8], pos: &mut usize, ai: u8) -> Result<u64, ErrorCode> {
    match ai {
        0..=23 => Ok(u64::from(ai)),
        24 => Ok(u64::from(read_u8(data, pos)?)),
        25 => Ok(u64::from(read_be_u16(data, pos)?)),
        26 => Ok(u64::from(read_be_u32(data, pos)?)),
        27 => read_be_u64(data, pos),
        _ => Err(ErrorCode::InvalidAdditionalInfo),
    }
}

/// Returns the position `len` bytes past `pos`, if that stays within `data`.
pub fn skip(data: &[u8], pos: usize, len: u64) -> Result<usize, ErrorCode> {
    let len = usize::try_from(len).map_err(|_| ErrorCode::EndOfData)?;
    let end = pos.checked_add(len).ok_or(ErrorCode::EndOfData)?;
    if end > data.len() {
        return Err(ErrorCode::EndOfData);
    }
    Ok(end)
}
