#![no_main]

use libfuzzer_sys::fuzz_target;

use cbor_cursor::{Cursor, DecodeLimits, Encoder, Head};

/// Re-encodes `item` with the encoder; returns the cursor after it.
fn copy<'a>(item: Cursor<'a>, enc: &mut Encoder<Vec<u8>>) -> Option<Cursor<'a>> {
    match item.head() {
        Head::PositiveInt(v) => enc.uint(v).ok()?,
        Head::NegativeInt(n) => enc.negative(n).ok()?,
        Head::ByteString(_) => enc.bytes(item.bytes()?).ok()?,
        Head::Tag(t) => {
            enc.tag(t).ok()?;
            return copy(item.enter(), enc);
        }
        Head::Array(n) => {
            enc.open_array(usize::try_from(n).ok()?).ok()?;
            let mut child = item.enter();
            for _ in 0..n {
                child = copy(child, enc)?;
            }
            return Some(child);
        }
        _ => return None,
    }
    Some(item.next())
}

fuzz_target!(|data: &[u8]| {
    let root = Cursor::with_limits(data, DecodeLimits::with_max_depth(32));
    let Some(raw) = root.raw() else { return };
    let mut enc = Encoder::new(Vec::new());
    if copy(root, &mut enc).is_some() {
        // Shortest-form input re-encodes byte for byte.
        let out = enc.into_vec();
        let again = Cursor::new(&out);
        assert_eq!(again.raw().map(<[u8]>::len), Some(out.len()));
        if raw.len() == out.len() {
            assert_eq!(raw, &out[..]);
        }
    }
});
