#![no_main]

use libfuzzer_sys::fuzz_target;

use cbor_cursor::{Cursor, DecodeLimits, TaggedCursor};

fn visit(item: Cursor<'_>, budget: &mut usize) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;
    let _ = (item.as_i128(), item.as_f64(), item.text(), item.raw());
    if item.is_array() || item.is_map() || !item.has_length() {
        let _ = item.for_each(|child, _| visit(child, budget));
        let _ = item.for_each_pair(|k, v| {
            let _ = (k.raw(), v.raw());
        });
    }
}

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits::with_max_depth(64);
    let root = Cursor::with_limits(data, limits);

    // Walking must terminate without panicking, and any successful skip
    // must land inside the buffer.
    let mut item = root;
    let mut steps = 0usize;
    while !item.is_error() && steps < 1024 {
        let next = item.next();
        assert!(next.offset() <= data.len());
        assert!(next.is_error() || next.offset() > item.offset());
        item = next;
        steps += 1;
    }

    let mut budget = 4096;
    visit(root, &mut budget);

    let tagged = TaggedCursor::with_limits(data, limits);
    for i in 0..tagged.tag_count().min(8) {
        assert!(tagged.tag(i).is_some());
    }
    if let Some(array) = tagged.typed_array() {
        let mut out = [0f64; 16];
        let _ = array.read(&mut out, 0);
    }
});
