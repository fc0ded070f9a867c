#![allow(clippy::unwrap_used)]

use cbor_cursor::{Cursor, ErrorCode, Head, MapSide};
use hex_literal::hex;

fn visited(data: &[u8]) -> Vec<Head> {
    fn walk(item: Cursor<'_>, out: &mut Vec<Head>) {
        out.push(match item.head() {
            Head::IndefiniteArray => Head::Array(0),
            head => head,
        });
        if item.is_array() {
            item.for_each(|child, _| walk(child, out));
        }
    }
    let mut out = Vec::new();
    Cursor::new(data).for_each(|child, _| walk(child, &mut out));
    out
}

#[test]
fn definite_and_indefinite_arrays_visit_the_same_sequence() {
    let expected = vec![
        Head::PositiveInt(1),
        Head::Array(2),
        Head::PositiveInt(2),
        Head::PositiveInt(3),
        Head::Array(2),
        Head::PositiveInt(4),
        Head::PositiveInt(5),
    ];
    assert_eq!(visited(&hex!("8301820203820405")), expected);

    let normalise = |heads: Vec<Head>| {
        heads
            .into_iter()
            .map(|h| match h {
                Head::Array(_) => Head::Array(2),
                other => other,
            })
            .collect::<Vec<_>>()
    };
    for data in [
        &hex!("9f018202039f0405ffff")[..],
        &hex!("9f01820203820405ff")[..],
        &hex!("83018202039f0405ff")[..],
        &hex!("83019f0203ff820405")[..],
    ] {
        assert_eq!(normalise(visited(data)), expected, "{data:02x?}");
    }
}

#[test]
fn indefinite_array_of_25_ints() {
    let data = hex!("9f0102030405060708090a0b0c0d0e0f101112131415161718181819ff");
    let mut counter = 0;
    let next = Cursor::new(&data).for_each(|item, i| {
        assert_eq!(i, counter);
        assert_eq!(item.as_usize(), Some(i + 1));
        counter += 1;
    });
    assert_eq!(counter, 25);
    assert_eq!(next.error(), Some(ErrorCode::EndOfData));
}

#[test]
fn definite_array_of_25_ints() {
    let data = hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819");
    let mut counter = 0;
    let next = Cursor::new(&data).for_each(|item, i| {
        assert_eq!(item.as_usize(), Some(i + 1));
        counter += 1;
    });
    assert_eq!(counter, 25);
    assert!(next.at_end());
}

#[test]
fn for_each_returns_cursor_after_container() {
    let data = hex!("82 9f0102ff 820304 f6");
    let root = Cursor::new(&data);
    let after = root.enter().for_each(|_, _| {});
    assert!(after.is_array());
    assert!(after.for_each(|_, _| {}).is_null());
}

#[test]
fn byte_string_chunks() {
    let data = hex!("5f42010243030405ff");
    let mut total = 0;
    let next = Cursor::new(&data).for_each(|chunk, i| {
        assert!(chunk.is_bytes() && chunk.has_length());
        assert_eq!(chunk.len(), Some(2 + i));
        total += chunk.len().unwrap();
    });
    assert!(next.at_end());
    assert_eq!(total, 5);
}

#[test]
fn text_string_chunks() {
    let data = hex!("7f657374726561646d696e67ff");
    let mut total = String::new();
    let next = Cursor::new(&data).for_each(|chunk, i| {
        assert!(chunk.is_text() && chunk.has_length());
        assert_eq!(chunk.len(), Some(5 - i));
        total.push_str(chunk.text().unwrap());
    });
    assert!(next.at_end());
    assert_eq!(total, "streaming");
}

#[test]
fn mismatched_chunk_is_invalid_value() {
    let data = hex!("5f 4101 6161 ff");
    let mut seen = 0;
    let next = Cursor::new(&data).for_each(|_, _| seen += 1);
    assert_eq!(next.error(), Some(ErrorCode::InvalidValue));
    assert_eq!(next.offset(), 0);
    assert_eq!(seen, 1);
}

#[test]
fn map_pairs_in_order() {
    let data = hex!("a201020304");
    let mut pairs = Vec::new();
    let next = Cursor::new(&data).for_each_pair(|k, v| {
        pairs.push((k.as_u64().unwrap(), v.as_u64().unwrap()));
    });
    assert_eq!(pairs, [(1, 2), (3, 4)]);
    assert!(next.at_end());
}

#[test]
fn indefinite_map_keys_values_and_pairs() {
    let data = hex!("bf61610161629f0203ffff");
    let root = Cursor::new(&data);

    let mut pairs = 0;
    let next = root.for_each_pair(|k, v| {
        match pairs {
            0 => assert!(k.is_text() && v.is_int()),
            1 => assert!(k.is_text() && v.is_array()),
            _ => panic!("too many pairs"),
        }
        pairs += 1;
    });
    assert_eq!(pairs, 2);
    assert!(next.at_end());

    let mut values = Vec::new();
    let next = root.for_each(|v, i| {
        assert_eq!(i, values.len());
        values.push(v.kind());
    });
    assert!(next.at_end());
    assert_eq!(values.len(), 2);
    assert!(values[1] == cbor_cursor::Kind::IndefiniteArray);

    let mut keys = Vec::new();
    let next = root.for_each_with(MapSide::Keys, |k, _| keys.push(k.text().unwrap()));
    assert!(next.at_end());
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn definite_map_keys() {
    let data = hex!("a26161016162820203");
    let mut keys = Vec::new();
    let next = Cursor::new(&data).for_each_with(MapSide::Keys, |k, i| {
        assert_eq!(i, keys.len());
        keys.push(k.text().unwrap());
    });
    assert!(next.at_end());
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn lookup_by_key() {
    let data = hex!("bf6346756ef563416d7421ff");
    let (mut fun, mut amt) = (None, None);
    Cursor::new(&data).for_each_pair(|k, v| match k.text() {
        Some("Fun") => fun = v.as_bool(),
        Some("Amt") => amt = v.as_i64(),
        other => panic!("unexpected key {other:?}"),
    });
    assert_eq!(fun, Some(true));
    assert_eq!(amt, Some(-2));
}

#[test]
fn unpaired_trailing_key() {
    let data = hex!("bf 6161 01 6162 ff");
    let mut pairs = 0;
    let next = Cursor::new(&data).for_each_pair(|_, _| pairs += 1);
    assert_eq!(pairs, 1);
    assert_eq!(next.error(), Some(ErrorCode::InvalidValue));
    assert_eq!(next.offset(), 6);

    let next = Cursor::new(&data).for_each(|_, _| {});
    assert_eq!(next.error(), Some(ErrorCode::InvalidValue));
    assert_eq!(Cursor::new(&data).next().error(), Some(ErrorCode::InvalidValue));
}

#[test]
fn break_value_in_definite_map_matches_next() {
    let data = hex!("a1 01 ff");
    let root = Cursor::new(&data);
    let skipped = root.next();
    assert!(skipped.at_end());
    assert_eq!(skipped.offset(), 3);

    let mut values = Vec::new();
    let next = root.for_each(|v, _| values.push(v.is_exit()));
    assert_eq!(values, [true]);
    assert_eq!((next.offset(), next.error()), (skipped.offset(), skipped.error()));

    let mut pairs = 0;
    let next = root.for_each_pair(|k, v| {
        assert_eq!(k.as_u64(), Some(1));
        assert!(v.is_exit());
        pairs += 1;
    });
    assert_eq!(pairs, 1);
    assert_eq!((next.offset(), next.error()), (skipped.offset(), skipped.error()));
}

#[test]
fn shape_mismatch() {
    for data in [
        &hex!("01")[..],
        &hex!("6161")[..],
        &hex!("c101")[..],
        &hex!("f6")[..],
    ] {
        let item = Cursor::new(data);
        let next = item.for_each(|_, _| panic!("visited a non-container"));
        assert_eq!(next.error(), Some(ErrorCode::MethodTypeMismatch));
        assert_eq!(next.offset(), 0);
    }

    let array = Cursor::new(&hex!("820102"));
    let next = array.for_each_pair(|_, _| panic!("arrays have no pairs"));
    assert_eq!(next.error(), Some(ErrorCode::MethodTypeMismatch));
}

#[test]
fn truncated_container_reports_its_own_offset() {
    let data = hex!("01 83 01 02");
    let root = Cursor::new(&data).next();
    let mut seen = 0;
    let next = root.for_each(|_, _| seen += 1);
    assert_eq!(seen, 2);
    assert_eq!(next.error(), Some(ErrorCode::EndOfData));
    assert_eq!(next.offset(), 1);
}
