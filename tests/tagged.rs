#![allow(clippy::unwrap_used)]

use cbor_cursor::{
    Cursor, DecodeLimits, ElementType, Endian, ErrorCode, Kind, TaggedCursor,
};
use hex_literal::hex;

#[test]
fn untagged_values_have_no_tags() {
    let item = TaggedCursor::new(&hex!("f8ff"));
    assert_eq!(item.tag_count(), 0);
    assert_eq!(item.tag(0), None);
    assert_eq!(item.kind(), Kind::Simple);
    assert_eq!(item.tag_offset(), 0);
}

#[test]
fn single_tags_resolve_to_their_payload() {
    let cases: [(&[u8], u64, Kind); 5] = [
        (&hex!("c074323031332d30332d32315432303a30343a30305a"), 0, Kind::TextString),
        (&hex!("c11a514b67b0"), 1, Kind::PositiveInt),
        (&hex!("c1fb41d452d9ec200000"), 1, Kind::Float64),
        (&hex!("d74401020304"), 23, Kind::ByteString),
        (&hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d"), 32, Kind::TextString),
    ];
    for (data, tag, kind) in cases {
        let item = TaggedCursor::new(data);
        assert_eq!(item.kind(), kind, "{data:02x?}");
        assert_eq!(item.tag_count(), 1);
        assert_eq!(item.tag(0), Some(tag));
        assert_eq!(item.tag(1), None);
    }
}

#[test]
fn stacked_tags_are_reread_in_order() {
    let item = TaggedCursor::new(&hex!("d9d9f7 c1 d820 6161"));
    assert_eq!(item.tag_count(), 3);
    assert_eq!(item.tag(0), Some(55_799));
    assert_eq!(item.tag(1), Some(1));
    assert_eq!(item.tag(2), Some(32));
    assert_eq!(item.cursor().text(), Some("a"));
    assert_eq!(item.cursor().offset(), 6);
    assert!(item.next().cursor().at_end());
}

#[test]
fn traversal_resolves_every_produced_cursor() {
    let data = hex!("83 c101 c2c3f6 02");
    let root = TaggedCursor::new(&data);
    assert_eq!(root.tag_count(), 0);

    let first = root.enter();
    assert_eq!(first.tag_count(), 1);
    assert_eq!(first.cursor().as_u64(), Some(1));

    let second = first.next();
    assert_eq!(second.tag_count(), 2);
    assert_eq!(second.tag(1), Some(3));
    assert!(second.cursor().is_null());

    let third = second.next();
    assert_eq!(third.tag_count(), 0);
    assert_eq!(third.cursor().as_u64(), Some(2));
}

#[test]
fn iteration_hands_out_tagged_cursors() {
    let data = hex!("82 c1 01 c2 02");
    let mut tags = Vec::new();
    let next = TaggedCursor::new(&data).for_each(|item, i| {
        assert_eq!(item.cursor().as_usize(), Some(i + 1));
        tags.push(item.tag(0).unwrap());
    });
    assert_eq!(tags, [1, 2]);
    assert!(next.cursor().at_end());

    let data = hex!("a1 c1 6161 c2 01");
    let next = TaggedCursor::new(&data).for_each_pair(|k, v| {
        assert_eq!((k.tag(0), v.tag(0)), (Some(1), Some(2)));
        assert_eq!(k.cursor().text(), Some("a"));
    });
    assert!(next.error() == Some(ErrorCode::EndOfData));
}

#[test]
fn tagged_next_exit() {
    let data = hex!("9f 01 02 ff c1 05");
    let after = TaggedCursor::new(&data).enter().next_exit();
    assert_eq!(after.tag(0), Some(1));
    assert_eq!(after.cursor().as_u64(), Some(5));
}

#[test]
fn typed_array_tags_are_recognised() {
    let item = TaggedCursor::new(&hex!("d855 48 db0f4940 0050c347"));
    let tag = item.typed_array_tag().unwrap();
    assert_eq!(tag.element_type(), ElementType::Float32);
    assert_eq!(tag.endian(), Endian::Little);
    assert_eq!(item.typed_array().unwrap().len(), 2);

    let plain = TaggedCursor::new(&hex!("d818 4100"));
    assert_eq!(plain.typed_array_tag(), None);
    assert!(plain.typed_array().is_none());

    assert_eq!(TaggedCursor::new(&hex!("d857 4100")).typed_array_tag(), None);
}

#[test]
fn typed_array_needs_a_definite_byte_string() {
    let text = TaggedCursor::new(&hex!("d840 6161"));
    assert!(text.typed_array_tag().is_some());
    assert!(text.typed_array().is_none());

    let chunked = TaggedCursor::new(&hex!("d840 5f 4101 ff"));
    assert!(chunked.typed_array().is_none());
}

#[test]
fn dangling_tag_is_end_of_data_at_the_tag() {
    let item = TaggedCursor::new(&hex!("00 c1"));
    let after = item.next();
    assert_eq!(after.error(), Some(ErrorCode::EndOfData));
    assert_eq!(after.cursor().offset(), 1);
    assert_eq!(after.tag_count(), 1);
}

#[test]
fn long_tag_runs_hit_the_depth_limit() {
    let mut data = vec![0xc1; 10];
    data.push(0x00);
    let item = TaggedCursor::with_limits(&data, DecodeLimits::with_max_depth(4));
    assert_eq!(item.error(), Some(ErrorCode::DepthLimitExceeded));
    assert_eq!(item.cursor().offset(), 0);

    let item = TaggedCursor::with_limits(&data, DecodeLimits::with_max_depth(16));
    assert_eq!(item.tag_count(), 10);
    assert_eq!(item.cursor().as_u64(), Some(0));
}

#[test]
fn from_cursor() {
    let data = hex!("c1 00");
    let item: TaggedCursor<'_> = Cursor::new(&data).into();
    assert_eq!(item.tag_count(), 1);
    assert_eq!(TaggedCursor::default().error(), Some(ErrorCode::NotInitialised));
}

#[test]
fn accessors_read_through_the_tags() {
    let data = hex!("83 c1 1903e8 c2 6161 d818 c3 fb3ff8000000000000");
    let first = TaggedCursor::new(&data).enter();
    assert!(first.is_int());
    assert_eq!(first.as_u64(), Some(1000));
    assert_eq!(first.as_i64(), Some(1000));
    assert_eq!(first.value(), 1000);
    assert_eq!(first.offset(), 2);
    assert_eq!(first.raw(), Some(&hex!("1903e8")[..]));

    let second = first.next();
    assert!(second.is_text());
    assert_eq!(second.text(), Some("a"));
    assert_eq!(second.bytes(), Some(&b"a"[..]));
    assert_eq!(second.len(), Some(1));

    let third = second.next();
    assert_eq!(third.tag_count(), 2);
    assert!(third.is_float());
    assert_eq!(third.as_f64(), Some(1.5));
    assert_eq!(third.as_u64(), None);

    let end = third.next();
    assert!(end.is_error() && end.at_end());
}
