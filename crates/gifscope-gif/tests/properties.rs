use gifscope_gif::{build_ranges, build_tree, describe, parse, FrameIndex, OUT_OF_BOUNDS};
use proptest::prelude::*;

/// A valid prefix followed by arbitrary bytes, biased toward block markers.
fn gif_bytes() -> impl Strategy<Value = Vec<u8>> {
    let version = prop_oneof![Just(*b"87a"), Just(*b"89a")];
    let marker = prop_oneof![
        4 => any::<u8>(),
        1 => Just(0x21u8),
        1 => Just(0x2Cu8),
        1 => Just(0xF9u8),
        1 => Just(0xFFu8),
        1 => Just(0x00u8),
    ];
    (
        version,
        any::<[u8; 7]>(),
        proptest::collection::vec(marker, 0..256),
    )
        .prop_map(|(version, screen, body)| {
            let mut data = b"GIF".to_vec();
            data.extend_from_slice(&version);
            data.extend_from_slice(&screen);
            data.extend_from_slice(&body);
            data
        })
}

proptest! {
    #[test]
    fn ranges_are_contiguous_and_in_bounds(data in gif_bytes()) {
        let (_, screen) = parse(&data).unwrap();
        let ranges = build_ranges(&data, &screen);

        prop_assert_eq!(ranges[0].start, 0);
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].end_exclusive(), pair[1].start);
        }
        let last = ranges.last().unwrap();
        prop_assert!(last.end_exclusive() <= data.len());
    }

    #[test]
    fn scan_is_bounded_by_length(data in gif_bytes()) {
        let (_, screen) = parse(&data).unwrap();
        let ranges = build_ranges(&data, &screen);

        // At most one range per byte, plus a possible empty trailing range.
        prop_assert!(ranges.len() <= data.len() + 1);
    }

    #[test]
    fn describe_is_total(data in gif_bytes(), offset in any::<i64>()) {
        let (_, screen) = parse(&data).unwrap();
        let text = describe(&data, &screen, offset);

        if offset < 0 || offset as u64 >= data.len() as u64 {
            prop_assert_eq!(text, OUT_OF_BOUNDS);
        } else {
            prop_assert!(!text.is_empty());
            prop_assert_ne!(text, OUT_OF_BOUNDS);
        }
    }

    #[test]
    fn describe_every_in_bounds_offset(data in gif_bytes()) {
        let (_, screen) = parse(&data).unwrap();
        for offset in 0..data.len() {
            prop_assert_ne!(describe(&data, &screen, offset as i64), OUT_OF_BOUNDS);
        }
    }

    #[test]
    fn frames_number_image_descriptors(data in gif_bytes()) {
        let (_, screen) = parse(&data).unwrap();
        let ranges = build_ranges(&data, &screen);
        let tree = build_tree(&ranges);

        let descriptors = ranges
            .iter()
            .filter(|r| r.kind == gifscope_gif::BlockKind::ImageDescriptor)
            .count();
        let numbers: Vec<_> = tree.frames().filter_map(|f| f.frame_index()).collect();

        prop_assert_eq!(numbers, (0..descriptors).collect::<Vec<_>>());
        prop_assert_eq!(FrameIndex::build(&tree).frame_count(), descriptors);
    }

    #[test]
    fn short_buffers_are_rejected(data in proptest::collection::vec(any::<u8>(), 0..13)) {
        let err = parse(&data).unwrap_err();
        prop_assert!(err.is_format_error());
    }

    #[test]
    fn wrong_signature_is_rejected(sig in any::<[u8; 6]>(), rest in any::<[u8; 7]>()) {
        prop_assume!(&sig != b"GIF87a" && &sig != b"GIF89a");
        let mut data = sig.to_vec();
        data.extend_from_slice(&rest);
        prop_assert!(parse(&data).is_err());
    }

    #[test]
    fn valid_signature_round_trips(
        version in prop_oneof![Just("87a"), Just("89a")],
        rest in any::<[u8; 7]>(),
        tail in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut data = format!("GIF{}", version).into_bytes();
        data.extend_from_slice(&rest);
        data.extend_from_slice(&tail);

        let (header, _) = parse(&data).unwrap();
        prop_assert_eq!(header.signature, "GIF");
        prop_assert_eq!(header.version, version);
    }
}
