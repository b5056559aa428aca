use bufsource::*;

use test_harness::{filler, PatternStream};

/// Bytes >= 100 are part interior; a run of bytes < 100 is the epilogue
/// separating parts.
struct ThresholdValidator;

impl PartValidator for ThresholdValidator {
    fn validate(&mut self, window: &[u8], already_validated: usize) -> PartVerdict {
        let mut validated = already_validated;
        while validated < window.len() && window[validated] >= 100 {
            validated += 1;
        }
        if validated < window.len() {
            let epilogue = window[validated..]
                .iter()
                .take_while(|&&b| b < 100)
                .count();
            PartVerdict {
                validated,
                end_found: true,
                epilogue,
            }
        } else {
            PartVerdict {
                validated,
                end_found: false,
                epilogue: 0,
            }
        }
    }
}

#[test]
fn skip_part_lands_on_the_first_part() {
    // filler yields bytes < 100 for positions 1274..1280 and >= 100 from
    // 1280 on, so a source opened mid-epilogue starts with garbage.
    let skip_before: u64 = 1274;
    let first_part_pos: u64 = 1280;

    let mut stream = StreamSource::new(PatternStream::new(2000), vec![0u8; 256]);
    assert_eq!(stream.skip(skip_before).unwrap(), skip_before);
    for i in skip_before..first_part_pos {
        assert!(filler(i) < 100, "position {i} must be epilogue");
    }
    assert!(filler(first_part_pos) >= 100);

    let mut source = PartitionedSource::new(stream, ThresholdValidator);
    assert!(source.skip_part().unwrap());
    source.ensure(3).unwrap();
    for i in 0..3u64 {
        assert_eq!(source.peek()[i as usize], filler(first_part_pos + i));
    }
    // The part interior runs while filler stays >= 100: 128 bytes.
    let part = source.read_all().unwrap();
    assert_eq!(part, PatternStream::collect_range(first_part_pos, 128));
    assert!(part.iter().all(|&b| b >= 100));
}

#[test]
fn traverses_synthetic_parts_and_epilogues() {
    let data = vec![
        50u8, 60, // leading epilogue
        150, 160, 170, // part
        40, // epilogue
        200, 210, // part
        30, 30, // trailing epilogue
    ];
    let stream = StreamSource::new(std::io::Cursor::new(data), vec![0u8; 4]);
    let mut source = PartitionedSource::new(stream, ThresholdValidator);

    assert_eq!(source.read_all().unwrap(), b"");
    assert!(source.skip_part().unwrap());
    assert_eq!(source.read_all().unwrap(), [150, 160, 170]);
    assert!(source.skip_part().unwrap());
    assert_eq!(source.read_all().unwrap(), [200, 210]);
    // The trailing epilogue separates an empty final part.
    assert!(source.skip_part().unwrap());
    assert_eq!(source.read_all().unwrap(), b"");
    assert!(!source.skip_part().unwrap());
    assert!(source.is_exhausted());
}

#[test]
fn ensure_and_consume_stay_inside_the_part() {
    let data = vec![150u8, 151, 152, 153, 10, 200];
    let stream = StreamSource::new(std::io::Cursor::new(data), vec![0u8; 8]);
    let mut source = PartitionedSource::new(stream, ThresholdValidator);

    source.ensure(4).unwrap();
    assert_eq!(source.peek(), &[150, 151, 152, 153]);
    assert!(matches!(
        source.ensure(5),
        Err(Error::InsufficientData { .. })
    ));
    source.consume(2).unwrap();
    assert_eq!(source.peek(), &[152, 153]);
}

#[test]
fn skip_within_and_past_the_part() {
    let data = vec![150u8, 151, 152, 153, 10, 200, 201];
    let stream = StreamSource::new(std::io::Cursor::new(data), vec![0u8; 8]);
    let mut source = PartitionedSource::new(stream, ThresholdValidator);

    assert_eq!(source.skip(2).unwrap(), 2);
    // The part has two bytes left; the epilogue is not skippable here.
    assert_eq!(source.skip(10).unwrap(), 2);
    assert!(source.is_exhausted());
    assert!(source.skip_part().unwrap());
    assert_eq!(source.read_all().unwrap(), [200, 201]);
}

#[test]
fn boundary_wider_than_the_buffer_is_reported() {
    /// Validates nothing until a zero byte is visible in the window.
    struct MarkerValidator;

    impl PartValidator for MarkerValidator {
        fn validate(&mut self, window: &[u8], _already_validated: usize) -> PartVerdict {
            match window.iter().position(|&b| b == 0) {
                Some(i) => PartVerdict {
                    validated: i,
                    end_found: true,
                    epilogue: 1,
                },
                None => PartVerdict {
                    validated: 0,
                    end_found: false,
                    epilogue: 0,
                },
            }
        }
    }

    let data = vec![1u8; 64];
    let stream = StreamSource::new(std::io::Cursor::new(data), vec![0u8; 16]);
    let mut source = PartitionedSource::new(stream, MarkerValidator);
    assert!(matches!(
        source.skip_part(),
        Err(Error::BufferTooSmall { .. })
    ));
}
