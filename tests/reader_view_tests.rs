use bufsource::*;
use std::io::{BufRead, Cursor, Read};

use test_harness::PatternStream;

#[test]
fn read_returns_every_byte_across_chunkings() {
    for dst_size in [1usize, 3, 7, 64] {
        let data = PatternStream::collect_range(0, 100);
        let source = StreamSource::new(Cursor::new(data.clone()), vec![0u8; 9]);
        let mut reader = SourceReader::new(source);

        let mut out = Vec::new();
        let mut chunk = vec![0u8; dst_size];
        loop {
            let n = reader.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        assert_eq!(out, data);
    }
}

#[test]
fn read_byte_returns_none_after_exhaustion() {
    let source = StreamSource::new(Cursor::new(vec![1u8, 2]), vec![0u8; 4]);
    let mut reader = SourceReader::new(source);
    assert_eq!(reader.read_byte().unwrap(), Some(1));
    assert_eq!(reader.read_byte().unwrap(), Some(2));
    assert_eq!(reader.read_byte().unwrap(), None);
    assert_eq!(reader.read_byte().unwrap(), None);
}

#[test]
fn empty_source_reads_zero() {
    let source = StreamSource::new(Cursor::new(Vec::new()), vec![0u8; 4]);
    let mut reader = SourceReader::new(source);
    let mut buf = [0u8; 8];
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn bufread_view_parses_lines_from_a_limited_source() {
    let text = b"alpha\nbeta\ngamma\nrest is cut off".to_vec();
    let stream = StreamSource::new(Cursor::new(text), vec![0u8; 8]);
    let limited = LimitedSource::new(stream, 16);
    let reader = SourceReader::new(limited);
    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    assert_eq!(lines, ["alpha", "beta", "gamma"]);
}

#[test]
fn into_inner_hands_back_the_source() {
    let source = ArraySource::new([1u8, 2, 3]);
    let mut reader = SourceReader::new(source);
    assert_eq!(reader.read_byte().unwrap(), Some(1));
    let mut source = reader.into_inner();
    assert_eq!(source.read_all().unwrap(), vec![2, 3]);
}
