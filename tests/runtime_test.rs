//! Heap and scalar I/O behaviour through the public API
use std::io::Cursor;

use bumprt::io::{print_int_to, read_int_from};
use bumprt::memory::heap::{Heap, HeapConfig, HeapError};
use bumprt::memory::WORD_SIZE;

fn heap_of(bytes: usize) -> Heap {
    Heap::with_config(&HeapConfig::default().with_heap_size(bytes)).unwrap()
}

#[test]
pub fn test_cursor_advances_by_rounded_size() {
    let heap = heap_of(4096);
    for size in [0u64, 1, 7, 8, 9, 15, 16, 17, 100, 255] {
        let before = heap.used_bytes();
        heap.allocate(size).unwrap();
        let rounded = size.div_ceil(WORD_SIZE as u64) * WORD_SIZE as u64;
        assert_eq!(heap.used_bytes() - before, rounded as usize);
    }
}

#[test]
pub fn test_allocations_do_not_overlap() {
    let heap = heap_of(4096);
    let ranges: Vec<(usize, usize)> = [3u64, 24, 1, 0, 57, 8, 200]
        .iter()
        .map(|size| {
            let handle = heap.allocate(*size).unwrap();
            let start = handle.as_ptr() as usize;
            (start, start + *size as usize)
        })
        .collect();

    for (i, (a_start, a_end)) in ranges.iter().enumerate() {
        for (b_start, b_end) in ranges.iter().skip(i + 1) {
            assert!(a_end <= b_start || b_end <= a_start);
        }
    }
}

#[test]
pub fn test_whole_heap_then_one_byte() {
    let heap = heap_of(1024);
    heap.allocate(1024).unwrap();
    assert_eq!(heap.cursor(), heap.end());
    assert!(matches!(
        heap.allocate(1),
        Err(HeapError::HeapExhausted { requested: 1, .. })
    ));
}

#[test]
pub fn test_zero_size_allocation() {
    let heap = heap_of(64);
    heap.allocate(8).unwrap();
    let cursor = heap.cursor();
    let handle = heap.allocate(0).unwrap();
    assert_eq!(handle.offset(), cursor);
    assert_eq!(heap.cursor(), cursor);
}

#[test]
pub fn test_small_heap_fills_exactly() {
    let heap = heap_of(64);
    assert!(heap.allocate(8).is_ok());
    assert!(heap.allocate(16).is_ok());
    assert!(heap.allocate(40).is_ok());
    assert_eq!(
        heap.allocate(1).unwrap_err(),
        HeapError::HeapExhausted {
            requested: 1,
            cursor: 8,
            end: 8
        }
    );
}

#[test]
pub fn test_oversized_first_request() {
    let heap = heap_of(64);
    let err = heap.allocate(65).unwrap_err();
    assert_eq!(
        err,
        HeapError::HeapExhausted {
            requested: 65,
            cursor: 0,
            end: 8
        }
    );
    assert_eq!(
        err.to_string(),
        "heap exhausted: requested 65 bytes (cursor: word 0, end: word 8)"
    );
}

#[test]
pub fn test_print_read_round_trip() {
    for x in [0, -1, 1, 42, i64::MIN, i64::MAX] {
        let mut out = Vec::new();
        print_int_to(&mut out, x).unwrap();
        assert_eq!(read_int_from(&mut Cursor::new(out)).unwrap(), x);
    }
}

#[test]
pub fn test_print_min_exactly() {
    let mut out = Vec::new();
    print_int_to(&mut out, i64::MIN).unwrap();
    assert_eq!(out, b"-9223372036854775808");
}

#[test]
pub fn test_prints_are_unseparated() {
    let mut out = Vec::new();
    print_int_to(&mut out, 1).unwrap();
    print_int_to(&mut out, -2).unwrap();
    assert_eq!(out, b"1-2");
}
