//! Integration test: buffered stream contract.
//!
//! Exercises the engine's observable guarantees end-to-end against the
//! scriptable in-memory descriptor: the position law (logical position =
//! raw cursor - buffered bytes), read-length bounding, sentinel vs
//! failing variants, separator/limit scanning, write realignment, and
//! scoped lifecycle behavior.
//!
//! Run: cargo test -p bufio-core --test stream_contract_test

use bufio_core::testing::MemoryIo;
use bufio_core::{Error, OpenMode, Separator, Stream, Whence};

fn reader(data: &[u8]) -> Stream<MemoryIo> {
    Stream::new(MemoryIo::new(data), OpenMode::reading())
}

fn rw(data: &[u8]) -> Stream<MemoryIo> {
    Stream::new(MemoryIo::new(data), OpenMode::parse("r+").unwrap())
}

// ---------------------------------------------------------------------------
// Position invariant
// ---------------------------------------------------------------------------

#[test]
fn position_law_holds_across_operations() {
    let mut s = reader(b"0123456789");

    let checkpoints: &[&dyn Fn(&mut Stream<MemoryIo>)] = &[
        &|s| {
            s.read_byte().unwrap();
        },
        &|s| {
            s.read(Some(3)).unwrap();
        },
        &|s| s.ungetc(b"abc"),
        &|s| {
            s.gets_limit(2).unwrap();
        },
        &|s| {
            s.seek(5, Whence::Start).unwrap();
        },
        &|s| {
            s.eof().unwrap();
        },
    ];

    for step in checkpoints {
        step(&mut s);
        let pos = s.pos().unwrap();
        let raw_cursor = s.get_ref().cursor();
        // pos() issues a raw seek, never a read, so neither the cursor
        // nor the buffered count moved since it was computed.
        assert_eq!(pos, raw_cursor - s.buffered() as u64);
    }
}

// ---------------------------------------------------------------------------
// Read-length bounding
// ---------------------------------------------------------------------------

#[test]
fn bounded_read_advances_exactly_n() {
    let mut s = reader(b"0123456789");
    let before = s.pos().unwrap();
    let bytes = s.read(Some(4)).unwrap().unwrap();
    assert_eq!(bytes, b"0123");
    assert_eq!(s.pos().unwrap(), before + 4);
}

#[test]
fn short_read_returns_remaining_bytes() {
    let mut s = reader(b"xyz");
    assert_eq!(s.read(Some(100)).unwrap().unwrap(), b"xyz");
}

#[test]
fn exhausted_bounded_read_is_the_sentinel() {
    let mut s = reader(b"xyz");
    s.read(None).unwrap();
    assert_eq!(s.read(Some(5)).unwrap(), None);
    // The unbounded form stays empty-not-sentinel.
    assert_eq!(s.read(None).unwrap().unwrap(), b"");
}

#[test]
fn zero_length_read_issues_no_raw_operation() {
    let mut s = reader(b"xyz");
    assert_eq!(s.read(Some(0)).unwrap().unwrap(), b"");
    assert_eq!(s.get_ref().reads(), 0);
    assert_eq!(s.get_ref().seeks(), 0);
}

// ---------------------------------------------------------------------------
// Pushback
// ---------------------------------------------------------------------------

#[test]
fn pushback_round_trip_with_prior_buffer_state() {
    let mut s = reader(b"tail");
    // Prime the buffer first so the pushback prepends, not replaces.
    assert_eq!(s.read_byte().unwrap(), b't');
    s.ungetc(b"head ");
    assert_eq!(s.read(Some(5)).unwrap().unwrap(), b"head ");
    assert_eq!(s.read(None).unwrap().unwrap(), b"ail");
}

// ---------------------------------------------------------------------------
// Separator scanning
// ---------------------------------------------------------------------------

#[test]
fn newline_scanning_then_end_of_stream() {
    let mut s = reader(b"ab\ncd\n");
    assert_eq!(s.read_line().unwrap(), b"ab\n");
    assert_eq!(s.read_line().unwrap(), b"cd\n");
    assert!(matches!(s.read_line(), Err(Error::EndOfStream)));
    // gets is the sentinel twin of the same condition.
    assert_eq!(s.gets().unwrap(), None);
}

#[test]
fn limit_precedence_without_separator() {
    let mut s = reader(b"abcdef");
    assert_eq!(s.gets_limit(3).unwrap().unwrap(), b"abc");
    assert_eq!(s.gets_limit(3).unwrap().unwrap(), b"def");
}

#[test]
fn paragraph_mode_uses_double_newline() {
    let mut s = reader(b"one\n\ntwo");
    assert_eq!(
        s.gets_with(Separator::Bytes(b""), None).unwrap().unwrap(),
        b"one\n\n"
    );
    assert_eq!(
        s.gets_with(Separator::Bytes(b""), None).unwrap().unwrap(),
        b"two"
    );
}

#[test]
fn separator_split_across_fills_is_not_matched() {
    // Fill windows of two bytes: "xa" then "b\n". The separator "ab"
    // straddles the window boundary, so scanning never sees it and the
    // whole content comes back as one unterminated line.
    let io = MemoryIo::new(b"xab\n").with_read_limit(2);
    let mut s = Stream::new(io, OpenMode::reading());
    assert_eq!(
        s.gets_with(Separator::Bytes(b"ab"), None).unwrap().unwrap(),
        b"xab\n"
    );
}

#[test]
fn limit_compares_against_the_current_window_only() {
    // Windows of three bytes; limit of four is never reached inside a
    // single window, so the accumulated line grows past it until the
    // separator appears.
    let io = MemoryIo::new(b"abcdefg\nrest").with_read_limit(3);
    let mut s = Stream::new(io, OpenMode::reading());
    assert_eq!(s.gets_limit(4).unwrap().unwrap(), b"abcdefg\n");
}

#[test]
fn nil_separator_slurps_and_never_fails() {
    let mut s = reader(b"a\nb");
    assert_eq!(
        s.read_line_with(Separator::None, None).unwrap(),
        b"a\nb"
    );
    // Even the failing form returns empty at the end for the unbounded
    // case, because it degrades to an unbounded read.
    assert_eq!(s.read_line_with(Separator::None, None).unwrap(), b"");
}

#[test]
fn multi_character_separator_in_one_window() {
    let mut s = reader(b"key=>value=>rest");
    assert_eq!(
        s.read_line_with(Separator::Bytes(b"=>"), None).unwrap(),
        b"key=>"
    );
    assert_eq!(
        s.read_line_with(Separator::Bytes(b"=>"), None).unwrap(),
        b"value=>"
    );
    assert_eq!(
        s.read_line_with(Separator::Bytes(b"=>"), None).unwrap(),
        b"rest"
    );
}

#[test]
fn read_lines_collects_the_remainder() {
    let mut s = reader(b"a\nb\nc");
    let lines = s.read_lines().unwrap();
    assert_eq!(lines, vec![b"a\n".to_vec(), b"b\n".to_vec(), b"c".to_vec()]);
    assert_eq!(s.read_lines().unwrap(), Vec::<Vec<u8>>::new());
}

// ---------------------------------------------------------------------------
// Write invalidation
// ---------------------------------------------------------------------------

#[test]
fn write_observes_logical_position_not_stale_buffer() {
    let mut s = rw(b"aaaabbbbcccc");
    // Read 4 bytes; the fill buffered everything, so the raw cursor is
    // at 12 while the logical position is 4.
    assert_eq!(s.read(Some(4)).unwrap().unwrap(), b"aaaa");
    s.write(b"XXXX").unwrap();
    // The write landed at logical position 4.
    assert_eq!(s.get_ref().contents(), b"aaaaXXXXcccc");
    // And reading resumes at 8, seeing fresh bytes, not stale ones.
    assert_eq!(s.read(None).unwrap().unwrap(), b"cccc");
}

#[test]
fn write_with_empty_buffer_skips_realignment() {
    let mut s = rw(b"");
    s.write(b"data").unwrap();
    assert_eq!(s.get_ref().seeks(), 0);
}

// ---------------------------------------------------------------------------
// eof
// ---------------------------------------------------------------------------

#[test]
fn eof_probe_is_non_raising_and_non_destructive() {
    let mut s = reader(b"z");
    assert!(!s.eof().unwrap());
    assert_eq!(s.read_byte().unwrap(), b'z');
    assert!(s.eof().unwrap());
    assert!(s.eof().unwrap());
}

// ---------------------------------------------------------------------------
// Scoped lifecycle
// ---------------------------------------------------------------------------

#[test]
fn scoped_close_is_idempotent_and_swallows_cleanup_failure() {
    // Close inside the block: the wrapper must not close again.
    reader(b"x")
        .scoped(|s| {
            s.close()?;
            Ok(())
        })
        .unwrap();

    // Failing cleanup close: the block's value still comes through.
    let io = MemoryIo::new(b"q").with_failing_close();
    let got = Stream::new(io, OpenMode::reading())
        .scoped(|s| s.read_byte())
        .unwrap();
    assert_eq!(got, b'q');
}

#[test]
fn block_failure_wins_over_cleanup_failure() {
    let io = MemoryIo::new(b"").with_failing_close();
    let res = Stream::new(io, OpenMode::reading()).scoped(|s| s.read_byte());
    // The block's EndOfStream survives; the close failure is swallowed.
    assert!(matches!(res, Err(Error::EndOfStream)));
}
