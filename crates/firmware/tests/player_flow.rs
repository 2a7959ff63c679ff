//! Integration test: the full boot-to-end-of-stream player scenario using
//! mock peripherals.
//!
//! Drives the tasks' per-cycle step functions directly — no executor, no
//! real time — through the canonical flow:
//!
//!   boot → Idle; play press (codec ready) → Playing; play press again →
//!   Paused; data-request asserted while Paused → zero bytes pushed;
//!   end-of-stream while Playing → Idle.
//!
//! Does NOT require physical hardware.
//!
//! Run with: cargo test -p firmware --test player_flow

// Integration test file -- intentional test patterns permitted.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use control::{DeviceState, SharedDeviceState};
use embassy_time::Instant;
use firmware::tasks::codec_feed::FeedOutcome;
use firmware::tasks::control_unit::StartupStatus;
use firmware::tasks::input_reader::ButtonMap;
use firmware::{CodecFeed, InputReader, StartupMonitor};
use platform::mocks::{MockByteStream, MockDigitalInput, MockDigitalOutput, MockLevel};
use platform::SliceSource;

fn t(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Four mock buttons plus their drive handles.
fn mock_panel() -> ([MockDigitalInput; 4], [MockLevel; 4]) {
    let (b0, l0) = MockDigitalInput::new(false);
    let (b1, l1) = MockDigitalInput::new(false);
    let (b2, l2) = MockDigitalInput::new(false);
    let (b3, l3) = MockDigitalInput::new(false);
    ([b0, b1, b2, b3], [l0, l1, l2, l3])
}

#[test]
fn end_to_end_player_scenario() {
    let shared = SharedDeviceState::new();

    // -- Boot ----------------------------------------------------------------
    let monitor = StartupMonitor::new(t(0));
    assert_eq!(monitor.check(&shared, t(0)), StartupStatus::Pending);

    // The tasks latch their flags during their own init.
    shared.input_reader_ready().set();
    shared.codec_feed_ready().set();
    assert_eq!(monitor.check(&shared, t(50)), StartupStatus::Ready);
    shared.transition(DeviceState::Idle).expect("boot edge");
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.current, DeviceState::Idle);
    assert_eq!(snapshot.previous, DeviceState::Uninitialized);

    // -- Wiring --------------------------------------------------------------
    let (pins, levels) = mock_panel();
    let mut reader = InputReader::new(pins, ButtonMap::default_map(), t(0));

    let (dreq, dreq_level) = MockDigitalInput::new(true);
    let (reset, _reset_level) = MockDigitalOutput::new();
    let (stream, log) = MockByteStream::new();
    let media = [0x42u8; 96]; // exactly three 32-byte chunks
    let mut codec = CodecFeed::new(dreq, reset, stream, SliceSource::new(&media));

    // -- Play ----------------------------------------------------------------
    levels[0].set(true);
    reader.poll_once(&shared, t(100));
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.current, DeviceState::Playing);
    assert_eq!(snapshot.previous, DeviceState::Idle);
    levels[0].set(false);
    reader.poll_once(&shared, t(150));

    // Playing + data-request asserted: one chunk per cycle.
    assert_eq!(codec.feed_once(&shared), FeedOutcome::Pushed(32));
    assert_eq!(log.total_bytes(), 32);

    // -- Pause ---------------------------------------------------------------
    levels[0].set(true);
    reader.poll_once(&shared, t(200));
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.current, DeviceState::Paused);
    assert_eq!(snapshot.previous, DeviceState::Playing);
    levels[0].set(false);
    reader.poll_once(&shared, t(250));

    // Data-request stays asserted while paused — still zero pushes.
    assert!(dreq_level.get());
    for _ in 0..5 {
        assert_eq!(codec.feed_once(&shared), FeedOutcome::NotPlaying);
    }
    assert_eq!(log.total_bytes(), 32, "no bytes may move while paused");

    // -- Resume and run to end of stream -------------------------------------
    levels[0].set(true);
    reader.poll_once(&shared, t(300));
    assert_eq!(shared.snapshot().current, DeviceState::Playing);

    assert_eq!(codec.feed_once(&shared), FeedOutcome::Pushed(32));
    assert_eq!(codec.feed_once(&shared), FeedOutcome::Pushed(32));
    assert_eq!(codec.feed_once(&shared), FeedOutcome::EndOfStream);
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.current, DeviceState::Idle);
    assert_eq!(snapshot.previous, DeviceState::Playing);
    assert_eq!(log.total_bytes(), 96);

    // Idle again: the feeder goes quiet.
    assert_eq!(codec.feed_once(&shared), FeedOutcome::NotPlaying);
}

#[test]
fn polling_glitch_is_not_a_press() {
    let shared = SharedDeviceState::new();
    shared.input_reader_ready().set();
    shared.codec_feed_ready().set();
    shared.transition(DeviceState::Idle).expect("boot edge");

    let (pins, levels) = mock_panel();
    let mut reader = InputReader::new(pins, ButtonMap::default_map(), t(0));

    // The line flips active only 10 ms after its last change — jitter, not
    // a press.
    levels[0].set(true);
    reader.poll_once(&shared, t(10));
    assert_eq!(shared.snapshot().current, DeviceState::Idle);

    // Release, then a press after a long stable-inactive window counts.
    levels[0].set(false);
    reader.poll_once(&shared, t(20));
    levels[0].set(true);
    reader.poll_once(&shared, t(100));
    assert_eq!(shared.snapshot().current, DeviceState::Playing);
}

#[test]
fn illegal_press_is_dropped_without_side_effects() {
    let shared = SharedDeviceState::new();
    shared.input_reader_ready().set();
    shared.codec_feed_ready().set();
    shared.transition(DeviceState::Idle).expect("boot edge");

    let (pins, levels) = mock_panel();
    let mut reader = InputReader::new(pins, ButtonMap::default_map(), t(0));

    // Pause (button 2) while idle is not an edge in the table.
    levels[2].set(true);
    reader.poll_once(&shared, t(100));
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.current, DeviceState::Idle);
    assert_eq!(snapshot.previous, DeviceState::Uninitialized);
}

#[test]
fn play_press_refused_while_codec_not_ready() {
    let shared = SharedDeviceState::new();
    shared.input_reader_ready().set();
    // codec_feed_ready deliberately left false. Playing is gated on the
    // codec flag; the boot edge itself is not.
    shared.transition(DeviceState::Idle).expect("boot edge");

    let (pins, levels) = mock_panel();
    let mut reader = InputReader::new(pins, ButtonMap::default_map(), t(0));

    levels[1].set(true); // explicit play button
    reader.poll_once(&shared, t(100));
    assert_eq!(shared.snapshot().current, DeviceState::Idle);
}
