//! Mock implementations for testing
//!
//! Host-test doubles for every capability trait. Each mock hands out a
//! cloneable handle (`Arc`-backed) so a test can flip input levels or
//! inspect written bytes while the task under test owns the mock itself.

#![cfg(any(test, feature = "std"))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::gpio::{DigitalInput, DigitalOutput};
use crate::stream::{ByteStream, IoError};
use crate::tick::{self, TickCallback, TickConfigError, TickSource};

/// Shared handle to a mock pin level.
#[derive(Clone)]
pub struct MockLevel(Arc<AtomicBool>);

impl MockLevel {
    /// Set the logical level.
    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    /// Read the logical level.
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Mock digital input with an externally controlled level.
pub struct MockDigitalInput {
    level: Arc<AtomicBool>,
}

impl MockDigitalInput {
    /// Create a mock input at the given initial level, plus a handle for
    /// driving it from the test.
    pub fn new(active: bool) -> (Self, MockLevel) {
        let level = Arc::new(AtomicBool::new(active));
        (
            Self {
                level: Arc::clone(&level),
            },
            MockLevel(level),
        )
    }
}

impl DigitalInput for MockDigitalInput {
    type Error = core::convert::Infallible;

    fn is_active(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.load(Ordering::SeqCst))
    }
}

/// Mock digital output recording the last driven level.
pub struct MockDigitalOutput {
    level: Arc<AtomicBool>,
}

impl MockDigitalOutput {
    /// Create a deasserted mock output plus an observer handle.
    pub fn new() -> (Self, MockLevel) {
        let level = Arc::new(AtomicBool::new(false));
        (
            Self {
                level: Arc::clone(&level),
            },
            MockLevel(level),
        )
    }
}

impl DigitalOutput for MockDigitalOutput {
    type Error = core::convert::Infallible;

    fn set_active(&mut self, active: bool) -> Result<(), Self::Error> {
        self.level.store(active, Ordering::SeqCst);
        Ok(())
    }
}

/// Observer handle to a [`MockByteStream`].
#[derive(Clone)]
pub struct MockStreamLog {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_next: Arc<AtomicBool>,
}

#[allow(clippy::unwrap_used)] // test double; poisoned mutex means the test already failed
impl MockStreamLog {
    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Total bytes accepted across all writes.
    pub fn total_bytes(&self) -> usize {
        self.writes.lock().unwrap().iter().map(Vec::len).sum()
    }

    /// All accepted bytes, concatenated in write order.
    pub fn all_bytes(&self) -> Vec<u8> {
        self.writes.lock().unwrap().concat()
    }

    /// Make the next write fail with [`IoError::Busy`].
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

/// Mock byte stream recording accepted writes, with one-shot failure
/// injection.
pub struct MockByteStream {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_next: Arc<AtomicBool>,
}

impl MockByteStream {
    /// Create an empty mock stream plus its observer handle.
    pub fn new() -> (Self, MockStreamLog) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let fail_next = Arc::new(AtomicBool::new(false));
        (
            Self {
                writes: Arc::clone(&writes),
                fail_next: Arc::clone(&fail_next),
            },
            MockStreamLog { writes, fail_next },
        )
    }
}

#[allow(clippy::unwrap_used)] // test double; poisoned mutex means the test already failed
impl ByteStream for MockByteStream {
    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(IoError::Busy);
        }
        self.writes.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }
}

/// Mock tick source recording the configuration sequence.
pub struct MockTickSource {
    clk_hz: u32,
    divider: Option<u32>,
    reload: u32,
    callback: Option<TickCallback>,
    started: bool,
}

impl MockTickSource {
    /// Create a mock driven by a `clk_hz` input clock.
    pub fn new(clk_hz: u32) -> Self {
        Self {
            clk_hz,
            divider: None,
            reload: tick::SYST_RELOAD_MAX,
            callback: None,
            started: false,
        }
    }

    /// Whether `start()` succeeded.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Deliver `n` ticks to the registered callback, as the interrupt would.
    pub fn fire(&self, n: u32) {
        if let Some(cb) = self.callback {
            for _ in 0..n {
                cb.invoke();
            }
        }
    }
}

impl TickSource for MockTickSource {
    fn configure(&mut self, divider: u32) {
        self.divider = Some(tick::nearest_supported_divider(divider));
    }

    fn set_tick_frequency(&mut self, hz: u32) -> u32 {
        let divider = self.divider.unwrap_or(1);
        self.reload = tick::reload_for(self.clk_hz, divider, hz);
        tick::achievable_hz(self.clk_hz, divider, self.reload)
    }

    fn register_tick_callback(&mut self, callback: TickCallback) {
        self.callback = Some(callback);
    }

    fn start(&mut self) -> Result<(), TickConfigError> {
        if self.divider.is_none() {
            return Err(TickConfigError::NotConfigured);
        }
        self.started = true;
        Ok(())
    }
}
