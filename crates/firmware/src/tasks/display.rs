//! Display task — renders the device state to the status display.
//!
//! A read-only consumer: it takes a snapshot each cycle, renders a short
//! status line, and writes it to the display's byte-stream port. A failed
//! write is retried on the next cycle; the state it failed to show is still
//! the state it will try to show again.

use control::{SharedDeviceState, StateSnapshot};
use core::fmt::Write as _;
use embassy_time::{Duration, Ticker};
use heapless::String;
use platform::ByteStream;

/// Display refresh period. Rendering is not time-critical.
pub const P_DISPLAY: Duration = Duration::from_millis(100);

/// Status line capacity: longest state label pair plus punctuation.
pub const STATUS_LINE_CAP: usize = 32;

/// Render the status line for a snapshot, e.g. `"playing (was idle)"`.
pub fn render_status_line(snapshot: StateSnapshot) -> String<STATUS_LINE_CAP> {
    let mut line = String::new();
    // Labels are short; the capacity bound cannot be hit.
    let _ = write!(
        line,
        "{} (was {})",
        snapshot.current.label(),
        snapshot.previous.label()
    );
    line
}

/// The display task state.
pub struct StatusDisplay<S> {
    stream: S,
    last_rendered: Option<StateSnapshot>,
}

impl<S: ByteStream> StatusDisplay<S> {
    /// Build the display task over its byte-stream port.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            last_rendered: None,
        }
    }

    /// One refresh cycle. Writes only when the snapshot changed since the
    /// last successful write; returns whether a write happened.
    pub fn render_once(&mut self, shared: &SharedDeviceState) -> bool {
        let snapshot = shared.snapshot();
        if self.last_rendered == Some(snapshot) {
            return false;
        }
        let line = render_status_line(snapshot);
        match self.stream.write(line.as_bytes()) {
            Ok(()) => {
                self.last_rendered = Some(snapshot);
                true
            }
            Err(_error) => {
                // Retry next cycle; last_rendered stays stale on purpose.
                #[cfg(feature = "defmt")]
                defmt::warn!("display write failed: {}", _error);
                false
            }
        }
    }

    /// The task loop.
    pub async fn run(mut self, shared: &SharedDeviceState) -> ! {
        let mut ticker = Ticker::every(P_DISPLAY);
        loop {
            ticker.next().await;
            self.render_once(shared);
        }
    }
}
