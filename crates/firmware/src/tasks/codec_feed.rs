//! Codec feed task — streams media chunks to the codec while playing.
//!
//! The codec raises its data-request line when it can accept another burst.
//! A chunk is pushed only when that line is asserted **and** the device is
//! `Playing` — never while paused. The codec has no notion of pause; feeding
//! it in any other state would drain a stale buffer, so the gate is a
//! correctness requirement, not an optimization.
//!
//! On end-of-stream the task itself requests `Idle`.

use control::{DeviceState, SharedDeviceState};
use embassy_time::{Duration, Ticker, Timer};
use platform::stream::IoError;
use platform::{ByteStream, ChunkSource, DigitalInput, DigitalOutput};

/// Codec polling period.
pub const P_CODEC: Duration = Duration::from_millis(50);

/// How long the reset line is held asserted during the handshake.
pub const RESET_PULSE: Duration = Duration::from_millis(10);

/// Outcome of one feed cycle, for tests and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Device is not `Playing`; nothing was read or pushed.
    NotPlaying,
    /// The codec has not requested data; nothing was read or pushed.
    NotRequested,
    /// One chunk of `n` bytes was pushed.
    Pushed(usize),
    /// The source is exhausted; `Idle` was requested.
    EndOfStream,
    /// The push failed; retried next cycle.
    WriteFailed(IoError),
    /// The data-request pin could not be read; retried next cycle.
    PinReadFailed,
}

/// The codec feed task state.
pub struct CodecFeed<Dreq, Reset, Stream, Source> {
    data_request: Dreq,
    reset: Reset,
    stream: Stream,
    source: Source,
    buf: [u8; platform::config::CODEC_CHUNK_LEN],
}

impl<Dreq, Reset, Stream, Source> CodecFeed<Dreq, Reset, Stream, Source>
where
    Dreq: DigitalInput,
    Reset: DigitalOutput,
    Stream: ByteStream,
    Source: ChunkSource,
{
    /// Build the feeder from the codec's data-request line, reset line,
    /// data port and the media source.
    pub fn new(data_request: Dreq, reset: Reset, stream: Stream, source: Source) -> Self {
        Self {
            data_request,
            reset,
            stream,
            source,
            buf: [0; platform::config::CODEC_CHUNK_LEN],
        }
    }

    /// One feed cycle: gate on state and data-request, then push one chunk.
    pub fn feed_once(&mut self, shared: &SharedDeviceState) -> FeedOutcome {
        // State gate first — the snapshot is a copy, no lock is held while
        // the pin or the stream is touched below.
        if shared.snapshot().current != DeviceState::Playing {
            return FeedOutcome::NotPlaying;
        }
        let requested = match self.data_request.is_active() {
            Ok(level) => level,
            Err(_error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("codec data-request read failed");
                return FeedOutcome::PinReadFailed;
            }
        };
        if !requested {
            return FeedOutcome::NotRequested;
        }
        match self.source.next_chunk(&mut self.buf) {
            None => {
                // The track ended; hand control back through the table.
                #[cfg(feature = "defmt")]
                defmt::info!("end of stream, requesting idle");
                if shared.transition(DeviceState::Idle).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("end-of-stream idle request dropped");
                }
                FeedOutcome::EndOfStream
            }
            Some(n) => match self.stream.write(&self.buf[..n]) {
                Ok(()) => FeedOutcome::Pushed(n),
                Err(error) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("codec push failed: {}", error);
                    FeedOutcome::WriteFailed(error)
                }
            },
        }
    }

    /// The task loop: handshake with the codec, latch readiness, then feed.
    pub async fn run(mut self, shared: &SharedDeviceState) -> ! {
        // Handshake: pulse reset, then wait for the codec to raise its
        // data-request line — that assertion is the "ready" signal.
        let _ = self.reset.set_active(true);
        Timer::after(RESET_PULSE).await;
        let _ = self.reset.set_active(false);

        let mut ticker = Ticker::every(P_CODEC);
        loop {
            ticker.next().await;
            if matches!(self.data_request.is_active(), Ok(true)) {
                break;
            }
        }
        shared.codec_feed_ready().set();
        #[cfg(feature = "defmt")]
        defmt::info!("codec handshake complete");

        loop {
            ticker.next().await;
            self.feed_once(shared);
        }
    }
}
