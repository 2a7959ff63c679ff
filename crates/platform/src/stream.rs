//! Byte-stream peripheral capability
//!
//! A [`ByteStream`] is a non-blocking byte sink: the display's command port
//! and the codec's data port both look like one. Writes either complete
//! immediately or fail with an [`IoError`]; callers retry on their next
//! polling cycle rather than waiting for completion, so no task ever blocks
//! inside a peripheral call.

use thiserror_no_std::Error;

/// Errors from byte-stream writes.
///
/// None of these is fatal: the owning task logs the failure and retries on
/// its next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// The peripheral did not accept the transfer.
    #[error("peripheral rejected the transfer")]
    Rejected,
    /// The peripheral is busy with a previous transfer.
    #[error("peripheral busy")]
    Busy,
    /// The bus reported a transfer fault.
    #[error("bus fault")]
    Bus,
}

/// Non-blocking byte sink.
pub trait ByteStream {
    /// Write `bytes` to the peripheral.
    ///
    /// Either the whole buffer is accepted or the write fails; there are no
    /// partial writes at this layer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError>;
}

/// Lifts any `embedded_hal` 1.0 `SpiDevice` into [`ByteStream`].
///
/// The `SpiDevice` contract manages chip-select assertion per transaction,
/// so a write here is one framed transfer on the wire.
pub struct SpiDeviceStream<D> {
    dev: D,
}

impl<D: embedded_hal::spi::SpiDevice> SpiDeviceStream<D> {
    /// Wrap an SPI device.
    pub fn new(dev: D) -> Self {
        Self { dev }
    }
}

impl<D: embedded_hal::spi::SpiDevice> ByteStream for SpiDeviceStream<D> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.dev.write(bytes).map_err(|_| IoError::Bus)
    }
}
