//! Capability layer for the Lark MP3 player.
//!
//! This crate defines the narrow interfaces the control core consumes from
//! the hardware, enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Task layer (firmware crate)
//!         ↓
//! Device state machine (control crate)
//!         ↓
//! Capability traits (this crate)
//!         ↓
//! Hardware layer (Embassy HAL + embedded-hal adapters)
//! ```
//!
//! # Capabilities
//!
//! - [`DigitalInput`] / [`DigitalOutput`] — active-level-aware pin access
//! - [`ByteStream`] — non-blocking byte sink (codec data port, display port)
//! - [`ChunkSource`] — "produce next chunk or end-of-stream" media source
//! - [`TickSource`] — periodic timer with a typed interrupt callback
//!
//! Concrete hardware drivers live in the `firmware` crate; the [`mocks`]
//! module provides host-test doubles for every capability.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod gpio;
pub mod source;
pub mod stream;
pub mod tick;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use gpio::{DigitalInput, DigitalOutput, InputPinAdapter, OutputPinAdapter, PinState};
pub use source::{ChunkSource, SliceSource};
pub use stream::{ByteStream, IoError, SpiDeviceStream};
pub use tick::{TickCallback, TickConfigError, TickSource};
