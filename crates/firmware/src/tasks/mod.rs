//! The task set.
//!
//! Four tasks cooperate through the shared device state:
//!
//! - [`input_reader`] — polls the buttons, maps presses to transition
//!   requests
//! - [`codec_feed`] — streams media chunks to the codec while playing
//! - [`display`] — renders the current state to the status display
//! - [`control_unit`] — boots the state machine and supervises readiness
//!
//! Each module exposes the task's state as a plain struct with a
//! synchronous per-cycle step method plus an async `run` loop wrapping it
//! in an `embassy_time::Ticker`. Host tests drive the step methods with
//! mock peripherals; the hardware entry point spawns the `run` loops.

pub mod codec_feed;
pub mod control_unit;
pub mod display;
pub mod input_reader;
