//! Lark MP3 Player Firmware
//!
//! Control core for a single-board MP3 player: a set of fixed-priority tasks
//! coordinating through one mutex-guarded device state.
//!
//! # Architecture
//!
//! ```text
//! Task layer (this crate: input reader, codec feed, display, control unit)
//!         ↓
//! Device state machine (control crate)
//!         ↓
//! Capability traits (platform crate)
//!         ↓
//! Hardware layer (Embassy HAL + embedded-hal adapters)
//! ```
//!
//! # Task priorities
//!
//! | Task          | Executor              | Rationale                        |
//! |---------------|-----------------------|----------------------------------|
//! | control unit  | high (interrupt)      | owns the state machine           |
//! | input reader  | high (interrupt)      | presses must never be missed     |
//! | codec feed    | medium (interrupt)    | deadline on the data-request line|
//! | display       | low (thread mode)     | rendering is not time-critical   |
//!
//! Every task loop polls on a fixed period and suspends only at the
//! end-of-iteration sleep; no task blocks inside a peripheral call.
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, embedded HAL)
//! - `std` - Enable standard library (for testing)

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod boot;
pub mod exception_handlers;
pub mod tasks;
pub mod tick;

pub use tasks::codec_feed::CodecFeed;
pub use tasks::control_unit::StartupMonitor;
pub use tasks::display::StatusDisplay;
pub use tasks::input_reader::{ButtonAction, ButtonMap, InputReader};
