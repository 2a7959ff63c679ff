//! Device state coordination for the Lark MP3 player — the transition table
//! and the mutex-guarded shared state every task reads.
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]

pub mod shared;
pub mod state;

pub use shared::{ReadyFlag, SharedDeviceState, StateSnapshot};
pub use state::{DeviceState, StateMachine, TransitionError};
