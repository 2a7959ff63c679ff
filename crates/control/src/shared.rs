//! Mutex-guarded shared device state.
//!
//! One [`SharedDeviceState`] value exists for the whole process. It is
//! created before any task runs (via `StaticCell` in the entry point) and
//! handed to each task as a `&'static` shared reference at spawn time —
//! there are no free-floating globals.
//!
//! Locking discipline: every access is a copy-out (or copy-in) under one
//! short critical section; callers act on the copy after the lock is
//! released, so no lock is ever held across a peripheral call or an await
//! point.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::state::{DeviceState, StateMachine, TransitionError};

// Justification for CriticalSectionRawMutex:
// The state is read from thread-mode tasks at every polling period and must
// also be readable from interrupt context (tick callbacks doing scheduler
// bookkeeping). CriticalSectionRawMutex sets PRIMASK=1 for the duration of
// the closure; each closure here is a Cell get/set plus an edge-table check
// (a handful of instructions, no loops), so the interrupt-masked window is
// tens of nanoseconds — far below any task's polling period.

/// Consistent `(current, previous)` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateSnapshot {
    /// The latest applied state.
    pub current: DeviceState,
    /// The state before the latest applied transition.
    pub previous: DeviceState,
}

/// Per-task readiness flag, one lock each.
///
/// A flag only ever moves `false → true` (set once when its owning task
/// finishes self-initialization), which is what makes the check-then-act in
/// [`SharedDeviceState::transition`] safe without holding both locks.
pub struct ReadyFlag {
    flag: Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl ReadyFlag {
    /// Create an unset flag.
    pub const fn new() -> Self {
        Self {
            flag: Mutex::new(Cell::new(false)),
        }
    }

    /// Mark the owning task ready. Idempotent.
    pub fn set(&self) {
        self.flag.lock(|f| f.set(true));
    }

    /// Read the flag.
    pub fn get(&self) -> bool {
        self.flag.lock(Cell::get)
    }
}

impl Default for ReadyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide device state: the state machine under its mutex, plus
/// the two per-task readiness flags.
///
/// The control task is the logical owner of the `(current, previous)` pair;
/// other tasks are readers plus writers of their own readiness flag only.
pub struct SharedDeviceState {
    machine: Mutex<CriticalSectionRawMutex, Cell<StateMachine>>,
    input_reader_ready: ReadyFlag,
    codec_feed_ready: ReadyFlag,
}

impl SharedDeviceState {
    /// Create the power-on state. `const` so it can live in a `StaticCell`.
    pub const fn new() -> Self {
        Self {
            machine: Mutex::new(Cell::new(StateMachine::new())),
            input_reader_ready: ReadyFlag::new(),
            codec_feed_ready: ReadyFlag::new(),
        }
    }

    /// Copy out a consistent `(current, previous)` pair under one critical
    /// section.
    pub fn snapshot(&self) -> StateSnapshot {
        self.machine.lock(|cell| {
            let machine = cell.get();
            StateSnapshot {
                current: machine.current(),
                previous: machine.previous(),
            }
        })
    }

    /// Request a transition to `requested`.
    ///
    /// Validates the edge against the table in
    /// [`DeviceState::can_transition_to`]; on success, `previous` and
    /// `current` are updated together, atomically with respect to
    /// [`snapshot`](Self::snapshot) readers. A request for `Playing` is
    /// additionally refused until the codec feed task has reported ready —
    /// the codec must never be fed before its handshake completes.
    pub fn transition(&self, requested: DeviceState) -> Result<(), TransitionError> {
        if requested == DeviceState::Playing && !self.codec_feed_ready.get() {
            return Err(TransitionError::CodecNotReady);
        }
        self.machine.lock(|cell| {
            let mut machine = cell.get();
            machine.request(requested)?;
            cell.set(machine);
            Ok(())
        })
    }

    /// The input reader task's readiness flag.
    pub fn input_reader_ready(&self) -> &ReadyFlag {
        &self.input_reader_ready
    }

    /// The codec feed task's readiness flag.
    pub fn codec_feed_ready(&self) -> &ReadyFlag {
        &self.codec_feed_ready
    }
}

impl Default for SharedDeviceState {
    fn default() -> Self {
        Self::new()
    }
}
