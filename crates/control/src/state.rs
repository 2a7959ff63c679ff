//! Device state machine.
//!
//! `StateMachine` is a pure, `no_std`, allocation-free value type that
//! tracks the player's current and previous [`DeviceState`] and validates
//! every requested transition against the fixed edge table.
//!
//! It deliberately has **no** locking and **no** I/O — concurrency is
//! layered on top by [`SharedDeviceState`](crate::shared::SharedDeviceState),
//! and hardware is driven by the tasks that read the resulting state. This
//! separation makes the transition table trivially testable on the host.

/// Device playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Power-on value; left exactly once, on successful boot, and never
    /// re-entered.
    Uninitialized,
    /// Booted, no track playing.
    Idle,
    /// A track is actively streaming to the codec.
    Playing,
    /// Playback is temporarily suspended.
    Paused,
}

impl DeviceState {
    /// Whether the edge `self → requested` appears in the transition table.
    ///
    /// | From          | To       | Meaning            |
    /// |---------------|----------|--------------------|
    /// | Uninitialized | Idle     | successful boot    |
    /// | Idle          | Playing  | play request       |
    /// | Playing       | Paused   | pause request      |
    /// | Paused        | Playing  | resume request     |
    /// | any           | Idle     | stop / eject       |
    ///
    /// `Uninitialized` is never a valid target.
    pub fn can_transition_to(self, requested: DeviceState) -> bool {
        match (self, requested) {
            (_, DeviceState::Uninitialized) => false,
            (_, DeviceState::Idle) => true,
            (DeviceState::Idle | DeviceState::Paused, DeviceState::Playing) => true,
            (DeviceState::Playing, DeviceState::Paused) => true,
            _ => false,
        }
    }

    /// Short label for logs and the status display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "booting",
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// Errors returned by transition requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionError {
    /// The requested edge is not in the transition table. Recovered
    /// locally: the request is logged and dropped.
    Illegal,
    /// A transition into `Playing` was requested before the codec feed
    /// task reported ready.
    CodecNotReady,
}

/// Pure state machine: one `(current, previous)` pair plus the edge table.
///
/// `Copy` so the shared wrapper can move whole snapshots in and out of its
/// critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMachine {
    current: DeviceState,
    previous: DeviceState,
}

impl StateMachine {
    /// Create a machine in the power-on state.
    pub const fn new() -> Self {
        Self {
            current: DeviceState::Uninitialized,
            previous: DeviceState::Uninitialized,
        }
    }

    /// The latest applied state.
    pub fn current(self) -> DeviceState {
        self.current
    }

    /// The state before the latest applied transition.
    pub fn previous(self) -> DeviceState {
        self.previous
    }

    /// Apply `requested` if the edge is legal.
    ///
    /// On success, `previous := current; current := requested` as one step.
    /// On an illegal edge, returns `Err(TransitionError::Illegal)` and
    /// mutates nothing.
    pub fn request(&mut self, requested: DeviceState) -> Result<(), TransitionError> {
        if !self.current.can_transition_to(requested) {
            return Err(TransitionError::Illegal);
        }
        self.previous = self.current;
        self.current = requested;
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
