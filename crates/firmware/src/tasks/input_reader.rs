//! Input reader task — button polling, debounce, transition requests.
//!
//! Polls the physical buttons every [`P_INPUT`] and turns each debounced
//! press into a transition request on the shared state. Illegal requests
//! are logged and dropped — a pause press while idle is user noise, not a
//! fault.
//!
//! The button-to-action mapping is data ([`ButtonMap`]), not code: boards
//! with different front panels remap without touching the task.

use control::{DeviceState, SharedDeviceState};
use embassy_time::{Duration, Instant, Ticker};
use platform::DigitalInput;

/// Input polling period.
pub const P_INPUT: Duration = Duration::from_millis(50);

/// Minimum time a button must sit inactive before an active edge counts as
/// a press. Filters contact bounce and polling jitter.
pub const DEBOUNCE_STABLE: Duration = Duration::from_millis(30);

/// Number of front-panel buttons.
pub const NUM_BUTTONS: usize = 4;

/// What a button press asks the state machine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Toggle between `Playing` and `Paused` (starts playback when idle).
    PlayPause,
    /// Request `Playing` unconditionally.
    Play,
    /// Request `Paused` unconditionally.
    Pause,
    /// Stop / eject: request `Idle`.
    Stop,
}

/// Button-index → action mapping.
#[derive(Debug, Clone, Copy)]
pub struct ButtonMap<const N: usize> {
    actions: [ButtonAction; N],
}

impl<const N: usize> ButtonMap<N> {
    /// Create a map from an explicit action table.
    pub const fn new(actions: [ButtonAction; N]) -> Self {
        Self { actions }
    }

    /// Action for button `index`.
    pub fn action(&self, index: usize) -> ButtonAction {
        self.actions[index]
    }
}

impl ButtonMap<NUM_BUTTONS> {
    /// The stock front panel: play/pause toggle, play, pause, stop.
    pub const fn default_map() -> Self {
        Self::new([
            ButtonAction::PlayPause,
            ButtonAction::Play,
            ButtonAction::Pause,
            ButtonAction::Stop,
        ])
    }
}

/// Resolve an action against the current state into the requested target.
pub fn requested_state(action: ButtonAction, current: DeviceState) -> DeviceState {
    match action {
        ButtonAction::PlayPause => {
            if current == DeviceState::Playing {
                DeviceState::Paused
            } else {
                DeviceState::Playing
            }
        }
        ButtonAction::Play => DeviceState::Playing,
        ButtonAction::Pause => DeviceState::Paused,
        ButtonAction::Stop => DeviceState::Idle,
    }
}

/// Debounced button over a [`DigitalInput`].
///
/// Reports a press only on an inactive→active edge where the inactive
/// level had been stable for at least [`DEBOUNCE_STABLE`].
pub struct DebouncedButton<P> {
    pin: P,
    last_level: bool,
    changed_at: Instant,
}

impl<P: DigitalInput> DebouncedButton<P> {
    /// Wrap a pin, assuming it is inactive at `now`.
    pub fn new(pin: P, now: Instant) -> Self {
        Self {
            pin,
            last_level: false,
            changed_at: now,
        }
    }

    /// Sample the pin; returns `Ok(true)` exactly once per debounced press.
    pub fn poll(&mut self, now: Instant) -> Result<bool, P::Error> {
        let level = self.pin.is_active()?;
        let mut pressed = false;
        if level != self.last_level {
            if level && now.duration_since(self.changed_at) >= DEBOUNCE_STABLE {
                pressed = true;
            }
            self.last_level = level;
            self.changed_at = now;
        }
        Ok(pressed)
    }
}

/// The input reader task state.
pub struct InputReader<P, const N: usize> {
    buttons: [DebouncedButton<P>; N],
    map: ButtonMap<N>,
}

impl<P: DigitalInput, const N: usize> InputReader<P, N> {
    /// Build the reader from configured button inputs.
    pub fn new(pins: [P; N], map: ButtonMap<N>, now: Instant) -> Self {
        Self {
            buttons: pins.map(|pin| DebouncedButton::new(pin, now)),
            map,
        }
    }

    /// One polling cycle: sample every button and forward debounced presses
    /// as transition requests.
    pub fn poll_once(&mut self, shared: &SharedDeviceState, now: Instant) {
        for (index, button) in self.buttons.iter_mut().enumerate() {
            let pressed = match button.poll(now) {
                Ok(pressed) => pressed,
                Err(_error) => {
                    // A misreading pin degrades input, never the device.
                    #[cfg(feature = "defmt")]
                    defmt::warn!("button {=usize} read failed", index);
                    continue;
                }
            };
            if !pressed {
                continue;
            }
            let action = self.map.action(index);
            let requested = requested_state(action, shared.snapshot().current);
            match shared.transition(requested) {
                Ok(()) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!(
                        "button {=usize}: state -> {=str}",
                        index,
                        requested.label()
                    );
                }
                Err(_error) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "button {=usize}: request {=str} dropped",
                        index,
                        requested.label()
                    );
                }
            }
        }
    }

    /// The task loop. Latches the readiness flag, then polls forever.
    pub async fn run(mut self, shared: &SharedDeviceState) -> ! {
        // Buttons were configured at construction; tell the control unit.
        shared.input_reader_ready().set();
        let mut ticker = Ticker::every(P_INPUT);
        loop {
            ticker.next().await;
            self.poll_once(shared, Instant::now());
        }
    }
}
