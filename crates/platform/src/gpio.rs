//! Digital I/O capability
//!
//! Tasks never touch pins directly; they consume [`DigitalInput`] and
//! [`DigitalOutput`], which fold the electrical polarity (active-high vs
//! active-low wiring) into a logical "active" level. Mode configuration
//! (input vs output, pull resistors) happens at construction time in the
//! hardware layer — an adapter is built from an already-configured pin, so
//! a task can never observe a pin in the wrong mode.

/// Logical pin state, polarity already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// Asserted (logical 1 after polarity correction)
    Active,
    /// Deasserted
    Inactive,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::Active)
    }
}

/// Polarity-aware digital input.
pub trait DigitalInput {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read the logical level: `true` when the line is asserted.
    fn is_active(&mut self) -> Result<bool, Self::Error>;
}

/// Polarity-aware digital output.
pub trait DigitalOutput {
    /// Error type
    type Error: core::fmt::Debug;

    /// Drive the logical level: `true` asserts the line.
    fn set_active(&mut self, active: bool) -> Result<(), Self::Error>;
}

/// Lifts any `embedded_hal` 1.0 input pin into [`DigitalInput`].
pub struct InputPinAdapter<P> {
    pin: P,
    active_low: bool,
}

impl<P: embedded_hal::digital::InputPin> InputPinAdapter<P> {
    /// Wrap an active-high input (asserted = electrically high).
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Wrap an active-low input (asserted = electrically low), the usual
    /// wiring for buttons with internal pull-ups.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }
}

impl<P: embedded_hal::digital::InputPin> DigitalInput for InputPinAdapter<P> {
    type Error = P::Error;

    fn is_active(&mut self) -> Result<bool, Self::Error> {
        let high = self.pin.is_high()?;
        Ok(high != self.active_low)
    }
}

/// Lifts any `embedded_hal` 1.0 output pin into [`DigitalOutput`].
pub struct OutputPinAdapter<P> {
    pin: P,
    active_low: bool,
}

impl<P: embedded_hal::digital::OutputPin> OutputPinAdapter<P> {
    /// Wrap an active-high output.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Wrap an active-low output (asserted = driven low), e.g. a codec
    /// reset line.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }
}

impl<P: embedded_hal::digital::OutputPin> DigitalOutput for OutputPinAdapter<P> {
    type Error = P::Error;

    fn set_active(&mut self, active: bool) -> Result<(), Self::Error> {
        if active != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
