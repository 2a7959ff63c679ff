//! Tick-source capability
//!
//! The scheduler substrate is driven by a fixed-period hardware timer. This
//! module defines the capability surface plus the pure reload/frequency math;
//! the register-level driver lives in the firmware crate.
//!
//! # Callback contract
//!
//! The registered [`TickCallback`] runs in interrupt context, once per tick.
//! It must not block, allocate, or take task-level mutexes — shared state it
//! touches must use an interrupt-safe (disable/restore) path, bounded well
//! below one tick period.

use thiserror_no_std::Error;

/// Largest reload value the SysTick 24-bit down-counter accepts.
pub const SYST_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Typed tick callback.
///
/// Wraps a plain `fn()` so registration sites name the contract instead of
/// passing an anonymous function pointer around.
#[derive(Clone, Copy)]
pub struct TickCallback(fn());

impl TickCallback {
    /// Wrap `f` as a tick callback. `f` must honor the interrupt-context
    /// contract documented on this module.
    pub const fn new(f: fn()) -> Self {
        Self(f)
    }

    /// Invoke the callback. Called by the driver's interrupt handler only.
    pub fn invoke(self) {
        (self.0)();
    }
}

/// Errors from tick-source configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickConfigError {
    /// `start()` was called before `configure()`.
    #[error("tick source started before configure()")]
    NotConfigured,
}

/// Periodic timer capability consumed by the scheduler substrate.
///
/// Call order: [`configure`](TickSource::configure), then optionally
/// [`set_tick_frequency`](TickSource::set_tick_frequency) and
/// [`register_tick_callback`](TickSource::register_tick_callback), then
/// [`start`](TickSource::start).
pub trait TickSource {
    /// Select the input clock divider. Unsupported dividers are clamped to
    /// the nearest the hardware offers.
    fn configure(&mut self, divider: u32);

    /// Request a tick frequency in Hz; returns the nearest achievable
    /// frequency, which the hardware is then programmed for. Never fails —
    /// audio timing tolerates bounded drift, so out-of-range requests clamp.
    fn set_tick_frequency(&mut self, hz: u32) -> u32;

    /// Register the interrupt-context callback invoked once per tick.
    fn register_tick_callback(&mut self, callback: TickCallback);

    /// Start the timer. Fails only if `configure` has not run.
    fn start(&mut self) -> Result<(), TickConfigError>;
}

/// Reload value for `tick_hz` given the timer input clock, clamped to the
/// counter's valid range `1..=`[`SYST_RELOAD_MAX`].
///
/// A request of 0 Hz is treated as 1 Hz; requests faster than the input
/// clock clamp to the minimum reload.
pub fn reload_for(clk_hz: u32, divider: u32, tick_hz: u32) -> u32 {
    let input_hz = clk_hz / divider.max(1);
    let ticks = input_hz / tick_hz.max(1);
    ticks.saturating_sub(1).clamp(1, SYST_RELOAD_MAX)
}

/// Frequency actually produced by a given reload value.
pub fn achievable_hz(clk_hz: u32, divider: u32, reload: u32) -> u32 {
    let input_hz = clk_hz / divider.max(1);
    input_hz / reload.saturating_add(1)
}

/// Nearest clock divider the SysTick hardware supports (processor clock or
/// processor clock / 8).
pub fn nearest_supported_divider(divider: u32) -> u32 {
    if divider <= 4 {
        1
    } else {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE_HZ: u32 = 400_000_000;

    #[test]
    fn one_khz_tick_at_core_clock() {
        let reload = reload_for(CORE_HZ, 1, 1_000);
        assert_eq!(reload, 399_999);
        assert_eq!(achievable_hz(CORE_HZ, 1, reload), 1_000);
    }

    #[test]
    fn too_slow_request_clamps_to_counter_range() {
        // 1 Hz at 400 MHz needs a reload of 399 999 999 — far past 24 bits.
        let reload = reload_for(CORE_HZ, 1, 1);
        assert_eq!(reload, SYST_RELOAD_MAX);
        // The nearest achievable frequency is ~23.8 Hz, not an error.
        let actual = achievable_hz(CORE_HZ, 1, reload);
        assert!(actual > 1);
    }

    #[test]
    fn too_fast_request_clamps_to_minimum_reload() {
        let reload = reload_for(CORE_HZ, 1, u32::MAX);
        assert_eq!(reload, 1);
    }

    #[test]
    fn zero_hz_request_is_treated_as_one() {
        assert_eq!(reload_for(CORE_HZ, 1, 0), reload_for(CORE_HZ, 1, 1));
    }

    #[test]
    fn divider_eight_scales_reload() {
        let divided = reload_for(CORE_HZ, 8, 1_000);
        assert_eq!(divided, 49_999);
        assert_eq!(achievable_hz(CORE_HZ, 8, divided), 1_000);
    }

    #[test]
    fn unsupported_dividers_snap_to_hardware_choices() {
        assert_eq!(nearest_supported_divider(1), 1);
        assert_eq!(nearest_supported_divider(2), 1);
        assert_eq!(nearest_supported_divider(7), 8);
        assert_eq!(nearest_supported_divider(8), 8);
        assert_eq!(nearest_supported_divider(100), 8);
    }

    #[test]
    fn callback_invokes_registered_fn() {
        use std::sync::atomic::{AtomicU32, Ordering};
        static CALLS: AtomicU32 = AtomicU32::new(0);
        fn bump() {
            CALLS.fetch_add(1, Ordering::Relaxed);
        }
        let cb = TickCallback::new(bump);
        cb.invoke();
        cb.invoke();
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);
    }
}
