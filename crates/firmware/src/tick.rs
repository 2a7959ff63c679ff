//! SysTick-backed tick source.
//!
//! [`SysTickSource`] implements the [`platform::tick::TickSource`] capability
//! on the Cortex-M SysTick timer: a fixed-period interrupt whose handler
//! invokes the registered [`TickCallback`]. The default callback,
//! [`scheduler_tick`], maintains the monotonic tick count that the control
//! unit reads for its heartbeat and runtime statistics.
//!
//! The handler holds the callback slot only for a copy-out under a
//! disable/restore critical section — it never touches the task-level state
//! mutex.

use core::sync::atomic::{AtomicU32, Ordering};

static SCHEDULER_TICKS: AtomicU32 = AtomicU32::new(0);

/// Default tick callback: bump the monotonic scheduler tick count.
///
/// Interrupt-context safe: one relaxed atomic increment, no locks, no
/// allocation. Relaxed ordering suffices on the single-core target.
pub fn scheduler_tick() {
    SCHEDULER_TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Monotonic count of scheduler ticks since [`scheduler_tick`] was
/// registered and the tick source started. Wraps after ~49 days at 1 kHz.
pub fn tick_count() -> u32 {
    SCHEDULER_TICKS.load(Ordering::Relaxed)
}

#[cfg(feature = "hardware")]
mod systick {
    //! Register-level SysTick driver. Only compiled when targeting real
    //! hardware (`--features hardware`).

    use core::cell::Cell;

    use cortex_m::peripheral::syst::SystClkSource;
    use cortex_m::peripheral::SYST;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::blocking_mutex::Mutex;
    use platform::tick::{self, TickCallback, TickConfigError, TickSource};

    /// Callback slot read by the SysTick handler. The handler copies the
    /// `Option<TickCallback>` out under a disable/restore critical section
    /// (a couple of loads) and invokes the copy afterwards.
    static TICK_CALLBACK: Mutex<CriticalSectionRawMutex, Cell<Option<TickCallback>>> =
        Mutex::new(Cell::new(None));

    /// SysTick-based [`TickSource`]. One instance exists; it owns the SYST
    /// peripheral for the lifetime of the process.
    pub struct SysTickSource {
        syst: SYST,
        clk_hz: u32,
        divider: Option<u32>,
        reload: u32,
    }

    impl SysTickSource {
        /// Take ownership of the SYST peripheral. `clk_hz` is the processor
        /// clock the reload math is derived from.
        pub fn new(syst: SYST, clk_hz: u32) -> Self {
            Self {
                syst,
                clk_hz,
                divider: None,
                reload: tick::SYST_RELOAD_MAX,
            }
        }
    }

    impl TickSource for SysTickSource {
        fn configure(&mut self, divider: u32) {
            // SysTick offers processor clock or processor clock / 8; other
            // requests clamp to the nearest supported divider.
            self.divider = Some(tick::nearest_supported_divider(divider));
        }

        fn set_tick_frequency(&mut self, hz: u32) -> u32 {
            let divider = self.divider.unwrap_or(1);
            self.reload = tick::reload_for(self.clk_hz, divider, hz);
            tick::achievable_hz(self.clk_hz, divider, self.reload)
        }

        fn register_tick_callback(&mut self, callback: TickCallback) {
            TICK_CALLBACK.lock(|slot| slot.set(Some(callback)));
        }

        fn start(&mut self) -> Result<(), TickConfigError> {
            let Some(divider) = self.divider else {
                return Err(TickConfigError::NotConfigured);
            };
            let source = if divider == 1 {
                SystClkSource::Core
            } else {
                SystClkSource::External
            };
            self.syst.set_clock_source(source);
            self.syst.set_reload(self.reload);
            self.syst.clear_current();
            self.syst.enable_interrupt();
            self.syst.enable_counter();
            Ok(())
        }
    }

    #[cortex_m_rt::exception]
    fn SysTick() {
        // Copy the slot out, then run the callback outside the critical
        // section — the callback's own contract keeps it interrupt-safe.
        let callback = TICK_CALLBACK.lock(Cell::get);
        if let Some(callback) = callback {
            callback.invoke();
        }
    }
}

#[cfg(feature = "hardware")]
pub use systick::SysTickSource;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_tick_advances_monotonic_count() {
        let before = tick_count();
        scheduler_tick();
        scheduler_tick();
        assert_eq!(tick_count(), before + 2);
    }
}
