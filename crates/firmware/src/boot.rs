//! Boot sequence for the Lark MP3 player.
//!
//! Initialization order (MUST be respected — order matters for correctness):
//!   1. Create the shared device state (before any task can run)
//!   2. Configure + start the tick source (scheduler bookkeeping)
//!   3. Arm the independent watchdog
//!   4. Start the priority executors
//!   5. Spawn the control unit (which spawns the other tasks)
//!
//! The state starts `Uninitialized`; only the control unit moves it to
//! `Idle`, and only once both readiness flags have latched true.

use embassy_time::Duration;

/// Ordered list of boot sequence steps for documentation and testing.
///
/// The ordering of these strings encodes the required startup sequence.
/// Tests assert state-before-spawn ordering, and the entry point follows
/// this list.
///
/// # Correctness Invariants
///
/// - The shared state must exist BEFORE any task is spawned — every task
///   receives a `&'static` reference to it at spawn time.
/// - The tick source must be configured before `start()` (the driver
///   enforces this with `TickConfigError::NotConfigured`).
/// - Once the watchdog is armed it cannot be stopped; the control unit MUST
///   feed it every supervisory cycle.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Shared state: init SharedDeviceState in its StaticCell",
    "2. Tick source: configure divider, set frequency, register callback, start",
    "3. Watchdog: arm IWDG1 with the 8 s timeout",
    "4. Executors: start high + medium InterruptExecutors",
    "5. Control unit: spawn on the high executor; it spawns the rest",
];

/// Core clock after `embassy_stm32::init(Default::default())` — the 64 MHz
/// HSI oscillator, no PLL. The tick-source reload math is derived from this.
pub const CORE_CLOCK_HZ: u32 = 64_000_000;

/// Scheduler bookkeeping tick rate requested from the tick source.
pub const SCHEDULER_TICK_HZ: u32 = 1_000;

/// Watchdog timeout. The control unit feeds the IWDG every supervisory
/// cycle (50 ms), leaving two orders of magnitude of margin.
pub const WATCHDOG_TIMEOUT_MS: u32 = 8_000;

/// How long the control unit waits for both readiness flags before logging
/// a startup failure. The failure is reported, not fatal: a task that
/// recovers late still boots the device.
pub const STARTUP_READINESS_TIMEOUT: Duration = Duration::from_millis(500);

/// IWDG timeout in microseconds, as `IndependentWatchdog::new` expects.
pub const fn watchdog_timeout_us() -> u32 {
    WATCHDOG_TIMEOUT_MS * 1_000
}

// ─── Tests ────────────────────────────────────────────────────────────────────
